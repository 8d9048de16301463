//! Session-stored state.
//!
//! Users are never written to the database, so the session carries the
//! signed-in profile along with the cart and the chatbot conversation.

use serde::{Deserialize, Serialize};

use sheti_core::Language;

use crate::ai::{Speaker, Turn};

/// Session keys.
pub mod keys {
    /// Key for the signed-in [`sheti_core::User`].
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the [`sheti_core::Cart`].
    pub const CART: &str = "cart";

    /// Key for the [`super::ChatSession`].
    pub const CHAT: &str = "chat";

    /// Key for the preferred [`sheti_core::Language`].
    pub const LANGUAGE: &str = "language";
}

/// One stored message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Chatbot conversation kept between requests.
///
/// The system instruction names the answer language, so a conversation only
/// continues while the language stays the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub language: Option<Language>,
    pub turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Oldest turns are dropped beyond this many messages.
    pub const MAX_TURNS: usize = 40;

    /// The conversation to continue in `lang`; a fresh one if the language
    /// changed.
    #[must_use]
    pub fn continue_in(self, lang: Language) -> Self {
        if self.language == Some(lang) {
            self
        } else {
            Self {
                language: Some(lang),
                turns: Vec::new(),
            }
        }
    }

    /// History in the shape the providers expect.
    #[must_use]
    pub fn history(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .map(|turn| match turn.speaker {
                Speaker::User => Turn::user(turn.text.clone()),
                Speaker::Model => Turn::model(turn.text.clone()),
            })
            .collect()
    }

    /// Append a question and its answer.
    pub fn record(&mut self, question: &str, answer: &str) {
        self.turns.push(ChatTurn {
            speaker: Speaker::User,
            text: question.to_owned(),
        });
        self.turns.push(ChatTurn {
            speaker: Speaker::Model,
            text: answer.to_owned(),
        });

        let excess = self.turns.len().saturating_sub(Self::MAX_TURNS);
        if excess > 0 {
            self.turns.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_change_resets_history() {
        let mut chat = ChatSession::default().continue_in(Language::Mr);
        chat.record("पाऊस कधी?", "उद्या");
        assert_eq!(chat.turns.len(), 2);

        let same = chat.clone().continue_in(Language::Mr);
        assert_eq!(same.turns.len(), 2);

        let switched = chat.continue_in(Language::En);
        assert!(switched.turns.is_empty());
        assert_eq!(switched.language, Some(Language::En));
    }

    #[test]
    fn test_history_keeps_speaker_order() {
        let mut chat = ChatSession::default().continue_in(Language::En);
        chat.record("hello", "namaste");
        let history = chat.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[1].speaker, Speaker::Model);
        assert_eq!(history[1].text(), "namaste");
    }

    #[test]
    fn test_history_is_capped() {
        let mut chat = ChatSession::default().continue_in(Language::Hi);
        for i in 0..30 {
            chat.record(&format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(chat.turns.len(), ChatSession::MAX_TURNS);
        assert_eq!(chat.turns[0].speaker, Speaker::User);
        assert_eq!(chat.turns[0].text, "q10");
    }
}
