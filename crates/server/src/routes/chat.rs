//! Farming chatbot.
//!
//! The conversation lives in the session. Provider failures do not fail the
//! request: the chat window shows a localized apology as the bot's reply
//! and the conversation starts over.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sheti_core::i18n::translate;
use sheti_core::{Language, User};
use tower_sessions::Session;
use tracing::instrument;

use crate::ai::{AiError, FailureKind, Source};
use crate::db::QuestionRepository;
use crate::error::{AppError, Result};
use crate::middleware::{Lang, OptionalUser};
use crate::models::{ChatSession, session_keys};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub sources: Vec<Source>,
    /// Set when the reply is an error notice rather than an answer.
    pub failed: bool,
}

/// Bot text shown when the conversation could not continue.
#[must_use]
pub fn failure_reply(err: &AiError, lang: Language) -> String {
    let key = match err.failure_kind() {
        FailureKind::Quota => "errors.serviceLimit",
        _ => "errors.connection",
    };
    translate(lang, key).to_string()
}

async fn record_question(state: &AppState, user: Option<&User>, question: &str) {
    let Some(user) = user.filter(|u| !u.is_guest()) else {
        return;
    };
    if let Err(e) = QuestionRepository::new(state.pool())
        .record(user.owner_key(), question)
        .await
    {
        tracing::warn!(error = %e, "Failed to record chat question");
    }
}

/// Answer the next chat message.
#[instrument(skip(state, session, user, request))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Lang(lang): Lang,
    OptionalUser(user): OptionalUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    record_question(&state, user.as_ref(), message).await;

    let chat = session
        .get::<ChatSession>(session_keys::CHAT)
        .await?
        .unwrap_or_default()
        .continue_in(lang);

    match state.assistant().chat(&chat.history(), message, lang).await {
        Ok(generation) => {
            let mut chat = chat;
            chat.record(message, &generation.text);
            session.insert(session_keys::CHAT, &chat).await?;
            Ok(Json(ChatReply {
                reply: generation.text,
                sources: generation.sources,
                failed: false,
            }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Chat failed, resetting conversation");
            session.remove_value(session_keys::CHAT).await?;
            Ok(Json(ChatReply {
                reply: failure_reply(&e, lang),
                sources: Vec::new(),
                failed: true,
            }))
        }
    }
}

/// Start the conversation over.
pub async fn reset(session: Session) -> Result<StatusCode> {
    session.remove_value(session_keys::CHAT).await?;
    Ok(StatusCode::NO_CONTENT)
}
