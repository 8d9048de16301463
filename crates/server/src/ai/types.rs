//! Provider-neutral request and response types.

use serde::{Deserialize, Serialize};

use super::ProviderKind;

/// Which model family a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Text,
    Vision,
}

/// Base64 image sent inline with a prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64 payload without any `data:` prefix
    pub data: String,
}

impl ImageInput {
    /// `data:` URI form used by OpenAI-compatible APIs.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image(ImageInput),
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    /// Ground the answer with web search where the provider supports it
    pub web_search: bool,
    /// JSON schema the answer must follow
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Single-prompt text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            tier: ModelTier::Text,
            system: None,
            turns: vec![Turn::user(prompt)],
            web_search: false,
            response_schema: None,
        }
    }

    /// Image first, then the prompt.
    pub fn vision(prompt: impl Into<String>, image: ImageInput) -> Self {
        Self {
            tier: ModelTier::Vision,
            system: None,
            turns: vec![Turn {
                speaker: Speaker::User,
                parts: vec![Part::Image(image), Part::Text(prompt.into())],
            }],
            web_search: false,
            response_schema: None,
        }
    }

    /// Multi-turn chat request. `turns` must end with the user's message.
    pub fn conversation(system: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            tier: ModelTier::Text,
            system: Some(system.into()),
            turns,
            web_search: false,
            response_schema: None,
        }
    }

    #[must_use]
    pub const fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    #[must_use]
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A web page the answer was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub text: String,
    pub sources: Vec<Source>,
    #[serde(skip)]
    pub provider: ProviderKind,
}

impl Generation {
    #[must_use]
    pub const fn new(text: String, sources: Vec<Source>, provider: ProviderKind) -> Self {
        Self {
            text,
            sources,
            provider,
        }
    }
}
