//! `OpenRouter` chat completions client (OpenAI-compatible).

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::OpenRouterConfig;

use super::ProviderKind;
use super::error::{self, AiError};
use super::types::{Generation, GenerationRequest, ModelTier, Part, Speaker};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const APP_TITLE: &str = "Sheti Man";
const PROVIDER: ProviderKind = ProviderKind::OpenRouter;

/// `OpenRouter` API client.
#[derive(Clone)]
pub struct OpenRouterClient {
    inner: Arc<OpenRouterClientInner>,
}

struct OpenRouterClientInner {
    client: reqwest::Client,
    url: String,
    model: String,
    vision_model: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.inner.model)
            .field("vision_model", &self.inner.vision_model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a new `OpenRouter` client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &OpenRouterConfig, timeout: Duration) -> Result<Self, AiError> {
        let bearer = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|_| AiError::InvalidApiKey { provider: PROVIDER })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("X-Title", HeaderValue::from_static(APP_TITLE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(OpenRouterClientInner {
                client,
                url: OPENROUTER_API_URL.to_string(),
                model: config.model.clone(),
                vision_model: config.vision_model.clone(),
            }),
        })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Text => &self.inner.model,
            ModelTier::Vision => &self.inner.vision_model,
        }
    }

    /// Run a chat completion.
    ///
    /// Web search grounding is not available here, so requests asking for it
    /// are answered from the model alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, or the completion is empty.
    #[instrument(skip(self, request), fields(provider = "openrouter", model = %self.model_for(request.tier)))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, AiError> {
        let body = build_body(self.model_for(request.tier), request);

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error::from_response(PROVIDER, response).await);
        }

        let text = response.text().await?;
        let completion: ChatCompletion =
            serde_json::from_str(&text).map_err(|e| AiError::Parse {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        parse_completion(completion)
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: WireContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(String),
    Parts(Vec<WirePart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn build_body<'a>(model: &'a str, request: &'a GenerationRequest) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(request.turns.len() + 1);

    let mut system = request.system.clone().unwrap_or_default();
    if let Some(schema) = &request.response_schema {
        // json_object mode does not carry a schema, so describe it.
        if !system.is_empty() {
            system.push_str("\n\n");
        }
        system.push_str("Respond only with a JSON object matching this schema: ");
        system.push_str(&schema.to_string());
    }
    if !system.is_empty() {
        messages.push(WireMessage {
            role: "system",
            content: WireContent::Text(system),
        });
    }

    for turn in &request.turns {
        let role = match turn.speaker {
            Speaker::User => "user",
            Speaker::Model => "assistant",
        };
        let has_image = turn.parts.iter().any(|p| matches!(p, Part::Image(_)));
        let content = if has_image {
            WireContent::Parts(
                turn.parts
                    .iter()
                    .map(|part| match part {
                        Part::Text(text) => WirePart::Text { text },
                        Part::Image(image) => WirePart::ImageUrl {
                            image_url: ImageUrl {
                                url: image.data_uri(),
                            },
                        },
                    })
                    .collect(),
            )
        } else {
            WireContent::Text(turn.text())
        };
        messages.push(WireMessage { role, content });
    }

    ChatCompletionRequest {
        model,
        messages,
        response_format: request.response_schema.as_ref().map(|_| ResponseFormat {
            format_type: "json_object",
        }),
    }
}

fn parse_completion(completion: ChatCompletion) -> Result<Generation, AiError> {
    let text = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AiError::EmptyResponse { provider: PROVIDER })?;

    Ok(Generation::new(text, Vec::new(), PROVIDER))
}
