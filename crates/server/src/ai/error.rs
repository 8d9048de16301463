//! AI provider errors and their user-facing classification.

use reqwest::StatusCode;
use serde::Deserialize;
use sheti_core::Language;
use sheti_core::i18n::translate;
use thiserror::Error;

use super::ProviderKind;

/// Errors that can occur when calling a generation API.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned 429.
    #[error("{provider} returned 429 (quota exceeded), retry after {retry_after:?}s")]
    RateLimited {
        provider: ProviderKind,
        retry_after: Option<u64>,
    },

    /// Provider is overloaded or down (5xx).
    #[error("{provider} unavailable ({status}): {message}")]
    Unavailable {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// Provider rejected the request.
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// Key missing, revoked or not allowed.
    #[error("{provider} rejected the API key")]
    InvalidApiKey { provider: ProviderKind },

    /// Response body did not have the expected shape.
    #[error("Failed to parse {provider} response: {message}")]
    Parse {
        provider: ProviderKind,
        message: String,
    },

    /// Provider answered without any content.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: ProviderKind },

    /// Provider cannot do what was asked.
    #[error("{provider} does not support {what}")]
    Unsupported {
        provider: ProviderKind,
        what: &'static str,
    },

    /// Nothing was configured that could serve the request.
    #[error("No AI provider available for this request")]
    NoProviders,
}

impl AiError {
    /// Whether the same call is worth repeating after a delay.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Unavailable { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("quota") || lower.contains("overloaded")
            }
            Self::InvalidApiKey { .. }
            | Self::Parse { .. }
            | Self::EmptyResponse { .. }
            | Self::Unsupported { .. }
            | Self::NoProviders => false,
        }
    }

    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Http(e) if e.is_connect() || e.is_timeout() => FailureKind::Network,
            Self::RateLimited { .. } => FailureKind::Quota,
            Self::InvalidApiKey { .. } => FailureKind::ApiKey,
            _ => FailureKind::classify(&self.to_string()),
        }
    }

    /// Localized message shown to the farmer.
    #[must_use]
    pub fn user_message(&self, lang: Language) -> String {
        self.failure_kind().user_message(lang)
    }
}

/// Error envelope shared by Gemini and OpenAI-compatible APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a non-success response into an [`AiError`].
pub(super) async fn from_response(provider: ProviderKind, response: reqwest::Response) -> AiError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());

    match response.text().await {
        Ok(body) => from_status(provider, status, retry_after, &body),
        Err(e) => AiError::Http(e),
    }
}

/// Map a status code and raw body to an [`AiError`].
pub(super) fn from_status(
    provider: ProviderKind,
    status: StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> AiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return AiError::RateLimited {
            provider,
            retry_after,
        };
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AiError::InvalidApiKey { provider };
    }

    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map_or_else(|_| body.trim().to_owned(), |e| e.error.message);

    if status.is_server_error() {
        AiError::Unavailable {
            provider,
            status: status.as_u16(),
            message,
        }
    } else {
        AiError::Api {
            provider,
            status: status.as_u16(),
            message,
        }
    }
}

/// Coarse failure category shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Quota,
    ApiKey,
    Network,
    /// First line of the raw message
    Other(String),
}

impl FailureKind {
    /// Classify a raw error message by the substrings providers use.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("quota") {
            Self::Quota
        } else if lower.contains("api key") || lower.contains("api_key") {
            Self::ApiKey
        } else if lower.contains("failed to fetch") {
            Self::Network
        } else {
            Self::Other(message.lines().next().unwrap_or_default().trim().to_owned())
        }
    }

    /// Translation key for the category, if it has one.
    #[must_use]
    pub const fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::Quota => Some("errors.serviceLimit"),
            Self::ApiKey => Some("errors.apiKey"),
            Self::Network => Some("errors.connection"),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn user_message(&self, lang: Language) -> String {
        match (self.message_key(), self) {
            (Some(key), _) => translate(lang, key).to_owned(),
            (None, Self::Other(line)) if !line.is_empty() => line.clone(),
            _ => translate(lang, "errors.connection").to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_substrings() {
        assert_eq!(
            FailureKind::classify("Resource has been exhausted (e.g. check quota)."),
            FailureKind::Quota
        );
        assert_eq!(FailureKind::classify("HTTP 429 Too Many"), FailureKind::Quota);
        assert_eq!(
            FailureKind::classify("API key not valid. Please pass a valid API key."),
            FailureKind::ApiKey
        );
        assert_eq!(
            FailureKind::classify("TypeError: Failed to fetch"),
            FailureKind::Network
        );
    }

    #[test]
    fn test_classify_other_keeps_first_line() {
        assert_eq!(
            FailureKind::classify("model not found\n  at line 3"),
            FailureKind::Other("model not found".to_owned())
        );
    }

    #[test]
    fn test_rate_limited_is_quota_and_transient() {
        let err = AiError::RateLimited {
            provider: ProviderKind::Gemini,
            retry_after: Some(2),
        };
        assert!(err.is_transient());
        assert_eq!(err.failure_kind(), FailureKind::Quota);
        assert_eq!(
            err.user_message(Language::En),
            translate(Language::En, "errors.serviceLimit")
        );
    }

    #[test]
    fn test_invalid_key_is_not_transient() {
        let err = AiError::InvalidApiKey {
            provider: ProviderKind::OpenRouter,
        };
        assert!(!err.is_transient());
        assert_eq!(
            err.user_message(Language::Hi),
            translate(Language::Hi, "errors.apiKey")
        );
    }

    #[test]
    fn test_from_status_maps_codes() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = from_status(ProviderKind::Gemini, StatusCode::BAD_REQUEST, None, body);
        assert!(!err.is_transient());
        assert_eq!(err.failure_kind(), FailureKind::ApiKey);

        let err = from_status(
            ProviderKind::Gemini,
            StatusCode::SERVICE_UNAVAILABLE,
            None,
            r#"{"error":{"message":"The model is overloaded."}}"#,
        );
        assert!(matches!(err, AiError::Unavailable { status: 503, .. }));
        assert!(err.is_transient());

        let err = from_status(ProviderKind::OpenRouter, StatusCode::TOO_MANY_REQUESTS, Some(7), "");
        assert!(matches!(
            err,
            AiError::RateLimited {
                retry_after: Some(7),
                ..
            }
        ));

        let err = from_status(ProviderKind::OpenRouter, StatusCode::UNAUTHORIZED, None, "nope");
        assert!(matches!(err, AiError::InvalidApiKey { .. }));
    }

    #[test]
    fn test_overloaded_api_error_is_transient() {
        let err = AiError::Api {
            provider: ProviderKind::Gemini,
            status: 400,
            message: "The model is overloaded. Please try again later.".to_owned(),
        };
        assert!(err.is_transient());
    }
}
