//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Responses are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sheti_core::audio::AudioError;
use sheti_core::{CatalogError, Language, OrderError, TaskError};
use sheti_core::i18n::translate;
use thiserror::Error;

use crate::ai::AiError;
use crate::db::RepositoryError;
use crate::services::{IdentityError, WeatherError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Every AI provider failed. `message` is already localized.
    #[error("AI error: {source}")]
    Ai {
        source: AiError,
        message: String,
    },

    /// Weather lookup failed. `message` is already localized.
    #[error("Weather error: {source}")]
    Weather {
        source: WeatherError,
        message: String,
    },

    /// Login verification failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Synthesized audio could not be decoded.
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with the resource's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// A feature has no configured backend.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap an AI failure with the farmer-facing message for `lang`.
    #[must_use]
    pub fn ai(source: AiError, lang: Language) -> Self {
        let message = source.user_message(lang);
        Self::Ai { source, message }
    }

    /// Wrap a weather failure with the farmer-facing message for `lang`.
    #[must_use]
    pub fn weather(source: WeatherError, lang: Language) -> Self {
        let message = match &source {
            WeatherError::InvalidCoordinates(detail) => detail.clone(),
            _ => translate(lang, "errors.weather").to_string(),
        };
        Self::Weather { source, message }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Weather {
                source: WeatherError::InvalidCoordinates(_),
                ..
            }
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Ai { .. } | Self::Weather { .. } | Self::Audio(_) => StatusCode::BAD_GATEWAY,
            Self::Identity(err) => match err {
                IdentityError::InvalidToken(_) | IdentityError::AudienceMismatch => {
                    StatusCode::UNAUTHORIZED
                }
                IdentityError::NotConfigured(_) => StatusCode::NOT_IMPLEMENTED,
                IdentityError::Http(_) | IdentityError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::EmptyName
            | CatalogError::NegativePrice
            | CatalogError::PriceTooPrecise
            | CatalogError::PriceTooLarge => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            OrderError::EmptyCart | OrderError::MissingField(_) | OrderError::TotalTooLarge => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server-side failures to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Ai { message, .. } | Self::Weather { message, .. } => message.clone(),
            Self::Audio(_) => "Could not decode synthesized audio".to_string(),
            Self::Identity(err) => match err {
                IdentityError::InvalidToken(_) | IdentityError::AudienceMismatch => {
                    "Invalid credentials".to_string()
                }
                IdentityError::NotConfigured(_) => err.to_string(),
                IdentityError::Http(_) | IdentityError::Upstream { .. } => {
                    "Identity provider unavailable".to_string()
                }
            },
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::Unavailable(msg) => msg.clone(),
            Self::RateLimited => "Too many requests".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("advice", "Fertilizer recommendation", Some(&[("crop", "Tomato")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ProviderKind;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("task TASK-1".to_string());
        assert_eq!(err.to_string(), "Not found: task TASK-1");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Unavailable("test".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Identity(IdentityError::AudienceMismatch)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::weather(
                WeatherError::InvalidCoordinates("latitude 91".to_string()),
                Language::En
            )),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_core_errors_map_to_client_errors() {
        assert_eq!(
            get_status(CatalogError::NotFound(sheti_core::ProductId::new(9)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(CatalogError::EmptyName.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CatalogError::PriceTooPrecise.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CatalogError::PriceTooLarge.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::TotalTooLarge.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(TaskError::EmptyText.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(
                OrderError::InvalidTransition {
                    from: sheti_core::OrderStatus::Delivered,
                    to: sheti_core::OrderStatus::Pending,
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_ai_error_is_localized_bad_gateway() {
        let err = AppError::ai(
            AiError::RateLimited {
                provider: ProviderKind::Gemini,
                retry_after: None,
            },
            Language::Mr,
        );
        match &err {
            AppError::Ai { message, .. } => {
                assert_eq!(message, translate(Language::Mr, "errors.serviceLimit"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_server_message_keys_exist() {
        let known: Vec<&str> = sheti_core::i18n::keys().collect();
        for key in [
            "errors.serviceLimit",
            "errors.connection",
            "errors.apiKey",
            "errors.weather",
            "errors.imageRequired",
        ] {
            assert!(known.contains(&key), "missing translation key {key}");
        }
    }
}
