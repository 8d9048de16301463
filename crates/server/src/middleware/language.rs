//! Per-request answer language.

use axum::{
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use sheti_core::Language;
use tower_sessions::Session;

use crate::models::session_keys;

/// Language to answer the current request in.
///
/// Resolved from the `lang` query parameter, then the session preference,
/// then `Accept-Language`, and finally Marathi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lang(pub Language);

fn from_query(query: Option<&str>) -> Option<Language> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "lang")
        .and_then(|(_, value)| Language::from_code(&value))
}

fn from_header(parts: &Parts) -> Option<Language> {
    parts
        .headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(Language::from_accept_language)
}

impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(lang) = from_query(parts.uri.query()) {
            return Ok(Self(lang));
        }

        if let Some(session) = parts.extensions.get::<Session>()
            && let Ok(Some(lang)) = session.get::<Language>(session_keys::LANGUAGE).await
        {
            return Ok(Self(lang));
        }

        Ok(Self(from_header(parts).unwrap_or_default()))
    }
}

/// Remember a language for later requests.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_preferred_language(
    session: &Session,
    lang: Language,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LANGUAGE, lang).await
}
