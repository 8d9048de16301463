//! Localization endpoints.

use axum::{Json, extract::Path};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheti_core::{Language, i18n};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::set_preferred_language;

/// Every interface string for a language, nested by key segment.
pub async fn bundle(Path(code): Path<String>) -> Result<Json<Value>> {
    let lang = Language::from_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("unsupported language: {code}")))?;
    Ok(Json(i18n::bundle(lang)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageChoice {
    pub language: Language,
}

/// Remember the preferred language for this session.
pub async fn set_language(
    session: Session,
    Json(choice): Json<LanguageChoice>,
) -> Result<Json<LanguageChoice>> {
    set_preferred_language(&session, choice.language).await?;
    Ok(Json(choice))
}
