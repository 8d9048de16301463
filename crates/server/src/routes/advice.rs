//! AI advisor endpoints: fertilizer, dosage, crop doctor and weather.

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use sheti_core::i18n::translate;
use tracing::instrument;

use super::MAX_IMAGE_BYTES;
use crate::ai::{CalculatorForm, FertilizerForm, Generation, ImageInput};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Lang;
use crate::services::Weather;
use crate::state::AppState;

fn require_complete(missing: Option<&'static str>) -> Result<()> {
    missing.map_or(Ok(()), |field| {
        Err(AppError::BadRequest(format!("`{field}` is required")))
    })
}

/// Organic fertilizer recommendation for a soil profile.
#[instrument(skip(state, form), fields(crop = %form.crop_name))]
pub async fn fertilizer(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Json(form): Json<FertilizerForm>,
) -> Result<Json<Generation>> {
    require_complete(form.missing_field())?;
    add_breadcrumb(
        "advice",
        "Fertilizer recommendation",
        Some(&[("crop", form.crop_name.as_str()), ("lang", lang.code())]),
    );

    state
        .assistant()
        .fertilizer_recommendation(&form, lang)
        .await
        .map(Json)
        .map_err(|e| AppError::ai(e, lang))
}

/// Fertilizer quantity for a plot.
#[instrument(skip(state, form), fields(crop = %form.crop_type))]
pub async fn calculator(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Json(form): Json<CalculatorForm>,
) -> Result<Json<Generation>> {
    require_complete(form.missing_field())?;
    add_breadcrumb(
        "advice",
        "Fertilizer calculator",
        Some(&[("crop", form.crop_type.as_str()), ("lang", lang.code())]),
    );

    state
        .assistant()
        .calculate_fertilizer(&form, lang)
        .await
        .map(Json)
        .map_err(|e| AppError::ai(e, lang))
}

/// Diagnose a plant photo.
///
/// Expects a multipart body with an `image` file part (`image/*`, at most
/// 8 MiB) and an optional `notes` text part.
#[instrument(skip(state, multipart))]
pub async fn crop_doctor(
    State(state): State<AppState>,
    Lang(lang): Lang,
    mut multipart: Multipart,
) -> Result<Json<Generation>> {
    let mut image = None;
    let mut notes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let mime_type = field.content_type().unwrap_or_default().to_owned();
                if !mime_type.starts_with("image/") {
                    return Err(AppError::BadRequest(format!(
                        "expected an image, got `{mime_type}`"
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(
                        "image must be at most 8 MiB".to_string(),
                    ));
                }
                image = Some(ImageInput {
                    mime_type,
                    data: STANDARD.encode(&bytes),
                });
            }
            Some("notes") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                notes = Some(text);
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| {
        AppError::BadRequest(translate(lang, "errors.imageRequired").to_string())
    })?;
    let notes = notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

    state
        .assistant()
        .analyze_crop_image(image, notes, lang)
        .await
        .map(Json)
        .map_err(|e| AppError::ai(e, lang))
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Current weather near the farmer, worded in their language.
#[instrument(skip(state))]
pub async fn weather(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Weather>> {
    state
        .weather()
        .current(query.lat, query.lng, lang)
        .await
        .map(Json)
        .map_err(|e| AppError::weather(e, lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_form_is_bad_request() {
        let form = CalculatorForm {
            land_size: "2".to_string(),
            crop_type: String::new(),
            fertilizer_type: "Urea".to_string(),
        };
        match require_complete(form.missing_field()) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("cropType")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
