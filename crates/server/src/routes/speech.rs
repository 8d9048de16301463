//! Reading advice aloud.
//!
//! `/api/speech` answers with a payload for [`PlaybackPlan::for_input`]:
//! a PCM data URI when a provider synthesized speech, otherwise
//! [`BROWSER_TTS_SIGNAL`] so the client reads the text with its own voice.
//!
//! [`PlaybackPlan::for_input`]: sheti_core::audio::PlaybackPlan::for_input

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sheti_core::audio::{
    BROWSER_TTS_SIGNAL, DEFAULT_SAMPLE_RATE, decode_base64, decode_pcm16, encode_wav,
    pcm_data_uri,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::Lang;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SpeechPayload {
    pub audio: String,
}

impl SpeechPayload {
    fn fallback() -> Self {
        Self {
            audio: BROWSER_TTS_SIGNAL.to_string(),
        }
    }
}

fn require_text(request: &SpeechRequest) -> Result<&str> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("text cannot be empty".to_string()));
    }
    Ok(text)
}

/// Synthesize speech, falling back to the client's synthesizer.
#[instrument(skip(state, request))]
pub async fn speak(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SpeechPayload>> {
    let text = require_text(&request)?;

    let payload = match state.assistant().text_to_speech(text).await {
        Ok(Some(pcm)) => SpeechPayload {
            audio: pcm_data_uri(&pcm),
        },
        Ok(None) => SpeechPayload::fallback(),
        Err(e) => {
            tracing::warn!(error = %e, "Speech synthesis failed, using browser voice");
            SpeechPayload::fallback()
        }
    };
    Ok(Json(payload))
}

/// Synthesize speech as a playable WAV file.
#[instrument(skip(state, request))]
pub async fn wav(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Json(request): Json<SpeechRequest>,
) -> Result<Response> {
    let text = require_text(&request)?;

    let pcm = state
        .assistant()
        .text_to_speech(text)
        .await
        .map_err(|e| AppError::ai(e, lang))?
        .ok_or_else(|| AppError::Unavailable("no speech provider configured".to_string()))?;

    let bytes = decode_base64(&pcm)?;
    let buffer = decode_pcm16(&bytes, DEFAULT_SAMPLE_RATE, 1)?;
    let file = encode_wav(&buffer)?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], file).into_response())
}

#[cfg(test)]
mod tests {
    use sheti_core::audio::PlaybackPlan;

    use super::*;

    #[test]
    fn test_fallback_payload_is_spoken_by_client() {
        let payload = SpeechPayload::fallback();
        assert!(matches!(
            PlaybackPlan::for_input(&payload.audio),
            PlaybackPlan::Speak(_)
        ));
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let request = SpeechRequest {
            text: "   ".to_string(),
        };
        assert!(matches!(
            require_text(&request),
            Err(AppError::BadRequest(_))
        ));
    }
}
