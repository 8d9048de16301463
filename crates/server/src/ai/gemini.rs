//! Gemini `generateContent` REST client.
//!
//! Covers plain text, inline images, JSON-schema output, Google Search
//! grounding, multi-turn chat and speech synthesis. Several API keys can be
//! configured; each request takes the next key round-robin.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::ProviderKind;
use super::error::{self, AiError};
use super::types::{Generation, GenerationRequest, ModelTier, Part, Source, Speaker};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROVIDER: ProviderKind = ProviderKind::Gemini;

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    base_url: String,
    api_keys: Vec<SecretString>,
    next_key: AtomicUsize,
    text_model: String,
    vision_model: String,
    tts_model: String,
    tts_voice: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("keys", &self.inner.api_keys.len())
            .field("text_model", &self.inner.text_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Result<Self, AiError> {
        Self::with_base_url(config, timeout, GEMINI_API_URL)
    }

    /// Create a client against a different API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        config: &GeminiConfig,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                api_keys: config.api_keys.clone(),
                next_key: AtomicUsize::new(0),
                text_model: config.text_model.clone(),
                vision_model: config.vision_model.clone(),
                tts_model: config.tts_model.clone(),
                tts_voice: config.tts_voice.clone(),
            }),
        })
    }

    /// Next API key in rotation.
    fn api_key(&self) -> Result<&SecretString, AiError> {
        let keys = &self.inner.api_keys;
        if keys.is_empty() {
            return Err(AiError::InvalidApiKey { provider: PROVIDER });
        }
        let index = self.inner.next_key.fetch_add(1, Ordering::Relaxed) % keys.len();
        keys.get(index)
            .ok_or(AiError::InvalidApiKey { provider: PROVIDER })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Text => &self.inner.text_model,
            ModelTier::Vision => &self.inner.vision_model,
        }
    }

    /// Generate content for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, or the response has no text.
    #[instrument(skip(self, request), fields(provider = "gemini", model = %self.model_for(request.tier)))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, AiError> {
        let body = build_body(request);
        let response = self.post(self.model_for(request.tier), &body).await?;
        parse_generation(&response)
    }

    /// Synthesize speech with the configured prebuilt voice.
    ///
    /// Returns base64 encoded 16-bit PCM at 24 kHz.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no audio comes back.
    #[instrument(skip(self, text), fields(provider = "gemini", model = %self.inner.tts_model, chars = text.chars().count()))]
    pub async fn speak(&self, text: &str) -> Result<String, AiError> {
        let body = build_speech_body(text, &self.inner.tts_voice);
        let response = self.post(&self.inner.tts_model, &body).await?;
        parse_audio(&response)
    }

    async fn post(
        &self,
        model: &str,
        body: &GenerateContentBody<'_>,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = format!("{}/{model}:generateContent", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key()?.expose_secret())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error::from_response(PROVIDER, response).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| AiError::Parse {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
struct ResponseInlineData {
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

fn wire_parts(parts: &[Part]) -> Vec<WirePart<'_>> {
    parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => WirePart {
                text: Some(text),
                inline_data: None,
            },
            Part::Image(image) => WirePart {
                text: None,
                inline_data: Some(WireInlineData {
                    mime_type: &image.mime_type,
                    data: &image.data,
                }),
            },
        })
        .collect()
}

fn build_body(request: &GenerationRequest) -> GenerateContentBody<'_> {
    let contents = request
        .turns
        .iter()
        .map(|turn| WireContent {
            role: Some(match turn.speaker {
                Speaker::User => "user",
                Speaker::Model => "model",
            }),
            parts: wire_parts(&turn.parts),
        })
        .collect();

    let system_instruction = request.system.as_deref().map(|text| WireContent {
        role: None,
        parts: vec![WirePart {
            text: Some(text),
            inline_data: None,
        }],
    });

    let tools = if request.web_search {
        vec![WireTool {
            google_search: serde_json::Map::new(),
        }]
    } else {
        Vec::new()
    };

    let generation_config = request
        .response_schema
        .as_ref()
        .map(|schema| GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            ..GenerationConfig::default()
        });

    GenerateContentBody {
        contents,
        system_instruction,
        tools,
        generation_config,
    }
}

fn build_speech_body<'a>(text: &'a str, voice: &str) -> GenerateContentBody<'a> {
    GenerateContentBody {
        contents: vec![WireContent {
            role: None,
            parts: vec![WirePart {
                text: Some(text),
                inline_data: None,
            }],
        }],
        system_instruction: None,
        tools: Vec::new(),
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["AUDIO"],
            speech_config: Some(serde_json::json!({
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            })),
            ..GenerationConfig::default()
        }),
    }
}

fn parse_generation(response: &GenerateContentResponse) -> Result<Generation, AiError> {
    let candidate = response
        .candidates
        .first()
        .ok_or(AiError::EmptyResponse { provider: PROVIDER })?;

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse { provider: PROVIDER });
    }

    let sources = candidate
        .grounding_metadata
        .iter()
        .flat_map(|m| m.grounding_chunks.iter())
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.clone()?;
            Some(Source {
                title: web.title.clone().unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect();

    Ok(Generation::new(text, sources, PROVIDER))
}

fn parse_audio(response: &GenerateContentResponse) -> Result<String, AiError> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.inline_data.as_ref())
        .map(|d| d.data.clone())
        .filter(|d| !d.is_empty())
        .ok_or(AiError::EmptyResponse { provider: PROVIDER })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ai::types::{ImageInput, Turn};

    #[test]
    fn test_build_body_text_with_search() {
        let request = GenerationRequest::text("Recommend compost").with_web_search();
        let body = serde_json::to_value(build_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Recommend compost"}]}],
                "tools": [{"googleSearch": {}}]
            })
        );
    }

    #[test]
    fn test_build_body_vision_and_schema() {
        let request = GenerationRequest::vision(
            "Diagnose",
            ImageInput {
                mime_type: "image/png".to_owned(),
                data: "iVBOR".to_owned(),
            },
        )
        .with_response_schema(json!({"type": "OBJECT"}));
        let body = serde_json::to_value(build_body(&request)).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0],
            json!({"inlineData": {"mimeType": "image/png", "data": "iVBOR"}})
        );
        assert_eq!(body["contents"][0]["parts"][1], json!({"text": "Diagnose"}));
        assert_eq!(
            body["generationConfig"],
            json!({"responseMimeType": "application/json", "responseSchema": {"type": "OBJECT"}})
        );
    }

    #[test]
    fn test_build_body_chat_roles_and_system() {
        let request = GenerationRequest::conversation(
            "You are helpful",
            vec![Turn::user("hi"), Turn::model("hello"), Turn::user("neem oil?")],
        );
        let body = serde_json::to_value(build_body(&request)).unwrap();
        assert_eq!(body["systemInstruction"], json!({"parts": [{"text": "You are helpful"}]}));
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_build_speech_body() {
        let body = serde_json::to_value(build_speech_body("Namaste", "Kore")).unwrap();
        assert_eq!(body["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
        assert!(body["contents"][0].get("role").is_none());
    }

    #[test]
    fn test_parse_generation_with_sources() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Use "}, {"text": "vermicompost."}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://icar.org.in", "title": "ICAR"}},
                    {"retrievedContext": {}}
                ]}
            }]
        }))
        .unwrap();
        let generation = parse_generation(&response).unwrap();
        assert_eq!(generation.text, "Use vermicompost.");
        assert_eq!(
            generation.sources,
            vec![Source {
                uri: "https://icar.org.in".to_owned(),
                title: "ICAR".to_owned()
            }]
        );
        assert_eq!(generation.provider, ProviderKind::Gemini);
    }

    #[test]
    fn test_parse_generation_empty_is_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(
            parse_generation(&response),
            Err(AiError::EmptyResponse { .. })
        ));
    }

    #[test]
    fn test_parse_audio() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAB"}}]}}]
        }))
        .unwrap();
        assert_eq!(parse_audio(&response).unwrap(), "AAAB");
    }

    #[test]
    fn test_api_keys_rotate() {
        let config = GeminiConfig {
            api_keys: vec![
                SecretString::from("key-a".to_string()),
                SecretString::from("key-b".to_string()),
            ],
            text_model: "m".to_owned(),
            vision_model: "m".to_owned(),
            tts_model: "m".to_owned(),
            tts_voice: "Kore".to_owned(),
        };
        let client = GeminiClient::new(&config, Duration::from_secs(5)).unwrap();
        let picked: Vec<String> = (0..3)
            .map(|_| client.api_key().unwrap().expose_secret().to_owned())
            .collect();
        assert_eq!(picked, ["key-a", "key-b", "key-a"]);
    }
}
