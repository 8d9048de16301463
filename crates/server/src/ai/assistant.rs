//! Farming advisor built on the configured AI providers.
//!
//! Each operation tries the providers in configured order. A provider gets
//! the full retry budget before the next one is tried; the first success
//! wins and the last error is returned when every provider fails.

use std::future::Future;

use serde::{Deserialize, Serialize};
use sheti_core::Language;
use tracing::{instrument, warn};

use crate::config::AiConfig;
use crate::services::weather::CurrentConditions;

use super::error::AiError;
use super::gemini::GeminiClient;
use super::openrouter::OpenRouterClient;
use super::prompts::{self, CalculatorForm, FertilizerForm};
use super::provider::{Provider, ProviderKind};
use super::retry::{RetryPolicy, with_retry};
use super::types::{Generation, GenerationRequest, ImageInput, Turn};

/// Something that can be named in logs while falling back.
pub trait Backend: Clone {
    fn kind(&self) -> ProviderKind;
}

impl Backend for Provider {
    fn kind(&self) -> ProviderKind {
        Self::kind(self)
    }
}

/// Run `call` against each backend in order until one succeeds.
///
/// # Errors
///
/// Returns the last backend's error, or [`AiError::NoProviders`] when
/// `backends` is empty.
pub async fn first_success<P, T, F, Fut>(
    backends: &[P],
    policy: &RetryPolicy,
    mut call: F,
) -> Result<T, AiError>
where
    P: Backend,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut last_error = None;

    for backend in backends {
        match with_retry(policy, || call(backend.clone())).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(provider = %backend.kind(), error = %e, "AI provider failed, trying next");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(AiError::NoProviders))
}

/// Localized weather wording returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherWording {
    pub condition: String,
    pub recommendation: String,
    pub location: String,
}

/// AI-backed farming advisor.
#[derive(Debug, Clone)]
pub struct Assistant {
    providers: Vec<Provider>,
    retry: RetryPolicy,
}

impl Assistant {
    #[must_use]
    pub const fn new(providers: Vec<Provider>, retry: RetryPolicy) -> Self {
        Self { providers, retry }
    }

    /// Build providers in the configured order, skipping unconfigured ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be constructed.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let mut providers = Vec::with_capacity(config.provider_order.len());
        for kind in &config.provider_order {
            match kind {
                ProviderKind::Gemini => {
                    if let Some(gemini) = &config.gemini {
                        providers.push(Provider::Gemini(GeminiClient::new(
                            gemini,
                            config.request_timeout,
                        )?));
                    }
                }
                ProviderKind::OpenRouter => {
                    if let Some(openrouter) = &config.openrouter {
                        providers.push(Provider::OpenRouter(OpenRouterClient::new(
                            openrouter,
                            config.request_timeout,
                        )?));
                    }
                }
            }
        }
        Ok(Self::new(providers, config.retry))
    }

    /// Providers in the order they are tried.
    pub fn provider_kinds(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.providers.iter().map(Provider::kind)
    }

    /// Run a request with fallback across providers.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, AiError> {
        first_success(&self.providers, &self.retry, |provider| async move {
            provider.generate(request).await
        })
        .await
    }

    /// Organic fertilizer advice for a crop and soil profile.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail.
    #[instrument(skip(self, form), fields(crop = %form.crop_name, lang = %lang))]
    pub async fn fertilizer_recommendation(
        &self,
        form: &FertilizerForm,
        lang: Language,
    ) -> Result<Generation, AiError> {
        let request = GenerationRequest::text(prompts::fertilizer(form, lang)).with_web_search();
        self.generate(&request).await
    }

    /// Diagnose a plant photo.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail.
    #[instrument(skip(self, image, notes), fields(mime = %image.mime_type, lang = %lang))]
    pub async fn analyze_crop_image(
        &self,
        image: ImageInput,
        notes: Option<&str>,
        lang: Language,
    ) -> Result<Generation, AiError> {
        let request = GenerationRequest::vision(prompts::crop_doctor(notes, lang), image);
        self.generate(&request).await
    }

    /// Quantity of a fertilizer for a plot.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail.
    #[instrument(skip(self, form), fields(crop = %form.crop_type, lang = %lang))]
    pub async fn calculate_fertilizer(
        &self,
        form: &CalculatorForm,
        lang: Language,
    ) -> Result<Generation, AiError> {
        let request = GenerationRequest::text(prompts::calculator(form, lang)).with_web_search();
        self.generate(&request).await
    }

    /// Localized description and farming tip for measured weather.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail, or a parse
    /// error when the answer is not the expected JSON.
    #[instrument(skip(self, conditions), fields(lang = %lang))]
    pub async fn describe_weather(
        &self,
        conditions: &CurrentConditions,
        lang: Language,
    ) -> Result<WeatherWording, AiError> {
        let request = GenerationRequest::text(prompts::weather(conditions, lang))
            .with_response_schema(prompts::weather_schema());
        let generation = self.generate(&request).await?;
        parse_json_answer(&generation)
    }

    /// Answer the next chat message given earlier turns.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when all providers fail.
    #[instrument(skip(self, history, message), fields(turns = history.len(), lang = %lang))]
    pub async fn chat(
        &self,
        history: &[Turn],
        message: &str,
        lang: Language,
    ) -> Result<Generation, AiError> {
        let mut turns = history.to_vec();
        turns.push(Turn::user(message));
        let request =
            GenerationRequest::conversation(prompts::chat_system(lang), turns).with_web_search();
        self.generate(&request).await
    }

    /// Read advice aloud.
    ///
    /// Returns base64 16-bit PCM, or `None` when no configured provider can
    /// synthesize speech.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when every speech provider fails.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn text_to_speech(&self, text: &str) -> Result<Option<String>, AiError> {
        let speakers: Vec<Provider> = self
            .providers
            .iter()
            .filter(|p| p.can_speak())
            .cloned()
            .collect();
        if speakers.is_empty() {
            return Ok(None);
        }

        let prompt = prompts::speech(text);
        let prompt = prompt.as_str();
        first_success(&speakers, &self.retry, |provider| async move {
            provider.speak(prompt).await
        })
        .await
        .map(Some)
    }
}

/// Parse a JSON answer, tolerating a Markdown code fence around it.
fn parse_json_answer<T: serde::de::DeserializeOwned>(generation: &Generation) -> Result<T, AiError> {
    let text = generation.text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(text);

    serde_json::from_str(body.trim()).map_err(|e| AiError::Parse {
        provider: generation.provider,
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone)]
    struct Fake(ProviderKind);

    impl Backend for Fake {
        fn kind(&self) -> ProviderKind {
            self.0
        }
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let calls = Mutex::new(Vec::new());
        let backends = [Fake(ProviderKind::Gemini), Fake(ProviderKind::OpenRouter)];

        let result = first_success(&backends, &instant(), |fake| {
            calls.lock().unwrap().push(fake.0);
            async move {
                match fake.0 {
                    ProviderKind::Gemini => Err(AiError::InvalidApiKey {
                        provider: ProviderKind::Gemini,
                    }),
                    ProviderKind::OpenRouter => Ok("answer"),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "answer");
        // Invalid keys are not retried, so Gemini is called once.
        assert_eq!(
            *calls.lock().unwrap(),
            [ProviderKind::Gemini, ProviderKind::OpenRouter]
        );
    }

    #[tokio::test]
    async fn test_retries_before_falling_back() {
        let calls = Mutex::new(Vec::new());
        let backends = [Fake(ProviderKind::Gemini), Fake(ProviderKind::OpenRouter)];

        let result: Result<(), _> = first_success(&backends, &instant(), |fake| {
            calls.lock().unwrap().push(fake.0);
            async move {
                Err(AiError::RateLimited {
                    provider: fake.0,
                    retry_after: None,
                })
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(AiError::RateLimited {
                provider: ProviderKind::OpenRouter,
                ..
            })
        ));
        assert_eq!(calls.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_no_backends() {
        let result: Result<(), _> =
            first_success::<Fake, _, _, _>(&[], &instant(), |_| async { Ok(()) }).await;
        assert!(matches!(result, Err(AiError::NoProviders)));
    }

    #[tokio::test]
    async fn test_speech_without_speaking_provider_is_none() {
        let assistant = Assistant::new(Vec::new(), instant());
        assert_eq!(assistant.text_to_speech("hello").await.unwrap(), None);
    }

    #[test]
    fn test_parse_json_answer_strips_fence() {
        let generation = Generation::new(
            "```json\n{\"condition\":\"Sunny\",\"recommendation\":\"Irrigate at dusk\",\"location\":\"Pune\"}\n```".to_owned(),
            Vec::new(),
            ProviderKind::OpenRouter,
        );
        let wording: WeatherWording = parse_json_answer(&generation).unwrap();
        assert_eq!(wording.location, "Pune");

        let bad = Generation::new("not json".to_owned(), Vec::new(), ProviderKind::Gemini);
        assert!(parse_json_answer::<WeatherWording>(&bad).is_err());
    }
}
