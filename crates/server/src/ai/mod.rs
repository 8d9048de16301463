//! Generative AI providers and the farming advisor built on them.
//!
//! # Providers
//!
//! - [`GeminiClient`] - text, vision, JSON, search grounding, speech
//! - [`OpenRouterClient`] - text, vision, JSON (no speech)
//!
//! [`Assistant`] tries providers in the configured order with exponential
//! backoff per provider ([`retry::with_retry`]).

pub mod assistant;
pub mod error;
pub mod gemini;
pub mod openrouter;
pub mod prompts;
pub mod provider;
pub mod retry;
pub mod types;

pub use assistant::{Assistant, WeatherWording};
pub use error::{AiError, FailureKind};
pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;
pub use prompts::{CalculatorForm, FertilizerForm};
pub use provider::{Provider, ProviderKind};
pub use types::{Generation, GenerationRequest, ImageInput, ModelTier, Part, Source, Speaker, Turn};
