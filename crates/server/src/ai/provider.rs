//! Provider selection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::AiError;
use super::gemini::GeminiClient;
use super::openrouter::OpenRouterClient;
use super::types::{Generation, GenerationRequest};

/// Names a generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenRouter,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(format!("unknown AI provider `{other}`")),
        }
    }
}

/// A configured backend.
#[derive(Debug, Clone)]
pub enum Provider {
    Gemini(GeminiClient),
    OpenRouter(OpenRouterClient),
}

impl Provider {
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::OpenRouter(_) => ProviderKind::OpenRouter,
        }
    }

    /// Run one generation call.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, AiError> {
        match self {
            Self::Gemini(client) => client.generate(request).await,
            Self::OpenRouter(client) => client.generate(request).await,
        }
    }

    /// Synthesize speech, returning base64 16-bit PCM.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Unsupported`] for providers without speech output.
    pub async fn speak(&self, text: &str) -> Result<String, AiError> {
        match self {
            Self::Gemini(client) => client.speak(text).await,
            Self::OpenRouter(_) => Err(AiError::Unsupported {
                provider: ProviderKind::OpenRouter,
                what: "speech synthesis",
            }),
        }
    }

    #[must_use]
    pub const fn can_speak(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(
            " openrouter ".parse::<ProviderKind>().unwrap(),
            ProviderKind::OpenRouter
        );
        assert!("openai".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::OpenRouter.to_string(), "openrouter");
    }
}
