//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHETI_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SHETI_BASE_URL` - Public URL of the API
//! - `SHETI_SESSION_SECRET` - Session signing secret (min 64 chars, high entropy)
//! - `GEMINI_API_KEYS` (comma separated, `API_KEY` also accepted) and/or
//!   `OPENROUTER_API_KEY` - at least one AI provider must be configured
//!
//! ## Optional
//! - `SHETI_HOST` - Bind address (default: 127.0.0.1)
//! - `SHETI_PORT` - Listen port (default: 3000)
//! - `AI_PROVIDER_ORDER` - Provider priority (default: `gemini,openrouter`)
//! - `GEMINI_TEXT_MODEL` - Text model (default: gemini-3-flash-preview)
//! - `GEMINI_VISION_MODEL` - Image model (default: gemini-2.5-flash-image)
//! - `GEMINI_TTS_MODEL` - Speech model (default: gemini-2.5-flash-preview-tts)
//! - `GEMINI_TTS_VOICE` - Prebuilt voice (default: Kore)
//! - `OPENROUTER_MODEL` - Text model on `OpenRouter`
//! - `OPENROUTER_VISION_MODEL` - Image model on `OpenRouter`
//! - `AI_MAX_RETRIES` - Retries per provider (default: 3)
//! - `AI_RETRY_MIN_DELAY_MS` / `AI_RETRY_MAX_DELAY_MS` - Backoff bounds (default: 1000 / 8000)
//! - `AI_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 60)
//! - `GOOGLE_CLIENT_ID` - Expected audience of Google ID tokens
//! - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - Supabase auth for access-token login
//! - `SHETI_UTC_OFFSET_MINUTES` - Farmers' timezone for due dates (default: 330, India)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::FixedOffset;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::ai::ProviderKind;
use crate::ai::retry::RetryPolicy;

/// Signed session cookies need a 64-byte key.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_GEMINI_TEXT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_VISION_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_GEMINI_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_GEMINI_TTS_VOICE: &str = "Kore";
const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_OPENROUTER_VISION_MODEL: &str = "google/gemini-2.5-flash";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("No AI provider configured: set GEMINI_API_KEYS or OPENROUTER_API_KEY")]
    NoAiProvider,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ShetiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Generative AI providers
    pub ai: AiConfig,
    /// Identity providers for login
    pub identity: IdentityConfig,
    /// Offset from UTC used to decide what "today" is for due dates
    pub utc_offset: FixedOffset,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// AI provider configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini: Option<GeminiConfig>,
    pub openrouter: Option<OpenRouterConfig>,
    /// Providers in the order they are tried. Unconfigured ones are skipped.
    pub provider_order: Vec<ProviderKind>,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact API keys.
#[derive(Clone)]
pub struct GeminiConfig {
    /// One or more API keys, rotated round-robin per request
    pub api_keys: Vec<SecretString>,
    pub text_model: String,
    pub vision_model: String,
    pub tts_model: String,
    pub tts_voice: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_keys", &format!("[REDACTED x{}]", self.api_keys.len()))
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .finish()
    }
}

/// `OpenRouter` API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenRouterConfig {
    pub api_key: SecretString,
    pub model: String,
    pub vision_model: String,
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .finish()
    }
}

/// Login provider configuration.
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    /// Expected `aud` of Google ID tokens; unchecked when absent
    pub google_client_id: Option<String>,
    pub supabase: Option<SupabaseConfig>,
}

/// Supabase auth configuration.
///
/// Implements `Debug` manually to redact the anon key.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl ShetiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHETI_DATABASE_URL")?;
        let host = parse_env("SHETI_HOST", "127.0.0.1")?;
        let port = parse_env("SHETI_PORT", "3000")?;
        let base_url = get_required_env("SHETI_BASE_URL")?;
        let session_secret = get_validated_secret("SHETI_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SHETI_SESSION_SECRET")?;

        let offset_minutes: i32 = parse_env("SHETI_UTC_OFFSET_MINUTES", "330")?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SHETI_UTC_OFFSET_MINUTES".to_string(),
                    format!("{offset_minutes} is out of range"),
                )
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            ai: AiConfig::from_env()?,
            identity: IdentityConfig::from_env(),
            utc_offset,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AiConfig {
    /// Load provider keys and retry settings on their own.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider key is set or a setting is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_keys = get_optional_env("GEMINI_API_KEYS")
            .or_else(|| get_optional_env("API_KEY"))
            .map(|raw| split_keys(&raw))
            .unwrap_or_default();

        let gemini = (!gemini_keys.is_empty()).then(|| GeminiConfig {
            api_keys: gemini_keys,
            text_model: get_env_or_default("GEMINI_TEXT_MODEL", DEFAULT_GEMINI_TEXT_MODEL),
            vision_model: get_env_or_default("GEMINI_VISION_MODEL", DEFAULT_GEMINI_VISION_MODEL),
            tts_model: get_env_or_default("GEMINI_TTS_MODEL", DEFAULT_GEMINI_TTS_MODEL),
            tts_voice: get_env_or_default("GEMINI_TTS_VOICE", DEFAULT_GEMINI_TTS_VOICE),
        });

        let openrouter = get_optional_env("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|key| OpenRouterConfig {
                api_key: SecretString::from(key.trim().to_string()),
                model: get_env_or_default("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
                vision_model: get_env_or_default(
                    "OPENROUTER_VISION_MODEL",
                    DEFAULT_OPENROUTER_VISION_MODEL,
                ),
            });

        if gemini.is_none() && openrouter.is_none() {
            return Err(ConfigError::NoAiProvider);
        }

        let provider_order = parse_provider_order(&get_env_or_default(
            "AI_PROVIDER_ORDER",
            "gemini,openrouter",
        ))?;

        let retry = RetryPolicy {
            max_retries: parse_env("AI_MAX_RETRIES", "3")?,
            min_delay: Duration::from_millis(parse_env("AI_RETRY_MIN_DELAY_MS", "1000")?),
            max_delay: Duration::from_millis(parse_env("AI_RETRY_MAX_DELAY_MS", "8000")?),
        };

        Ok(Self {
            gemini,
            openrouter,
            provider_order,
            retry,
            request_timeout: Duration::from_secs(parse_env("AI_REQUEST_TIMEOUT_SECS", "60")?),
        })
    }
}

impl IdentityConfig {
    fn from_env() -> Self {
        let supabase = match (
            get_optional_env("SUPABASE_URL"),
            get_optional_env("SUPABASE_ANON_KEY"),
        ) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: SecretString::from(anon_key),
            }),
            _ => None,
        };

        Self {
            google_client_id: get_optional_env("GOOGLE_CLIENT_ID"),
            supabase,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split a comma separated key list, dropping blanks.
fn split_keys(raw: &str) -> Vec<SecretString> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| SecretString::from(k.to_string()))
        .collect()
}

/// Parse `AI_PROVIDER_ORDER`, rejecting unknown names and duplicates.
fn parse_provider_order(raw: &str) -> Result<Vec<ProviderKind>, ConfigError> {
    let mut order = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let kind: ProviderKind = name
            .parse()
            .map_err(|e: String| ConfigError::InvalidEnvVar("AI_PROVIDER_ORDER".to_string(), e))?;
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    if order.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "AI_PROVIDER_ORDER".to_string(),
            "must name at least one provider".to_string(),
        ));
    }
    Ok(order)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-session-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(64), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        let short = SecretString::from("k".repeat(32));
        assert!(validate_session_secret(&short, "TEST_SESSION").is_err());
        let long = SecretString::from("k".repeat(64));
        assert!(validate_session_secret(&long, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_split_keys_drops_blanks() {
        let keys = split_keys(" key-one , ,key-two,");
        let exposed: Vec<&str> = keys.iter().map(ExposeSecret::expose_secret).collect();
        assert_eq!(exposed, ["key-one", "key-two"]);
    }

    #[test]
    fn test_parse_provider_order() {
        assert_eq!(
            parse_provider_order("openrouter, gemini,openrouter").unwrap(),
            vec![ProviderKind::OpenRouter, ProviderKind::Gemini]
        );
        assert!(parse_provider_order("gemini,claude").is_err());
        assert!(parse_provider_order(" , ").is_err());
    }

    #[test]
    fn test_gemini_config_debug_redacts_keys() {
        let config = GeminiConfig {
            api_keys: vec![SecretString::from("AIzaSyVerySecretValue".to_string())],
            text_model: DEFAULT_GEMINI_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_GEMINI_VISION_MODEL.to_string(),
            tts_model: DEFAULT_GEMINI_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_GEMINI_TTS_VOICE.to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("gemini-3-flash-preview"));
        assert!(debug_output.contains("[REDACTED x1]"));
        assert!(!debug_output.contains("AIzaSyVerySecretValue"));
    }

    #[test]
    fn test_supabase_config_debug_redacts_key() {
        let config = SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: SecretString::from("anon-super-secret".to_string()),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abc.supabase.co"));
        assert!(!debug_output.contains("anon-super-secret"));
    }
}
