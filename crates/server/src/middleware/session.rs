//! Session middleware configuration.
//!
//! Sessions are stored in `PostgreSQL` and identified by a signed cookie.
//! They hold the signed-in user, the cart, the chat conversation and the
//! preferred language.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ShetiConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sheti_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Error building the session layer.
#[derive(Debug, thiserror::Error)]
#[error("session secret cannot be used as a signing key: {0}")]
pub struct SessionKeyError(String);

/// Create the session layer with the `PostgreSQL` store.
///
/// # Errors
///
/// Returns an error if the session secret is too short to sign cookies.
pub fn create_session_layer(
    pool: &PgPool,
    config: &ShetiConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, SessionKeyError> {
    // The session table must be created via migration
    let store = PostgresStore::new(pool.clone());
    session_layer(store, &config.base_url, &config.session_secret)
}

/// Create the session layer over any store.
///
/// Cookies are marked secure when `base_url` is https.
///
/// # Errors
///
/// Returns an error if the secret is shorter than 64 bytes.
pub fn session_layer<S: SessionStore>(
    store: S,
    base_url: &str,
    secret: &SecretString,
) -> Result<SessionManagerLayer<S, SignedCookie>, SessionKeyError> {
    let key = Key::try_from(secret.expose_secret().as_bytes())
        .map_err(|e| SessionKeyError(e.to_string()))?;

    let is_secure = base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

#[cfg(test)]
mod tests {
    use tower_sessions::MemoryStore;

    use super::*;

    #[test]
    fn test_short_secret_is_rejected() {
        let secret = SecretString::from("too-short");
        let result = session_layer(MemoryStore::default(), "http://localhost:3000", &secret);
        assert!(result.is_err());
    }

    #[test]
    fn test_long_secret_builds_layer() {
        let secret = SecretString::from("k".repeat(64));
        let result = session_layer(MemoryStore::default(), "https://shetiman.app", &secret);
        assert!(result.is_ok());
    }
}
