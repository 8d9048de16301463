//! Sign-in through Google, Supabase, or as a guest.
//!
//! No passwords are handled here. Google ID tokens are checked with Google's
//! `tokeninfo` endpoint and Supabase access tokens with the project's
//! `/auth/v1/user` endpoint; the resulting profile lives in the session.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use sheti_core::{Email, Role, User};
use thiserror::Error;
use tracing::instrument;

use crate::config::{IdentityConfig, SupabaseConfig};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Errors verifying a login.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token was rejected or malformed.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token was issued for another application.
    #[error("Token audience does not match this application")]
    AudienceMismatch,

    /// The login method is not configured on this server.
    #[error("{0} login is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity provider failed.
    #[error("Identity provider error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl IdentityError {
    /// Whether the caller supplied bad credentials (as opposed to an outage).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::AudienceMismatch)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    user_metadata: SupabaseMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct SupabaseMetadata {
    full_name: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
    picture: Option<String>,
}

/// Verifies login tokens.
#[derive(Clone)]
pub struct IdentityService {
    inner: Arc<IdentityServiceInner>,
}

struct IdentityServiceInner {
    client: reqwest::Client,
    tokeninfo_url: String,
    google_client_id: Option<String>,
    supabase: Option<SupabaseConfig>,
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("google_client_id", &self.inner.google_client_id)
            .field("supabase", &self.inner.supabase)
            .finish_non_exhaustive()
    }
}

impl IdentityService {
    /// Create the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &IdentityConfig, timeout: Duration) -> Result<Self, IdentityError> {
        Ok(Self {
            inner: Arc::new(IdentityServiceInner {
                client: reqwest::Client::builder().timeout(timeout).build()?,
                tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
                google_client_id: config.google_client_id.clone(),
                supabase: config.supabase.clone(),
            }),
        })
    }

    /// A guest profile.
    #[must_use]
    pub fn guest(role: Role) -> User {
        User::guest(role)
    }

    /// Verify a Google ID token (the `credential` from Google Identity
    /// Services).
    ///
    /// # Errors
    ///
    /// Returns an error if Google rejects the token, the audience does not
    /// match `GOOGLE_CLIENT_ID`, or Google cannot be reached.
    #[instrument(skip(self, credential))]
    pub async fn google(&self, credential: &str, role: Role) -> Result<User, IdentityError> {
        if credential.trim().is_empty() {
            return Err(IdentityError::InvalidToken("empty credential".to_string()));
        }

        let url = url::Url::parse_with_params(&self.inner.tokeninfo_url, &[("id_token", credential)])
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_client_error() {
            return Err(IdentityError::InvalidToken(first_line(&body)));
        }
        if !status.is_success() {
            return Err(IdentityError::Upstream {
                status: status.as_u16(),
                message: first_line(&body),
            });
        }

        let info: GoogleTokenInfo = serde_json::from_str(&body)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        user_from_google(info, self.inner.google_client_id.as_deref(), role)
    }

    /// Verify a Supabase access token.
    ///
    /// # Errors
    ///
    /// Returns an error if Supabase is not configured, rejects the token, or
    /// cannot be reached.
    #[instrument(skip(self, access_token))]
    pub async fn supabase(&self, access_token: &str, role: Role) -> Result<User, IdentityError> {
        let supabase = self
            .inner
            .supabase
            .as_ref()
            .ok_or(IdentityError::NotConfigured("Supabase"))?;

        let response = self
            .inner
            .client
            .get(format!("{}/auth/v1/user", supabase.url))
            .header("apikey", supabase.anon_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_client_error() {
            return Err(IdentityError::InvalidToken(first_line(&body)));
        }
        if !status.is_success() {
            return Err(IdentityError::Upstream {
                status: status.as_u16(),
                message: first_line(&body),
            });
        }

        let user: SupabaseUser = serde_json::from_str(&body)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        Ok(user_from_supabase(user, role))
    }
}

fn first_line(body: &str) -> String {
    body.lines().next().unwrap_or_default().trim().to_string()
}

/// Lowercased provider email, or empty when it is missing or malformed so
/// that [`User::owner_key`] falls back to the account id.
fn normalized_email(raw: Option<String>) -> String {
    raw.and_then(|e| Email::parse(&e.to_lowercase()).ok())
        .map(Email::into_inner)
        .unwrap_or_default()
}

fn user_from_google(
    info: GoogleTokenInfo,
    expected_audience: Option<&str>,
    role: Role,
) -> Result<User, IdentityError> {
    if let Some(expected) = expected_audience
        && info.aud != expected
    {
        return Err(IdentityError::AudienceMismatch);
    }

    let email = normalized_email(info.email);
    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    Ok(User {
        id: info.sub,
        name,
        email,
        role,
        picture: info.picture,
        phone: None,
    })
}

fn user_from_supabase(user: SupabaseUser, role: Role) -> User {
    let email = normalized_email(user.email);
    let meta = user.user_metadata;
    let name = meta
        .full_name
        .or(meta.name)
        .filter(|n| !n.trim().is_empty())
        .or_else(|| {
            email
                .split('@')
                .next()
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
        .or_else(|| user.phone.clone())
        .unwrap_or_else(|| "Farmer".to_string());

    User {
        id: user.id,
        name,
        email,
        role,
        picture: meta.avatar_url.or(meta.picture),
        phone: user.phone.filter(|p| !p.is_empty()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token_info(aud: &str) -> GoogleTokenInfo {
        serde_json::from_value(serde_json::json!({
            "iss": "https://accounts.google.com",
            "aud": aud,
            "sub": "1098765",
            "email": "Priya.Patil@Gmail.com",
            "email_verified": "true",
            "name": "Priya Patil",
            "picture": "https://lh3.googleusercontent.com/a/xyz"
        }))
        .unwrap()
    }

    #[test]
    fn test_google_user_mapping() {
        let user = user_from_google(token_info("client-1"), Some("client-1"), Role::Farmer).unwrap();
        assert_eq!(user.id, "1098765");
        assert_eq!(user.email, "priya.patil@gmail.com");
        assert_eq!(user.name, "Priya Patil");
        assert_eq!(user.role, Role::Farmer);
        assert!(user.picture.is_some());
    }

    #[test]
    fn test_google_audience_checked_when_configured() {
        assert!(matches!(
            user_from_google(token_info("someone-else"), Some("client-1"), Role::Farmer),
            Err(IdentityError::AudienceMismatch)
        ));
        assert!(user_from_google(token_info("anything"), None, Role::Supplier).is_ok());
    }

    #[test]
    fn test_supabase_user_mapping() {
        let user: SupabaseUser = serde_json::from_value(serde_json::json!({
            "id": "6c1e-uuid",
            "aud": "authenticated",
            "email": "kisan@example.in",
            "phone": "",
            "user_metadata": {"full_name": "Kisan Rao", "avatar_url": "https://cdn/a.png"}
        }))
        .unwrap();
        let user = user_from_supabase(user, Role::Supplier);
        assert_eq!(user.name, "Kisan Rao");
        assert_eq!(user.picture.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(user.phone, None);
        assert!(user.is_supplier());
    }

    #[test]
    fn test_supabase_phone_only_user() {
        let user: SupabaseUser = serde_json::from_value(serde_json::json!({
            "id": "77aa",
            "phone": "919822000000"
        }))
        .unwrap();
        let user = user_from_supabase(user, Role::Farmer);
        assert_eq!(user.name, "919822000000");
        assert_eq!(user.owner_key(), "77aa");
    }

    #[test]
    fn test_malformed_email_is_dropped() {
        assert_eq!(normalized_email(Some("Asha@Farm.IN".into())), "asha@farm.in");
        assert_eq!(normalized_email(Some("not-an-email".into())), "");
        assert_eq!(normalized_email(None), "");
    }

    #[test]
    fn test_rejections() {
        assert!(IdentityError::AudienceMismatch.is_rejection());
        assert!(!IdentityError::NotConfigured("Supabase").is_rejection());
    }
}
