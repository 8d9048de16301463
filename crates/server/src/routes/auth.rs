//! Login and logout.
//!
//! There are no local accounts: a login verifies a credential with the
//! identity provider and stores the resulting profile in the session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sheti_core::{Role, User};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::services::IdentityService;
use crate::state::AppState;

/// Guest login request.
#[derive(Debug, Default, Deserialize)]
pub struct GuestLogin {
    #[serde(default)]
    pub role: Role,
}

/// Google Identity Services login request.
#[derive(Debug, Deserialize)]
pub struct GoogleLogin {
    /// The ID token returned by the Google sign-in button.
    pub credential: String,
    #[serde(default)]
    pub role: Role,
}

/// Supabase auth login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupabaseLogin {
    pub access_token: String,
    #[serde(default)]
    pub role: Role,
}

async fn sign_in(session: &Session, user: User) -> Result<Json<User>> {
    set_current_user(session, &user).await?;
    set_sentry_user(&user.id, (!user.email.is_empty()).then_some(user.email.as_str()));
    let role = user.role.to_string();
    add_breadcrumb("auth", "Signed in", Some(&[("role", role.as_str())]));
    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
    Ok(Json(user))
}

/// Sign in as a guest.
#[instrument(skip(session))]
pub async fn guest(session: Session, Json(login): Json<GuestLogin>) -> Result<Json<User>> {
    sign_in(&session, IdentityService::guest(login.role)).await
}

/// Sign in with a Google ID token.
#[instrument(skip(state, session, login), fields(role = %login.role))]
pub async fn google(
    State(state): State<AppState>,
    session: Session,
    Json(login): Json<GoogleLogin>,
) -> Result<Json<User>> {
    let user = state
        .identity()
        .google(&login.credential, login.role)
        .await?;
    sign_in(&session, user).await
}

/// Sign in with a Supabase access token.
#[instrument(skip(state, session, login), fields(role = %login.role))]
pub async fn supabase(
    State(state): State<AppState>,
    session: Session,
    Json(login): Json<SupabaseLogin>,
) -> Result<Json<User>> {
    let user = state
        .identity()
        .supabase(&login.access_token, login.role)
        .await?;
    sign_in(&session, user).await
}

/// Sign out and discard the whole session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    StatusCode::NO_CONTENT.into_response()
}

/// The signed-in user.
pub async fn me(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}
