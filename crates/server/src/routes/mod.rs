//! HTTP route handlers for the Sheti Man API.
//!
//! Every endpoint speaks JSON except `/api/speech/wav`.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Database readiness
//!
//! # Localization
//! GET  /api/i18n/{lang}         - Translation bundle
//! PUT  /api/language            - Store preferred language
//!
//! # Auth (rate limited)
//! POST /api/auth/guest          - Guest login
//! POST /api/auth/google         - Google ID token login
//! POST /api/auth/supabase       - Supabase access token login
//! POST /api/auth/logout         - Logout
//! GET  /api/auth/me             - Current user
//!
//! # Advice (rate limited)
//! POST /api/advice/fertilizer   - Organic fertilizer recommendation
//! POST /api/advice/calculator   - Fertilizer dosage
//! POST /api/advice/crop-doctor  - Plant photo diagnosis (multipart)
//! GET  /api/weather             - Localized weather (?lat=&lng=)
//! POST /api/chat                - Chat turn
//! DELETE /api/chat              - Reset chat
//! POST /api/speech              - Text to speech, PCM data URI or fallback signal
//! POST /api/speech/wav          - Text to speech as a WAV file
//!
//! # Tasks (requires auth)
//! GET  /api/dashboard           - Pending count and next tasks
//! GET  /api/tasks               - Task list
//! POST /api/tasks               - Add task
//! POST /api/tasks/{id}/toggle   - Toggle completion
//! DELETE /api/tasks/{id}        - Delete task
//!
//! # Marketplace
//! GET  /api/products            - Catalog in the request language
//! POST /api/products            - Add product (supplier)
//! PUT  /api/products/{id}       - Edit product (supplier)
//! DELETE /api/products/{id}     - Remove product (supplier)
//! GET  /api/cart                - Cart contents
//! POST /api/cart/add            - Add one unit
//! POST /api/cart/update         - Set quantity
//! POST /api/cart/remove         - Remove line
//! POST /api/checkout            - Place order from cart (requires auth)
//! GET  /api/orders              - Own orders, or all orders for suppliers
//! POST /api/orders/{id}/status  - Advance fulfillment (supplier)
//! ```

pub mod advice;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod health;
pub mod i18n;
pub mod orders;
pub mod products;
pub mod speech;
pub mod tasks;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::middleware::{ai_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Largest accepted crop photo.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let login = Router::new()
        .route("/guest", post(auth::guest))
        .route("/google", post(auth::google))
        .route("/supabase", post(auth::supabase));
    let login = match auth_rate_limiter() {
        Some(limiter) => login.route_layer(limiter),
        None => login,
    };

    Router::new()
        .merge(login)
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the AI-backed routes router.
pub fn advice_routes() -> Router<AppState> {
    let router = Router::new()
        .route("/advice/fertilizer", post(advice::fertilizer))
        .route("/advice/calculator", post(advice::calculator))
        .route(
            "/advice/crop-doctor",
            // Multipart framing on top of the image itself
            post(advice::crop_doctor).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route("/weather", get(advice::weather))
        .route("/chat", post(chat::send).delete(chat::reset))
        .route("/speech", post(speech::speak))
        .route("/speech/wav", post(speech::wav));

    match ai_rate_limiter() {
        Some(limiter) => router.route_layer(limiter),
        None => router,
    }
}

/// Create the task routes router.
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::index).post(tasks::create))
        .route("/{id}/toggle", post(tasks::toggle))
        .route("/{id}", axum::routing::delete(tasks::delete))
}

/// Create the marketplace routes router.
pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(orders::checkout))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
}

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/i18n/{lang}", get(i18n::bundle))
        .route("/language", put(i18n::set_language))
        .nest("/auth", auth_routes())
        .route("/dashboard", get(tasks::dashboard))
        .nest("/tasks", task_routes())
        .merge(advice_routes())
        .merge(market_routes())
}

/// Create all routes.
///
/// Handlers expect the session layer to be applied by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
}
