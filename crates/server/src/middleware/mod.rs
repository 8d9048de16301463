//! HTTP middleware stack for the Sheti Man API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Rate limiting on AI and login routes (governor)
//!
//! Extractors for the signed-in user and the answer language read the
//! session that layer 4 installs.

pub mod auth;
pub mod language;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{
    AuthRejection, OptionalUser, RequireSupplier, RequireUser, clear_current_user,
    set_current_user,
};
pub use language::{Lang, set_preferred_language};
pub use rate_limit::{ai_rate_limiter, auth_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use session::{SessionKeyError, create_session_layer, session_layer};
