//! Server-side models that are not part of the core domain.

pub mod session;

pub use session::{ChatSession, ChatTurn, keys as session_keys};
