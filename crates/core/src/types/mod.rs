//! Core types for Sheti Man.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod money;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use language::Language;
pub use money::Money;
pub use status::*;
pub use user::User;
