//! Sheti Man API library.
//!
//! The HTTP service is built as a library so integration tests can drive
//! the router in-process; `main.rs` only wires configuration, tracing and
//! the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
