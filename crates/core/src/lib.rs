//! Sheti Man Core - Shared types library.
//!
//! This crate provides the domain types and pure logic used across all
//! Sheti Man components:
//! - `server` - JSON API for the farming assistant
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types, tables and pure functions - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and lets
//! every state transition be tested without a network.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, languages, roles
//! - [`task`] - Farm task list and overdue logic
//! - [`catalog`] - Marketplace products per language
//! - [`cart`] - Shopping cart arithmetic
//! - [`order`] - Checkout and order status
//! - [`i18n`] - English/Hindi/Marathi string tables
//! - [`audio`] - 16-bit PCM decoding for synthesized speech

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod audio;
pub mod cart;
pub mod catalog;
pub mod i18n;
pub mod order;
pub mod task;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{Catalog, CatalogError, Product, ProductDraft};
pub use order::{Order, OrderError, ShippingInfo};
pub use task::{Task, TaskError, TaskSummary};
pub use types::*;
