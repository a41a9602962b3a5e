//! Sweet Bliss Core - Shared domain types.
//!
//! This crate provides the types shared by the Sweet Bliss components:
//! - `api` - JSON backend for accounts and carts
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for user IDs, emails, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
