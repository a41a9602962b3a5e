//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Signup, login and bearer token issue/verification
//! - `cart` - Cart mutations under optimistic concurrency
//!
//! Services borrow their stores from [`AppState`](crate::state::AppState)
//! and are built per request.

pub mod auth;
pub mod cart;
