//! Sweet Bliss API library.
//!
//! JSON backend for account signup/login and per-user carts. The binary in
//! `main.rs` wires configuration, logging and the database pool around
//! [`routes::app`]; everything else lives here so it can be tested without a
//! socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
