//! Domain models for accounts and carts.

pub mod cart;
pub mod user;

pub use cart::{Cart, LineItem, VersionedCart};
pub use user::{NewUser, User};
