//! Store trait definitions.

use async_trait::async_trait;

use sweet_bliss_core::{Email, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, VersionedCart};
use crate::models::user::{NewUser, User};

/// Storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Email uniqueness is enforced here, atomically with the insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user by email.
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Look up a user and their password hash by email.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Look up a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Storage for cart documents, one per owner.
///
/// Writes are conditional: a cart is created only if none exists, and
/// replaced only if its version has not moved since it was read. Callers
/// handle a `false` return by re-reading.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the owner's cart and its current version.
    async fn load(&self, owner: UserId) -> Result<Option<VersionedCart>, RepositoryError>;

    /// Create the owner's cart at version 0.
    ///
    /// Returns `false` without writing if a cart already exists.
    async fn insert(&self, owner: UserId, cart: &Cart) -> Result<bool, RepositoryError>;

    /// Replace the owner's items if the stored version equals `expected_version`,
    /// bumping the version by one.
    ///
    /// Returns `false` without writing if the version has moved.
    async fn compare_and_swap(
        &self,
        owner: UserId,
        expected_version: i64,
        cart: &Cart,
    ) -> Result<bool, RepositoryError>;
}
