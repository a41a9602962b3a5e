//! In-memory store for tests.
//!
//! Implements both [`UserStore`] and [`CartStore`] with the same atomicity
//! guarantees as the `PostgreSQL` repositories: email uniqueness is checked
//! and the user inserted under one write lock, and cart writes compare the
//! version under the lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sweet_bliss_core::{Email, UserId};

use super::{CartStore, RepositoryError, UserStore};
use crate::models::cart::{Cart, VersionedCart};
use crate::models::user::{NewUser, User};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory account and cart store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<StoredUser>>,
    carts: RwLock<HashMap<UserId, VersionedCart>>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline, every call fails with `RepositoryError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "memory store is offline".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.check_online()?;
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.user.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next = i32::try_from(users.len() + 1)
            .map_err(|_| RepositoryError::Conflict("user id space exhausted".to_owned()))?;
        let created = User {
            id: UserId::new(next),
            name: user.name,
            email: user.email,
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash,
        });
        Ok(created)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.get_password_hash(email).await?.map(|(user, _)| user))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.check_online()?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| &u.user.email == email)
            .map(|u| (u.user.clone(), u.password_hash.clone())))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_online()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.id == id).map(|u| u.user.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_online()
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn load(&self, owner: UserId) -> Result<Option<VersionedCart>, RepositoryError> {
        self.check_online()?;
        let carts = self.carts.read().await;
        Ok(carts.get(&owner).cloned())
    }

    async fn insert(&self, owner: UserId, cart: &Cart) -> Result<bool, RepositoryError> {
        self.check_online()?;
        let mut carts = self.carts.write().await;
        if carts.contains_key(&owner) {
            return Ok(false);
        }
        carts.insert(
            owner,
            VersionedCart {
                cart: cart.clone(),
                version: 0,
            },
        );
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        owner: UserId,
        expected_version: i64,
        cart: &Cart,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;
        let mut carts = self.carts.write().await;
        match carts.get_mut(&owner) {
            Some(stored) if stored.version == expected_version => {
                stored.cart = cart.clone();
                stored.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sweet_bliss_core::Price;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Baker".to_string(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create(new_user("a@b.c")).await.unwrap();

        let err = store.create(new_user("A@B.C")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let first = store.create(new_user("a@b.c")).await.unwrap();
        let second = store.create(new_user("d@e.f")).await.unwrap();

        assert_eq!(first.id, UserId::new(1));
        assert_eq!(second.id, UserId::new(2));
        assert_eq!(store.get_by_id(second.id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let store = MemoryStore::new();
        let owner = UserId::new(1);
        let mut cart = Cart::new();
        cart.add("Donut", Price::from_cents(250).unwrap(), "img.png");

        assert!(store.insert(owner, &cart).await.unwrap());
        assert!(!store.insert(owner, &cart).await.unwrap());

        cart.add("Donut", Price::from_cents(250).unwrap(), "img.png");
        assert!(store.compare_and_swap(owner, 0, &cart).await.unwrap());
        assert!(!store.compare_and_swap(owner, 0, &Cart::new()).await.unwrap());

        let stored = store.load(owner).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.cart.get("Donut").unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_offline_store_reports_unavailable() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.ping().await,
            Err(RepositoryError::Unavailable(_))
        ));

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }
}
