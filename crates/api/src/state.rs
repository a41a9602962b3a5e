//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{ApiConfig, TokenConfig};
use crate::db::{CartRepository, CartStore, UserRepository, UserStore};
use crate::services::auth::TokenIssuer;
use crate::services::cart::{CartLocks, CartService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, the token issuer and the CORS allow-list.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: Arc<dyn UserStore>,
    carts: Arc<dyn CartStore>,
    cart_locks: CartLocks,
    tokens: TokenIssuer,
    cors_origins: Vec<String>,
}

impl AppState {
    /// Create the production state backed by `PostgreSQL`.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self::from_stores(
            &config.token,
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(CartRepository::new(pool)),
            config.cors_origins.clone(),
        )
    }

    /// Create state over arbitrary store implementations.
    ///
    /// An empty `cors_origins` allows any origin.
    #[must_use]
    pub fn from_stores(
        token: &TokenConfig,
        users: Arc<dyn UserStore>,
        carts: Arc<dyn CartStore>,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users,
                carts,
                cart_locks: CartLocks::new(),
                tokens: TokenIssuer::new(token),
                cors_origins,
            }),
        }
    }

    /// Create state over a single in-memory store.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn in_memory(token: &TokenConfig, store: Arc<crate::db::memory::MemoryStore>) -> Self {
        Self::from_stores(token, store.clone(), store, Vec::new())
    }

    /// Get the credential store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// A cart service whose writes are serialised per owner across all requests.
    #[must_use]
    pub fn cart_service(&self) -> CartService<'_> {
        CartService::new(self.inner.carts.as_ref(), &self.inner.cart_locks)
    }

    /// Get the bearer token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Origins allowed by CORS; empty means any.
    #[must_use]
    pub fn cors_origins(&self) -> &[String] {
        &self.inner.cors_origins
    }
}
