//! Per-owner cart write locks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use sweet_bliss_core::UserId;

/// Registry of per-owner locks.
///
/// Holding an owner's guard serialises that owner's read-modify-write cycles
/// inside this process; other owners are never blocked. Entries that nobody
/// holds or waits on are dropped on the next acquire.
#[derive(Debug, Default)]
pub struct CartLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl CartLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `owner`'s cart.
    pub async fn acquire(&self, owner: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(owner).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
