//! Cart service.
//!
//! Every mutation is a read-modify-write against the owner's cart document:
//! load items and version, apply the pure [`Cart`] rules, then write back only
//! if the version is unchanged.
//!
//! Within one process an owner's mutations run one at a time under
//! [`CartLocks`], so they never race each other. The version check covers
//! writers in other processes sharing the database: a lost race re-reads and
//! re-applies, up to [`MAX_CART_WRITE_ATTEMPTS`] times.

mod error;
mod locks;

pub use error::CartError;
pub use locks::CartLocks;

use sweet_bliss_core::{Price, UserId};

use crate::db::CartStore;
use crate::models::cart::{Cart, LineItem};

/// How many times a mutation is attempted before giving up with `Conflict`.
pub const MAX_CART_WRITE_ATTEMPTS: usize = 5;

/// Longest accepted item name, in characters.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Longest accepted image reference, in characters.
pub const MAX_IMAGE_LEN: usize = 2048;

/// Most distinct line items one cart may hold.
pub const MAX_LINE_ITEMS: usize = 100;

/// Cart service.
pub struct CartService<'a> {
    carts: &'a dyn CartStore,
    locks: &'a CartLocks,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(carts: &'a dyn CartStore, locks: &'a CartLocks) -> Self {
        Self { carts, locks }
    }

    /// The owner's line items; empty if they have no cart yet.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn get(&self, owner: UserId) -> Result<Vec<LineItem>, CartError> {
        Ok(self
            .carts
            .load(owner)
            .await?
            .map(|stored| stored.cart.into_items())
            .unwrap_or_default())
    }

    /// Add one unit of an item, creating the cart if needed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidItem` for an empty or oversized name or image.
    /// Returns `CartError::CartFull` if the item is new and the cart already
    /// holds [`MAX_LINE_ITEMS`] line items.
    /// Returns `CartError::Conflict` if every write attempt raced.
    pub async fn add(
        &self,
        owner: UserId,
        name: &str,
        price: Price,
        image: &str,
    ) -> Result<(), CartError> {
        validate_item(name, image)?;

        self.mutate(owner, true, |cart| {
            if cart.get(name).is_none() && cart.items().len() >= MAX_LINE_ITEMS {
                return Err(CartError::CartFull {
                    limit: MAX_LINE_ITEMS,
                });
            }
            cart.add(name, price, image);
            Ok(true)
        })
        .await?;
        Ok(())
    }

    /// Set an item's quantity. Zero removes the item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a negative or oversized quantity.
    /// Returns `CartError::ItemNotFound` if the owner has no item with that name.
    pub async fn update_quantity(
        &self,
        owner: UserId,
        name: &str,
        quantity: i64,
    ) -> Result<(), CartError> {
        let quantity = u32::try_from(quantity).map_err(|_| {
            CartError::InvalidQuantity(if quantity < 0 {
                "quantity cannot be negative".to_string()
            } else {
                format!("quantity must be at most {}", u32::MAX)
            })
        })?;

        let exists = self
            .mutate(owner, false, |cart| {
                if cart.set_quantity(name, quantity) {
                    Ok(true)
                } else {
                    Err(CartError::ItemNotFound(name.to_string()))
                }
            })
            .await?;

        if !exists {
            return Err(CartError::ItemNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Remove an item. Succeeds if there is nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Conflict` if every write attempt raced.
    pub async fn remove(&self, owner: UserId, name: &str) -> Result<(), CartError> {
        self.mutate(owner, false, |cart| Ok(cart.remove(name))).await?;
        Ok(())
    }

    /// Empty the cart. A missing cart stays missing.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Conflict` if every write attempt raced.
    pub async fn clear(&self, owner: UserId) -> Result<(), CartError> {
        self.mutate(owner, false, |cart| Ok(cart.clear())).await?;
        Ok(())
    }

    /// Apply `apply` to the owner's cart under optimistic concurrency.
    ///
    /// `apply` returns whether it changed the cart; unchanged carts are not
    /// written. When no cart exists it is created if `create` is set, and
    /// otherwise `apply` is skipped and the result is `Ok(false)`.
    async fn mutate<F>(&self, owner: UserId, create: bool, apply: F) -> Result<bool, CartError>
    where
        F: Fn(&mut Cart) -> Result<bool, CartError> + Send + Sync,
    {
        let _guard = self.locks.acquire(owner).await;

        for attempt in 1..=MAX_CART_WRITE_ATTEMPTS {
            let written = match self.carts.load(owner).await? {
                Some(mut stored) => {
                    if !apply(&mut stored.cart)? {
                        return Ok(true);
                    }
                    self.carts
                        .compare_and_swap(owner, stored.version, &stored.cart)
                        .await?
                }
                None if create => {
                    let mut cart = Cart::new();
                    if !apply(&mut cart)? {
                        return Ok(true);
                    }
                    self.carts.insert(owner, &cart).await?
                }
                None => return Ok(false),
            };

            if written {
                return Ok(true);
            }

            tracing::debug!(user_id = %owner, attempt, "cart write lost a race, retrying");
        }

        tracing::warn!(user_id = %owner, "cart write gave up after repeated conflicts");
        Err(CartError::Conflict {
            attempts: MAX_CART_WRITE_ATTEMPTS,
        })
    }
}

fn validate_item(name: &str, image: &str) -> Result<(), CartError> {
    if name.is_empty() {
        return Err(CartError::InvalidItem("Item name is required".to_string()));
    }
    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(CartError::InvalidItem(format!(
            "Item name must be at most {MAX_ITEM_NAME_LEN} characters"
        )));
    }
    if image.chars().count() > MAX_IMAGE_LEN {
        return Err(CartError::InvalidItem(format!(
            "Image must be at most {MAX_IMAGE_LEN} characters"
        )));
    }
    Ok(())
}
