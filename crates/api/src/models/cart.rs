//! Cart domain types and the merge rules applied to them.
//!
//! A cart is an ordered list of [`LineItem`]s keyed by name. All mutation
//! goes through [`Cart`], which keeps two invariants:
//!
//! - at most one line item per distinct name
//! - every stored quantity is at least 1
//!
//! The methods are pure; persistence and concurrency live in the cart service.

use serde::{Deserialize, Serialize};

use sweet_bliss_core::Price;

/// One named, priced, quantified entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name; doubles as the merge key.
    pub name: String,
    /// Unit price captured when the item was first added.
    pub price: Price,
    /// Image reference captured when the item was first added.
    pub image: String,
    pub quantity: u32,
}

/// An owner's cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

/// A cart together with the store version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedCart {
    pub cart: Cart,
    pub version: i64,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wrap items read back from storage.
    #[must_use]
    pub const fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Add one unit of `name`.
    ///
    /// If a line item with that name exists, its quantity goes up by one and
    /// the supplied price and image are discarded. Otherwise a new line item
    /// with quantity 1 is appended. Returns the resulting quantity.
    pub fn add(&mut self, name: &str, price: Price, image: &str) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.name == name) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(LineItem {
            name: name.to_owned(),
            price,
            image: image.to_owned(),
            quantity: 1,
        });
        1
    }

    /// Set the quantity of `name`. A quantity of 0 removes the item.
    ///
    /// Returns `false` if no line item has that name.
    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(name);
        }

        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line item named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        self.items.len() != before
    }

    /// Remove all line items. Returns whether the cart was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }
}
