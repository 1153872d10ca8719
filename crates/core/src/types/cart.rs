//! Shopping cart snapshot and its mutation rules.
//!
//! A [`Cart`] is an ordered list of [`CartEntry`] values. The mutations here
//! keep two invariants:
//!
//! - at most one entry per product ID
//! - every entry has a quantity of at least 1 (entries reaching 0 are removed)
//!
//! On the wire a cart is a bare JSON array of `{ "product": ..., "quantity": n }`.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// ID of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// A full cart snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Find the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id() == product_id)
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented and
    /// the stored product data is left as is; otherwise a new entry with
    /// quantity 1 is appended.
    pub fn add_product(&mut self, product: Product) {
        if let Some(existing) = self.entry_mut(product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.entries.push(CartEntry::new(product, 1));
        }
    }

    /// Increment the quantity of a product already in the cart.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        self.entry_mut(product_id).is_some_and(|entry| {
            entry.quantity = entry.quantity.saturating_add(1);
            true
        })
    }

    /// Decrement the quantity of a product, removing it at zero.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.product_id() == product_id)
        else {
            return false;
        };

        let remove = self.entries.get_mut(index).is_some_and(|entry| {
            entry.quantity = entry.quantity.saturating_sub(1);
            entry.quantity == 0
        });
        if remove {
            self.entries.remove(index);
        }
        true
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.product_id() == product_id)
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self { entries }
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
