//! Product types as exchanged with the catalog backend.
//!
//! The backend owns the product schema. Only the `id` field is interpreted
//! here; every other attribute is kept in an open map so that unknown fields
//! survive a read-then-write cycle unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier.
    pub id: ProductId,

    /// All other product attributes (name, price, stock, ...), verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with no attributes besides its ID.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// A partial product: only the fields to change.
///
/// Serialized as a plain JSON object, so an empty patch is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductPatch(Map<String, Value>);

impl ProductPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a new value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Fields carried by this patch.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ProductPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Response envelope for a single product: `{ "product": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

impl ProductResponse {
    #[must_use]
    pub fn into_product(self) -> Product {
        self.product
    }
}

/// Response envelope for the product listing: `{ "products": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

impl ProductListResponse {
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}
