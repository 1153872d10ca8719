//! Catalog Client - product API access and a persistent shopping cart.
//!
//! # Architecture
//!
//! - [`ProductClient`] wraps the product REST API with `reqwest`; one request per call
//! - [`CartStore`] keeps the cart in a [`KeyValueStore`] and publishes snapshots on a
//!   `tokio::sync::watch` channel
//! - [`CatalogClient`] bundles both; the host constructs it once and clones it freely
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_client::{CatalogClient, CatalogConfig};
//! use catalog_core::ProductId;
//!
//! let config = CatalogConfig::from_env()?;
//! let client = CatalogClient::from_config(&config)?;
//!
//! let product = client.get_product_by_id("5").await?.into_product();
//! client.add_to_cart(&product)?;
//! client.decrement_quantity(ProductId::new(5))?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
mod client;
pub mod config;
pub mod error;
pub mod products;
pub mod storage;

pub use cart::{CART_KEY, CartStore};
pub use client::CatalogClient;
pub use config::{CatalogConfig, ConfigError};
pub use error::{CartError, CatalogError, StorageError};
pub use products::ProductClient;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
