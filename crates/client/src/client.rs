//! The catalog client façade.
//!
//! Bundles the product REST client and the cart store behind one explicitly
//! constructed value. The host application owns it and clones it wherever it
//! is needed; clones share the HTTP connection pool and the cart.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use catalog_core::{Cart, Product, ProductId, ProductListResponse, ProductPatch, ProductResponse};

use crate::cart::CartStore;
use crate::config::CatalogConfig;
use crate::error::{CartError, CatalogError};
use crate::products::ProductClient;
use crate::storage::{FileStore, KeyValueStore};

/// Typed access to the product API and the shopping cart.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    products: ProductClient,
    cart: CartStore,
}

impl CatalogClient {
    /// Build a client from configuration, persisting the cart under
    /// `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStore::new(config.storage_dir.clone()));
        Self::new(config, storage)
    }

    /// Build a client with an explicit cart storage backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &CatalogConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        Ok(Self::from_parts(
            ProductClient::new(config.api_url.clone())?,
            CartStore::new(storage),
        ))
    }

    /// Assemble a client from already constructed parts.
    #[must_use]
    pub const fn from_parts(products: ProductClient, cart: CartStore) -> Self {
        Self { products, cart }
    }

    #[must_use]
    pub const fn products(&self) -> &ProductClient {
        &self.products
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// See [`ProductClient::check_product_exists`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn check_product_exists(&self, id: ProductId) -> Result<bool, CatalogError> {
        self.products.check_product_exists(id).await
    }

    /// See [`ProductClient::get_product_by_id`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_product_by_id(&self, id: &str) -> Result<ProductResponse, CatalogError> {
        self.products.get_product_by_id(id).await
    }

    /// See [`ProductClient::add_product`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn add_product(&self, product: &Product) -> Result<String, CatalogError> {
        self.products.add_product(product).await
    }

    /// See [`ProductClient::update_product`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, CatalogError> {
        self.products.update_product(id, patch).await
    }

    /// See [`ProductClient::delete_product`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<String, CatalogError> {
        self.products.delete_product(id).await
    }

    /// See [`ProductClient::get_products`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_products(&self) -> Result<ProductListResponse, CatalogError> {
        self.products.get_products().await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be persisted.
    pub fn add_to_cart(&self, product: &Product) -> Result<Cart, CartError> {
        self.cart.add_to_cart(product)
    }

    /// See [`CartStore::increment_quantity`].
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be persisted.
    pub fn increment_quantity(&self, product_id: ProductId) -> Result<Cart, CartError> {
        self.cart.increment_quantity(product_id)
    }

    /// See [`CartStore::decrement_quantity`].
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be persisted.
    pub fn decrement_quantity(&self, product_id: ProductId) -> Result<Cart, CartError> {
        self.cart.decrement_quantity(product_id)
    }

    /// See [`CartStore::clear_cart`].
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be persisted.
    pub fn clear_cart(&self) -> Result<Cart, CartError> {
        self.cart.clear_cart()
    }

    /// See [`CartStore::get_cart`].
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        self.cart.get_cart()
    }

    /// Latest published cart snapshot.
    #[must_use]
    pub fn cart_snapshot(&self) -> Cart {
        self.cart.snapshot()
    }

    /// Subscribe to cart snapshots (replay-latest).
    #[must_use]
    pub fn subscribe_cart(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Cart snapshots as a `Stream`, starting with the latest one.
    #[must_use]
    pub fn cart_stream(&self) -> WatchStream<Cart> {
        self.cart.stream()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Server;
    use serde_json::json;
    use tokio_stream::StreamExt;

    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_product_in_catalog_goes_into_cart() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/products/5")
            .with_status(200)
            .with_body(json!({"product": {"id": 5, "name": "Pineapple chips"}}).to_string())
            .create_async()
            .await;

        let config =
            CatalogConfig::new(&format!("{}/api/products", server.url()), ".unused").unwrap();
        let client = CatalogClient::new(&config, Arc::new(MemoryStore::new())).unwrap();
        let mut stream = client.cart_stream();
        assert!(stream.next().await.unwrap().is_empty());

        let product = client.get_product_by_id("5").await.unwrap().into_product();
        client.add_to_cart(&product).unwrap();

        let published = stream.next().await.unwrap();
        assert_eq!(published, client.get_cart());
        assert_eq!(published.get(ProductId::new(5)).unwrap().product, product);
    }

    #[test]
    fn test_from_config_uses_storage_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CatalogConfig::new("http://localhost:8181/api/products", dir.path()).unwrap();

        let client = CatalogClient::from_config(&config).unwrap();
        client.add_to_cart(&Product::new(ProductId::new(1))).unwrap();

        assert!(dir.path().join("cart.json").exists());
        assert_eq!(
            client.products().base_url().as_str(),
            "http://localhost:8181/api/products"
        );
    }
}
