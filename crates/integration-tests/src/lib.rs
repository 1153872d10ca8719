//! Integration tests for the catalog client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `products_api` - Product REST calls against a mock backend
//! - `cart_store` - Cart persistence and the snapshot stream
//!
//! No external services are needed: the backend is a `mockito` server and
//! the cart lives in a temporary directory.

use std::sync::Arc;

use mockito::{Server, ServerGuard};
use tempfile::TempDir;

use catalog_client::{CatalogClient, CatalogConfig, FileStore, KeyValueStore};

/// Path of the product API on the mock server.
pub const API_PATH: &str = "/api/products";

/// A client wired to a mock backend and a throwaway storage directory.
pub struct TestContext {
    pub server: ServerGuard,
    pub storage_dir: TempDir,
    pub client: CatalogClient,
}

impl TestContext {
    /// Start a mock backend and build a client against it.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the client cannot be created.
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let storage_dir = TempDir::new().expect("create temp dir");
        let client = client_for(&server, &storage_dir);
        Self {
            server,
            storage_dir,
            client,
        }
    }

    /// A second client sharing the same backend and storage, as after a restart.
    #[must_use]
    pub fn reopen(&self) -> CatalogClient {
        client_for(&self.server, &self.storage_dir)
    }

    /// Direct access to the storage the client persists into.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(self.storage_dir.path()))
    }
}

fn client_for(server: &ServerGuard, storage_dir: &TempDir) -> CatalogClient {
    let config = CatalogConfig::new(&format!("{}{API_PATH}", server.url()), storage_dir.path())
        .expect("valid config");
    CatalogClient::from_config(&config).expect("build client")
}
