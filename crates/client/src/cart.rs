//! Persistent shopping cart with a replay-latest snapshot stream.
//!
//! # Flow
//!
//! 1. On construction the cart is loaded from the store under [`CART_KEY`]
//! 2. Each mutation reads the stored cart, applies the change, and writes it back
//! 3. The new snapshot is published to every subscriber
//!
//! Subscribers get the latest snapshot immediately, then later snapshots in
//! publish order. A subscriber that falls behind skips straight to the newest
//! snapshot.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use catalog_core::{Cart, Product, ProductId};

use crate::error::CartError;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Cart backed by a [`KeyValueStore`].
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStore>,
    snapshots: watch::Sender<Cart>,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.inner.snapshots.borrow().len())
            .field("subscribers", &self.inner.snapshots.receiver_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a cart store, loading the persisted cart as the first snapshot.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let initial = load_cart(storage.as_ref());
        debug!(items = initial.len(), "Loaded cart");

        let (snapshots, _) = watch::channel(initial);
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                snapshots,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Read the persisted cart.
    ///
    /// A missing, unreadable, or malformed stored value yields an empty cart.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        load_cart(self.inner.storage.as_ref())
    }

    /// Latest published snapshot, without touching storage.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.inner.snapshots.borrow().clone()
    }

    /// Subscribe to cart snapshots.
    ///
    /// The receiver's current value is the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.snapshots.subscribe()
    }

    /// Cart snapshots as a `Stream`, starting with the latest one.
    #[must_use]
    pub fn stream(&self) -> WatchStream<Cart> {
        WatchStream::new(self.subscribe())
    }

    /// Add one unit of `product`, appending it if it is not in the cart yet.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the updated cart cannot be persisted.
    pub fn add_to_cart(&self, product: &Product) -> Result<Cart, CartError> {
        self.mutate("add_to_cart", product.id, |cart| {
            cart.add_product(product.clone());
            true
        })
    }

    /// Increment the quantity of a product already in the cart.
    ///
    /// Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the updated cart cannot be persisted.
    pub fn increment_quantity(&self, product_id: ProductId) -> Result<Cart, CartError> {
        self.mutate("increment_quantity", product_id, |cart| {
            cart.increment(product_id)
        })
    }

    /// Decrement the quantity of a product, removing it when it reaches 0.
    ///
    /// Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the updated cart cannot be persisted.
    pub fn decrement_quantity(&self, product_id: ProductId) -> Result<Cart, CartError> {
        self.mutate("decrement_quantity", product_id, |cart| {
            cart.decrement(product_id)
        })
    }

    /// Remove every item from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the empty cart cannot be persisted.
    pub fn clear_cart(&self) -> Result<Cart, CartError> {
        let _guard = self.lock();
        let cart = Cart::new();
        self.update_cart(cart.clone())?;
        info!("Cart cleared");
        Ok(cart)
    }

    /// Read-modify-write under the write lock. `apply` returns `false` when
    /// nothing changed, in which case nothing is written and the cart read
    /// from storage is published only if it differs from the latest snapshot.
    fn mutate<F>(&self, operation: &str, product_id: ProductId, apply: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let _guard = self.lock();
        let mut cart = self.get_cart();

        if !apply(&mut cart) {
            debug!(operation, product_id = %product_id, "Product not in cart, nothing to do");
            self.sync_snapshot(&cart);
            return Ok(cart);
        }

        self.update_cart(cart.clone())?;
        info!(
            operation,
            product_id = %product_id,
            items = cart.len(),
            quantity = cart.total_quantity(),
            "Cart updated"
        );
        Ok(cart)
    }

    /// Persist `cart` and publish it to subscribers.
    fn update_cart(&self, cart: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&cart)?;
        self.inner.storage.set(CART_KEY, &serialized)?;
        self.inner.snapshots.send_replace(cart);
        Ok(())
    }

    /// Publish `stored` if another writer changed storage since the last snapshot.
    fn sync_snapshot(&self, stored: &Cart) {
        let changed = self.inner.snapshots.send_if_modified(|current| {
            if *current == *stored {
                false
            } else {
                stored.clone_into(current);
                true
            }
        });
        if changed {
            debug!(items = stored.len(), "Picked up cart changed by another writer");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load the stored cart, falling back to an empty one.
fn load_cart(storage: &dyn KeyValueStore) -> Cart {
    let raw = match storage.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, using empty cart");
            return Cart::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Stored cart is malformed, using empty cart");
        Cart::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;
    use tokio_stream::StreamExt;

    use catalog_core::CartEntry;

    use super::*;
    use crate::error::StorageError;
    use crate::storage::{FileStore, MemoryStore};

    fn product(id: i64) -> Product {
        Product::new(ProductId::new(id))
    }

    fn store_with(raw: Option<&str>) -> (Arc<MemoryStore>, CartStore) {
        let storage = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            storage.set(CART_KEY, raw).unwrap();
        }
        let carts = CartStore::new(storage.clone());
        (storage, carts)
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    /// Store whose reads always fail.
    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "unreadable",
            )))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_get_cart_without_stored_value_is_empty() {
        let (_, carts) = store_with(None);
        assert!(carts.get_cart().is_empty());
        assert!(carts.snapshot().is_empty());
    }

    #[test]
    fn test_get_cart_returns_stored_cart() {
        let raw = json!([
            {"product": {"id": 1, "name": "Pineapple"}, "quantity": 2},
            {"product": {"id": 4}, "quantity": 1}
        ]);
        let (_, carts) = store_with(Some(&raw.to_string()));

        let cart = carts.get_cart();
        assert_eq!(serde_json::to_value(&cart).unwrap(), raw);
    }

    #[test]
    fn test_malformed_cart_is_empty() {
        for raw in ["not json", "{\"product\": 1}", "[{\"quantity\": 1}]", ""] {
            let (_, carts) = store_with(Some(raw));
            assert!(carts.get_cart().is_empty(), "{raw:?} should load as empty");
        }
    }

    #[tokio::test]
    async fn test_unreadable_storage_gives_empty_cart() {
        let carts = CartStore::new(Arc::new(UnreadableStore));

        assert!(carts.get_cart().is_empty());
        assert!(carts.stream().next().await.unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_file_gives_empty_cart() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("cart.json")).unwrap();

        let carts = CartStore::new(Arc::new(FileStore::new(dir.path())));

        assert!(carts.get_cart().is_empty());
        assert!(carts.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_first_stream_value_is_stored_cart() {
        let (_, carts) = store_with(Some(r#"[{"product":{"id":1},"quantity":2}]"#));

        let first = carts.stream().next().await.unwrap();
        assert_eq!(first, Cart::from(vec![CartEntry::new(product(1), 2)]));
    }

    #[test]
    fn test_add_to_cart_is_visible_to_get_cart() {
        let (storage, carts) = store_with(None);

        carts.add_to_cart(&product(5)).unwrap();

        let cart = carts.get_cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(5)).unwrap().quantity, 1);
        assert_eq!(
            storage.get(CART_KEY).unwrap().as_deref(),
            Some(r#"[{"product":{"id":5},"quantity":1}]"#)
        );
    }

    #[test]
    fn test_increment_and_decrement() {
        let (_, carts) = store_with(None);
        carts.add_to_cart(&product(1)).unwrap();

        let cart = carts.increment_quantity(ProductId::new(1)).unwrap();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 2);

        carts.decrement_quantity(ProductId::new(1)).unwrap();
        let cart = carts.decrement_quantity(ProductId::new(1)).unwrap();
        assert!(cart.is_empty());
        assert!(carts.get_cart().is_empty());
    }

    #[test]
    fn test_unknown_product_does_not_publish() {
        let (_, carts) = store_with(None);
        let rx = carts.subscribe();

        carts.increment_quantity(ProductId::new(9)).unwrap();
        carts.decrement_quantity(ProductId::new(9)).unwrap();

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_noop_mutation_picks_up_other_writer() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ours = CartStore::new(storage.clone());
        let theirs = CartStore::new(storage);
        theirs.add_to_cart(&product(2)).unwrap();

        let returned = ours.increment_quantity(ProductId::new(9)).unwrap();

        assert_eq!(returned.len(), 1);
        assert_eq!(ours.snapshot(), returned);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates_in_order() {
        let (_, carts) = store_with(None);
        let mut rx = carts.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        carts.add_to_cart(&product(1)).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().total_quantity(), 1);

        carts.add_to_cart(&product(1)).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().total_quantity(), 2);

        carts.clear_cart().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_latest_snapshot() {
        let (_, carts) = store_with(None);
        carts.add_to_cart(&product(1)).unwrap();
        carts.add_to_cart(&product(2)).unwrap();

        let latest = carts.stream().next().await.unwrap();
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn test_failed_write_keeps_snapshot() {
        let carts = CartStore::new(Arc::new(ReadOnlyStore));

        let result = carts.add_to_cart(&product(1));

        assert!(matches!(result, Err(CartError::Storage(_))));
        assert!(carts.snapshot().is_empty());
    }

    #[test]
    fn test_cart_survives_restart_with_file_store() {
        let dir = TempDir::new().unwrap();

        let carts = CartStore::new(Arc::new(FileStore::new(dir.path())));
        carts.add_to_cart(&product(3).with_attribute("name", "Coconut")).unwrap();
        carts.add_to_cart(&product(3)).unwrap();
        drop(carts);

        let reopened = CartStore::new(Arc::new(FileStore::new(dir.path())));
        let entry = reopened.snapshot().get(ProductId::new(3)).cloned().unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.product.attribute("name"), Some(&json!("Coconut")));
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let (_, carts) = store_with(None);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let carts = carts.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        carts.add_to_cart(&product(1)).unwrap();
                    }
                });
            }
        });

        assert_eq!(carts.get_cart().total_quantity(), 200);
        assert_eq!(carts.snapshot().total_quantity(), 200);
    }

    #[test]
    fn test_cart_stores_sharing_a_directory_never_fail() {
        let dir = TempDir::new().unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let carts = CartStore::new(Arc::new(FileStore::new(dir.path())));
                scope.spawn(move || {
                    for _ in 0..100 {
                        carts.add_to_cart(&product(1)).unwrap();
                    }
                });
            }
        });

        let reopened = CartStore::new(Arc::new(FileStore::new(dir.path())));
        let quantity = reopened.get_cart().total_quantity();
        assert!((1..=400).contains(&quantity), "quantity {quantity}");
    }
}
