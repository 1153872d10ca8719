//! Cart commands.
//!
//! The cart lives in `CATALOG_STORAGE_DIR/cart.json`, so it persists between
//! invocations.

use serde::Serialize;

use catalog_client::CatalogClient;
use catalog_core::{Cart, Product};

use super::{CommandError, emit, parse_id};

/// Cart as printed by every cart command.
#[derive(Serialize)]
struct CartSummary<'a> {
    items: &'a Cart,
    item_count: usize,
    total_quantity: u64,
}

fn emit_cart(cart: &Cart) -> Result<(), CommandError> {
    emit(&CartSummary {
        items: cart,
        item_count: cart.len(),
        total_quantity: cart.total_quantity(),
    })
}

/// Print the stored cart.
pub fn show(client: &CatalogClient) -> Result<(), CommandError> {
    emit_cart(&client.get_cart())
}

/// Fetch a product from the API and add it to the cart.
pub async fn add(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    let product = client.get_product_by_id(id).await?.into_product();
    emit_cart(&client.add_to_cart(&product)?)
}

/// Add a product given as JSON.
pub fn add_json(client: &CatalogClient, raw: &str) -> Result<(), CommandError> {
    let product: Product = serde_json::from_str(raw)?;
    emit_cart(&client.add_to_cart(&product)?)
}

pub fn increment(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    emit_cart(&client.increment_quantity(parse_id(id)?)?)
}

pub fn decrement(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    emit_cart(&client.decrement_quantity(parse_id(id)?)?)
}

pub fn clear(client: &CatalogClient) -> Result<(), CommandError> {
    emit_cart(&client.clear_cart()?)
}
