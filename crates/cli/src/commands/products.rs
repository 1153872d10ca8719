//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! catalog products list
//! catalog products get 5
//! catalog products exists 5
//! catalog products add '{"id": 5, "name": "Pineapple chips"}'
//! catalog products update 5 '{"price": 3.99}'
//! catalog products delete 5
//! ```

use serde_json::json;

use catalog_client::CatalogClient;
use catalog_core::{Product, ProductPatch};

use super::{CommandError, emit, parse_id};

/// Print every product.
pub async fn list(client: &CatalogClient) -> Result<(), CommandError> {
    let response = client.get_products().await?;
    tracing::info!(count = response.products.len(), "Fetched products");
    emit(&response)
}

/// Print one product.
pub async fn get(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    emit(&client.get_product_by_id(id).await?)
}

/// Print whether a product ID exists.
pub async fn exists(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let exists = client.check_product_exists(id).await?;
    emit(&json!({ "id": id, "exists": exists }))
}

/// Create a product from a JSON argument.
pub async fn add(client: &CatalogClient, raw: &str) -> Result<(), CommandError> {
    let product: Product = serde_json::from_str(raw)?;
    let message = client.add_product(&product).await?;
    emit(&json!({ "message": message }))
}

/// Apply a partial update given as a JSON object.
pub async fn update(client: &CatalogClient, id: &str, raw: &str) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let patch: ProductPatch = serde_json::from_str(raw)?;
    if patch.is_empty() {
        tracing::warn!(id = %id, "Empty update, sending anyway");
    }
    emit(&client.update_product(id, &patch).await?)
}

/// Delete a product.
pub async fn delete(client: &CatalogClient, id: &str) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let message = client.delete_product(id).await?;
    emit(&json!({ "message": message }))
}
