//! Integration tests for the product REST calls.
//!
//! Each test stands up a mock backend and checks the exact request the
//! client sends and what it hands back.

use mockito::Matcher;
use serde_json::json;

use catalog_core::{Product, ProductId, ProductPatch};
use catalog_integration_tests::{API_PATH, TestContext};

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_get_product_by_id_requests_exact_path() {
    let mut ctx = TestContext::new().await;
    let payload = json!({
        "product": {"id": 42, "name": "Golden pineapple", "price": 5.75, "stock": 10}
    });
    let mock = ctx
        .server
        .mock("GET", format!("{API_PATH}/42").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(payload.to_string())
        .expect(1)
        .create_async()
        .await;

    let response = ctx.client.get_product_by_id("42").await.expect("request succeeds");

    mock.assert_async().await;
    assert_eq!(
        serde_json::to_value(&response).expect("serialize"),
        payload,
        "payload should pass through unchanged"
    );
}

#[tokio::test]
async fn test_get_products_returns_list() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .server
        .mock("GET", API_PATH)
        .with_status(200)
        .with_body(
            json!({"products": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}).to_string(),
        )
        .create_async()
        .await;

    let products = ctx
        .client
        .get_products()
        .await
        .expect("request succeeds")
        .into_products();

    let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_check_product_exists_false() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .server
        .mock("GET", format!("{API_PATH}/exists/77").as_str())
        .with_status(200)
        .with_body("false")
        .create_async()
        .await;

    let exists = ctx
        .client
        .check_product_exists(ProductId::new(77))
        .await
        .expect("request succeeds");

    assert!(!exists);
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_add_product_forwards_payload_verbatim() {
    let mut ctx = TestContext::new().await;
    let body = json!({
        "id": 9,
        "name": "Coconut water",
        "price": 2.1,
        "dimensions": {"volume_ml": 330},
        "tags": ["drink", "tropical"]
    });
    let product: Product = serde_json::from_value(body.clone()).expect("valid product");
    let mock = ctx
        .server
        .mock("POST", format!("{API_PATH}/add").as_str())
        .match_body(Matcher::Json(body))
        .with_status(200)
        .with_body("\"Producto agregado\"")
        .create_async()
        .await;

    let message = ctx.client.add_product(&product).await.expect("request succeeds");

    mock.assert_async().await;
    assert_eq!(message, "Producto agregado");
}

#[tokio::test]
async fn test_update_product_sends_only_patch_fields() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .server
        .mock("PUT", format!("{API_PATH}/9").as_str())
        .match_body(Matcher::Json(json!({"stock": 0})))
        .with_status(200)
        .with_body(json!({"id": 9, "name": "Coconut water", "stock": 0}).to_string())
        .create_async()
        .await;

    let updated = ctx
        .client
        .update_product(ProductId::new(9), &ProductPatch::new().set("stock", 0))
        .await
        .expect("request succeeds");

    mock.assert_async().await;
    assert_eq!(updated.attribute("stock"), Some(&json!(0)));
}

#[tokio::test]
async fn test_delete_product() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .server
        .mock("DELETE", format!("{API_PATH}/9").as_str())
        .with_status(200)
        .with_body("Product deleted")
        .create_async()
        .await;

    let message = ctx
        .client
        .delete_product(ProductId::new(9))
        .await
        .expect("request succeeds");

    mock.assert_async().await;
    assert_eq!(message, "Product deleted");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_http_error_surfaces_as_failed_result() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .server
        .mock("DELETE", format!("{API_PATH}/404").as_str())
        .with_status(404)
        .with_body("Product not found")
        .create_async()
        .await;

    let err = ctx
        .client
        .delete_product(ProductId::new(404))
        .await
        .expect_err("404 should fail");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_connection_refused_surfaces_as_http_error() {
    let ctx = TestContext::new().await;
    let config = catalog_client::CatalogConfig::new(
        "http://127.0.0.1:9/api/products",
        ctx.storage_dir.path(),
    )
    .expect("valid config");
    let client = catalog_client::CatalogClient::from_config(&config).expect("build client");

    let err = client.get_products().await.expect_err("nothing listens on port 9");

    assert!(matches!(err, catalog_client::CatalogError::Http(_)));
}
