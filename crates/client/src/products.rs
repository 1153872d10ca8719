//! REST client for the catalog product API.
//!
//! Every method issues exactly one request against the configured base
//! endpoint and decodes the response. There is no retry, timeout or caching
//! layer; failures surface to the caller as [`CatalogError`].

use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use catalog_core::{Product, ProductId, ProductListResponse, ProductPatch, ProductResponse};

use crate::error::CatalogError;

/// Maximum number of body characters kept in an API error message.
const ERROR_BODY_EXCERPT: usize = 200;

/// Client for the product REST API.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ProductClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ProductClient {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(client, base_url))
    }

    /// Create a client that shares an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            inner: Arc::new(ProductClientInner { client, base_url }),
        }
    }

    /// Base endpoint all requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check whether a product with this ID exists.
    ///
    /// `GET {base}/exists/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a boolean.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn check_product_exists(&self, id: ProductId) -> Result<bool, CatalogError> {
        let url = self.endpoint(&["exists", &id.to_string()])?;
        let response = self.inner.client.get(url).send().await?;
        decode_json(response).await
    }

    /// Fetch a single product.
    ///
    /// `GET {base}/{id}`. The ID is taken as text because callers usually
    /// hold it as a route or form parameter.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not `{ product }`.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product_by_id(&self, id: &str) -> Result<ProductResponse, CatalogError> {
        let url = self.endpoint(&[id])?;
        let response = self.inner.client.get(url).send().await?;
        decode_json(response).await
    }

    /// Create a product.
    ///
    /// `POST {base}/add` with the product as the JSON body. Returns the
    /// backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn add_product(&self, product: &Product) -> Result<String, CatalogError> {
        let url = self.endpoint(&["add"])?;
        let response = self.inner.client.post(url).json(product).send().await?;
        decode_confirmation(response).await
    }

    /// Apply a partial update to a product.
    ///
    /// `PUT {base}/{id}` with only the changed fields as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product.
    #[instrument(skip(self, patch), fields(id = %id, fields = patch.fields().len()))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, CatalogError> {
        let url = self.endpoint(&[&id.to_string()])?;
        let response = self.inner.client.put(url).json(patch).send().await?;
        decode_json(response).await
    }

    /// Delete a product.
    ///
    /// `DELETE {base}/{id}`. Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<String, CatalogError> {
        let url = self.endpoint(&[&id.to_string()])?;
        let response = self.inner.client.delete(url).send().await?;
        decode_confirmation(response).await
    }

    /// List all products.
    ///
    /// `GET {base}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not `{ products }`.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<ProductListResponse, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await?;
        decode_json(response).await
    }

    /// Append path segments to the base endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Turn a non-success response into `CatalogError::Api`, otherwise return the body.
async fn read_body(response: Response) -> Result<String, CatalogError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            url = %url,
            body = %excerpt(&body),
            "Product API returned non-success status"
        );
        return Err(CatalogError::Api {
            status: status.as_u16(),
            message: excerpt(&body),
        });
    }

    debug!(status = %status, url = %url, bytes = body.len(), "Product API response");
    Ok(body)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, body = %excerpt(&body), "Failed to parse product API response");
        CatalogError::Parse(e.to_string())
    })
}

/// Confirmation endpoints answer with either a JSON string or plain text.
async fn decode_confirmation(response: Response) -> Result<String, CatalogError> {
    let body = read_body(response).await?;
    Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_EXCERPT).collect()
}
