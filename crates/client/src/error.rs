//! Errors returned by the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection refused, DNS, body read, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The base endpoint cannot be extended with path segments.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// HTTP status of an API error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Errors from the key-value store backing the cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that cannot be used as a storage name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The new cart could not be written back.
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The new cart could not be serialized.
    #[error("Cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
