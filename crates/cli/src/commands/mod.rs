//! Subcommand implementations.

use serde::Serialize;
use thiserror::Error;

use catalog_client::{CartError, CatalogError, ConfigError};
use catalog_core::ProductId;

pub mod cart;
pub mod products;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Product API call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart could not be saved.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Argument is not valid JSON of the expected shape.
    #[error("Invalid JSON argument: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Argument is not a numeric product ID.
    #[error("Invalid product ID: {0}")]
    InvalidId(String),
}

/// Parse a numeric product ID argument.
pub fn parse_id(raw: &str) -> Result<ProductId, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidId(raw.to_owned()))
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn emit<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
