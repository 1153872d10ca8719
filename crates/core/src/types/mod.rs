//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for products and the shopping cart.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartEntry};
pub use id::*;
pub use product::{Product, ProductListResponse, ProductPatch, ProductResponse};
