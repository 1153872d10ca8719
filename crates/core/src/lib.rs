//! Catalog Core - Shared product and cart types.
//!
//! This crate provides the types used by every catalog component:
//! - `client` - REST product client and persistent cart store
//! - `cli` - Command-line host for the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. Cart mutations live here as plain methods on
//! [`Cart`] so they can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, products, partial updates, and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
