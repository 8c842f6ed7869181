//! Veda Core - Shared types library.
//!
//! This crate provides common types used across all Veda components:
//! - `shop` - The storefront client core (cart, wishlist, session)
//! - `cli` - Command-line tools for driving the client core
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
