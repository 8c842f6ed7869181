//! Veda Shop - storefront client core.
//!
//! This crate is the state container behind the Veda storefront UI: an
//! optimistic, local-first cart and wishlist that survives page reloads and
//! best-effort-syncs to the remote shop API.
//!
//! # Architecture
//!
//! - [`state::ShopState`] owns the in-memory cart and wishlist for the
//!   current identity (guest or authenticated user)
//! - every mutation is applied locally first, mirrored synchronously to a
//!   [`persist::SnapshotStore`] snapshot, and then pushed to the server by a
//!   detached background task whose failure is logged and swallowed
//! - on login, the guest collections are merged into the server copy and
//!   the server state is adopted afterwards (see [`state`])
//!
//! The remote API is reached through the [`api::ShopApi`] trait; the
//! production implementation is [`api::ApiClient`] over `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use veda_shop::api::ApiClient;
//! use veda_shop::config::ShopConfig;
//! use veda_shop::persist::FileStore;
//! use veda_shop::state::ShopState;
//!
//! let config = ShopConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! let store = FileStore::new(&config.storage_dir);
//! let mut shop = ShopState::new(api, store);
//!
//! shop.restore().await;
//! shop.add_to_cart(product, 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod persist;
pub mod session;
pub mod state;
pub mod store;
mod sync;

pub use error::{Result, ShopError};
pub use state::ShopState;
