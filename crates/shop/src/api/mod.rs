//! Remote shop API: trait seam, wire types, and the reqwest client.
//!
//! # Architecture
//!
//! - [`ShopApi`] is the seam the state container talks through; production
//!   code uses [`ApiClient`], tests substitute an in-process fake
//! - collection responses pass through [`shapes::normalize`] because the
//!   API's envelope varies per endpoint
//! - catalog reads are cached in-memory via `moka` (5 minute TTL);
//!   cart/wishlist/session calls are never cached

mod client;
pub mod shapes;
pub mod types;

pub use client::ApiClient;

use std::future::Future;

use secrecy::SecretString;
use thiserror::Error;

use veda_core::ProductId;

use crate::store::Item;
use types::{Credentials, LoginResponse, NewProduct, Product, ProductUpdate, RegisterInput, UserProfile};

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, truncated.
        message: String,
    },

    /// Credentials or token were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the server.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of fetching a remote collection.
///
/// `Ok(None)` means the request succeeded but the body matched no known
/// collection shape - callers must not treat that as an empty collection.
pub type CollectionFetch = Result<Option<Vec<Item>>, ApiError>;

/// The remote shop API surface consumed by the state container.
///
/// Implementations must be cheap to clone (the state container clones them
/// into detached sync tasks) and their futures must be `Send`.
pub trait ShopApi: Send + Sync {
    /// Install or clear the bearer token used for authenticated calls.
    fn set_token(&self, token: Option<SecretString>);

    // =========================================================================
    // Session
    // =========================================================================

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    fn register(
        &self,
        input: &RegisterInput,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    fn fetch_current_user(&self) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;

    // =========================================================================
    // Cart
    // =========================================================================

    fn fetch_cart(&self) -> impl Future<Output = CollectionFetch> + Send;

    fn add_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn remove_cart_item(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    // =========================================================================
    // Wishlist
    // =========================================================================

    fn fetch_wishlist(&self) -> impl Future<Output = CollectionFetch> + Send;

    fn add_wishlist_item(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn remove_wishlist_item(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    // =========================================================================
    // Catalog
    // =========================================================================

    fn get_product(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    // =========================================================================
    // Catalog (admin only)
    // =========================================================================

    fn create_product(
        &self,
        input: &NewProduct,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn update_product(
        &self,
        product_id: &ProductId,
        input: &ProductUpdate,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn delete_product(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
