//! Crate-wide error type.
//!
//! Each layer keeps its own error enum; this is the roll-up for callers
//! (the CLI, mostly) that cross several layers in one command.

use thiserror::Error;

use crate::admin::CatalogError;
use crate::api::ApiError;
use crate::config::ConfigError;
use crate::persist::PersistError;
use crate::session::AuthError;

/// Convenience alias for fallible shop operations.
pub type Result<T> = std::result::Result<T, ShopError>;

/// Any failure the shop layer can surface.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API request error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Snapshot persistence error.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Catalog management error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
