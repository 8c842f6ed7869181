//! Catalog management, gated on the admin role.
//!
//! Product mutations go through the admin endpoints and are only attempted
//! when the current identity carries the admin role; the role check happens
//! client-side before any network call, the server enforces it again.

use thiserror::Error;

use veda_core::ProductId;

use crate::api::types::{NewProduct, Product, ProductUpdate};
use crate::api::{ApiError, ShopApi};
use crate::persist::SnapshotStore;
use crate::state::ShopState;

/// Failures from catalog management operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The current identity is not an admin; no request was made.
    #[error("catalog management requires an admin account")]
    NotAuthorized,

    /// The API rejected or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl<A, S> ShopState<A, S>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    fn require_admin(&self) -> Result<(), CatalogError> {
        match self.identity().user() {
            Some(user) if user.role.is_admin() => Ok(()),
            _ => Err(CatalogError::NotAuthorized),
        }
    }

    /// Create a product in the catalog.
    ///
    /// # Errors
    ///
    /// Fails without a network call unless the current identity is an
    /// admin; otherwise propagates API failures.
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, CatalogError> {
        self.require_admin()?;
        Ok(self.api().create_product(input).await?)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Fails without a network call unless the current identity is an
    /// admin; otherwise propagates API failures.
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, CatalogError> {
        self.require_admin()?;
        Ok(self.api().update_product(product_id, update).await?)
    }

    /// Delete a product from the catalog.
    ///
    /// # Errors
    ///
    /// Fails without a network call unless the current identity is an
    /// admin; otherwise propagates API failures.
    pub async fn delete_product(&self, product_id: &ProductId) -> Result<(), CatalogError> {
        self.require_admin()?;
        Ok(self.api().delete_product(product_id).await?)
    }
}
