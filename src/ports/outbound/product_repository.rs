use crate::catalog::domain::{CreatedProduct, ProductPayload};
use crate::shared::Result;
use async_trait::async_trait;

/// ProductRepository port for creating products on the remote platform
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Creates one product with its variants, metafields and assignments
    ///
    /// # Errors
    /// Returns `CatalogError::RemoteUnavailable` on transport failure and
    /// `CatalogError::RemoteRejected` when the platform reports user errors.
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct>;
}

#[async_trait]
impl<T: ProductRepository + ?Sized> ProductRepository for &T {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct> {
        (**self).create_product(payload).await
    }
}
