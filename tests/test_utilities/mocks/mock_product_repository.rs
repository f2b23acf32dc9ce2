use async_trait::async_trait;
use catalog_mapper::catalog::domain::{CreatedProduct, ProductPayload};
use catalog_mapper::prelude::*;
use catalog_mapper::shared::error::CatalogError;
use std::sync::Mutex;

/// Mock ProductRepository capturing every payload it receives
#[derive(Default)]
pub struct MockProductRepository {
    reject: bool,
    pub payloads: Mutex<Vec<ProductPayload>>,
}

impl MockProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every product creation is rejected by the platform.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<ProductPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct> {
        self.payloads.lock().unwrap().push(payload.clone());
        if self.reject {
            return Err(CatalogError::RemoteRejected {
                operation: "productCreate".to_string(),
                messages: vec!["Title can't be blank".to_string()],
            }
            .into());
        }
        Ok(CreatedProduct {
            id: "gid://shopify/Product/42".to_string(),
            handle: Some("created-product".to_string()),
        })
    }
}
