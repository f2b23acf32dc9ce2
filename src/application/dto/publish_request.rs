use crate::catalog::domain::{CreatedProduct, ProductFields, ProductPayload};
use std::collections::BTreeMap;

/// PublishRequest - Operator input for publishing one product
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    /// Template string; also the product title unless `title` is set
    pub template: String,
    /// Decimal price of the single variant
    pub price: String,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub collection_ids: Vec<String>,
    pub channel_ids: Vec<String>,
    pub image_urls: Vec<String>,
    /// Fields not carried by the template (rank, inclusions, issues)
    pub extra_fields: ProductFields,
}

/// PublishResponse - What was sent and what the platform returned
#[derive(Debug, Clone)]
pub struct PublishResponse {
    pub product: CreatedProduct,
    pub payload: ProductPayload,
    /// Values published as literal text because no catalog entry exists
    pub missing: BTreeMap<String, Vec<String>>,
}
