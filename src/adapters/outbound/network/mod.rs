/// Network adapters for the remote catalog platform
mod shopify_client;

pub use shopify_client::{ShopifyAdminClient, ShopifyConnection};
