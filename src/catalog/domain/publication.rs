use super::MetafieldValue;
use serde::{Deserialize, Serialize};

/// Namespace of reference metafields written on published products.
pub const METAFIELD_NAMESPACE: &str = "specs";

/// Namespace holding plain-text fallbacks for values with no catalog entry.
pub const LITERAL_NAMESPACE: &str = "specs_text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldInput {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl MetafieldInput {
    pub fn reference(key: &str, value: &MetafieldValue) -> Self {
        Self {
            namespace: METAFIELD_NAMESPACE.to_string(),
            key: key.to_string(),
            kind: value.remote_type().to_string(),
            value: value.to_remote_value(),
        }
    }

    pub fn literal(key: &str, text: &str) -> Self {
        Self {
            namespace: LITERAL_NAMESPACE.to_string(),
            key: key.to_string(),
            kind: "single_line_text_field".to_string(),
            value: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInput {
    /// Decimal string, e.g. `"1299.00"`
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Option values in `ProductPayload::options` order
    pub option_values: Vec<String>,
}

/// Product record handed to the product-creation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub title: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    /// Option names, e.g. `["Color"]`
    pub options: Vec<String>,
    pub variants: Vec<VariantInput>,
    pub metafields: Vec<MetafieldInput>,
    pub collection_ids: Vec<String>,
    pub channel_ids: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Identifier of a product accepted by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
    #[serde(default)]
    pub handle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::ComponentType;

    #[test]
    fn test_reference_metafields_use_specs_namespace() {
        let rank = MetafieldInput::reference(
            ComponentType::ProductRank.metafield_key(),
            &MetafieldValue::Reference("gid://shopify/Metaobject/7".to_string()),
        );
        assert_eq!(rank.namespace, "specs");
        assert_eq!(rank.key, "rank");
        assert_eq!(rank.kind, "metaobject_reference");

        let graphics = MetafieldInput::literal(ComponentType::Graphics.metafield_key(), "Iris Xe");
        assert_eq!(graphics.namespace, "specs_text");
        assert_eq!(graphics.key, "graphics");
    }
}
