use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw product input: field name → value, as entered or decoded.
pub type ProductFields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Non-blank trimmed values carried by this field.
    pub fn values(&self) -> Vec<&str> {
        let values: Vec<&str> = match self {
            FieldValue::Single(v) => vec![v.trim()],
            FieldValue::List(items) => items.iter().map(|v| v.trim()).collect(),
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

/// A resolved metafield value ready for the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetafieldValue {
    Reference(String),
    References(Vec<String>),
}

impl MetafieldValue {
    /// Remote metafield type name for this value shape.
    pub fn remote_type(&self) -> &'static str {
        match self {
            MetafieldValue::Reference(_) => "metaobject_reference",
            MetafieldValue::References(_) => "list.metaobject_reference",
        }
    }

    /// Serialized value as the remote API expects it.
    pub fn to_remote_value(&self) -> String {
        match self {
            MetafieldValue::Reference(id) => id.clone(),
            MetafieldValue::References(ids) => {
                serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// Result of resolving product fields against the component catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyOutcome {
    /// Metafield key → catalog identifier(s)
    pub resolved: BTreeMap<String, MetafieldValue>,
    /// Input field name → values with no catalog entry
    pub missing: BTreeMap<String, Vec<String>>,
    /// Metafield key → literal text kept for single-valued misses
    pub literals: BTreeMap<String, String>,
}

impl AssemblyOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged() {
        let fields: ProductFields =
            serde_json::from_str(r#"{"cpu": "i7", "inclusions": ["With box", " "]}"#).unwrap();
        assert_eq!(fields["cpu"].values(), vec!["i7"]);
        assert_eq!(fields["inclusions"].values(), vec!["With box"]);
    }

    #[test]
    fn test_metafield_remote_value() {
        let single = MetafieldValue::Reference("gid://shopify/Metaobject/1".to_string());
        assert_eq!(single.remote_type(), "metaobject_reference");
        assert_eq!(single.to_remote_value(), "gid://shopify/Metaobject/1");

        let list = MetafieldValue::References(vec![
            "gid://shopify/Metaobject/1".to_string(),
            "gid://shopify/Metaobject/2".to_string(),
        ]);
        assert_eq!(list.remote_type(), "list.metaobject_reference");
        assert_eq!(
            list.to_remote_value(),
            r#"["gid://shopify/Metaobject/1","gid://shopify/Metaobject/2"]"#
        );
    }
}
