use super::metafield::{FieldValue, ProductFields};
use super::Configuration;
use serde::Serialize;

/// Fields of a laptop-style template:
/// `{model} [{cpu}/{ram}/{vga}/{display}/{storage}] [{color}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaptopTemplate {
    pub model: String,
    pub cpu: String,
    pub ram: String,
    pub vga: String,
    pub display: String,
    pub storage: String,
    pub color: String,
}

/// Fields of a smartphone-style template:
/// `{model} {storage} [{color}]` or `{model} {storage} [{color}] [{preset}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartphoneTemplate {
    pub model: String,
    pub storage: String,
    pub color: String,
    pub inclusion_preset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ParsedTemplate {
    Laptop(LaptopTemplate),
    Smartphone(SmartphoneTemplate),
}

impl ParsedTemplate {
    pub fn model(&self) -> &str {
        match self {
            ParsedTemplate::Laptop(t) => &t.model,
            ParsedTemplate::Smartphone(t) => &t.model,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            ParsedTemplate::Laptop(t) => &t.color,
            ParsedTemplate::Smartphone(t) => &t.color,
        }
    }
}

/// How a template was matched against the stored configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// Every compared component agreed
    Exact,
    /// Accepted through the partial-match threshold
    Partial { matched: usize, compared: usize },
}

/// A template resolved back to full component names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTemplate {
    pub template: String,
    pub brand: String,
    pub model: String,
    /// Category of the stored model ("Laptop", "Smartphone"...)
    pub category: Option<String>,
    pub configuration: Configuration,
    pub color: String,
    pub inclusion_preset: Option<String>,
    pub match_kind: MatchKind,
}

impl DecodedTemplate {
    /// Converts the decoded template into assembler input.
    ///
    /// An inclusion preset such as `"Box + Charger"` becomes the list
    /// `["Box", "Charger"]`.
    pub fn to_product_fields(&self) -> ProductFields {
        let mut fields = ProductFields::new();
        for name in [
            "processor",
            "ram",
            "vga",
            "graphics",
            "display",
            "storage",
            "os",
            "keyboard_layout",
            "keyboard_backlight",
        ] {
            if let Some(value) = self.configuration.field(name) {
                fields.insert(name.to_string(), FieldValue::Single(value.to_string()));
            }
        }
        if !self.color.trim().is_empty() {
            fields.insert(
                "color".to_string(),
                FieldValue::Single(self.color.trim().to_string()),
            );
        }
        if let Some(preset) = &self.inclusion_preset {
            let items: Vec<String> = preset
                .split(['+', ','])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !items.is_empty() {
                fields.insert("inclusions".to_string(), FieldValue::List(items));
            }
        }
        fields
    }
}
