use super::ComponentType;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One concrete hardware build of a product model.
///
/// Every field except `ram` should match a catalog key of the matching
/// component type; a value absent from the catalog is exactly what the
/// missing-entry tracker exists to catch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vga: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_backlight: Option<String>,
}

impl Configuration {
    /// Catalog-backed fields carried by a configuration, in report order.
    pub const CATALOG_FIELDS: [ComponentType; 8] = [
        ComponentType::Processor,
        ComponentType::Vga,
        ComponentType::Graphics,
        ComponentType::Display,
        ComponentType::Storage,
        ComponentType::Os,
        ComponentType::KeyboardLayout,
        ComponentType::KeyboardBacklight,
    ];

    /// Fields whose absence makes a configuration unusable.
    pub const REQUIRED_FIELDS: [&'static str; 4] = ["processor", "ram", "display", "storage"];

    /// Value of a catalog-backed field, with blanks treated as absent.
    pub fn component(&self, component_type: ComponentType) -> Option<&str> {
        let value = match component_type {
            ComponentType::Processor => self.processor.as_deref(),
            ComponentType::Vga => self.vga.as_deref(),
            ComponentType::Graphics => self.graphics.as_deref(),
            ComponentType::Display => self.display.as_deref(),
            ComponentType::Storage => self.storage.as_deref(),
            ComponentType::Os => self.os.as_deref(),
            ComponentType::KeyboardLayout => self.keyboard_layout.as_deref(),
            ComponentType::KeyboardBacklight => self.keyboard_backlight.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Looks up a field by its JSON name, including `ram`.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "ram" => self.ram.as_deref(),
            other => return ComponentType::from_field_name(other).and_then(|t| self.component(t)),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Names of required fields that are absent or blank.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| self.field(name).is_none())
            .collect()
    }
}

/// A sellable model within one brand catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductModel {
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub configurations: Vec<Configuration>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Form a color takes inside a template bracket.
///
/// Brackets delimit template fields, so they are dropped from the name and
/// the whitespace they leave behind is collapsed.
pub fn template_color(color: &str) -> String {
    color
        .replace(['[', ']'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category and color lookups shared by stored models and their legacy view.
pub trait ModelAttributes {
    fn category(&self) -> Option<&str>;

    fn colors(&self) -> &[String];

    /// Phones and tablets use the short `{model} {storage} [{color}]` template.
    fn is_smartphone(&self) -> bool {
        self.category()
            .map(|c| {
                let c = c.to_lowercase();
                c.contains("phone") || c.contains("tablet")
            })
            .unwrap_or(false)
    }

    /// Stored color whose template form equals `color`.
    fn find_color(&self, color: &str) -> Option<&str> {
        let wanted = template_color(color);
        if wanted.is_empty() {
            return None;
        }
        self.colors()
            .iter()
            .map(String::as_str)
            .find(|c| template_color(c) == wanted)
    }

    fn has_color(&self, color: &str) -> bool {
        self.find_color(color).is_some()
    }
}

impl ModelAttributes for ProductModel {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn colors(&self) -> &[String] {
        &self.colors
    }
}

/// Contents of one `products/{brand}.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCatalog {
    pub brand: String,
    pub models: BTreeMap<String, ProductModel>,
}

/// Single-configuration view of a model for consumers that predate
/// multi-configuration catalogs.
///
/// Lossy: the first configuration's fields are copied to the top level and
/// every other configuration is visible only through `configurations`.
/// Never write this shape back as the canonical representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyModelView {
    pub model_key: String,
    pub brand: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub configurations: Vec<Configuration>,
    pub colors: Vec<String>,
    #[serde(flatten)]
    pub primary: Configuration,
}

impl LegacyModelView {
    pub fn new(brand: &str, model_key: &str, model: &ProductModel) -> Self {
        Self {
            model_key: model_key.to_string(),
            brand: brand.to_string(),
            display_name: model.display_name.clone(),
            series: model.series.clone(),
            year: model.year,
            category: model.category.clone(),
            configurations: model.configurations.clone(),
            colors: model.colors.clone(),
            primary: model.configurations.first().cloned().unwrap_or_default(),
        }
    }
}

impl ModelAttributes for LegacyModelView {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn colors(&self) -> &[String] {
        &self.colors
    }
}

/// Accepts `2023` or `"2023"`; anything else non-numeric becomes `None`.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(u16),
        Text(String),
    }

    Ok(match Option::<RawYear>::deserialize(deserializer)? {
        Some(RawYear::Number(n)) => Some(n),
        Some(RawYear::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> ProductModel {
        serde_json::from_str(
            r#"{
                "display_name": "ASUS TUF Gaming F15",
                "series": "TUF",
                "year": "2023",
                "category": "Gaming Laptop",
                "configurations": [
                    {
                        "processor": "Intel Core i7-12700H (20 CPUs), ~2.3GHz",
                        "ram": "16GB",
                        "vga": "NVIDIA GeForce RTX 4060 8GB",
                        "graphics": "Intel Iris Xe Graphics",
                        "display": "15.6 inch FHD 144Hz",
                        "storage": "512GB SSD"
                    },
                    { "processor": "Intel Core i5-12500H", "ram": "8GB", "storage": "512GB SSD" }
                ],
                "colors": ["Graphite Black", "Mecha Gray"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_year_accepts_string() {
        assert_eq!(sample_model().year, Some(2023));
    }

    #[test]
    fn test_component_accessor_skips_blank() {
        let config = Configuration {
            vga: Some("  ".to_string()),
            processor: Some("Apple M2 Chip".to_string()),
            ..Default::default()
        };
        assert_eq!(config.component(ComponentType::Vga), None);
        assert_eq!(
            config.component(ComponentType::Processor),
            Some("Apple M2 Chip")
        );
        assert_eq!(config.component(ComponentType::Color), None);
    }

    #[test]
    fn test_missing_required_fields() {
        let model = sample_model();
        assert!(model.configurations[0].missing_required_fields().is_empty());
        assert_eq!(
            model.configurations[1].missing_required_fields(),
            vec!["display"]
        );
    }

    #[test]
    fn test_legacy_view_flattens_first_configuration() {
        let model = sample_model();
        let view = LegacyModelView::new("ASUS", "ASUS TUF F15 FX507ZV4", &model);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["processor"], "Intel Core i7-12700H (20 CPUs), ~2.3GHz");
        assert_eq!(json["brand"], "ASUS");
        assert_eq!(json["configurations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_smartphone_detection() {
        let mut model = sample_model();
        assert!(!model.is_smartphone());
        model.category = Some("Smartphone".to_string());
        assert!(model.is_smartphone());

        let view = LegacyModelView::new("ASUS", "ASUS TUF F15 FX507ZV4", &model);
        assert!(view.is_smartphone());
    }

    #[test]
    fn test_template_color_drops_brackets() {
        assert_eq!(template_color(" Graphite Black "), "Graphite Black");
        assert_eq!(template_color("Black [Matte]"), "Black Matte");
        assert_eq!(template_color("Black/Grey"), "Black/Grey");
        assert_eq!(template_color("[]"), "");
    }

    #[test]
    fn test_find_color_returns_stored_name() {
        let mut model = sample_model();
        model.colors.push("Black [Matte]".to_string());

        assert_eq!(model.find_color("Mecha Gray"), Some("Mecha Gray"));
        assert_eq!(model.find_color("Black Matte"), Some("Black [Matte]"));
        assert_eq!(model.find_color("Neon Pink"), None);
        assert_eq!(model.find_color(""), None);
        assert!(model.has_color(" Graphite Black"));
    }
}
