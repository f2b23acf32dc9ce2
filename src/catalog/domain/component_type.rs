use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Full display name → remote identifier for one component type.
///
/// Keys are unique by construction; identifiers may repeat across keys,
/// which catalog validation reports as a duplicate-mapping anomaly.
pub type ComponentMapping = BTreeMap<String, String>;

/// Closed set of structured attribute categories backed by a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Processor,
    /// Dedicated graphics
    Vga,
    /// Integrated graphics
    Graphics,
    Display,
    Storage,
    Color,
    Os,
    KeyboardLayout,
    KeyboardBacklight,
    ProductRank,
    ProductInclusion,
    /// Known issues / defects of a used unit
    Minus,
}

/// Alternate field spellings accepted from product inputs.
///
/// Looked up by `ComponentType::from_field_name`; anything absent here is
/// not a catalog-backed field.
const FIELD_ALIASES: &[(&str, ComponentType)] = &[
    ("processor", ComponentType::Processor),
    ("cpu", ComponentType::Processor),
    ("vga", ComponentType::Vga),
    ("gpu", ComponentType::Vga),
    ("dedicated_graphics", ComponentType::Vga),
    ("graphics", ComponentType::Graphics),
    ("integrated_graphics", ComponentType::Graphics),
    ("display", ComponentType::Display),
    ("screen", ComponentType::Display),
    ("storage", ComponentType::Storage),
    ("ssd", ComponentType::Storage),
    ("color", ComponentType::Color),
    ("colour", ComponentType::Color),
    ("os", ComponentType::Os),
    ("operating_system", ComponentType::Os),
    ("keyboard_layout", ComponentType::KeyboardLayout),
    ("keyboard_backlight", ComponentType::KeyboardBacklight),
    ("backlight", ComponentType::KeyboardBacklight),
    ("rank", ComponentType::ProductRank),
    ("product_rank", ComponentType::ProductRank),
    ("inclusion", ComponentType::ProductInclusion),
    ("inclusions", ComponentType::ProductInclusion),
    ("product_inclusion", ComponentType::ProductInclusion),
    ("product_inclusions", ComponentType::ProductInclusion),
    ("minus", ComponentType::Minus),
    ("issue", ComponentType::Minus),
    ("issues", ComponentType::Minus),
    ("product_minus", ComponentType::Minus),
];

impl ComponentType {
    pub const ALL: [ComponentType; 12] = [
        ComponentType::Processor,
        ComponentType::Vga,
        ComponentType::Graphics,
        ComponentType::Display,
        ComponentType::Storage,
        ComponentType::Color,
        ComponentType::Os,
        ComponentType::KeyboardLayout,
        ComponentType::KeyboardBacklight,
        ComponentType::ProductRank,
        ComponentType::ProductInclusion,
        ComponentType::Minus,
    ];

    /// Canonical snake_case name, also the remote metaobject definition type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Processor => "processor",
            ComponentType::Vga => "vga",
            ComponentType::Graphics => "graphics",
            ComponentType::Display => "display",
            ComponentType::Storage => "storage",
            ComponentType::Color => "color",
            ComponentType::Os => "os",
            ComponentType::KeyboardLayout => "keyboard_layout",
            ComponentType::KeyboardBacklight => "keyboard_backlight",
            ComponentType::ProductRank => "product_rank",
            ComponentType::ProductInclusion => "product_inclusion",
            ComponentType::Minus => "minus",
        }
    }

    /// Stem of the backing file under `metaobjects/`.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ComponentType::Processor => "processors",
            ComponentType::Vga => "vgas",
            ComponentType::Graphics => "graphics",
            ComponentType::Display => "displays",
            ComponentType::Storage => "storages",
            ComponentType::Color => "colors",
            ComponentType::Os => "os",
            ComponentType::KeyboardLayout => "keyboard_layouts",
            ComponentType::KeyboardBacklight => "keyboard_backlights",
            ComponentType::ProductRank => "product_ranks",
            ComponentType::ProductInclusion => "product_inclusions",
            ComponentType::Minus => "product_minus",
        }
    }

    /// Key of the product metafield this type fills, under
    /// `METAFIELD_NAMESPACE` (or `LITERAL_NAMESPACE` for text fallbacks).
    pub fn metafield_key(&self) -> &'static str {
        match self {
            ComponentType::ProductRank => "rank",
            ComponentType::ProductInclusion => "inclusions",
            other => other.as_str(),
        }
    }

    /// Whether the metafield holds a list of references.
    pub fn is_list(&self) -> bool {
        matches!(self, ComponentType::ProductInclusion | ComponentType::Minus)
    }

    /// Resolves an input field name through the alias table.
    pub fn from_field_name(name: &str) -> Option<ComponentType> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        FIELD_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, component_type)| *component_type)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::from_field_name(s).ok_or_else(|| {
            format!(
                "Invalid component type: {}. Expected one of: {}",
                s,
                ComponentType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn test_aliases_resolve_to_same_type() {
        assert_eq!(
            ComponentType::from_field_name("cpu"),
            Some(ComponentType::Processor)
        );
        assert_eq!(
            ComponentType::from_field_name("processor"),
            Some(ComponentType::Processor)
        );
        assert_eq!(
            ComponentType::from_field_name("Inclusions"),
            Some(ComponentType::ProductInclusion)
        );
        assert_eq!(
            ComponentType::from_field_name("keyboard-backlight"),
            Some(ComponentType::KeyboardBacklight)
        );
    }

    #[test]
    fn test_unknown_field_is_none() {
        assert_eq!(ComponentType::from_field_name("price"), None);
        assert_eq!(ComponentType::from_field_name(""), None);
    }

    #[test]
    fn test_every_type_reachable_by_canonical_name() {
        for component_type in ComponentType::ALL {
            assert_eq!(
                ComponentType::from_field_name(component_type.as_str()),
                Some(component_type)
            );
        }
    }

    #[test]
    fn test_file_stems_are_unique() {
        let stems: HashSet<_> = ComponentType::ALL.iter().map(|t| t.file_stem()).collect();
        assert_eq!(stems.len(), ComponentType::ALL.len());
    }

    #[test]
    fn test_list_types() {
        assert!(ComponentType::ProductInclusion.is_list());
        assert!(ComponentType::Minus.is_list());
        assert!(!ComponentType::Processor.is_list());
    }

    #[test]
    fn test_metafield_keys() {
        assert_eq!(ComponentType::ProductInclusion.metafield_key(), "inclusions");
        assert_eq!(ComponentType::ProductRank.metafield_key(), "rank");
        assert_eq!(ComponentType::Vga.metafield_key(), "vga");
    }

    #[test]
    fn test_from_str_invalid_lists_choices() {
        let err = ComponentType::from_str("warranty").unwrap_err();
        assert!(err.contains("warranty"));
        assert!(err.contains("processor"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ComponentType::KeyboardLayout).unwrap();
        assert_eq!(json, "\"keyboard_layout\"");
    }
}
