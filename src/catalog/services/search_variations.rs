use crate::catalog::domain::ComponentType;
use regex::Regex;
use std::sync::OnceLock;

static CAPACITY_SUFFIX: OnceLock<Regex> = OnceLock::new();
static BARE_CAPACITY: OnceLock<Regex> = OnceLock::new();

const MANUFACTURER_PREFIXES: &[&str] = &[
    "NVIDIA GeForce ",
    "NVIDIA ",
    "GeForce ",
    "AMD ",
    "Intel ",
    "Apple ",
    "Qualcomm ",
    "MediaTek ",
];

const STORAGE_SUFFIXES: &[&str] = &[" SSD", " HDD", " NVMe", " eMMC"];

/// Abbreviation families swapped in both directions for display searches.
const DISPLAY_SYNONYMS: &[(&str, &str)] = &[
    ("FHD", "Full HD"),
    ("QHD", "Quad HD"),
    ("UHD", "Ultra HD"),
    ("\"", " inch"),
];

/// Maximum number of queries issued per unmapped value.
pub const MAX_VARIATIONS: usize = 6;

/// SearchVariations produces the remote-search queries for an unmapped value.
///
/// Output is deterministic: the original value first, then progressively
/// looser rewrites, de-duplicated, capped at `MAX_VARIATIONS`.
pub struct SearchVariations;

impl SearchVariations {
    pub fn generate(component_type: ComponentType, value: &str) -> Vec<String> {
        let original = value.trim().to_string();
        let mut variations = vec![original.clone()];

        if let Some(stripped) = Self::strip_manufacturer(&original) {
            variations.push(stripped);
        }

        match component_type {
            ComponentType::Storage => variations.extend(Self::storage(&original)),
            ComponentType::Vga | ComponentType::Graphics => {
                let capacity = CAPACITY_SUFFIX.get_or_init(|| {
                    Regex::new(r"\s+\d+\s?GB$").expect("capacity pattern must compile")
                });
                let snapshot = variations.clone();
                for v in snapshot {
                    let without = capacity.replace(&v, "").trim().to_string();
                    if without != v {
                        variations.push(without);
                    }
                }
            }
            ComponentType::Display => variations.extend(Self::display(&original)),
            ComponentType::Processor => {
                if let Some(head) = original.split(" (").next() {
                    variations.push(head.trim().to_string());
                }
            }
            _ => {}
        }

        let mut seen = std::collections::HashSet::new();
        variations
            .into_iter()
            .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
            .take(MAX_VARIATIONS)
            .collect()
    }

    fn strip_manufacturer(value: &str) -> Option<String> {
        MANUFACTURER_PREFIXES
            .iter()
            .find_map(|prefix| value.strip_prefix(prefix))
            .map(|rest| rest.trim().to_string())
    }

    fn storage(value: &str) -> Vec<String> {
        if let Some(base) = STORAGE_SUFFIXES
            .iter()
            .find_map(|suffix| value.strip_suffix(suffix))
        {
            return vec![base.trim().to_string()];
        }
        let bare = BARE_CAPACITY.get_or_init(|| {
            Regex::new(r"(?i)^\d+\s?(GB|TB)$").expect("capacity pattern must compile")
        });
        if bare.is_match(value) {
            return vec![format!("{} SSD", value)];
        }
        Vec::new()
    }

    fn display(value: &str) -> Vec<String> {
        let mut out = Vec::new();
        for (short, long) in DISPLAY_SYNONYMS {
            if value.contains(long) {
                out.push(value.replace(long, short));
            } else if value.contains(short) {
                out.push(value.replace(short, long));
            }
        }
        out
    }
}
