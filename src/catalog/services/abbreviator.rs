use crate::catalog::domain::{ComponentType, Configuration};
use regex::Regex;
use std::sync::OnceLock;

/// Token written in place of a dedicated GPU when a configuration has none.
pub const NO_VGA_TOKEN: &str = "Integrated";

static INTEL_CORE: OnceLock<Regex> = OnceLock::new();
static AMD_RYZEN: OnceLock<Regex> = OnceLock::new();
static NVIDIA_MODEL: OnceLock<Regex> = OnceLock::new();
static RADEON_MODEL: OnceLock<Regex> = OnceLock::new();
static REFRESH_RATE: OnceLock<Regex> = OnceLock::new();
static CAPACITY: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("abbreviation pattern must compile"))
}

/// ComponentAbbreviator compresses full component names into template tokens.
///
/// Every rule falls back to the trimmed full name when its pattern is absent,
/// so abbreviation never fails; it only gets less compact.
pub struct ComponentAbbreviator;

impl ComponentAbbreviator {
    /// Abbreviates `full_name` according to the rules for `component_type`.
    ///
    /// - processor: `i7-12700H` after "Intel Core", `Ryzen 7 7735HS` after
    ///   "AMD", " Chip" stripped after "Apple"
    /// - vga: `RTX 4060` / `GTX 1650`, else the model after "Radeon"
    /// - display: `144Hz`, else `Retina`
    /// - storage: capacity only (`512GB`)
    /// - everything else: unchanged
    pub fn abbreviate(full_name: &str, component_type: ComponentType) -> String {
        let name = full_name.trim();
        let abbreviated = match component_type {
            ComponentType::Processor => Self::processor(name),
            ComponentType::Vga => Self::vga(name),
            ComponentType::Display => Self::display(name),
            ComponentType::Storage => Self::storage(name),
            _ => None,
        };
        abbreviated.unwrap_or_else(|| name.to_string())
    }

    /// Template token for a field: abbreviated, with template delimiters
    /// (`/`, `[`, `]`) replaced so the result always parses back.
    pub fn token(value: Option<&str>, component_type: ComponentType) -> String {
        let raw = match (value, component_type) {
            (Some(v), t) => Self::abbreviate(v, t),
            (None, ComponentType::Vga) => NO_VGA_TOKEN.to_string(),
            (None, _) => String::new(),
        };
        sanitize(&raw)
    }

    /// The five laptop-template tokens: cpu, ram, vga, display, storage.
    pub fn configuration_tokens(config: &Configuration) -> [String; 5] {
        [
            Self::token(config.component(ComponentType::Processor), ComponentType::Processor),
            sanitize(config.field("ram").unwrap_or_default()),
            Self::token(config.component(ComponentType::Vga), ComponentType::Vga),
            Self::token(config.component(ComponentType::Display), ComponentType::Display),
            Self::token(config.component(ComponentType::Storage), ComponentType::Storage),
        ]
    }

    fn processor(name: &str) -> Option<String> {
        if name.contains("Intel Core") {
            return compiled(&INTEL_CORE, r"i\d+-\w+")
                .find(name)
                .map(|m| m.as_str().to_string());
        }
        if name.contains("AMD") {
            return compiled(&AMD_RYZEN, r"Ryzen \d+ \w+")
                .find(name)
                .map(|m| m.as_str().to_string());
        }
        if name.contains("Apple") {
            return Some(name.replace(" Chip", ""));
        }
        None
    }

    fn vga(name: &str) -> Option<String> {
        if let Some(m) = compiled(&NVIDIA_MODEL, r"(?:RTX|GTX) \d+").find(name) {
            return Some(m.as_str().to_string());
        }
        if name.contains("Radeon") {
            return compiled(&RADEON_MODEL, r"Radeon\s+((?:RX\s+)?[A-Za-z0-9]+)")
                .captures(name)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
        }
        None
    }

    fn display(name: &str) -> Option<String> {
        if let Some(c) = compiled(&REFRESH_RATE, r"(\d+)\s?Hz").captures(name) {
            return Some(format!("{}Hz", &c[1]));
        }
        if name.contains("Retina") {
            return Some("Retina".to_string());
        }
        None
    }

    fn storage(name: &str) -> Option<String> {
        compiled(&CAPACITY, r"(?i)(\d+)\s?(GB|TB)")
            .captures(name)
            .map(|c| format!("{}{}", &c[1], c[2].to_uppercase()))
    }
}

fn sanitize(token: &str) -> String {
    token.trim().replace('/', "-").replace(['[', ']'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intel_processor() {
        assert_eq!(
            ComponentAbbreviator::abbreviate(
                "Intel Core i7-12700H (20 CPUs), ~2.3GHz",
                ComponentType::Processor
            ),
            "i7-12700H"
        );
    }

    #[test]
    fn test_amd_processor() {
        assert_eq!(
            ComponentAbbreviator::abbreviate(
                "AMD Ryzen 7 7735HS (16 CPUs), ~3.2GHz",
                ComponentType::Processor
            ),
            "Ryzen 7 7735HS"
        );
    }

    #[test]
    fn test_apple_processor_strips_chip() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("Apple M2 Chip", ComponentType::Processor),
            "Apple M2"
        );
    }

    #[test]
    fn test_processor_without_pattern_falls_back() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("Intel Core Ultra 7 155H", ComponentType::Processor),
            "Intel Core Ultra 7 155H"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate(" Qualcomm Snapdragon X ", ComponentType::Processor),
            "Qualcomm Snapdragon X"
        );
    }

    #[test]
    fn test_vga_rules() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("NVIDIA GeForce RTX 4060 8GB", ComponentType::Vga),
            "RTX 4060"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("NVIDIA GeForce GTX 1650 4GB", ComponentType::Vga),
            "GTX 1650"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("AMD Radeon RX 6500M 4GB", ComponentType::Vga),
            "RX 6500M"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("AMD Radeon 680M", ComponentType::Vga),
            "680M"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("Intel Arc A370M", ComponentType::Vga),
            "Intel Arc A370M"
        );
    }

    #[test]
    fn test_display_rules() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("15.6 inch FHD 144Hz", ComponentType::Display),
            "144Hz"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("13.3 inch Retina Display", ComponentType::Display),
            "Retina"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("14 inch WUXGA IPS", ComponentType::Display),
            "14 inch WUXGA IPS"
        );
    }

    #[test]
    fn test_storage_capacity() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("512GB SSD", ComponentType::Storage),
            "512GB"
        );
        assert_eq!(
            ComponentAbbreviator::abbreviate("1 TB NVMe", ComponentType::Storage),
            "1TB"
        );
    }

    #[test]
    fn test_identity_types() {
        assert_eq!(
            ComponentAbbreviator::abbreviate("Windows 11 Home", ComponentType::Os),
            "Windows 11 Home"
        );
    }

    #[test]
    fn test_token_sanitizes_delimiters() {
        assert_eq!(
            ComponentAbbreviator::token(Some("Intel/Other [x]"), ComponentType::Processor),
            "Intel-Other x"
        );
        assert_eq!(
            ComponentAbbreviator::token(None, ComponentType::Vga),
            NO_VGA_TOKEN
        );
        assert_eq!(ComponentAbbreviator::token(None, ComponentType::Display), "");
    }
}
