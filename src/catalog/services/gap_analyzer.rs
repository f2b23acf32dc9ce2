use crate::catalog::domain::{
    BrandCatalog, ComponentMapping, ComponentType, Configuration, GapEntry, GapReport,
    TypeCoverage,
};
use chrono::Utc;
use std::collections::BTreeMap;

/// Component types a gap analysis covers: every catalog-backed
/// configuration field plus model colors.
pub const ANALYZED_TYPES: [ComponentType; 9] = [
    ComponentType::Processor,
    ComponentType::Vga,
    ComponentType::Graphics,
    ComponentType::Display,
    ComponentType::Storage,
    ComponentType::Os,
    ComponentType::KeyboardLayout,
    ComponentType::KeyboardBacklight,
    ComponentType::Color,
];

/// GapAnalyzer diffs referenced specification values against the catalog.
pub struct GapAnalyzer;

impl GapAnalyzer {
    pub fn analyze(
        brands: &[BrandCatalog],
        mappings: &BTreeMap<ComponentType, ComponentMapping>,
        skipped_brands: Vec<String>,
    ) -> GapReport {
        let references = Self::collect_references(brands);
        let empty = ComponentMapping::new();

        let mut coverage = Vec::with_capacity(ANALYZED_TYPES.len());
        let mut unmapped = BTreeMap::new();

        for component_type in ANALYZED_TYPES {
            let mapping = mappings.get(&component_type).unwrap_or(&empty);
            let values = references.get(&component_type);
            let referenced = values.map(BTreeMap::len).unwrap_or(0);

            let gaps: Vec<GapEntry> = values
                .into_iter()
                .flat_map(|v| v.values())
                .filter(|entry| !mapping.contains_key(&entry.value))
                .cloned()
                .collect();

            coverage.push(TypeCoverage {
                component_type,
                referenced,
                mapped: referenced - gaps.len(),
            });
            if !gaps.is_empty() {
                unmapped.insert(component_type, gaps);
            }
        }

        GapReport {
            generated_at: Utc::now(),
            coverage,
            unmapped,
            skipped_brands,
        }
    }

    /// type → value → entry, counting one reference per configuration
    /// (or per color slot).
    fn collect_references(
        brands: &[BrandCatalog],
    ) -> BTreeMap<ComponentType, BTreeMap<String, GapEntry>> {
        let mut references: BTreeMap<ComponentType, BTreeMap<String, GapEntry>> = BTreeMap::new();
        let mut record = |component_type: ComponentType, value: &str, source: &str| {
            let entry = references
                .entry(component_type)
                .or_default()
                .entry(value.to_string())
                .or_insert_with(|| GapEntry {
                    component_type,
                    value: value.to_string(),
                    frequency: 0,
                    found_in: Default::default(),
                });
            entry.frequency += 1;
            entry.found_in.insert(source.to_string());
        };

        for brand in brands {
            for (model_key, model) in &brand.models {
                let source = format!("{} / {}", brand.brand, model_key);
                for config in &model.configurations {
                    for component_type in Configuration::CATALOG_FIELDS {
                        if let Some(value) = config.component(component_type) {
                            record(component_type, value, &source);
                        }
                    }
                }
                for color in model.colors.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
                    record(ComponentType::Color, color, &source);
                }
            }
        }
        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{JobStatus, ProductModel};

    fn brand(name: &str, model_key: &str, vga: &str) -> BrandCatalog {
        let model = ProductModel {
            display_name: model_key.to_string(),
            configurations: vec![
                Configuration {
                    processor: Some("Intel Core i7-12700H (20 CPUs), ~2.3GHz".to_string()),
                    vga: Some(vga.to_string()),
                    ..Default::default()
                },
                Configuration {
                    processor: Some("Intel Core i5-12500H (16 CPUs), ~2.5GHz".to_string()),
                    vga: Some(vga.to_string()),
                    ..Default::default()
                },
            ],
            colors: vec!["Graphite Black".to_string()],
            ..Default::default()
        };
        BrandCatalog {
            brand: name.to_string(),
            models: BTreeMap::from([(model_key.to_string(), model)]),
        }
    }

    #[test]
    fn test_lists_unmapped_values_with_provenance() {
        let brands = vec![
            brand("ASUS", "TUF F15", "NVIDIA GeForce RTX 4060 8GB"),
            brand("Lenovo", "Legion 5", "NVIDIA GeForce RTX 4060 8GB"),
        ];
        let mut mappings = BTreeMap::new();
        mappings.insert(
            ComponentType::Processor,
            ComponentMapping::from([(
                "Intel Core i7-12700H (20 CPUs), ~2.3GHz".to_string(),
                "gid://shopify/Metaobject/1".to_string(),
            )]),
        );

        let report = GapAnalyzer::analyze(&brands, &mappings, vec![]);

        let vga = &report.unmapped[&ComponentType::Vga];
        assert_eq!(vga.len(), 1);
        assert_eq!(vga[0].frequency, 4);
        assert_eq!(
            vga[0].found_in.iter().cloned().collect::<Vec<_>>(),
            vec!["ASUS / TUF F15", "Lenovo / Legion 5"]
        );

        let processors = &report.unmapped[&ComponentType::Processor];
        assert_eq!(processors.len(), 1);
        assert_eq!(processors[0].value, "Intel Core i5-12500H (16 CPUs), ~2.5GHz");

        assert!(report.unmapped.contains_key(&ComponentType::Color));
        assert_eq!(report.status(), JobStatus::Partial);
    }

    #[test]
    fn test_fully_mapped_store_passes() {
        let brands = vec![brand("ASUS", "TUF F15", "RTX")];
        let mut mappings = BTreeMap::new();
        for (component_type, value) in [
            (ComponentType::Processor, "Intel Core i7-12700H (20 CPUs), ~2.3GHz"),
            (ComponentType::Processor, "Intel Core i5-12500H (16 CPUs), ~2.5GHz"),
            (ComponentType::Vga, "RTX"),
            (ComponentType::Color, "Graphite Black"),
        ] {
            mappings
                .entry(component_type)
                .or_insert_with(ComponentMapping::new)
                .insert(value.to_string(), "gid://shopify/Metaobject/1".to_string());
        }

        let report = GapAnalyzer::analyze(&brands, &mappings, vec![]);
        assert!(report.unmapped.is_empty());
        assert_eq!(report.completeness_percent(), 100.0);
        assert_eq!(report.status(), JobStatus::Pass);
    }
}
