use crate::catalog::domain::BrandCatalog;
use serde::Serialize;

/// Structural problems found in the specification store.
///
/// Errors make a model unusable for template generation (no configurations,
/// no colors, a configuration without a required field). Warnings flag
/// optional fields that are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SpecValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

const OPTIONAL_FIELDS: [&str; 2] = ["vga", "graphics"];

pub struct SpecValidator;

impl SpecValidator {
    pub fn validate(brands: &[BrandCatalog]) -> SpecValidationReport {
        let mut report = SpecValidationReport::default();

        for brand in brands {
            for (model_key, model) in &brand.models {
                let label = format!("{} / {}", brand.brand, model_key);

                if model.configurations.is_empty() {
                    report.errors.push(format!("{}: no configurations", label));
                }
                if model.colors.is_empty() {
                    report.errors.push(format!("{}: no colors", label));
                }

                for (index, config) in model.configurations.iter().enumerate() {
                    for field in config.missing_required_fields() {
                        report.errors.push(format!(
                            "{}: configuration {} is missing '{}'",
                            label,
                            index + 1,
                            field
                        ));
                    }
                    if OPTIONAL_FIELDS.iter().all(|f| config.field(f).is_none()) {
                        report.warnings.push(format!(
                            "{}: configuration {} has neither 'vga' nor 'graphics'",
                            label,
                            index + 1
                        ));
                    }
                }
            }
        }
        report
    }
}
