use super::analyze_gaps::{gap_report, load_mappings};
use crate::application::dto::JobResponse;
use crate::catalog::domain::{JobStatus, ValidationReport};
use crate::catalog::policies::HealthScorePolicy;
use crate::catalog::services::CatalogValidator;
use crate::ports::outbound::{
    ComponentCatalog, ReportFormatter, ReportWriter, SpecificationRepository,
};
use crate::shared::Result;
use chrono::Utc;

pub const CATALOG_VALIDATION_JOB: &str = "catalog_validation";

/// ValidateCatalogUseCase - Scores the health of the component catalog
///
/// The score starts from mapping completeness (the share of specification
/// values with a catalog entry) and loses points for every structural
/// issue in the catalog files. Status follows the score: `PASS_SCORE` and
/// above passes, `PARTIAL_SCORE` and above is partial, anything lower fails.
pub struct ValidateCatalogUseCase<S, C, F, W> {
    specs: S,
    catalog: C,
    validator: CatalogValidator,
    formatter: F,
    writer: W,
}

impl<S, C, F, W> ValidateCatalogUseCase<S, C, F, W>
where
    S: SpecificationRepository,
    C: ComponentCatalog,
    F: ReportFormatter,
    W: ReportWriter,
{
    pub fn new(specs: S, catalog: C, validator: CatalogValidator, formatter: F, writer: W) -> Self {
        Self {
            specs,
            catalog,
            validator,
            formatter,
            writer,
        }
    }

    /// Validates without writing report files.
    pub fn validate(&self) -> Result<ValidationReport> {
        let gaps = gap_report(&self.specs, &self.catalog)?;
        let mappings = load_mappings(&self.catalog, &self.catalog.get_all_types())?;
        let check = self.validator.check(&mappings);

        let completeness_percent = gaps.completeness_percent();
        let health_score = HealthScorePolicy::score(completeness_percent, &check.issues);
        let status = if health_score >= HealthScorePolicy::PASS_SCORE {
            JobStatus::Pass
        } else if health_score >= HealthScorePolicy::PARTIAL_SCORE {
            JobStatus::Partial
        } else {
            JobStatus::Fail
        };

        Ok(ValidationReport {
            generated_at: Utc::now(),
            total_entries: check.total_entries,
            valid_entries: check.valid_entries,
            referenced_values: gaps.total_referenced(),
            unmapped_values: gaps.total_unmapped(),
            completeness_percent,
            health_score,
            status,
            issues: check.issues,
        })
    }

    pub fn execute(&self) -> Result<JobResponse<ValidationReport>> {
        let report = self.validate()?;
        tracing::info!(
            score = report.health_score,
            completeness = report.completeness_percent,
            issues = report.issues.len(),
            "catalog validated"
        );

        let json = serde_json::to_string_pretty(&report)?;
        let markdown = self.formatter.format_validation(&report);
        let paths = self
            .writer
            .write_report(CATALOG_VALIDATION_JOB, &json, &markdown)?;

        Ok(JobResponse {
            status: report.status,
            report,
            paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::filesystem::{
        FileComponentCatalog, FileReportWriter, FileSpecificationStore,
    };
    use crate::adapters::outbound::formatters::MarkdownReportFormatter;
    use std::fs;
    use tempfile::TempDir;

    const PREFIX: &str = "gid://shopify/Metaobject/";

    const BRAND: &str = r#"{
        "brand": "Acme",
        "models": {
            "Acme Book 14": {
                "display_name": "Acme Book 14",
                "category": "Laptop",
                "configurations": [{
                    "processor": "Intel Core i5-1335U",
                    "ram": "16GB",
                    "vga": "Intel Iris Xe",
                    "display": "14 inch FHD",
                    "storage": "512GB SSD",
                    "os": "Windows 11 Home"
                }],
                "colors": ["Silver"]
            }
        }
    }"#;

    fn use_case(
        dir: &TempDir,
    ) -> ValidateCatalogUseCase<
        FileSpecificationStore,
        FileComponentCatalog,
        MarkdownReportFormatter,
        FileReportWriter,
    > {
        ValidateCatalogUseCase::new(
            FileSpecificationStore::new(dir.path().join("products")),
            FileComponentCatalog::new(dir.path().join("metaobjects"), dir.path().join("backups")),
            CatalogValidator::new(PREFIX),
            MarkdownReportFormatter::new(),
            FileReportWriter::new(dir.path().join("analysis")),
        )
    }

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn map_acme_book(dir: &TempDir) {
        write(dir, "products/acme.json", BRAND);
        write(dir, "metaobjects/processors.json", r#"{"Intel Core i5-1335U": "gid://shopify/Metaobject/1"}"#);
        write(dir, "metaobjects/vgas.json", r#"{"Intel Iris Xe": "gid://shopify/Metaobject/2"}"#);
        write(dir, "metaobjects/displays.json", r#"{"14 inch FHD": "gid://shopify/Metaobject/3"}"#);
        write(dir, "metaobjects/storages.json", r#"{"512GB SSD": "gid://shopify/Metaobject/4"}"#);
        write(dir, "metaobjects/os.json", r#"{"Windows 11 Home": "gid://shopify/Metaobject/5"}"#);
        write(dir, "metaobjects/colors.json", r#"{"Silver": "gid://shopify/Metaobject/6"}"#);
    }

    #[test]
    fn test_fully_mapped_catalog_passes() {
        let dir = TempDir::new().unwrap();
        map_acme_book(&dir);

        let response = use_case(&dir).execute().unwrap();
        assert_eq!(response.report.referenced_values, 6);
        assert_eq!(response.report.unmapped_values, 0);
        assert_eq!(response.report.health_score, 100);
        assert_eq!(response.status, JobStatus::Pass);
        assert!(response.paths.json.ends_with("catalog_validation.json"));
        assert!(response.paths.markdown.exists());
    }

    #[test]
    fn test_unmapped_specification_values_lower_the_score() {
        let dir = TempDir::new().unwrap();
        write(&dir, "products/acme.json", BRAND);
        fs::create_dir_all(dir.path().join("metaobjects")).unwrap();

        let report = use_case(&dir).validate().unwrap();
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.referenced_values, 6);
        assert_eq!(report.unmapped_values, 6);
        assert_eq!(report.completeness_percent, 0.0);
        assert_eq!(report.health_score, 0);
        assert_eq!(report.status, JobStatus::Fail);
    }

    #[test]
    fn test_partial_mapping_scores_by_completeness() {
        let dir = TempDir::new().unwrap();
        map_acme_book(&dir);
        fs::remove_file(dir.path().join("metaobjects/colors.json")).unwrap();

        let report = use_case(&dir).validate().unwrap();
        assert_eq!(report.unmapped_values, 1);
        // 5 of 6 mapped
        assert_eq!(report.health_score, 83);
        assert_eq!(report.status, JobStatus::Partial);
    }

    #[test]
    fn test_structural_issues_are_penalties_only() {
        let dir = TempDir::new().unwrap();
        map_acme_book(&dir);
        write(
            &dir,
            "metaobjects/colors.json",
            r#"{
                "Silver": "gid://shopify/Metaobject/6",
                "Graphite Black": "gid://shopify/Metaobject/7",
                "Black": "gid://shopify/Metaobject/7",
                "Pink": "not-an-id"
            }"#,
        );

        let report = use_case(&dir).validate().unwrap();
        assert_eq!(report.total_entries, 9);
        assert_eq!(report.valid_entries, 8);
        assert_eq!(report.completeness_percent, 100.0);
        // one error (-5), two duplicate warnings (-4)
        assert_eq!(report.health_score, 91);
        assert_eq!(report.status, JobStatus::Pass);
    }
}
