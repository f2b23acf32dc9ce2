use crate::application::dto::JobResponse;
use crate::catalog::domain::{BrandCatalog, ComponentMapping, ComponentType, GapReport};
use crate::catalog::services::{GapAnalyzer, ANALYZED_TYPES};
use crate::ports::outbound::{
    ComponentCatalog, ProgressReporter, ReportFormatter, ReportWriter, SpecificationRepository,
};
use crate::shared::Result;
use std::collections::BTreeMap;

pub const GAP_ANALYSIS_JOB: &str = "gap_analysis";

/// Loads the current mapping of every analyzed component type.
pub(crate) fn load_mappings<C: ComponentCatalog>(
    catalog: &C,
    types: &[ComponentType],
) -> Result<BTreeMap<ComponentType, ComponentMapping>> {
    let mut mappings = BTreeMap::new();
    for component_type in types {
        let mapping = catalog.get_mapping(*component_type)?;
        mappings.insert(*component_type, (*mapping).clone());
    }
    Ok(mappings)
}

/// Diffs every specification value against the catalog.
pub(crate) fn gap_report<S, C>(specs: &S, catalog: &C) -> Result<GapReport>
where
    S: SpecificationRepository,
    C: ComponentCatalog,
{
    let loaded = specs.load_all()?;
    let brands: Vec<BrandCatalog> = loaded.brands.iter().map(|b| (**b).clone()).collect();
    let mappings = load_mappings(catalog, &ANALYZED_TYPES)?;
    Ok(GapAnalyzer::analyze(&brands, &mappings, loaded.skipped))
}

/// AnalyzeGapsUseCase - Lists specification values with no catalog entry
///
/// Writes `gap_analysis.json` (machine-readable, with frequency and
/// provenance) and `gap_analysis.md`. The job passes only when every
/// referenced value is mapped and every brand loaded.
pub struct AnalyzeGapsUseCase<S, C, F, W, PR> {
    specs: S,
    catalog: C,
    formatter: F,
    writer: W,
    progress_reporter: PR,
}

impl<S, C, F, W, PR> AnalyzeGapsUseCase<S, C, F, W, PR>
where
    S: SpecificationRepository,
    C: ComponentCatalog,
    F: ReportFormatter,
    W: ReportWriter,
    PR: ProgressReporter,
{
    pub fn new(specs: S, catalog: C, formatter: F, writer: W, progress_reporter: PR) -> Self {
        Self {
            specs,
            catalog,
            formatter,
            writer,
            progress_reporter,
        }
    }

    pub fn execute(&self) -> Result<JobResponse<GapReport>> {
        self.progress_reporter
            .report("🔍 Comparing product specifications against the component catalog...");
        let report = gap_report(&self.specs, &self.catalog)?;

        for brand in &report.skipped_brands {
            self.progress_reporter
                .report_error(&format!("brand '{}' skipped: backing file failed to load", brand));
        }

        let json = serde_json::to_string_pretty(&report)?;
        let markdown = self.formatter.format_gaps(&report);
        let paths = self.writer.write_report(GAP_ANALYSIS_JOB, &json, &markdown)?;

        self.progress_reporter.report_completion(&format!(
            "{} unmapped values, {:.1}% complete",
            report.total_unmapped(),
            report.completeness_percent()
        ));

        Ok(JobResponse {
            status: report.status(),
            report,
            paths,
        })
    }
}
