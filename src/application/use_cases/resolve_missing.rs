use super::analyze_gaps::gap_report;
use crate::application::dto::{JobResponse, ResolveRequest};
use crate::application::services::MissingEntryTracker;
use crate::catalog::domain::{
    ComponentType, ResolutionReport, ResolvedValue, UnresolvedValue,
};
use crate::catalog::services::SearchVariations;
use crate::ports::outbound::{
    ComponentCatalog, ComponentCatalogWriter, MetaobjectMatch, MetaobjectRepository,
    MissingEntryStore, ProgressReporter, ReportFormatter, ReportPaths, ReportWriter,
    SpecificationRepository,
};
use crate::shared::Result;
use chrono::Utc;
use std::collections::BTreeMap;

pub const RESOLVE_MISSING_JOB: &str = "resolve_missing";

/// One value to look up, with the tracker field names it was logged under.
#[derive(Debug, Clone)]
struct Candidate {
    component_type: ComponentType,
    value: String,
    tracker_fields: Vec<String>,
}

/// Picks the record a search result set identifies, if any.
///
/// A display name equal to the value or the query (ignoring case) wins.
/// Failing that, a lone result is accepted. Several non-matching results
/// are ambiguous and the next variation is tried.
fn select_match<'m>(
    value: &str,
    query: &str,
    results: &'m [MetaobjectMatch],
) -> Option<&'m MetaobjectMatch> {
    results
        .iter()
        .find(|m| {
            let name = m.display_name.trim();
            name.eq_ignore_ascii_case(value.trim()) || name.eq_ignore_ascii_case(query.trim())
        })
        .or(match results {
            [only] => Some(only),
            _ => None,
        })
}

/// ResolveMissingUseCase - Finds remote identifiers for unmapped values
///
/// Candidates are every gap-analysis value plus every missing-entry log
/// value not yet in the catalog. Each is searched with its variations in
/// turn, one call at a time with `request_delay` between calls. Confirmed
/// identifiers are written after a backup of each changed file, the
/// catalog cache is cleared, and the resolved values leave the log.
///
/// A remote failure stops the loop. Identifiers confirmed before it are
/// still written and reported, then the failure is returned; if nothing
/// was confirmed, no file is touched.
///
/// # Type Parameters
/// * `S` - SpecificationRepository implementation
/// * `C` - ComponentCatalog + ComponentCatalogWriter implementation
/// * `R` - MetaobjectRepository implementation
/// * `M` - MissingEntryStore behind the tracker
/// * `PR` - ProgressReporter implementation
/// * `F` - ReportFormatter implementation
/// * `W` - ReportWriter implementation
pub struct ResolveMissingUseCase<'t, S, C, R, M, PR, F, W>
where
    M: MissingEntryStore,
{
    specs: S,
    catalog: C,
    metaobjects: R,
    tracker: &'t MissingEntryTracker<M>,
    progress_reporter: PR,
    formatter: F,
    writer: W,
}

impl<'t, S, C, R, M, PR, F, W> ResolveMissingUseCase<'t, S, C, R, M, PR, F, W>
where
    S: SpecificationRepository,
    C: ComponentCatalog + ComponentCatalogWriter,
    R: MetaobjectRepository,
    M: MissingEntryStore,
    PR: ProgressReporter,
    F: ReportFormatter,
    W: ReportWriter,
{
    pub fn new(
        specs: S,
        catalog: C,
        metaobjects: R,
        tracker: &'t MissingEntryTracker<M>,
        progress_reporter: PR,
        formatter: F,
        writer: W,
    ) -> Self {
        Self {
            specs,
            catalog,
            metaobjects,
            tracker,
            progress_reporter,
            formatter,
            writer,
        }
    }

    pub async fn execute(&self, request: ResolveRequest) -> Result<JobResponse<ResolutionReport>> {
        let candidates = self.collect_candidates()?;
        self.progress_reporter.report(&format!(
            "🔎 Searching the remote catalog for {} unmapped values{}...",
            candidates.len(),
            if request.dry_run { " (dry run)" } else { "" }
        ));

        let mut report = ResolutionReport {
            generated_at: Utc::now(),
            dry_run: request.dry_run,
            resolved: Vec::new(),
            not_found: Vec::new(),
            backups: Vec::new(),
            interrupted_by: None,
        };
        let mut resolved_candidates = Vec::new();
        let mut calls_made = 0usize;
        let mut failure = None;

        for (index, candidate) in candidates.iter().enumerate() {
            self.progress_reporter.report_progress(
                index + 1,
                candidates.len(),
                Some(&format!("{}: {}", candidate.component_type, candidate.value)),
            );

            match self
                .resolve_candidate(candidate, &request, &mut calls_made)
                .await
            {
                Ok(Ok(resolved)) => {
                    report.resolved.push(resolved);
                    resolved_candidates.push(candidate);
                }
                Ok(Err(unresolved)) => report.not_found.push(unresolved),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(error) = failure {
            if report.resolved.is_empty() {
                return Err(error);
            }
            report.interrupted_by = Some(format!("{:#}", error));
            self.progress_reporter.report_error(&format!(
                "remote failure after {} resolved values; saving them before stopping",
                report.resolved.len()
            ));
            if let Err(save_error) = self.finish(&mut report, &resolved_candidates) {
                tracing::error!(error = %save_error, "could not save resolved values");
            }
            return Err(error);
        }

        let paths = self.finish(&mut report, &resolved_candidates)?;
        self.progress_reporter.report_completion(&format!(
            "{} resolved, {} not found",
            report.resolved.len(),
            report.not_found.len()
        ));

        Ok(JobResponse {
            status: report.status(),
            report,
            paths,
        })
    }

    /// Applies confirmed identifiers (unless dry run) and writes the report.
    fn finish(
        &self,
        report: &mut ResolutionReport,
        resolved_candidates: &[&Candidate],
    ) -> Result<ReportPaths> {
        if !report.dry_run && !report.resolved.is_empty() {
            report.backups = self.apply(&report.resolved)?;
            self.forget_resolved(resolved_candidates);
        }

        let json = serde_json::to_string_pretty(&*report)?;
        let markdown = self.formatter.format_resolution(report);
        self.writer
            .write_report(RESOLVE_MISSING_JOB, &json, &markdown)
    }

    fn collect_candidates(&self) -> Result<Vec<Candidate>> {
        let mut candidates: BTreeMap<(ComponentType, String), Candidate> = BTreeMap::new();

        let gaps = gap_report(&self.specs, &self.catalog)?;
        for entries in gaps.unmapped.values() {
            for entry in entries {
                candidates
                    .entry((entry.component_type, entry.value.clone()))
                    .or_insert_with(|| Candidate {
                        component_type: entry.component_type,
                        value: entry.value.clone(),
                        tracker_fields: Vec::new(),
                    });
            }
        }

        for entry in self.tracker.entries() {
            let Some(component_type) = ComponentType::from_field_name(&entry.field_name) else {
                tracing::debug!(field = %entry.field_name, "logged field has no catalog type");
                continue;
            };
            if self.catalog.get_id(component_type, &entry.value)?.is_some() {
                continue;
            }
            candidates
                .entry((component_type, entry.value.clone()))
                .or_insert_with(|| Candidate {
                    component_type,
                    value: entry.value.clone(),
                    tracker_fields: Vec::new(),
                })
                .tracker_fields
                .push(entry.field_name);
        }

        Ok(candidates.into_values().collect())
    }

    /// Searches every variation of one candidate. The outer `Result` is a
    /// remote failure that stops the job.
    async fn resolve_candidate(
        &self,
        candidate: &Candidate,
        request: &ResolveRequest,
        calls_made: &mut usize,
    ) -> Result<std::result::Result<ResolvedValue, UnresolvedValue>> {
        let mut attempted = Vec::new();

        for query in SearchVariations::generate(candidate.component_type, &candidate.value) {
            self.pace(request, calls_made).await;
            let results = self
                .metaobjects
                .search(candidate.component_type, &query)
                .await?;
            attempted.push(query.clone());

            if let Some(found) = select_match(&candidate.value, &query, &results) {
                tracing::info!(
                    component_type = %candidate.component_type,
                    value = %candidate.value,
                    query = %query,
                    id = %found.id,
                    "resolved unmapped value"
                );
                return Ok(Ok(ResolvedValue {
                    component_type: candidate.component_type,
                    value: candidate.value.clone(),
                    remote_id: found.id.clone(),
                    matched_query: Some(query),
                    created: false,
                }));
            }
            if results.len() > 1 {
                tracing::debug!(query = %query, results = results.len(), "ambiguous search result");
            }
        }

        if request.create && !request.dry_run {
            self.pace(request, calls_made).await;
            let id = self
                .metaobjects
                .create(candidate.component_type, &candidate.value)
                .await?;
            tracing::info!(
                component_type = %candidate.component_type,
                value = %candidate.value,
                id = %id,
                "created remote record"
            );
            return Ok(Ok(ResolvedValue {
                component_type: candidate.component_type,
                value: candidate.value.clone(),
                remote_id: id,
                matched_query: None,
                created: true,
            }));
        }

        Ok(Err(UnresolvedValue {
            component_type: candidate.component_type,
            value: candidate.value.clone(),
            attempted_queries: attempted,
        }))
    }

    async fn pace(&self, request: &ResolveRequest, calls_made: &mut usize) {
        if *calls_made > 0 && !request.request_delay.is_zero() {
            tokio::time::sleep(request.request_delay).await;
        }
        *calls_made += 1;
    }

    /// Backs up and rewrites each affected catalog file, then drops the
    /// cached mappings so later lookups see the new entries.
    fn apply(&self, resolved: &[ResolvedValue]) -> Result<Vec<std::path::PathBuf>> {
        let mut by_type: BTreeMap<ComponentType, Vec<&ResolvedValue>> = BTreeMap::new();
        for value in resolved {
            by_type.entry(value.component_type).or_default().push(value);
        }

        let mut backups = Vec::new();
        for (component_type, values) in by_type {
            if let Some(backup) = self.catalog.backup(component_type)? {
                backups.push(backup);
            }
            let mut mapping = (*self.catalog.get_mapping(component_type)?).clone();
            for value in values {
                mapping
                    .entry(value.value.clone())
                    .or_insert_with(|| value.remote_id.clone());
            }
            self.catalog.write_mapping(component_type, &mapping)?;
        }
        self.catalog.clear_cache();
        Ok(backups)
    }

    fn forget_resolved(&self, resolved: &[&Candidate]) {
        for candidate in resolved {
            for field in &candidate.tracker_fields {
                if let Err(e) = self.tracker.remove_entry(field, &candidate.value) {
                    tracing::warn!(
                        field = %field,
                        value = %candidate.value,
                        error = %e,
                        "could not remove resolved value from the missing-entry log"
                    );
                }
            }
        }
    }
}
