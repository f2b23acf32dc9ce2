use crate::catalog::domain::{
    FieldSummary, GapReport, ResolutionReport, Severity, TrackerStatistics, ValidationReport,
};
use crate::ports::outbound::ReportFormatter;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Rows listed per component type before the remainder is summarized.
const MAX_ROWS_PER_TYPE: usize = 50;

/// MarkdownReportFormatter adapter producing the `.md` side of every job
pub struct MarkdownReportFormatter;

impl MarkdownReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn heading(out: &mut String, title: &str, generated_at: &chrono::DateTime<chrono::Utc>) {
        let _ = writeln!(out, "# {}\n", title);
        let _ = writeln!(
            out,
            "_Generated {}_\n",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

impl Default for MarkdownReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownReportFormatter {
    fn format_gaps(&self, report: &GapReport) -> String {
        let mut out = String::new();
        Self::heading(&mut out, "Catalog Gap Analysis", &report.generated_at);

        let _ = writeln!(
            out,
            "**Completeness:** {:.1}% ({} of {} referenced values unmapped)\n",
            report.completeness_percent(),
            report.total_unmapped(),
            report.total_referenced()
        );
        if !report.skipped_brands.is_empty() {
            let _ = writeln!(
                out,
                "**Skipped brands (failed to load):** {}\n",
                report.skipped_brands.join(", ")
            );
        }

        out.push_str("| Type | Referenced | Mapped | Unmapped |\n");
        out.push_str("|------|-----------:|-------:|---------:|\n");
        for coverage in &report.coverage {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                coverage.component_type,
                coverage.referenced,
                coverage.mapped,
                coverage.unmapped()
            );
        }

        for (component_type, entries) in &report.unmapped {
            let mut sorted: Vec<_> = entries.iter().collect();
            sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.value.cmp(&b.value)));

            let _ = writeln!(out, "\n## {} ({})\n", component_type, entries.len());
            out.push_str("| Value | Frequency | Found in |\n");
            out.push_str("|-------|----------:|----------|\n");
            for entry in sorted.iter().take(MAX_ROWS_PER_TYPE) {
                let found_in: Vec<&str> = entry.found_in.iter().map(String::as_str).collect();
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    Self::cell(&entry.value),
                    entry.frequency,
                    Self::cell(&found_in.join(", "))
                );
            }
            if sorted.len() > MAX_ROWS_PER_TYPE {
                let _ = writeln!(
                    out,
                    "\n_...and {} more_",
                    sorted.len() - MAX_ROWS_PER_TYPE
                );
            }
        }
        out
    }

    fn format_resolution(&self, report: &ResolutionReport) -> String {
        let mut out = String::new();
        Self::heading(&mut out, "Missing Entry Resolution", &report.generated_at);

        if report.dry_run {
            out.push_str("> Dry run: no catalog files were changed.\n\n");
        }
        if let Some(reason) = &report.interrupted_by {
            let _ = writeln!(
                out,
                "> Stopped early by a remote failure: {}\n",
                Self::cell(reason)
            );
        }
        let created = report.resolved.iter().filter(|r| r.created).count();
        let _ = writeln!(
            out,
            "**Resolved:** {} ({} created) · **Not found:** {}\n",
            report.resolved.len(),
            created,
            report.not_found.len()
        );

        if !report.resolved.is_empty() {
            out.push_str("## Resolved\n\n");
            out.push_str("| Type | Value | Identifier | Matched by |\n");
            out.push_str("|------|-------|------------|------------|\n");
            for resolved in &report.resolved {
                let matched = match (&resolved.matched_query, resolved.created) {
                    (_, true) => "created".to_string(),
                    (Some(query), false) => Self::cell(query),
                    (None, false) => String::new(),
                };
                let _ = writeln!(
                    out,
                    "| {} | {} | `{}` | {} |",
                    resolved.component_type,
                    Self::cell(&resolved.value),
                    resolved.remote_id,
                    matched
                );
            }
            out.push('\n');
        }

        if !report.not_found.is_empty() {
            out.push_str("## Not found (create manually)\n\n");
            out.push_str("| Type | Value | Queries tried |\n");
            out.push_str("|------|-------|---------------|\n");
            for unresolved in &report.not_found {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    unresolved.component_type,
                    Self::cell(&unresolved.value),
                    Self::cell(&unresolved.attempted_queries.join("; "))
                );
            }
            out.push('\n');
        }

        if !report.backups.is_empty() {
            out.push_str("## Backups\n\n");
            for backup in &report.backups {
                let _ = writeln!(out, "- `{}`", backup.display());
            }
        }
        out
    }

    fn format_validation(&self, report: &ValidationReport) -> String {
        let mut out = String::new();
        Self::heading(&mut out, "Catalog Validation", &report.generated_at);

        let _ = writeln!(
            out,
            "**Health score:** {}/100 ({:?})\n",
            report.health_score, report.status
        );
        let _ = writeln!(
            out,
            "- Mapping completeness: {:.1}% ({} of {} referenced values unmapped)",
            report.completeness_percent, report.unmapped_values, report.referenced_values
        );
        let _ = writeln!(
            out,
            "- Entries: {} ({} valid)",
            report.total_entries, report.valid_entries
        );
        let _ = writeln!(out, "- Errors: {}", report.count(Severity::Error));
        let _ = writeln!(out, "- Warnings: {}\n", report.count(Severity::Warning));

        if report.issues.is_empty() {
            out.push_str("No issues found.\n");
            return out;
        }

        out.push_str("| Severity | Type | Name | Identifier | Issue |\n");
        out.push_str("|----------|------|------|------------|-------|\n");
        let mut issues: Vec<_> = report.issues.iter().collect();
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        for issue in issues {
            let _ = writeln!(
                out,
                "| {:?} | {} | {} | `{}` | {} |",
                issue.severity,
                issue.component_type,
                Self::cell(&issue.name),
                Self::cell(&issue.remote_id),
                Self::cell(&issue.message)
            );
        }
        out
    }

    fn format_missing_summary(
        &self,
        summary: &BTreeMap<String, FieldSummary>,
        statistics: &TrackerStatistics,
    ) -> String {
        let mut out = String::from("# Missing Catalog Entries\n\n");
        let _ = writeln!(
            out,
            "{} unique values across {} fields ({} occurrences). Log: `{}`\n",
            statistics.total_unique_values,
            statistics.total_fields,
            statistics.total_frequency,
            statistics.storage_location
        );

        for (field, field_summary) in summary {
            let _ = writeln!(
                out,
                "## {} ({} values, {} occurrences)\n",
                field, field_summary.total_values, field_summary.total_frequency
            );
            out.push_str("| Value | Frequency | Last seen |\n");
            out.push_str("|-------|----------:|-----------|\n");
            for entry in &field_summary.most_common {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    Self::cell(&entry.value),
                    entry.frequency,
                    entry.last_seen.format("%Y-%m-%d %H:%M")
                );
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{
        ComponentType, GapEntry, IssueKind, JobStatus, MissContext, MissingEntry, TypeCoverage,
        UnresolvedValue, ValidationIssue,
    };
    use chrono::Utc;
    use std::collections::BTreeSet;

    #[test]
    fn test_gap_report_lists_values() {
        let mut unmapped = BTreeMap::new();
        unmapped.insert(
            ComponentType::Vga,
            vec![GapEntry {
                component_type: ComponentType::Vga,
                value: "NVIDIA GeForce RTX 4060 8GB".to_string(),
                frequency: 3,
                found_in: BTreeSet::from(["ASUS / TUF F15".to_string()]),
            }],
        );
        let report = GapReport {
            generated_at: Utc::now(),
            coverage: vec![TypeCoverage {
                component_type: ComponentType::Vga,
                referenced: 2,
                mapped: 1,
            }],
            unmapped,
            skipped_brands: vec!["broken".to_string()],
        };

        let markdown = MarkdownReportFormatter::new().format_gaps(&report);
        assert!(markdown.contains("# Catalog Gap Analysis"));
        assert!(markdown.contains("**Completeness:** 50.0%"));
        assert!(markdown.contains("| NVIDIA GeForce RTX 4060 8GB | 3 | ASUS / TUF F15 |"));
        assert!(markdown.contains("broken"));
    }

    #[test]
    fn test_resolution_report_marks_dry_run() {
        let report = ResolutionReport {
            generated_at: Utc::now(),
            dry_run: true,
            resolved: vec![],
            not_found: vec![UnresolvedValue {
                component_type: ComponentType::Display,
                value: "15.6 inch | FHD".to_string(),
                attempted_queries: vec!["15.6 inch | FHD".to_string()],
            }],
            backups: vec![],
            interrupted_by: None,
        };
        let markdown = MarkdownReportFormatter::new().format_resolution(&report);
        assert!(markdown.contains("Dry run"));
        assert!(markdown.contains("15.6 inch \\| FHD"));
    }

    #[test]
    fn test_validation_report_orders_errors_first() {
        let issue = |severity: Severity, kind: IssueKind| ValidationIssue {
            severity,
            kind,
            component_type: ComponentType::Storage,
            name: "512GB SSD".to_string(),
            remote_id: "x".to_string(),
            message: format!("{:?}", kind),
        };
        let report = ValidationReport {
            generated_at: Utc::now(),
            total_entries: 2,
            valid_entries: 1,
            referenced_values: 4,
            unmapped_values: 2,
            completeness_percent: 50.0,
            health_score: 43,
            status: JobStatus::Fail,
            issues: vec![
                issue(Severity::Warning, IssueKind::DuplicateIdentifier),
                issue(Severity::Error, IssueKind::InvalidIdentifier),
            ],
        };
        let markdown = MarkdownReportFormatter::new().format_validation(&report);
        let error_at = markdown.find("| Error |").unwrap();
        let warning_at = markdown.find("| Warning |").unwrap();
        assert!(error_at < warning_at);
        assert!(markdown.contains("**Health score:** 43/100 (Fail)"));
        assert!(markdown.contains("50.0% (2 of 4 referenced values unmapped)"));
    }

    #[test]
    fn test_missing_summary() {
        let entry = MissingEntry::new("vga", "RTX 4060", MissContext::new(), Utc::now());
        let mut summary = BTreeMap::new();
        summary.insert(
            "vga".to_string(),
            FieldSummary {
                total_values: 1,
                total_frequency: 1,
                most_common: vec![entry.clone()],
                recent_entries: vec![entry],
            },
        );
        let statistics = TrackerStatistics {
            total_fields: 1,
            total_unique_values: 1,
            total_frequency: 1,
            storage_location: "data/missing/missing_metaobjects.json".to_string(),
            session_missing_count: 0,
        };
        let markdown = MarkdownReportFormatter::new().format_missing_summary(&summary, &statistics);
        assert!(markdown.contains("## vga (1 values, 1 occurrences)"));
        assert!(markdown.contains("| RTX 4060 | 1 |"));
    }
}
