use super::ComponentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Outcome class of an offline job, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pass,
    Partial,
    Fail,
}

/// A configuration value with no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub component_type: ComponentType,
    pub value: String,
    /// Number of configurations (or color slots) referencing the value
    pub frequency: usize,
    /// `"{brand} / {model}"` keys that reference the value
    pub found_in: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCoverage {
    pub component_type: ComponentType,
    /// Distinct values referenced by the specification store
    pub referenced: usize,
    pub mapped: usize,
}

impl TypeCoverage {
    pub fn unmapped(&self) -> usize {
        self.referenced.saturating_sub(self.mapped)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub generated_at: DateTime<Utc>,
    pub coverage: Vec<TypeCoverage>,
    pub unmapped: BTreeMap<ComponentType, Vec<GapEntry>>,
    /// Brands skipped because their source failed to load
    #[serde(default)]
    pub skipped_brands: Vec<String>,
}

impl GapReport {
    pub fn total_referenced(&self) -> usize {
        self.coverage.iter().map(|c| c.referenced).sum()
    }

    pub fn total_unmapped(&self) -> usize {
        self.unmapped.values().map(Vec::len).sum()
    }

    /// Mapped share of referenced values, 0–100. An empty store is complete.
    pub fn completeness_percent(&self) -> f64 {
        let referenced = self.total_referenced();
        if referenced == 0 {
            return 100.0;
        }
        let mapped: usize = self.coverage.iter().map(|c| c.mapped).sum();
        mapped as f64 * 100.0 / referenced as f64
    }

    pub fn status(&self) -> JobStatus {
        if self.total_unmapped() == 0 && self.skipped_brands.is_empty() {
            JobStatus::Pass
        } else {
            JobStatus::Partial
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub component_type: ComponentType,
    pub value: String,
    pub remote_id: String,
    /// Search text that produced the match; `None` when the record was created
    pub matched_query: Option<String>,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedValue {
    pub component_type: ComponentType,
    pub value: String,
    pub attempted_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub resolved: Vec<ResolvedValue>,
    pub not_found: Vec<UnresolvedValue>,
    pub backups: Vec<PathBuf>,
    /// Remote failure that stopped the job before every value was tried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted_by: Option<String>,
}

impl ResolutionReport {
    pub fn status(&self) -> JobStatus {
        match (self.resolved.is_empty(), self.not_found.is_empty()) {
            (_, true) => JobStatus::Pass,
            (false, false) => JobStatus::Partial,
            (true, false) => JobStatus::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Identifier does not match the platform's identifier format
    InvalidIdentifier,
    /// Identifier mapped from more than one full name
    DuplicateIdentifier,
    /// Catalog key is empty or whitespace
    BlankName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub component_type: ComponentType,
    pub name: String,
    pub remote_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub total_entries: usize,
    pub valid_entries: usize,
    /// Distinct specification values the catalog is expected to map
    pub referenced_values: usize,
    pub unmapped_values: usize,
    /// Mapped share of `referenced_values`, 0–100
    pub completeness_percent: f64,
    pub health_score: u8,
    pub status: JobStatus,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(referenced: usize, mapped: usize) -> GapReport {
        GapReport {
            generated_at: Utc::now(),
            coverage: vec![TypeCoverage {
                component_type: ComponentType::Vga,
                referenced,
                mapped,
            }],
            unmapped: BTreeMap::new(),
            skipped_brands: vec![],
        }
    }

    #[test]
    fn test_completeness_percent() {
        assert_eq!(report(4, 3).completeness_percent(), 75.0);
        assert_eq!(report(0, 0).completeness_percent(), 100.0);
    }

    #[test]
    fn test_resolution_status() {
        let mut resolution = ResolutionReport {
            generated_at: Utc::now(),
            dry_run: false,
            resolved: vec![],
            not_found: vec![],
            backups: vec![],
            interrupted_by: None,
        };
        assert_eq!(resolution.status(), JobStatus::Pass);

        resolution.not_found.push(UnresolvedValue {
            component_type: ComponentType::Storage,
            value: "2TB SSD".to_string(),
            attempted_queries: vec!["2TB SSD".to_string()],
        });
        assert_eq!(resolution.status(), JobStatus::Fail);

        resolution.resolved.push(ResolvedValue {
            component_type: ComponentType::Storage,
            value: "1TB SSD".to_string(),
            remote_id: "gid://shopify/Metaobject/9".to_string(),
            matched_query: Some("1TB".to_string()),
            created: false,
        });
        assert_eq!(resolution.status(), JobStatus::Partial);
    }

    #[test]
    fn test_gap_report_serializes_type_keys() {
        let mut gap = report(1, 0);
        gap.unmapped.insert(
            ComponentType::Vga,
            vec![GapEntry {
                component_type: ComponentType::Vga,
                value: "NVIDIA GeForce RTX 4060 8GB".to_string(),
                frequency: 1,
                found_in: BTreeSet::from(["ASUS / TUF F15".to_string()]),
            }],
        );
        let json = serde_json::to_value(&gap).unwrap();
        assert!(json["unmapped"]["vga"].is_array());
    }
}
