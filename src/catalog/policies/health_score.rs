use crate::catalog::domain::{Severity, ValidationIssue};

/// HealthScorePolicy turns catalog validation results into a 0–100 score.
///
/// score = completeness% - Σ penalty(issue), clamped to 0..=100.
/// The weights are a rough indicator, not a contractual threshold.
pub struct HealthScorePolicy;

impl HealthScorePolicy {
    pub const ERROR_PENALTY: f64 = 5.0;
    pub const WARNING_PENALTY: f64 = 2.0;
    pub const PASS_SCORE: u8 = 90;
    pub const PARTIAL_SCORE: u8 = 70;

    pub fn penalty(severity: Severity) -> f64 {
        match severity {
            Severity::Error => Self::ERROR_PENALTY,
            Severity::Warning => Self::WARNING_PENALTY,
        }
    }

    pub fn score(completeness_percent: f64, issues: &[ValidationIssue]) -> u8 {
        let penalties: f64 = issues.iter().map(|i| Self::penalty(i.severity)).sum();
        (completeness_percent - penalties).clamp(0.0, 100.0).round() as u8
    }
}
