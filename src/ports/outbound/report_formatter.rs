use crate::catalog::domain::{
    FieldSummary, GapReport, ResolutionReport, TrackerStatistics, ValidationReport,
};
use std::collections::BTreeMap;

/// ReportFormatter port rendering job results for human readers
pub trait ReportFormatter {
    fn format_gaps(&self, report: &GapReport) -> String;

    fn format_resolution(&self, report: &ResolutionReport) -> String;

    fn format_validation(&self, report: &ValidationReport) -> String;

    fn format_missing_summary(
        &self,
        summary: &BTreeMap<String, FieldSummary>,
        statistics: &TrackerStatistics,
    ) -> String;
}

impl<T: ReportFormatter + ?Sized> ReportFormatter for &T {
    fn format_gaps(&self, report: &GapReport) -> String {
        (**self).format_gaps(report)
    }

    fn format_resolution(&self, report: &ResolutionReport) -> String {
        (**self).format_resolution(report)
    }

    fn format_validation(&self, report: &ValidationReport) -> String {
        (**self).format_validation(report)
    }

    fn format_missing_summary(
        &self,
        summary: &BTreeMap<String, FieldSummary>,
        statistics: &TrackerStatistics,
    ) -> String {
        (**self).format_missing_summary(summary, statistics)
    }
}
