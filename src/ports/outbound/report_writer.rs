use crate::shared::Result;
use std::path::PathBuf;

/// Locations of the two artifacts written for one job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// ReportWriter port for reconciliation job output
pub trait ReportWriter {
    /// Writes `<job>.json` and `<job>.md`
    ///
    /// # Arguments
    /// * `job` - Job name, used as the file stem
    /// * `json` - Machine-readable results, already serialized
    /// * `markdown` - Human-readable summary
    fn write_report(&self, job: &str, json: &str, markdown: &str) -> Result<ReportPaths>;
}

impl<T: ReportWriter + ?Sized> ReportWriter for &T {
    fn write_report(&self, job: &str, json: &str, markdown: &str) -> Result<ReportPaths> {
        (**self).write_report(job, json, markdown)
    }
}
