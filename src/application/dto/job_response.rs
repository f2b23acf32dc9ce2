use crate::catalog::domain::JobStatus;
use crate::ports::outbound::ReportPaths;
use crate::shared::error::ExitCode;

/// JobResponse - Result of one reconciliation job run
#[derive(Debug, Clone)]
pub struct JobResponse<R> {
    pub report: R,
    pub status: JobStatus,
    /// Where the JSON and Markdown reports were written
    pub paths: ReportPaths,
}

impl<R> JobResponse<R> {
    pub fn exit_code(&self) -> ExitCode {
        match self.status {
            JobStatus::Pass => ExitCode::Success,
            JobStatus::Partial => ExitCode::Partial,
            JobStatus::Fail => ExitCode::Failed,
        }
    }
}
