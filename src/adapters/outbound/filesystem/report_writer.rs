use crate::ports::outbound::{ReportPaths, ReportWriter};
use crate::shared::fs::write_atomic;
use crate::shared::Result;
use std::path::PathBuf;

/// FileReportWriter adapter writing job results under `analysis/`
pub struct FileReportWriter {
    dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportWriter for FileReportWriter {
    fn write_report(&self, job: &str, json: &str, markdown: &str) -> Result<ReportPaths> {
        let paths = ReportPaths {
            json: self.dir.join(format!("{}.json", job)),
            markdown: self.dir.join(format!("{}.md", job)),
        };
        write_atomic(&paths.json, json)?;
        write_atomic(&paths.markdown, markdown)?;
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_both_artifacts() {
        let temp = TempDir::new().unwrap();
        let writer = FileReportWriter::new(temp.path().join("analysis"));
        let paths = writer
            .write_report("gap_analysis", "{}\n", "# Gap analysis\n")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&paths.json).unwrap(), "{}\n");
        assert!(paths.markdown.ends_with("analysis/gap_analysis.md"));
    }
}
