use crate::catalog::domain::MissingEntryTable;
use crate::ports::outbound::MissingEntryStore;
use crate::shared::fs::{read_json, write_json};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct MissingLogFile {
    last_updated: DateTime<Utc>,
    #[serde(default)]
    total_missing_fields: usize,
    #[serde(default)]
    total_missing_values: usize,
    #[serde(default)]
    entries: MissingEntryTable,
}

/// FileMissingEntryLog adapter: the whole entry table in one JSON file,
/// rewritten atomically on every save.
pub struct FileMissingEntryLog {
    path: PathBuf,
}

impl FileMissingEntryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MissingEntryStore for FileMissingEntryLog {
    fn load(&self) -> Result<MissingEntryTable> {
        Ok(read_json::<MissingLogFile>(&self.path)?
            .map(|file| file.entries)
            .unwrap_or_default())
    }

    fn save(&self, table: &MissingEntryTable) -> Result<()> {
        let file = MissingLogFile {
            last_updated: Utc::now(),
            total_missing_fields: table.len(),
            total_missing_values: table.values().map(|values| values.len()).sum(),
            entries: table.clone(),
        };
        write_json(&self.path, &file)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
