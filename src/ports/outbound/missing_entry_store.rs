use crate::catalog::domain::{MissContext, MissingEntryTable};
use crate::shared::Result;

/// MissingEntryStore port for the durable missing-entry log
pub trait MissingEntryStore {
    /// Loads the full entry table; an absent log is an empty table
    fn load(&self) -> Result<MissingEntryTable>;

    /// Replaces the durable log with `table`
    fn save(&self, table: &MissingEntryTable) -> Result<()>;

    /// Human-readable location of the log, for statistics output
    fn location(&self) -> String;
}

/// MissingEntryRecorder port through which resolution misses are reported
///
/// Recording never fails from the caller's point of view.
pub trait MissingEntryRecorder {
    fn record(&self, field_name: &str, value: &str, context: &MissContext);
}

impl<T: MissingEntryRecorder + ?Sized> MissingEntryRecorder for &T {
    fn record(&self, field_name: &str, value: &str, context: &MissContext) {
        (**self).record(field_name, value, context)
    }
}
