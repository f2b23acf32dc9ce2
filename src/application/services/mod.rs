/// Application services holding state across use cases
mod missing_entry_tracker;

pub use missing_entry_tracker::{MissingEntryTracker, SUMMARY_TOP_N};
