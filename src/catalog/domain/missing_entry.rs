use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form provenance attached to a miss (product title, brand, model...).
pub type MissContext = BTreeMap<String, String>;

/// field name → value → entry
pub type MissingEntryTable = BTreeMap<String, BTreeMap<String, MissingEntry>>;

/// A (field, value) pair that failed catalog resolution at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub field_name: String,
    pub value: String,
    pub frequency: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub context: MissContext,
}

impl MissingEntry {
    pub fn new(field_name: &str, value: &str, context: MissContext, now: DateTime<Utc>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value: value.to_string(),
            frequency: 1,
            first_seen: now,
            last_seen: now,
            context,
        }
    }

    /// Counts another occurrence. Later context keys overwrite earlier ones.
    pub fn record_occurrence(&mut self, context: MissContext, now: DateTime<Utc>) {
        self.frequency += 1;
        self.last_seen = now;
        self.context.extend(context);
    }
}

/// A miss hit during the current process, kept for UI feedback only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMiss {
    pub field_name: String,
    pub value: String,
    pub context: MissContext,
    pub seen_at: DateTime<Utc>,
}

/// Per-field aggregate returned by the missing summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub total_values: usize,
    pub total_frequency: u64,
    /// Top entries by frequency
    pub most_common: Vec<MissingEntry>,
    /// Top entries by last_seen
    pub recent_entries: Vec<MissingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerStatistics {
    pub total_fields: usize,
    pub total_unique_values: usize,
    pub total_frequency: u64,
    pub storage_location: String,
    pub session_missing_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_occurrence_merges_context() {
        let t0 = Utc::now();
        let mut first_context = MissContext::new();
        first_context.insert("brand".to_string(), "ASUS".to_string());
        first_context.insert("title".to_string(), "old".to_string());
        let mut entry = MissingEntry::new("vga", "RTX 4060", first_context, t0);

        let mut second_context = MissContext::new();
        second_context.insert("title".to_string(), "new".to_string());
        entry.record_occurrence(second_context, t0 + Duration::seconds(5));

        assert_eq!(entry.frequency, 2);
        assert_eq!(entry.first_seen, t0);
        assert_eq!(entry.last_seen, t0 + Duration::seconds(5));
        assert_eq!(entry.context["brand"], "ASUS");
        assert_eq!(entry.context["title"], "new");
    }
}
