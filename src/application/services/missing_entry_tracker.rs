use crate::catalog::domain::{
    FieldSummary, MissContext, MissingEntry, MissingEntryTable, SessionMiss, TrackerStatistics,
};
use crate::ports::outbound::{MissingEntryRecorder, MissingEntryStore};
use crate::shared::Result;
use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Entries listed per field in each summary ranking.
pub const SUMMARY_TOP_N: usize = 5;

/// MissingEntryTracker records catalog misses with frequency and provenance.
///
/// Every logged miss is written through to the store immediately. A failed
/// write is logged and dropped so the interactive flow that hit the miss is
/// never blocked; the in-memory table and the session list stay accurate.
///
/// If the existing log cannot be read, the tracker keeps working in memory
/// but refuses to save, so the unreadable file is not overwritten.
pub struct MissingEntryTracker<S: MissingEntryStore> {
    store: S,
    table: RefCell<Option<MissingEntryTable>>,
    writable: RefCell<bool>,
    session: RefCell<Vec<SessionMiss>>,
}

impl<S: MissingEntryStore> MissingEntryTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            table: RefCell::new(None),
            writable: RefCell::new(true),
            session: RefCell::new(Vec::new()),
        }
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut MissingEntryTable) -> R) -> R {
        let mut slot = self.table.borrow_mut();
        let table = slot.get_or_insert_with(|| match self.store.load() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    location = %self.store.location(),
                    error = %e,
                    "missing-entry log unreadable; tracking in memory only"
                );
                *self.writable.borrow_mut() = false;
                MissingEntryTable::new()
            }
        });
        f(table)
    }

    fn save(&self) -> Result<()> {
        if !*self.writable.borrow() {
            anyhow::bail!(
                "missing-entry log at {} was unreadable and is left untouched",
                self.store.location()
            );
        }
        let slot = self.table.borrow();
        match slot.as_ref() {
            Some(table) => self.store.save(table),
            None => Ok(()),
        }
    }

    /// Records one miss now. See `log_missing_entry_at`.
    pub fn log_missing_entry(&self, field_name: &str, value: &str, context: MissContext) {
        self.log_missing_entry_at(field_name, value, context, Utc::now());
    }

    /// Records one miss at `now`: creates the entry with frequency 1, or
    /// bumps frequency, refreshes `last_seen` and merges `context`.
    /// Blank values are ignored.
    pub fn log_missing_entry_at(
        &self,
        field_name: &str,
        value: &str,
        context: MissContext,
        now: DateTime<Utc>,
    ) {
        let field_name = field_name.trim();
        let value = value.trim();
        if field_name.is_empty() || value.is_empty() {
            return;
        }

        self.with_table(|table| {
            let values = table.entry(field_name.to_string()).or_default();
            match values.get_mut(value) {
                Some(entry) => entry.record_occurrence(context.clone(), now),
                None => {
                    values.insert(
                        value.to_string(),
                        MissingEntry::new(field_name, value, context.clone(), now),
                    );
                }
            }
        });

        self.session.borrow_mut().push(SessionMiss {
            field_name: field_name.to_string(),
            value: value.to_string(),
            context,
            seen_at: now,
        });

        if let Err(e) = self.save() {
            tracing::warn!(field = field_name, value, error = %e, "could not persist missing entry");
        }
    }

    /// Per-field totals with the top entries by frequency and by recency.
    pub fn get_missing_summary(&self) -> BTreeMap<String, FieldSummary> {
        self.with_table(|table| {
            table
                .iter()
                .map(|(field, values)| {
                    let mut by_frequency: Vec<&MissingEntry> = values.values().collect();
                    by_frequency.sort_by(|a, b| {
                        b.frequency.cmp(&a.frequency).then_with(|| a.value.cmp(&b.value))
                    });
                    let mut by_recency: Vec<&MissingEntry> = values.values().collect();
                    by_recency.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));

                    let summary = FieldSummary {
                        total_values: values.len(),
                        total_frequency: values.values().map(|e| e.frequency).sum(),
                        most_common: by_frequency
                            .into_iter()
                            .take(SUMMARY_TOP_N)
                            .cloned()
                            .collect(),
                        recent_entries: by_recency
                            .into_iter()
                            .take(SUMMARY_TOP_N)
                            .cloned()
                            .collect(),
                    };
                    (field.clone(), summary)
                })
                .collect()
        })
    }

    pub fn get_statistics(&self) -> TrackerStatistics {
        let (total_fields, total_unique_values, total_frequency) = self.with_table(|table| {
            (
                table.len(),
                table.values().map(|v| v.len()).sum(),
                table
                    .values()
                    .flat_map(|v| v.values())
                    .map(|e| e.frequency)
                    .sum(),
            )
        });
        TrackerStatistics {
            total_fields,
            total_unique_values,
            total_frequency,
            storage_location: self.store.location(),
            session_missing_count: self.session.borrow().len(),
        }
    }

    /// Entry for one (field, value) pair, if recorded.
    pub fn get_entry(&self, field_name: &str, value: &str) -> Option<MissingEntry> {
        self.with_table(|table| table.get(field_name)?.get(value).cloned())
    }

    /// Misses hit since the session list was last cleared, oldest first.
    pub fn session_entries(&self) -> Vec<SessionMiss> {
        self.session.borrow().clone()
    }

    pub fn clear_session(&self) {
        self.session.borrow_mut().clear();
    }

    /// Drops entries whose `last_seen` is more than `days` days old.
    ///
    /// # Returns
    /// Number of entries removed.
    pub fn prune_older_than(&self, days: i64) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(days.max(0));
        let removed = self.with_table(|table| {
            let mut removed = 0;
            for values in table.values_mut() {
                let before = values.len();
                values.retain(|_, entry| entry.last_seen >= cutoff);
                removed += before - values.len();
            }
            table.retain(|_, values| !values.is_empty());
            removed
        });
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Removes one entry, e.g. after reconciliation mapped its value.
    pub fn remove_entry(&self, field_name: &str, value: &str) -> Result<bool> {
        let removed = self.with_table(|table| {
            let Some(values) = table.get_mut(field_name) else {
                return false;
            };
            let removed = values.remove(value).is_some();
            if values.is_empty() {
                table.remove(field_name);
            }
            removed
        });
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Every recorded (field, value) pair.
    pub fn entries(&self) -> Vec<MissingEntry> {
        self.with_table(|table| table.values().flat_map(|v| v.values()).cloned().collect())
    }

    /// Drops the in-memory table; the next access reloads from the store.
    pub fn reload(&self) {
        *self.table.borrow_mut() = None;
        *self.writable.borrow_mut() = true;
    }
}

impl<S: MissingEntryStore> MissingEntryRecorder for MissingEntryTracker<S> {
    fn record(&self, field_name: &str, value: &str, context: &MissContext) {
        self.log_missing_entry(field_name, value, context.clone());
    }
}
