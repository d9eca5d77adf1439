//! Versioned, caller-owned collection of course records

use super::CourseRecord;

/// Ordered course records plus a version counter
///
/// The version increases on every mutation, so a caller holding a computed
/// summary can tell whether it is stale. Aggregation and forecasting only ever
/// borrow [`records`](Self::records); they never mutate or retain the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<CourseRecord>,
    version: u64,
}

impl RecordSet {
    /// Create an empty set at version 0
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            version: 0,
        }
    }

    /// Wrap already-loaded records (e.g. from a tracker file) at version 0
    #[must_use]
    pub const fn from_records(records: Vec<CourseRecord>) -> Self {
        Self {
            records,
            version: 0,
        }
    }

    /// Borrow the records in insertion order
    #[must_use]
    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    /// Current version
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record
    pub fn add(&mut self, record: CourseRecord) {
        self.records.push(record);
        self.version += 1;
    }

    /// Append records in order (one version bump for the whole batch)
    pub fn extend<I: IntoIterator<Item = CourseRecord>>(&mut self, records: I) {
        let before = self.records.len();
        self.records.extend(records);
        if self.records.len() != before {
            self.version += 1;
        }
    }

    /// Remove the most recently added record
    pub fn remove_last(&mut self) -> Option<CourseRecord> {
        let removed = self.records.pop();
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Remove every record
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.records.clear();
            self.version += 1;
        }
    }

    /// Consume the set, returning its records
    #[must_use]
    pub fn into_records(self) -> Vec<CourseRecord> {
        self.records
    }
}
