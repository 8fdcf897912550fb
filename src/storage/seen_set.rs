use std::collections::HashSet;

use crate::domain::VersionRecord;

/// Identifiers already observed on one feed.
///
/// The set only grows and lives in memory: a restart re-seeds it from a fresh
/// full fetch. Each feed owns its own set and only one check runs against it
/// at a time, so no internal locking is done here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set from the initial full fetch of a feed
    pub fn initialize(&mut self, records: &[VersionRecord]) {
        self.ids.extend(records.iter().map(|record| record.id.clone()));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not seen before
    pub fn add(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
