use std::collections::BTreeMap;

use chrono::Utc;

use super::{LayoutRecord, LayoutStore, LayoutSummary, PersistenceError, SaveLayout};

/// Layouts kept for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryLayoutStore {
    records: BTreeMap<String, LayoutRecord>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn list_layouts(&self) -> Result<Vec<LayoutSummary>, PersistenceError> {
        let mut records: Vec<&LayoutRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(records.into_iter().map(LayoutRecord::summary).collect())
    }

    fn fetch_layout(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }

    fn save_layout(&mut self, request: SaveLayout) -> Result<String, PersistenceError> {
        let existing = request.id.as_ref().and_then(|id| self.records.get(id)).cloned();
        let record = request.into_record(existing, Utc::now());
        let id = record.id.clone();
        self.records.insert(id.clone(), record);
        Ok(id)
    }

    fn delete_layout(&mut self, id: &str) -> Result<(), PersistenceError> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }
}
