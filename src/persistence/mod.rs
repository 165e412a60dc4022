//! Named, persisted layouts.
//!
//! The workspace only ever talks to a [`LayoutStore`]; whether records live
//! in files or in memory is the store's business. Every failure is a
//! [`PersistenceError`] the caller reports and otherwise ignores, so a broken
//! store never touches live window state.

mod file;
mod memory;

pub use file::FileLayoutStore;
pub use memory::MemoryLayoutStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::snapshot::LayoutSnapshot;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("layout storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout could not be encoded or decoded: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("layout {0} not found")]
    NotFound(String),
}

/// A saved layout as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub layout: LayoutSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LayoutRecord {
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// What the load menu lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    pub id: String,
    pub name: String,
}

/// Parameters of a save. With `id` set an existing record is updated in
/// place; an unknown id is created under that id.
#[derive(Debug, Clone)]
pub struct SaveLayout {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub layout: LayoutSnapshot,
}

impl SaveLayout {
    pub fn new(name: impl Into<String>, layout: LayoutSnapshot) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            layout,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Merge into `existing` (update) or build a new record.
    pub(crate) fn into_record(self, existing: Option<LayoutRecord>, now: DateTime<Utc>) -> LayoutRecord {
        match existing {
            Some(mut record) => {
                record.name = self.name;
                record.description = self.description;
                record.layout = self.layout;
                record.updated_at = now;
                record
            }
            None => LayoutRecord {
                id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: self.name,
                description: self.description,
                layout: self.layout,
                created_at: now,
                updated_at: now,
            },
        }
    }
}

pub trait LayoutStore {
    /// Saved layouts, oldest first.
    fn list_layouts(&self) -> Result<Vec<LayoutSummary>, PersistenceError>;

    fn fetch_layout(&self, id: &str) -> Result<LayoutRecord, PersistenceError>;

    /// Returns the id of the saved record.
    fn save_layout(&mut self, request: SaveLayout) -> Result<String, PersistenceError>;

    fn delete_layout(&mut self, id: &str) -> Result<(), PersistenceError>;

    /// The most recently updated layout called `name`.
    fn find_by_name(&self, name: &str) -> Result<Option<LayoutRecord>, PersistenceError> {
        let mut best: Option<LayoutRecord> = None;
        for summary in self.list_layouts()? {
            if summary.name != name {
                continue;
            }
            let record = self.fetch_layout(&summary.id)?;
            if best.as_ref().is_none_or(|b| record.updated_at >= b.updated_at) {
                best = Some(record);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Point, Size};
    use crate::snapshot::WindowSnapshot;
    use crate::window::ContentKind;

    fn snapshot() -> LayoutSnapshot {
        LayoutSnapshot {
            windows: vec![WindowSnapshot {
                id: "a".into(),
                title: "Chart".into(),
                content_kind: ContentKind::Chart,
                position: Point::new(1, 2),
                size: Size::new(300, 200),
                is_maximized: false,
                is_minimized: false,
            }],
            tab_groups: Vec::new(),
        }
    }

    #[test]
    fn record_json_is_camel_case() {
        let now = Utc::now();
        let record = SaveLayout::new("Desk", snapshot()).into_record(None, now);
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("description").is_none());
        assert_eq!(value["layout"]["windows"][0]["contentKind"], "chart");
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn update_keeps_id_and_creation_time() {
        let t0 = Utc::now();
        let first = SaveLayout::new("Desk", snapshot()).into_record(None, t0);
        let t1 = t0 + chrono::Duration::seconds(5);
        let updated = SaveLayout::new("Desk v2", LayoutSnapshot::default())
            .with_description("moved things")
            .into_record(Some(first.clone()), t1);
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.created_at, t0);
        assert_eq!(updated.updated_at, t1);
        assert_eq!(updated.name, "Desk v2");
        assert!(updated.layout.is_empty());
    }
}
