use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use super::{LayoutRecord, LayoutStore, LayoutSummary, PersistenceError, SaveLayout};

/// One pretty-printed JSON file per layout, named `<id>.json`.
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    dir: PathBuf,
}

impl FileLayoutStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Only uuid ids map to files, so an id can never name a path outside
    /// the directory.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(id).ok()?;
        Some(self.dir.join(format!("{id}.json")))
    }

    fn read(&self, path: &Path, id: &str) -> Result<LayoutRecord, PersistenceError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

impl LayoutStore for FileLayoutStore {
    fn list_layouts(&self) -> Result<Vec<LayoutSummary>, PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(PersistenceError::from)
                .and_then(|raw| serde_json::from_str::<LayoutRecord>(&raw).map_err(PersistenceError::from))
            {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable layout");
                }
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(records.iter().map(LayoutRecord::summary).collect())
    }

    fn fetch_layout(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        self.read(&path, id)
    }

    fn save_layout(&mut self, mut request: SaveLayout) -> Result<String, PersistenceError> {
        if request.id.as_deref().is_some_and(|id| self.path_for(id).is_none()) {
            request.id = None;
        }
        let existing = match request.id.as_deref() {
            Some(id) => match self.fetch_layout(id) {
                Ok(record) => Some(record),
                Err(PersistenceError::NotFound(_)) => None,
                Err(err) => return Err(err),
            },
            None => None,
        };
        let record = request.into_record(existing, Utc::now());
        let path = self
            .path_for(&record.id)
            .ok_or_else(|| PersistenceError::NotFound(record.id.clone()))?;

        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&record)?)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(layout_id = %record.id, name = %record.name, "saved layout");
        Ok(record.id)
    }

    fn delete_layout(&mut self, id: &str) -> Result<(), PersistenceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(PersistenceError::NotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}
