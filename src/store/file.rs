//! Local JSON file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{StoreError, WorkoutRecord, WorkoutStore};

/// Writes each workout to `<dir>/<started_at_ms>-<exercise>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination path for `record`.
    pub fn path_for(&self, record: &WorkoutRecord) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", record.started_at_ms, record.exercise))
    }
}

#[async_trait]
impl WorkoutStore for JsonFileStore {
    /// Returns the written file path as the record id.
    async fn save(&self, record: &WorkoutRecord) -> Result<String, StoreError> {
        let path = self.path_for(record);
        let json = serde_json::to_vec_pretty(record)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, json).await?;

        log::info!("store: wrote {}", path.display());
        Ok(path.display().to_string())
    }
}
