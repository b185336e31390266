use super::SnapshotStore;
use crate::analysis::Analysis;
use crate::error::PersistenceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// A stored analysis. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub group_id: String,
    pub saved_at: DateTime<Utc>,
    pub analysis: Analysis,
}

/// Snapshot store writing one JSON file per analysis under `<dir>/<group>/`
#[derive(Debug, Clone)]
pub struct DirSnapshotStore {
    dir: PathBuf,
}

impl DirSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn group_dir(&self, group_id: &str) -> PathBuf {
        self.dir.join(sanitize(group_id))
    }

    /// All snapshots for a group, oldest first. Unreadable files are skipped.
    pub fn list(&self, group_id: &str) -> Result<Vec<SnapshotRecord>, PersistenceError> {
        let group_dir = self.group_dir(group_id);
        if !group_dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&group_dir).map_err(PersistenceError::Read)? {
            let path = entry.map_err(PersistenceError::Read)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable snapshot {:?}: {}", path, e),
            }
        }

        records.sort_by_key(|r| r.saved_at);
        Ok(records)
    }
}

#[async_trait]
impl SnapshotStore for DirSnapshotStore {
    async fn save(
        &self,
        group_id: &str,
        timestamp: DateTime<Utc>,
        analysis: &Analysis,
    ) -> Result<(), PersistenceError> {
        let group_dir = self.group_dir(group_id);
        tokio::fs::create_dir_all(&group_dir)
            .await
            .map_err(PersistenceError::CreateDir)?;

        let record = SnapshotRecord {
            group_id: group_id.to_string(),
            saved_at: timestamp,
            analysis: analysis.clone(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        let file_name = format!(
            "{}-{}.json",
            timestamp.format("%Y%m%dT%H%M%S%3fZ"),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = group_dir.join(file_name);

        // create_new: an existing snapshot is never overwritten
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| PersistenceError::Write {
                path: path.clone(),
                source: e,
            })?;
        file.write_all(&json)
            .await
            .map_err(|e| PersistenceError::Write {
                path: path.clone(),
                source: e,
            })?;
        file.flush().await.map_err(|e| PersistenceError::Write {
            path: path.clone(),
            source: e,
        })?;

        debug!("Wrote snapshot {:?}", path);
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<SnapshotRecord, PersistenceError> {
    let content = fs::read_to_string(path).map_err(PersistenceError::Read)?;
    Ok(serde_json::from_str(&content)?)
}

fn sanitize(group_id: &str) -> String {
    group_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_group_id() {
        assert_eq!(sanitize("family/../x"), "family____x");
        assert_eq!(sanitize("rivera-2"), "rivera-2");
    }

    #[test]
    fn test_list_missing_group_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirSnapshotStore::new(dir.path());
        assert!(store.list("nobody").unwrap().is_empty());
    }
}
