//! Sync state tracking.
//!
//! Maps each source event id to the UID the event was created with at the
//! destination. A key being present means the event was synced and must
//! not be created again. Stored as a flat JSON object:
//!
//! ```json
//! {
//!   "4k3j2h1g0f": "4k3j2h1g0f@google.com"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{SyncalError, SyncalResult};

#[derive(Debug, Clone)]
pub struct SyncState {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl SyncState {
    /// Empty state that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        SyncState {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    /// Read the state file. A missing file is an empty state, not an error.
    pub fn load(path: impl Into<PathBuf>) -> SyncalResult<Self> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::empty(path));
            }
            Err(e) => {
                return Err(SyncalError::StateLoad {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        let entries: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| SyncalError::StateLoad {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(SyncState { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.entries.contains_key(source_id)
    }

    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.entries.get(source_id).map(String::as_str)
    }

    /// Record that `source_id` was synced as `dest_uid`, replacing any prior entry.
    pub fn put(&mut self, source_id: impl Into<String>, dest_uid: impl Into<String>) {
        self.entries.insert(source_id.into(), dest_uid.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write the full mapping to disk.
    ///
    /// Content goes to a sibling `.tmp` file first which is then renamed over
    /// the real one, so a crash mid-write never leaves a truncated state.
    pub fn save(&self) -> SyncalResult<()> {
        let save_err = |reason: String| SyncalError::StateSave {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }

        // Sort for deterministic output
        let sorted: BTreeMap<&String, &String> = self.entries.iter().collect();
        let content = serde_json::to_string_pretty(&sorted)
            .map_err(|e| SyncalError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        std::fs::write(&temp, content).map_err(|e| save_err(e.to_string()))?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(save_err(e.to_string()));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = SyncState::load(dir.path().join("sync-state.json")).unwrap();

        assert!(state.is_empty());
        assert!(!state.contains("g1"));
    }

    #[test]
    fn test_save_then_load_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");

        let mut state = SyncState::empty(&path);
        state.put("g1", "uid-1");
        state.put("g2", "uid-2");
        state.save().unwrap();

        let loaded = SyncState::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("g1"), Some("uid-1"));
        assert_eq!(loaded.get("g2"), Some("uid-2"));
    }

    #[test]
    fn test_saved_file_is_flat_json_with_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");

        let mut state = SyncState::empty(&path);
        state.put("g2", "uid-2");
        state.put("g1", "uid-1");
        state.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"g1\": \"uid-1\",\n  \"g2\": \"uid-2\"\n}");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");

        let mut state = SyncState::empty(&path);
        state.put("g1", "uid-1");
        state.save().unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("sync-state.json.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");
        // A non-empty directory at the target path makes the rename fail
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let mut state = SyncState::empty(&path);
        state.put("g1", "uid-1");
        let err = state.save().unwrap_err();

        assert!(matches!(err, SyncalError::StateSave { .. }), "got {:?}", err);
        assert!(!dir.path().join("sync-state.json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sync-state.json");

        let mut state = SyncState::empty(&path);
        state.put("g1", "uid-1");
        state.save().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let mut state = SyncState::empty("unused.json");
        state.put("g1", "old");
        state.put("g1", "new");

        assert_eq!(state.len(), 1);
        assert_eq!(state.get("g1"), Some("new"));
    }

    #[test]
    fn test_corrupt_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = SyncState::load(&path).unwrap_err();
        assert!(matches!(err, SyncalError::StateLoad { .. }), "got {:?}", err);
    }

    #[test]
    fn test_unexpected_shape_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");
        std::fs::write(&path, r#"{"g1": 42}"#).unwrap();

        assert!(SyncState::load(&path).is_err());
    }
}
