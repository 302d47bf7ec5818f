//! Snapshot persistence for one result set's cache content.
//!
//! Layout under the snapshot root, one directory per result set name:
//! `manifest.json` (fingerprint + timestamp) and `entries.jsonl`, one entry
//! per line.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use st_core::{ProjectId, ResultSetId};

use crate::hash::compute_cache_fingerprint;
use crate::store::{CacheStore, MemoryCacheStore};
use crate::types::{CacheKey, LoadCaseKey};
use crate::{CacheError, CacheResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub result_set_name: String,
    pub fingerprint: String,
    pub saved_at: String,
    pub entry_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    key: CacheKey,
    story_sort_order: u32,
    cells: Vec<(LoadCaseKey, f64)>,
}

/// Directory name for a result set. Path separators and other non-portable
/// characters map to `_` so every snapshot stays under the root; names that
/// collapse to `.` or `..` get a fixed stand-in.
fn dir_name(result_set_name: &str) -> String {
    let mapped: String = result_set_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if mapped.is_empty() || mapped.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        mapped
    }
}

#[derive(Clone)]
pub struct SnapshotStore {
    root_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(root_dir: PathBuf) -> CacheResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn snapshot_dir(&self, result_set_name: &str) -> PathBuf {
        self.root_dir.join(dir_name(result_set_name))
    }

    pub fn has_snapshot(&self, result_set_name: &str) -> bool {
        self.snapshot_dir(result_set_name).join("manifest.json").exists()
    }

    /// Persist one result set's entries from an in-memory store.
    pub fn save(
        &self,
        store: &MemoryCacheStore,
        project: ProjectId,
        result_set: ResultSetId,
        result_set_name: &str,
    ) -> CacheResult<SnapshotManifest> {
        let dir = self.snapshot_dir(result_set_name);
        fs::create_dir_all(&dir)?;

        let entries = store.entries_of(project, result_set);
        let mut lines = String::new();
        for entry in &entries {
            let snap = SnapshotEntry {
                key: entry.key.clone(),
                story_sort_order: entry.story_sort_order,
                cells: entry
                    .matrix
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
            };
            lines.push_str(&serde_json::to_string(&snap)?);
            lines.push('\n');
        }
        fs::write(dir.join("entries.jsonl"), lines)?;

        let manifest = SnapshotManifest {
            result_set_name: result_set_name.to_string(),
            fingerprint: compute_cache_fingerprint(store, project, result_set),
            saved_at: chrono::Utc::now().to_rfc3339(),
            entry_count: entries.len(),
        };
        fs::write(
            dir.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;
        Ok(manifest)
    }

    pub fn load_manifest(&self, result_set_name: &str) -> CacheResult<SnapshotManifest> {
        let path = self.snapshot_dir(result_set_name).join("manifest.json");
        if !path.exists() {
            return Err(CacheError::SnapshotNotFound {
                result_set: result_set_name.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a snapshot's entries back into a store via plain upserts.
    pub fn load_into(
        &self,
        store: &mut MemoryCacheStore,
        result_set_name: &str,
    ) -> CacheResult<usize> {
        let path = self.snapshot_dir(result_set_name).join("entries.jsonl");
        if !path.exists() {
            return Err(CacheError::SnapshotNotFound {
                result_set: result_set_name.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let mut loaded = 0;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let snap: SnapshotEntry = serde_json::from_str(line)?;
            store.upsert(
                snap.key,
                snap.cells.into_iter().collect(),
                snap.story_sort_order,
            )?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn delete(&self, result_set_name: &str) -> CacheResult<()> {
        let dir = self.snapshot_dir(result_set_name);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_name_neutralizes_path_separators() {
        assert_eq!(dir_name("RunA"), "RunA");
        assert_eq!(dir_name("../evil"), ".._evil");
        assert_eq!(dir_name("a/b\\c"), "a_b_c");
        assert_eq!(dir_name(".."), "unnamed");
        assert_eq!(dir_name(""), "unnamed");
    }
}
