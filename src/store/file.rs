//! JSON file and directory record store.
//!
//! A file may hold either an array of records or a single record object.
//! A directory is walked recursively; every `*.json` file in it is loaded
//! in path order so the resulting collection is deterministic.

use super::{RecordStore, StoreError};
use crate::models::TeardownRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<TeardownRecord>),
    One(Box<TeardownRecord>),
}

/// Store backed by local JSON exports.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every record under the root path.
    pub fn load(&self) -> Result<Vec<TeardownRecord>, StoreError> {
        if self.root.is_dir() {
            self.load_dir()
        } else {
            load_file(&self.root)
        }
    }

    fn load_dir(&self) -> Result<Vec<TeardownRecord>, StoreError> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();

        paths.sort();
        debug!("Found {} JSON files under {}", paths.len(), self.root.display());

        let mut records = Vec::new();
        for path in &paths {
            records.extend(load_file(path)?);
        }

        Ok(records)
    }
}

fn load_file(path: &Path) -> Result<Vec<TeardownRecord>, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parsed: RecordFile =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let records = match parsed {
        RecordFile::Many(records) => records,
        RecordFile::One(record) => vec![*record],
    };

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[async_trait]
impl RecordStore for FileStore {
    async fn fetch_teardowns(&self) -> Result<Vec<TeardownRecord>, StoreError> {
        self.load()
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
