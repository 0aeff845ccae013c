//! Append-only idea store backed by a single JSON file.
//!
//! The whole collection is rewritten on every append. There is no locking and no
//! atomic rename: a crash mid-write leaves a truncated file, which the next
//! [`IdeaStore::load`] treats as an empty store.

use muse_core::Record;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug)]
pub struct IdeaStore {
    path: PathBuf,
    records: Vec<Record>,
    load_failure: Option<String>,
}

impl IdeaStore {
    /// Open the store at `path`. A missing file is an empty store; an unreadable
    /// or unparsable one is reported as an error.
    pub fn try_load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Vec<Record>>(&raw).map_err(|source| {
                StoreError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self {
            path,
            records,
            load_failure: None,
        })
    }

    /// Open the store at `path`, falling back to an empty store on any failure.
    ///
    /// The failure is logged and kept in [`IdeaStore::load_failure`] so the caller
    /// can surface it; the program carries on either way.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(path.clone()) {
            Ok(store) => {
                tracing::debug!(path = %path.display(), records = store.len(), "idea store loaded");
                store
            }
            Err(e) => {
                tracing::warn!("Starting with an empty idea store: {}", e);
                Self {
                    path,
                    records: Vec::new(),
                    load_failure: Some(e.to_string()),
                }
            }
        }
    }

    /// Append a record and rewrite the whole file.
    ///
    /// If the write fails the record is dropped again, so memory never holds
    /// more than the file does.
    pub fn append(&mut self, record: Record) -> Result<(), StoreError> {
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.records).map_err(StoreError::Serialize)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), records = self.records.len(), "idea store saved");
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record.
    pub fn latest(&self) -> Option<&Record> {
        self.records.last()
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[Record] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    /// See [`crate::matcher::search`].
    pub fn search(&self, query: &str, top_k: usize) -> Vec<String> {
        crate::matcher::search(&self.records, query, top_k)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_failure(&self) -> Option<&str> {
        self.load_failure.as_deref()
    }
}
