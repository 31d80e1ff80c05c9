//! Rates document storage
//!
//! The service persists exactly one JSON document, replaced wholesale
//! on every accepted write. `FileStore` keeps it on disk and swaps the
//! document in atomically; `MemoryStore` backs tests.

use crate::error::StoreError;
use parking_lot::Mutex;
use ratecard_core::RateTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage for the single rates document
pub trait DocumentStore: Send + Sync {
    /// Read the document, `None` when nothing has been stored yet
    fn get(&self) -> Result<Option<RateTable>, StoreError>;

    /// Replace the document wholesale
    fn put(&self, rates: &RateTable) -> Result<(), StoreError>;
}

/// On-disk store holding one pretty-printed JSON document
///
/// Writers are serialized with a mutex; the document is written to a
/// sibling temp file and renamed into place, so readers only ever see
/// a complete document.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the given document path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the stored document
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn get(&self) -> Result<Option<RateTable>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn put(&self, rates: &RateTable) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(rates)
            .map_err(|source| StoreError::Encode { source })?;

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, content).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "rates document replaced");
        Ok(())
    }
}

/// In-memory store for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Option<RateTable>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding a document
    #[must_use]
    pub fn seeded(rates: RateTable) -> Self {
        Self {
            doc: Mutex::new(Some(rates)),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self) -> Result<Option<RateTable>, StoreError> {
        Ok(self.doc.lock().clone())
    }

    fn put(&self, rates: &RateTable) -> Result<(), StoreError> {
        *self.doc.lock() = Some(rates.clone());
        Ok(())
    }
}
