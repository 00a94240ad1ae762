//! Registry of open documents keyed by opaque handles.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use gridcopy_io::SpreadsheetDocument;
use serde::{Deserialize, Serialize};

use crate::error::{CopyError, Result};

/// Opaque, process-unique identifier of an open document. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    /// Rebuild a handle from an integer received across an API boundary.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns every open document.
///
/// Lookups hand out an `Arc`, so a job that resolved a document keeps it alive
/// even if the handle is closed while the job runs. A document becomes visible
/// only after it is fully loaded.
pub struct DocumentStore<D> {
    docs: DashMap<DocumentHandle, Arc<D>>,
    next_id: AtomicU64,
}

impl<D> Default for DocumentStore<D> {
    fn default() -> Self {
        Self {
            docs: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<D: SpreadsheetDocument> DocumentStore<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> DocumentHandle {
        DocumentHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Load a document from disk and publish it.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<DocumentHandle> {
        let path = path.as_ref();
        let doc = D::open_path(path).map_err(|source| CopyError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let handle = self.insert(doc);
        tracing::info!(%handle, path = %path.display(), "document opened");
        Ok(handle)
    }

    /// Publish an already constructed document.
    pub fn insert(&self, doc: D) -> DocumentHandle {
        let handle = self.allocate();
        self.docs.insert(handle, Arc::new(doc));
        tracing::debug!(%handle, open = self.docs.len(), "document registered");
        handle
    }

    /// Publish a blank workbook.
    pub fn create(&self) -> DocumentHandle {
        self.insert(D::new_blank())
    }

    pub fn get(&self, handle: DocumentHandle) -> Result<Arc<D>> {
        self.docs
            .get(&handle)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(CopyError::DocumentNotFound(handle))
    }

    pub fn close(&self, handle: DocumentHandle) -> Result<()> {
        match self.docs.remove(&handle) {
            Some(_) => {
                tracing::debug!(%handle, "document closed");
                Ok(())
            }
            None => Err(CopyError::DocumentNotFound(handle)),
        }
    }

    /// Drop every registered document; returns how many were closed.
    pub fn close_all(&self) -> usize {
        let handles: Vec<DocumentHandle> = self.docs.iter().map(|entry| *entry.key()).collect();
        let closed = handles
            .into_iter()
            .filter(|handle| self.docs.remove(handle).is_some())
            .count();
        tracing::info!(closed, "all documents closed");
        closed
    }

    pub fn save<P: AsRef<Path>>(&self, handle: DocumentHandle, path: P) -> Result<()> {
        let path = path.as_ref();
        let doc = self.get(handle)?;
        doc.save_as(path).map_err(|source| CopyError::SaveFailed {
            handle,
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(%handle, path = %path.display(), "document saved");
        Ok(())
    }

    pub fn contains(&self, handle: DocumentHandle) -> bool {
        self.docs.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Currently open handles in allocation order.
    pub fn handles(&self) -> Vec<DocumentHandle> {
        let mut handles: Vec<DocumentHandle> = self.docs.iter().map(|entry| *entry.key()).collect();
        handles.sort_unstable();
        handles
    }
}
