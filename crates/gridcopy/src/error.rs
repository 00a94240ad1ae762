use std::path::PathBuf;

use gridcopy_common::CellRect;
use gridcopy_io::IoError;
use thiserror::Error;

use crate::store::DocumentHandle;

/// Failures of the worker pool itself.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("worker pool is closed")]
    Closed,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Discriminant of a [`CopyError`], stable across error payload changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DocumentNotFound,
    OpenFailed,
    SaveFailed,
    SheetNotFound,
    CellWriteFailed,
    StyleCopyFailed,
    InvalidRange,
    OverlappingRanges,
    RowTaskPanicked,
    Pool,
    Document,
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("document handle {0} not found")]
    DocumentNotFound(DocumentHandle),

    #[error("failed to open '{}': {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("failed to save document {handle} to '{}': {source}", path.display())]
    SaveFailed {
        handle: DocumentHandle,
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("cannot write '{sheet}' row {row} col {col}: {source}")]
    CellWriteFailed {
        sheet: String,
        row: u32,
        col: u32,
        #[source]
        source: IoError,
    },

    /// Logged during a copy, never returned from one.
    #[error("cannot copy style to '{sheet}' row {row} col {col}: {source}")]
    StyleCopyFailed {
        sheet: String,
        row: u32,
        col: u32,
        #[source]
        source: IoError,
    },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("destination {dst} overlaps source {src} on sheet '{sheet}'")]
    OverlappingRanges {
        sheet: String,
        src: CellRect,
        dst: CellRect,
    },

    #[error("{0} row task(s) stopped without reporting completion")]
    RowTaskPanicked(usize),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Document(IoError),
}

impl CopyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CopyError::DocumentNotFound(_) => ErrorKind::DocumentNotFound,
            CopyError::OpenFailed { .. } => ErrorKind::OpenFailed,
            CopyError::SaveFailed { .. } => ErrorKind::SaveFailed,
            CopyError::SheetNotFound(_) => ErrorKind::SheetNotFound,
            CopyError::CellWriteFailed { .. } => ErrorKind::CellWriteFailed,
            CopyError::StyleCopyFailed { .. } => ErrorKind::StyleCopyFailed,
            CopyError::InvalidRange(_) => ErrorKind::InvalidRange,
            CopyError::OverlappingRanges { .. } => ErrorKind::OverlappingRanges,
            CopyError::RowTaskPanicked(_) => ErrorKind::RowTaskPanicked,
            CopyError::Pool(_) => ErrorKind::Pool,
            CopyError::Document(_) => ErrorKind::Document,
        }
    }

    /// A rejected cell write; a missing sheet keeps its own kind.
    pub(crate) fn cell_write(sheet: &str, row: u32, col: u32, source: IoError) -> Self {
        match source {
            IoError::SheetNotFound(name) => CopyError::SheetNotFound(name),
            source => CopyError::CellWriteFailed {
                sheet: sheet.to_string(),
                row,
                col,
                source,
            },
        }
    }
}

impl From<IoError> for CopyError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::SheetNotFound(name) => CopyError::SheetNotFound(name),
            other => CopyError::Document(other),
        }
    }
}

pub type Result<T, E = CopyError> = std::result::Result<T, E>;
