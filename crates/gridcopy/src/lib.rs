//! Concurrent, structure-preserving copies of cell ranges between in-memory
//! spreadsheet documents.
//!
//! Documents live in a [`DocumentStore`] and are addressed by
//! [`DocumentHandle`]. A [`CopyEngine`] copies rectangles (or whole sheets)
//! between them on a bounded [`WorkerPool`], then reproduces contained merges,
//! column widths and row heights at the destination.

mod accessors;
pub mod cancel;
pub mod config;
pub mod copy;
pub mod error;
mod finish;
pub mod pool;
pub mod store;

pub use cancel::CancellationToken;
pub use config::EngineConfig;
pub use copy::{CopyEngine, CopyJob, CopyReport, JobPhase};
pub use error::{CopyError, ErrorKind, PoolError, Result};
pub use pool::WorkerPool;
pub use store::{DocumentHandle, DocumentStore};

pub use gridcopy_common::{
    CellCoord, CellRect, LiteralValue, MergeRegion, Offset, ValueKind, classify,
};
pub use gridcopy_io::{IoError, SpreadsheetDocument};

#[cfg(feature = "umya")]
pub use gridcopy_io::UmyaDocument;
