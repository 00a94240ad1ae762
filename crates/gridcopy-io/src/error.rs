use gridcopy_common::{AddressError, CellRect, RectError};
use thiserror::Error;

/// Failures reported by a document backend.
#[derive(Debug, Error)]
pub enum IoError {
    #[cfg(feature = "umya")]
    #[error("xlsx: {0}")]
    Xlsx(#[from] umya_spreadsheet::XlsxError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("cannot create sheet '{name}': {reason}")]
    SheetCreate { name: String, reason: String },

    #[error("invalid formula '{formula}': {message}")]
    InvalidFormula { formula: String, message: String },

    #[error("cell (row {row}, col {col}) is outside the sheet bounds")]
    OutOfBounds { row: u32, col: u32 },

    #[error("merge {requested} overlaps existing merge {existing}")]
    MergeConflict { requested: CellRect, existing: CellRect },

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Range(#[from] RectError),
}
