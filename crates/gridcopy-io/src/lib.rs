pub mod backends;
pub mod error;
pub mod formula;
pub mod traits;

#[cfg(feature = "umya")]
pub use backends::UmyaDocument;
pub use error::IoError;
pub use traits::SpreadsheetDocument;

// Re-export for convenience
pub use gridcopy_common::{CellCoord, CellRect, LiteralValue, MergeRegion};
