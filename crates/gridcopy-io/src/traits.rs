use gridcopy_common::{LiteralValue, MergeRegion};
use std::path::Path;

use crate::error::IoError;

/// An in-memory spreadsheet document.
///
/// Every method takes `&self`: implementations synchronise internally so a
/// document can be shared between the worker threads of a copy job. Individual
/// calls are atomic with respect to each other; nothing is promised across
/// calls. Rows and columns are 1-based. Closing a document is dropping it.
pub trait SpreadsheetDocument: Send + Sync + 'static {
    /// Opaque cell formatting, recreated cell-by-cell on copy.
    type Style: Clone + Send + Sync + 'static;
    /// Detached copy of a whole worksheet (cells, merges, dimensions, metadata).
    type Sheet: Send + 'static;

    /// Blank workbook containing a single default sheet.
    fn new_blank() -> Self
    where
        Self: Sized;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError>
    where
        Self: Sized;

    fn save_as(&self, path: &Path) -> Result<(), IoError>;

    fn sheet_names(&self) -> Vec<String>;

    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|s| s == sheet)
    }

    /// Create `sheet`; a no-op when it already exists.
    fn create_sheet(&self, sheet: &str) -> Result<(), IoError>;

    /// Stored cell text (unformatted), row by row, in the shape a grid reader expects:
    /// rows run up to the last row holding a value or a formula, and every row
    /// is trimmed after its last such cell. Interior gaps are `""`.
    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, IoError>;

    /// Stored text of one cell, without number formatting; `""` for a missing cell.
    fn cell_value(&self, sheet: &str, row: u32, col: u32) -> Result<String, IoError>;

    /// Typed value of one cell; [`LiteralValue::Empty`] for a missing cell.
    fn read_value(&self, sheet: &str, row: u32, col: u32) -> Result<LiteralValue, IoError>;

    fn set_cell_value(
        &self,
        sheet: &str,
        row: u32,
        col: u32,
        value: LiteralValue,
    ) -> Result<(), IoError>;

    /// Formula with a leading `=`, or `None` for a plain cell.
    fn cell_formula(&self, sheet: &str, row: u32, col: u32) -> Result<Option<String>, IoError>;

    /// Store a formula (leading `=` optional). Rejects malformed formulas.
    fn set_cell_formula(&self, sheet: &str, row: u32, col: u32, formula: &str)
    -> Result<(), IoError>;

    /// Style of an existing cell; `None` when the cell carries no style.
    fn cell_style(&self, sheet: &str, row: u32, col: u32) -> Result<Option<Self::Style>, IoError>;

    fn set_cell_style(
        &self,
        sheet: &str,
        row: u32,
        col: u32,
        style: Self::Style,
    ) -> Result<(), IoError>;

    fn merge_regions(&self, sheet: &str) -> Result<Vec<MergeRegion>, IoError>;

    /// Merge `region`. Merging an already merged region is a no-op; a region
    /// overlapping a different merge is rejected.
    fn merge(&self, sheet: &str, region: MergeRegion) -> Result<(), IoError>;

    /// Remove every merge overlapping `region`; returns how many were removed.
    fn unmerge(&self, sheet: &str, region: MergeRegion) -> Result<usize, IoError>;

    /// Explicit width of a column, if one is set.
    fn column_width(&self, sheet: &str, col: u32) -> Result<Option<f64>, IoError>;

    fn set_column_width(&self, sheet: &str, col: u32, width: f64) -> Result<(), IoError>;

    /// Explicit height of a row, if one is set.
    fn row_height(&self, sheet: &str, row: u32) -> Result<Option<f64>, IoError>;

    fn set_row_height(&self, sheet: &str, row: u32, height: f64) -> Result<(), IoError>;

    /// Delete `row`, shifting the rows below it up by one.
    fn remove_row(&self, sheet: &str, row: u32) -> Result<(), IoError>;

    fn sheet_snapshot(&self, sheet: &str) -> Result<Self::Sheet, IoError>;

    /// Install a snapshot under `name`, replacing any sheet with that name.
    fn put_sheet(&self, name: &str, sheet: Self::Sheet) -> Result<(), IoError>;
}
