//! Single-cell and row-level operations next to the copy engine.

use gridcopy_common::{CellCoord, CellRect, LiteralValue};
use gridcopy_io::SpreadsheetDocument;
use tracing::debug;

use crate::copy::CopyEngine;
use crate::error::{CopyError, Result};
use crate::store::DocumentHandle;

impl<D: SpreadsheetDocument> CopyEngine<D> {
    pub fn sheet_names(&self, handle: DocumentHandle) -> Result<Vec<String>> {
        Ok(self.store().get(handle)?.sheet_names())
    }

    /// Stored cell text of every used row of `sheet`.
    pub fn read_sheet(&self, handle: DocumentHandle, sheet: &str) -> Result<Vec<Vec<String>>> {
        Ok(self.store().get(handle)?.read_rows(sheet)?)
    }

    /// Write one cell given as an A1 address. Text starting with `=` is stored as
    /// a formula; anything else is re-typed like a copied value.
    pub fn write_cell(
        &self,
        handle: DocumentHandle,
        sheet: &str,
        address: &str,
        text: &str,
    ) -> Result<()> {
        let doc = self.store().get(handle)?;
        let coord = CellCoord::try_from_a1(address)
            .map_err(|e| CopyError::InvalidRange(format!("{address}: {e}")))?;
        let written = if text.starts_with('=') {
            doc.set_cell_formula(sheet, coord.row, coord.col, text)
        } else {
            doc.set_cell_value(sheet, coord.row, coord.col, LiteralValue::from_raw(text))
        };
        written.map_err(|e| CopyError::cell_write(sheet, coord.row, coord.col, e))
    }

    /// Remove every merge overlapping the rectangle between two corner
    /// addresses; returns how many were removed.
    pub fn unmerge_range(
        &self,
        handle: DocumentHandle,
        sheet: &str,
        start: &str,
        end: &str,
    ) -> Result<usize> {
        let doc = self.store().get(handle)?;
        let corner = |addr: &str| {
            CellCoord::try_from_a1(addr)
                .map_err(|e| CopyError::InvalidRange(format!("{addr}: {e}")))
        };
        let region = CellRect::from_corners(corner(start)?, corner(end)?);
        Ok(doc.unmerge(sheet, region)?)
    }

    pub fn delete_row(&self, handle: DocumentHandle, sheet: &str, row: u32) -> Result<()> {
        if row == 0 {
            return Err(CopyError::InvalidRange("row 0".to_string()));
        }
        let doc = self.store().get(handle)?;
        Ok(doc.remove_row(sheet, row)?)
    }

    /// Delete several rows, bottom-up so earlier removals do not shift later
    /// ones. Duplicates and row 0 are ignored. Returns the rows removed.
    pub fn delete_rows(&self, handle: DocumentHandle, sheet: &str, rows: &[u32]) -> Result<usize> {
        let doc = self.store().get(handle)?;
        let mut ordered: Vec<u32> = rows.iter().copied().filter(|&r| r > 0).collect();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();
        for &row in &ordered {
            doc.remove_row(sheet, row)?;
        }
        debug!(%handle, sheet, removed = ordered.len(), "rows deleted");
        Ok(ordered.len())
    }
}
