#![cfg(feature = "umya")]

use crate::error::IoError;
use crate::formula;
use crate::traits::SpreadsheetDocument;
use gridcopy_common::{CellRect, LiteralValue, MAX_COLS, MAX_ROWS, MergeRegion};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Cell, CellRawValue, Spreadsheet, Style, Worksheet};

/// Largest magnitude at which every integer is exactly representable in `f64`.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// xlsx document backed by `umya-spreadsheet`.
///
/// umya's workbook is not internally synchronised, so the whole workbook sits
/// behind one `RwLock`. Each trait call takes the lock for its own duration only.
pub struct UmyaDocument {
    workbook: RwLock<Spreadsheet>,
    original_path: Option<PathBuf>,
}

impl fmt::Debug for UmyaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UmyaDocument")
            .field("sheets", &self.sheet_names())
            .field("original_path", &self.original_path)
            .finish()
    }
}

impl UmyaDocument {
    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self {
            workbook: RwLock::new(book),
            original_path: None,
        }
    }

    /// Path the document was opened from, if any.
    pub fn original_path(&self) -> Option<&Path> {
        self.original_path.as_deref()
    }

    /// Run `f` against the underlying workbook under the read lock.
    pub fn with_workbook<T>(&self, f: impl FnOnce(&Spreadsheet) -> T) -> T {
        f(&self.workbook.read())
    }

    /// Run `f` against the underlying workbook under the write lock.
    pub fn with_workbook_mut<T>(&self, f: impl FnOnce(&mut Spreadsheet) -> T) -> T {
        f(&mut self.workbook.write())
    }

    pub fn into_inner(self) -> Spreadsheet {
        self.workbook.into_inner()
    }

    fn with_sheet<T>(&self, sheet: &str, f: impl FnOnce(&Worksheet) -> T) -> Result<T, IoError> {
        let wb = self.workbook.read();
        let ws = wb
            .get_sheet_by_name(sheet)
            .ok_or_else(|| IoError::SheetNotFound(sheet.to_string()))?;
        Ok(f(ws))
    }

    fn with_sheet_mut<T>(
        &self,
        sheet: &str,
        f: impl FnOnce(&mut Worksheet) -> T,
    ) -> Result<T, IoError> {
        let mut wb = self.workbook.write();
        let ws = wb
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| IoError::SheetNotFound(sheet.to_string()))?;
        Ok(f(ws))
    }

    fn convert_cell_value(cell: &Cell) -> LiteralValue {
        match cell.get_cell_value().get_raw_value() {
            CellRawValue::Numeric(n) => {
                let n = *n;
                if n.fract() == 0.0 && n.abs() < EXACT_INT_LIMIT {
                    LiteralValue::Int(n as i64)
                } else {
                    LiteralValue::Number(n)
                }
            }
            CellRawValue::Bool(b) => LiteralValue::Boolean(*b),
            CellRawValue::String(s) => LiteralValue::Text(s.to_string()),
            CellRawValue::RichText(rt) => LiteralValue::Text(rt.get_text().to_string()),
            CellRawValue::Lazy(s) => LiteralValue::from_raw(s.as_ref()),
            CellRawValue::Error(_) => LiteralValue::Text(cell.get_value().into_owned()),
            CellRawValue::Empty => LiteralValue::Empty,
        }
    }

    fn parse_merges(ws: &Worksheet) -> Vec<MergeRegion> {
        ws.get_merge_cells()
            .iter()
            .filter_map(|range| CellRect::parse_a1(&range.get_range()).ok())
            .collect()
    }
}

fn check_bounds(row: u32, col: u32) -> Result<(), IoError> {
    if row == 0 || col == 0 || row > MAX_ROWS || col > MAX_COLS {
        return Err(IoError::OutOfBounds { row, col });
    }
    Ok(())
}

impl SpreadsheetDocument for UmyaDocument {
    type Style = Style;
    type Sheet = Worksheet;

    fn new_blank() -> Self {
        Self::from_spreadsheet(umya_spreadsheet::new_file())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        // Full read (not lazy) so every sheet is deserialised before it is shared.
        let book = umya_spreadsheet::reader::xlsx::read(path.as_ref())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            sheets = book.get_sheet_count(),
            "opened xlsx"
        );
        Ok(Self {
            workbook: RwLock::new(book),
            original_path: Some(path.as_ref().to_path_buf()),
        })
    }

    fn save_as(&self, path: &Path) -> Result<(), IoError> {
        let wb = self.workbook.read();
        umya_spreadsheet::writer::xlsx::write(&wb, path)?;
        tracing::debug!(path = %path.display(), "saved xlsx");
        Ok(())
    }

    fn sheet_names(&self) -> Vec<String> {
        let wb = self.workbook.read();
        wb.get_sheet_collection_no_check()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn has_sheet(&self, sheet: &str) -> bool {
        self.workbook.read().get_sheet_by_name(sheet).is_some()
    }

    fn create_sheet(&self, sheet: &str) -> Result<(), IoError> {
        let mut wb = self.workbook.write();
        if wb.get_sheet_by_name(sheet).is_some() {
            return Ok(());
        }
        wb.new_sheet(sheet)
            .map(|_| ())
            .map_err(|reason| IoError::SheetCreate {
                name: sheet.to_string(),
                reason: reason.to_string(),
            })
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, IoError> {
        self.with_sheet(sheet, |ws| {
            let mut grid: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
            for cell in ws.get_cell_collection() {
                let value = cell.get_value();
                if value.is_empty() && !cell.is_formula() {
                    continue;
                }
                let coord = cell.get_coordinate();
                grid.entry(*coord.get_row_num())
                    .or_default()
                    .insert(*coord.get_col_num(), value.into_owned());
            }
            let last_row = grid.keys().next_back().copied().unwrap_or(0);
            let mut rows = Vec::with_capacity(last_row as usize);
            for r in 1..=last_row {
                let row = match grid.remove(&r) {
                    Some(mut cells) => {
                        let width = cells.keys().next_back().copied().unwrap_or(0);
                        (1..=width)
                            .map(|c| cells.remove(&c).unwrap_or_default())
                            .collect()
                    }
                    None => Vec::new(),
                };
                rows.push(row);
            }
            rows
        })
    }

    fn cell_value(&self, sheet: &str, row: u32, col: u32) -> Result<String, IoError> {
        self.with_sheet(sheet, |ws| {
            ws.get_cell((col, row))
                .map(|c| c.get_value().into_owned())
                .unwrap_or_default()
        })
    }

    fn read_value(&self, sheet: &str, row: u32, col: u32) -> Result<LiteralValue, IoError> {
        self.with_sheet(sheet, |ws| {
            ws.get_cell((col, row))
                .map(Self::convert_cell_value)
                .unwrap_or(LiteralValue::Empty)
        })
    }

    fn set_cell_value(
        &self,
        sheet: &str,
        row: u32,
        col: u32,
        value: LiteralValue,
    ) -> Result<(), IoError> {
        check_bounds(row, col)?;
        self.with_sheet_mut(sheet, |ws| {
            // umya uses (col,row)
            let cell = ws.get_cell_mut((col, row));
            cell.get_cell_value_mut().remove_formula();
            match value {
                // Past 2^53 an f64 would round the integer; keep its digits as text.
                LiteralValue::Int(i) if i.unsigned_abs() <= 1 << 53 => {
                    cell.set_value_number(i as f64);
                }
                LiteralValue::Int(i) => {
                    cell.set_value_string(i.to_string());
                }
                LiteralValue::Number(n) => {
                    cell.set_value_number(n);
                }
                LiteralValue::Text(s) => {
                    cell.set_value_string(s);
                }
                LiteralValue::Boolean(b) => {
                    cell.set_value_bool(b);
                }
                LiteralValue::Empty => {
                    cell.set_blank();
                }
            }
        })
    }

    fn cell_formula(&self, sheet: &str, row: u32, col: u32) -> Result<Option<String>, IoError> {
        self.with_sheet(sheet, |ws| {
            ws.get_cell((col, row))
                .filter(|c| c.is_formula() && !c.get_formula().is_empty())
                .map(|c| formula::with_equals(c.get_formula()))
        })
    }

    fn set_cell_formula(
        &self,
        sheet: &str,
        row: u32,
        col: u32,
        formula: &str,
    ) -> Result<(), IoError> {
        let body = formula::validate(formula)?;
        check_bounds(row, col)?;
        self.with_sheet_mut(sheet, |ws| {
            let cell = ws.get_cell_mut((col, row));
            // umya stores formula without leading '='
            cell.set_formula(body.to_string());
            cell.set_formula_result_default("");
        })
    }

    fn cell_style(&self, sheet: &str, row: u32, col: u32) -> Result<Option<Style>, IoError> {
        self.with_sheet(sheet, |ws| {
            ws.get_cell((col, row))
                .map(Cell::get_style)
                .filter(|style| **style != Style::default())
                .cloned()
        })
    }

    fn set_cell_style(&self, sheet: &str, row: u32, col: u32, style: Style) -> Result<(), IoError> {
        check_bounds(row, col)?;
        self.with_sheet_mut(sheet, |ws| {
            ws.get_cell_mut((col, row)).set_style(style);
        })
    }

    fn merge_regions(&self, sheet: &str) -> Result<Vec<MergeRegion>, IoError> {
        self.with_sheet(sheet, Self::parse_merges)
    }

    fn merge(&self, sheet: &str, region: MergeRegion) -> Result<(), IoError> {
        check_bounds(region.start_row, region.start_col)?;
        check_bounds(region.end_row, region.end_col)?;
        self.with_sheet_mut(sheet, |ws| {
            let existing = Self::parse_merges(ws);
            if existing.contains(&region) {
                return Ok(());
            }
            if let Some(conflict) = existing.iter().find(|m| m.intersects(&region)) {
                return Err(IoError::MergeConflict {
                    requested: region,
                    existing: *conflict,
                });
            }
            ws.add_merge_cells(region.to_string());
            Ok(())
        })?
    }

    fn unmerge(&self, sheet: &str, region: MergeRegion) -> Result<usize, IoError> {
        self.with_sheet_mut(sheet, |ws| {
            let merges = ws.get_merge_cells_mut();
            let before = merges.len();
            merges.retain(|range| {
                CellRect::parse_a1(&range.get_range())
                    .map(|m| !m.intersects(&region))
                    .unwrap_or(true)
            });
            let removed = before - merges.len();
            if removed == 0 {
                tracing::trace!(%region, "unmerge matched no merges");
            }
            removed
        })
    }

    fn column_width(&self, sheet: &str, col: u32) -> Result<Option<f64>, IoError> {
        self.with_sheet(sheet, |ws| {
            ws.get_column_dimension_by_number(&col)
                .map(|c| *c.get_width())
        })
    }

    fn set_column_width(&self, sheet: &str, col: u32, width: f64) -> Result<(), IoError> {
        check_bounds(1, col)?;
        self.with_sheet_mut(sheet, |ws| {
            ws.get_column_dimension_by_number_mut(&col).set_width(width);
        })
    }

    fn row_height(&self, sheet: &str, row: u32) -> Result<Option<f64>, IoError> {
        self.with_sheet(sheet, |ws| ws.get_row_dimension(&row).map(|r| *r.get_height()))
    }

    fn set_row_height(&self, sheet: &str, row: u32, height: f64) -> Result<(), IoError> {
        check_bounds(row, 1)?;
        self.with_sheet_mut(sheet, |ws| {
            ws.get_row_dimension_mut(&row).set_height(height);
        })
    }

    fn remove_row(&self, sheet: &str, row: u32) -> Result<(), IoError> {
        check_bounds(row, 1)?;
        self.with_sheet_mut(sheet, |ws| {
            ws.remove_row(&row, &1);
        })
    }

    fn sheet_snapshot(&self, sheet: &str) -> Result<Worksheet, IoError> {
        self.with_sheet(sheet, Worksheet::clone)
    }

    fn put_sheet(&self, name: &str, mut sheet: Worksheet) -> Result<(), IoError> {
        sheet.set_name(name);
        let mut wb = self.workbook.write();
        if wb.get_sheet_by_name(name).is_some() {
            wb.remove_sheet_by_name(name)
                .map_err(|reason| IoError::SheetCreate {
                    name: name.to_string(),
                    reason: reason.to_string(),
                })?;
        }
        wb.add_sheet(sheet)
            .map(|_| ())
            .map_err(|reason| IoError::SheetCreate {
                name: name.to_string(),
                reason: reason.to_string(),
            })
    }
}
