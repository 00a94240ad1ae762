use core::fmt;

use crate::coord::{AddressError, CellCoord, Offset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive, 1-based rectangle of cells.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

/// A block of visually joined cells.
pub type MergeRegion = CellRect;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RectError {
    ZeroIndex,
    /// Start/end were not ordered (start <= end).
    Order,
    Address(AddressError),
}

impl fmt::Display for RectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RectError::ZeroIndex => write!(f, "row and column indices must be 1-based (>= 1)"),
            RectError::Order => {
                write!(f, "range must be ordered so the start is above/left of the end")
            }
            RectError::Address(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RectError {}

impl From<AddressError> for RectError {
    fn from(value: AddressError) -> Self {
        RectError::Address(value)
    }
}

impl CellRect {
    pub fn new(
        start_row: u32,
        end_row: u32,
        start_col: u32,
        end_col: u32,
    ) -> Result<Self, RectError> {
        if start_row == 0 || end_row == 0 || start_col == 0 || end_col == 0 {
            return Err(RectError::ZeroIndex);
        }
        if start_row > end_row || start_col > end_col {
            return Err(RectError::Order);
        }
        Ok(Self {
            start_row,
            end_row,
            start_col,
            end_col,
        })
    }

    /// Rectangle spanning two corner cells, in any order.
    pub fn from_corners(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start_row: a.row.min(b.row),
            end_row: a.row.max(b.row),
            start_col: a.col.min(b.col),
            end_col: a.col.max(b.col),
        }
    }

    /// Parse `A1:C3` (or a single `B2`).
    pub fn parse_a1(range: &str) -> Result<Self, RectError> {
        match range.split_once(':') {
            Some((start, end)) => Ok(Self::from_corners(
                CellCoord::try_from_a1(start)?,
                CellCoord::try_from_a1(end)?,
            )),
            None => {
                let cell = CellCoord::try_from_a1(range)?;
                Ok(Self::from_corners(cell, cell))
            }
        }
    }

    pub fn start(&self) -> CellCoord {
        CellCoord {
            row: self.start_row,
            col: self.start_col,
        }
    }

    pub fn end(&self) -> CellCoord {
        CellCoord {
            row: self.end_row,
            col: self.end_col,
        }
    }

    pub fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &CellRect) -> bool {
        self.contains(other.start_row, other.start_col)
            && self.contains(other.end_row, other.end_col)
    }

    pub fn intersects(&self, other: &CellRect) -> bool {
        !(self.end_col < other.start_col
            || other.end_col < self.start_col
            || self.end_row < other.start_row
            || other.end_row < self.start_row)
    }

    /// Shift by `offset`; `None` if any corner would leave the grid.
    pub fn translate(&self, offset: Offset) -> Option<CellRect> {
        Some(CellRect::from_corners(
            offset.apply(self.start())?,
            offset.apply(self.end())?,
        ))
    }

    /// Same-sized rectangle whose top-left corner is `anchor` (saturating at `u32::MAX`).
    pub fn at_anchor(&self, anchor: CellCoord) -> CellRect {
        CellRect {
            start_row: anchor.row,
            end_row: anchor.row.saturating_add(self.end_row - self.start_row),
            start_col: anchor.col,
            end_col: anchor.col.saturating_add(self.end_col - self.start_col),
        }
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}
