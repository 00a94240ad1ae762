//! A1 address helpers and anchor offsets.
//!
//! Rows and columns are 1-based everywhere in gridcopy. Addresses use the usual
//! column letters followed by the row number (`A1`, `AB12`). A `$` anchor before
//! either part is accepted when parsing and never emitted. Upper bounds are not
//! enforced here; backends apply their own format ceilings (see [`MAX_ROWS`] and
//! [`MAX_COLS`] for the xlsx limits).

use core::fmt;
use std::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Last row addressable in an xlsx worksheet.
pub const MAX_ROWS: u32 = 1_048_576;
/// Last column (`XFD`) addressable in an xlsx worksheet.
pub const MAX_COLS: u32 = 16_384;

/// Errors returned when converting between coordinates and A1 text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// Row index 0 was supplied where a 1-based row is required.
    ZeroRow,
    /// Column index 0 was supplied where a 1-based column is required.
    ZeroCol,
    /// Text was not of the form `[$]LETTERS[$]DIGITS`.
    Malformed(String),
    /// Row or column component does not fit in a `u32`.
    Overflow(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::ZeroRow => write!(f, "row indices are 1-based (got 0)"),
            AddressError::ZeroCol => write!(f, "column indices are 1-based (got 0)"),
            AddressError::Malformed(s) => write!(f, "'{s}' is not an A1-style cell address"),
            AddressError::Overflow(s) => write!(f, "cell address '{s}' is out of range"),
        }
    }
}

impl Error for AddressError {}

/// Absolute 1-based cell position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub fn new(row: u32, col: u32) -> Result<Self, AddressError> {
        if row == 0 {
            return Err(AddressError::ZeroRow);
        }
        if col == 0 {
            return Err(AddressError::ZeroCol);
        }
        Ok(Self { row, col })
    }

    /// Parse an A1-style reference.
    pub fn try_from_a1(address: &str) -> Result<Self, AddressError> {
        let (col, row) = to_coords(address)?;
        Ok(Self { row, col })
    }

    pub fn to_a1(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row)
    }
}

impl TryFrom<(u32, u32)> for CellCoord {
    type Error = AddressError;

    /// Accepts `(row, col)`.
    fn try_from(value: (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

/// Convert a 1-based column index into letters (`1 -> A`, `27 -> AA`).
///
/// Column 0 has no letters and yields an empty string.
pub fn column_to_letters(col: u32) -> String {
    let mut buf = Vec::with_capacity(3);
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        buf.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    buf.iter().rev().collect()
}

/// Convert column letters into a 1-based column index. Case-insensitive.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.bytes() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let val = u32::from(ch.to_ascii_uppercase() - b'A') + 1;
        col = col.checked_mul(26)?.checked_add(val)?;
    }
    Some(col)
}

/// Render `(col, row)` as an A1 address.
pub fn to_address(col: u32, row: u32) -> Result<String, AddressError> {
    Ok(CellCoord::new(row, col)?.to_string())
}

/// Parse an A1 address into `(col, row)`.
pub fn to_coords(address: &str) -> Result<(u32, u32), AddressError> {
    let malformed = || AddressError::Malformed(address.to_string());
    let body = address.trim();
    let body = body.strip_prefix('$').unwrap_or(body);
    let split = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(malformed)?;
    let (letters, rest) = body.split_at(split);
    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let col = letters_to_column(letters)
        .ok_or_else(|| AddressError::Overflow(address.to_string()))?;
    let row: u32 = digits
        .parse()
        .map_err(|_| AddressError::Overflow(address.to_string()))?;
    if row == 0 {
        return Err(AddressError::ZeroRow);
    }
    Ok((col, row))
}

/// Signed row/column displacement between two anchors.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Offset {
    pub rows: i64,
    pub cols: i64,
}

impl Offset {
    pub const ZERO: Self = Self { rows: 0, cols: 0 };

    /// `dst - src` on both axes.
    pub fn between(src: CellCoord, dst: CellCoord) -> Self {
        Self {
            rows: i64::from(dst.row) - i64::from(src.row),
            cols: i64::from(dst.col) - i64::from(src.col),
        }
    }

    #[inline]
    pub fn apply_row(self, row: u32) -> Option<u32> {
        shift(row, self.rows)
    }

    #[inline]
    pub fn apply_col(self, col: u32) -> Option<u32> {
        shift(col, self.cols)
    }

    /// Translate a coordinate; `None` when the result would fall below row/col 1.
    #[inline]
    pub fn apply(self, coord: CellCoord) -> Option<CellCoord> {
        Some(CellCoord {
            row: self.apply_row(coord.row)?,
            col: self.apply_col(coord.col)?,
        })
    }
}

/// Row and column deltas that move `src_anchor` onto `dst_anchor`.
pub fn offset(src_anchor: CellCoord, dst_anchor: CellCoord) -> Offset {
    Offset::between(src_anchor, dst_anchor)
}

#[inline]
fn shift(value: u32, delta: i64) -> Option<u32> {
    let out = i64::from(value) + delta;
    if out < 1 {
        return None;
    }
    u32::try_from(out).ok()
}
