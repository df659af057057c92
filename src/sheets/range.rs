//! A1-notation ranges over the record columns.

use crate::models::record::{FIRST_DATA_ROW, Field};
use std::fmt;

/// Which rows a range covers. Columns always span the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSpan {
    /// Whole columns (`A:I`), used as the append target.
    All,
    /// From a row to the end of the sheet (`A2:I`).
    From(u32),
    /// Inclusive row interval (`A5:I5`).
    Rows(u32, u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub rows: RowSpan,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, rows: RowSpan) -> Self {
        Self {
            sheet: sheet.into(),
            rows,
        }
    }

    /// Every data row, header excluded.
    pub fn data_rows(sheet: &str) -> Self {
        Self::new(sheet, RowSpan::From(FIRST_DATA_ROW))
    }

    /// Exactly one row.
    pub fn row(sheet: &str, row: u32) -> Self {
        Self::new(sheet, RowSpan::Rows(row, row))
    }

    pub fn append_target(sheet: &str) -> Self {
        Self::new(sheet, RowSpan::All)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = column_letter(0);
        let last = column_letter(Field::COUNT - 1);
        write!(f, "{}!", quote_sheet_name(&self.sheet))?;
        match self.rows {
            RowSpan::All => write!(f, "{first}:{last}"),
            RowSpan::From(start) => write!(f, "{first}{start}:{last}"),
            RowSpan::Rows(start, end) => write!(f, "{first}{start}:{last}{end}"),
        }
    }
}

/// 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Sheet names that are not plain identifiers must be single-quoted,
/// with embedded quotes doubled.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}
