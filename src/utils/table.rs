//! Table rendering utilities for CLI outputs.

use crate::utils::formatting::{pad_right, truncate};
use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    /// Upper bound for the column; cells wider than this are truncated.
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Column widths: the widest cell (or header), capped at `max_width`.
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| UnicodeWidthStr::width(c.as_str()))
                    .max()
                    .unwrap_or(0)
                    .max(UnicodeWidthStr::width(col.header.as_str()));
                widest.min(col.max_width)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        for (col, width) in self.columns.iter().zip(&widths) {
            out.push_str(&pad_right(&truncate(&col.header, *width), *width));
            out.push_str("  ");
        }
        out.push('\n');

        for width in &widths {
            out.push_str(&"-".repeat(*width));
            out.push_str("  ");
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad_right(&truncate(cell, *width), *width));
                out.push_str("  ");
            }
            out.push('\n');
        }

        out
    }
}
