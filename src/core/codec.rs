//! Row <-> Record conversion.
//!
//! The sheet stores a record as 9 positional cells; the rest of the crate works
//! with named fields. Both directions are total: missing cells decode to the
//! empty string and every field encodes to exactly one cell.

use crate::models::record::{Field, HEADER_ROWS, Record};

/// Decode the cells of one data row.
///
/// `physical_index` is the 0-based position of the row among the data rows
/// (the header excluded). The resulting `row_position` is the 1-based sheet
/// row, i.e. `physical_index + HEADER_ROWS + 1`.
pub fn decode<S: AsRef<str>>(fields: &[S], physical_index: usize) -> Record {
    let mut record = Record {
        row_position: Some(physical_index as u32 + HEADER_ROWS + 1),
        ..Record::default()
    };

    for field in Field::ALL {
        if let Some(cell) = fields.get(field.index()) {
            record.set(field, cell.as_ref());
        }
    }

    record
}

/// Encode a record into the 9 cells written to the sheet.
/// `row_position` is addressing, not payload, and is not encoded.
pub fn encode(record: &Record) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|f| record.get(*f).to_string())
        .collect()
}
