//! Form input for the create and edit views.

use crate::errors::{AppError, AppResult};
use crate::models::record::{Field, Record};
use crate::models::work_mode::WorkMode;

/// Values entered by the user. `None` means "not given": blank on create,
/// unchanged on edit. The serial number is never part of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub company: Option<String>,
    pub l1: Option<String>,
    pub l2: Option<String>,
    pub l3: Option<String>,
    pub mr: Option<String>,
    pub location: Option<String>,
    pub mode: Option<String>,
    pub details: Option<String>,
}

impl RecordForm {
    fn entries(&self) -> [(Field, Option<&String>); 8] {
        [
            (Field::Company, self.company.as_ref()),
            (Field::L1, self.l1.as_ref()),
            (Field::L2, self.l2.as_ref()),
            (Field::L3, self.l3.as_ref()),
            (Field::Mr, self.mr.as_ref()),
            (Field::Location, self.location.as_ref()),
            (Field::Mode, self.mode.as_ref()),
            (Field::Details, self.details.as_ref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_none())
    }

    /// Overlay the given values onto `record`.
    pub fn apply_to(&self, record: &mut Record) -> AppResult<()> {
        for (field, value) in self.entries() {
            let Some(value) = value else { continue };
            let value = if field == Field::Mode {
                normalize_mode(value)?
            } else {
                value.clone()
            };
            record.set(field, value);
        }
        Ok(())
    }

    /// A new, not yet stored record.
    pub fn to_record(&self) -> AppResult<Record> {
        let mut record = Record::default();
        self.apply_to(&mut record)?;
        Ok(record)
    }
}

/// Store the canonical label for a known mode; blank stays blank.
fn normalize_mode(value: &str) -> AppResult<String> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    WorkMode::from_code(value)
        .map(|m| m.label().to_string())
        .ok_or_else(|| {
            let accepted: Vec<&str> = WorkMode::ALL.iter().map(|m| m.label()).collect();
            AppError::InvalidWorkMode(format!(
                "'{}'. Use one of: {}",
                value,
                accepted.join(", ")
            ))
        })
}
