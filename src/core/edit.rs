use crate::core::form::RecordForm;
use crate::core::validation::{REQUIRED_FIELDS, is_valid, validate};
use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use crate::sheets::client::SheetClient;
use crate::sheets::transport::SheetsTransport;

/// High-level business logic for the `edit` command.
pub struct EditLogic;

impl EditLogic {
    /// Fetch the stored record, overlay the form, validate and write it back.
    /// The serial number is carried through unchanged.
    pub fn apply<T: SheetsTransport>(
        client: &SheetClient<T>,
        row_position: u32,
        form: &RecordForm,
    ) -> AppResult<Record> {
        let mut record = client.get_record(row_position)?;
        form.apply_to(&mut record)?;

        let errors = validate(&record, &REQUIRED_FIELDS);
        if !is_valid(&errors) {
            return Err(AppError::Validation(errors));
        }

        client.update_record(row_position, &record)?;
        Ok(record)
    }
}
