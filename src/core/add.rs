use crate::core::form::RecordForm;
use crate::core::validation::{REQUIRED_FIELDS, is_valid, validate};
use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use crate::sheets::client::SheetClient;
use crate::sheets::transport::SheetsTransport;

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    /// Build the record from the form and validate it. Purely local.
    pub fn prepare(form: &RecordForm) -> AppResult<Record> {
        let record = form.to_record()?;

        let errors = validate(&record, &REQUIRED_FIELDS);
        if !is_valid(&errors) {
            return Err(AppError::Validation(errors));
        }

        Ok(record)
    }

    /// Append a prepared record; returns it with its assigned serial number.
    pub fn submit<T: SheetsTransport>(
        client: &SheetClient<T>,
        record: &Record,
    ) -> AppResult<Record> {
        client.create_record(record)
    }

    pub fn apply<T: SheetsTransport>(
        client: &SheetClient<T>,
        form: &RecordForm,
    ) -> AppResult<Record> {
        let record = Self::prepare(form)?;
        Self::submit(client, &record)
    }
}
