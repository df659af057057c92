use crate::errors::AppResult;
use crate::models::record::Record;
use crate::sheets::client::SheetClient;
use crate::sheets::transport::SheetsTransport;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Record about to be deleted, for the confirmation prompt.
    pub fn preview<T: SheetsTransport>(
        client: &SheetClient<T>,
        row_position: u32,
    ) -> AppResult<Record> {
        client.get_record(row_position)
    }

    /// Clear the row. Later rows keep their positions.
    pub fn apply<T: SheetsTransport>(client: &SheetClient<T>, row_position: u32) -> AppResult<()> {
        client.delete_record(row_position)
    }
}
