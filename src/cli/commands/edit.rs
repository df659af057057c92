use crate::cli::commands::{fail, open_client, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::core::form::RecordForm;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Update the record at a row with the given fields.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit { row, fields } = cmd {
        let form = RecordForm::from(fields);
        if form.is_empty() {
            info("No fields given, nothing to update.");
            return Ok(());
        }

        let pool = open_pool(cfg)?;

        let updated = open_client(cfg)
            .and_then(|client| EditLogic::apply(&client, *row, &form))
            .map_err(|e| {
                fail(
                    &pool,
                    "edit",
                    &row.to_string(),
                    "Failed to update record. Please try again.",
                    e,
                )
            })?;

        ttlog_quiet(
            &pool.conn,
            "edit",
            &row.to_string(),
            &format!("Updated record #{} ({})", updated.serial_number, updated.company),
        );
        success("Record updated successfully!");
    }

    Ok(())
}
