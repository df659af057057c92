use crate::cli::commands::{fail, open_client, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::core::form::RecordForm;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Create a new record.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { fields } = cmd {
        let pool = open_pool(cfg)?;
        let form = RecordForm::from(fields);

        //
        // 1. Validate locally, before anything touches the network
        //
        let record = AddLogic::prepare(&form)
            .map_err(|e| fail(&pool, "add", "", "Failed to create record", e))?;

        //
        // 2. Append
        //
        let created = open_client(cfg)
            .and_then(|client| AddLogic::submit(&client, &record))
            .map_err(|e| {
                fail(
                    &pool,
                    "add",
                    &record.company,
                    "Failed to create record. Please try again.",
                    e,
                )
            })?;

        ttlog_quiet(
            &pool.conn,
            "add",
            &format!("#{}", created.serial_number),
            &format!("Created record for {}", created.company),
        );
        success(format!(
            "Record #{} created successfully!",
            created.serial_number
        ));
    }

    Ok(())
}
