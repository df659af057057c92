use crate::cli::commands::{fail, open_client, open_pool};
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::record::HEADER_ROW;
use crate::ui::messages::success;

/// Write the column titles into row 1 of the configured sheet.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    open_client(cfg)
        .and_then(|client| client.initialize_sheet())
        .map_err(|e| {
            fail(
                &pool,
                "init-sheet",
                &cfg.sheet_name,
                "Failed to initialize the sheet header",
                e,
            )
        })?;

    ttlog_quiet(
        &pool.conn,
        "init-sheet",
        &cfg.sheet_name,
        &format!("Header row written: {}", HEADER_ROW.join(", ")),
    );
    success(format!("Header row written to {}", cfg.sheet_name));
    Ok(())
}
