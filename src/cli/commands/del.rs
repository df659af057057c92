use crate::cli::commands::{fail, open_client, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::del::DeleteLogic;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { row, yes } = cmd {
        let pool = open_pool(cfg)?;
        let target = row.to_string();

        let client = open_client(cfg)
            .map_err(|e| fail(&pool, "del", &target, "Failed to delete record", e))?;

        //
        // Confirmation prompt
        //
        if !*yes {
            let record = DeleteLogic::preview(&client, *row)
                .map_err(|e| fail(&pool, "del", &target, "Failed to fetch record", e))?;

            let prompt = if record.is_blank() {
                format!("Row {} is already empty. Clear it anyway?", row)
            } else {
                format!(
                    "Delete the record for \"{}\" (row {})? This action is irreversible.",
                    record.company, row
                )
            };

            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
        }

        //
        // Execute deletion
        //
        DeleteLogic::apply(&client, *row)
            .map_err(|e| fail(&pool, "del", &target, "Failed to delete record", e))?;

        ttlog_quiet(&pool.conn, "del", &target, &format!("Cleared row {}", row));
        success("Record deleted successfully");
    }

    Ok(())
}
