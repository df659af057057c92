use crate::cli::commands::{fail, open_pool, open_session};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle `login`, `logout` and `status`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let session = open_session(cfg)?;

    match cmd {
        Commands::Login => {
            if session.is_authenticated() {
                info("Using existing authorization (no login needed)");
                return Ok(());
            }

            session
                .authorize()
                .map_err(|e| fail(&pool, "login", "", "Authorization failed", e))?;

            ttlog_quiet(&pool.conn, "login", "", "OAuth token stored");
            success("Authorization saved; it will be reused until you log out");
        }
        Commands::Logout => {
            session.logout()?;
            ttlog_quiet(&pool.conn, "logout", "", "OAuth token cleared");
            success("Logged out - token cleared");
        }
        Commands::Status => {
            let state = if session.is_authenticated() {
                "Authenticated"
            } else {
                "Not authenticated"
            };
            let spreadsheet = if cfg.spreadsheet_id.is_empty() {
                "(not set)"
            } else {
                cfg.spreadsheet_id.as_str()
            };

            println!("🔐 Authorization : {}", state);
            println!("📄 Spreadsheet   : {}", spreadsheet);
            println!("📑 Sheet         : {}", cfg.sheet_name);
            println!("🗄️  State DB      : {}", cfg.state_db);
        }
        _ => {}
    }

    Ok(())
}
