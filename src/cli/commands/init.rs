use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite state database and its migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing rsheetcrud…");

    cfg.init_all(cli.test)?;

    let pool = DbPool::open_initialized(&cfg.state_db)?;
    println!("✅ State database initialized at {}", &cfg.state_db);

    ttlog_quiet(
        &pool.conn,
        "init",
        "State initialized",
        &format!("State database initialized at {}", &cfg.state_db),
    );

    println!("🎉 rsheetcrud initialization completed!");
    println!("   Next: set spreadsheet_id and client_id in {}", Config::config_file().display());
    Ok(())
}
