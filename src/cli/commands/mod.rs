//! Command handlers: the presentation layer over the sheet client.

pub mod add;
pub mod auth;
pub mod config;
pub mod del;
pub mod edit;
pub mod init;
pub mod init_sheet;
pub mod list;
pub mod log;
pub mod show;

use crate::auth::consent::LoopbackConsent;
use crate::auth::session::AuthSession;
use crate::auth::store::SqliteTokenStore;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::sheets;
use crate::sheets::client::SheetClient;
use crate::sheets::http::HttpTransport;
use crate::ui::messages::{error, warning};
use std::sync::Arc;

pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open_initialized(&cfg.state_db)
}

/// Session backed by the state database, so authorization survives restarts.
pub(crate) fn open_session(cfg: &Config) -> AppResult<Arc<AuthSession>> {
    let store = SqliteTokenStore::open(&cfg.state_db)?;
    let consent = LoopbackConsent::new(&cfg.client_id, &cfg.client_secret);
    Ok(Arc::new(AuthSession::restore(store, consent)?))
}

pub(crate) fn open_client(cfg: &Config) -> AppResult<SheetClient<HttpTransport>> {
    sheets::http_client(cfg, open_session(cfg)?)
}

/// Tell the user what failed in plain words, keep the details in the journal,
/// and hand the error back to the caller.
pub(crate) fn fail(
    pool: &DbPool,
    operation: &str,
    target: &str,
    friendly: &str,
    err: AppError,
) -> AppError {
    if let AppError::Validation(errors) = &err {
        for msg in errors.values() {
            error(msg);
        }
        error("Please fill in all required fields");
        ttlog_quiet(
            &pool.conn,
            &format!("{operation}_error"),
            target,
            &err.to_string(),
        );
        return err;
    }

    if err.is_auth_rejection() {
        warning("The stored authorization was rejected and has been cleared. Please try again.");
    }

    error(friendly);
    ttlog_quiet(
        &pool.conn,
        &format!("{operation}_error"),
        target,
        &err.to_string(),
    );
    err
}
