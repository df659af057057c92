pub mod client;
pub mod http;
pub mod range;
pub mod transport;

use crate::auth::session::AuthSession;
use crate::config::Config;
use crate::errors::AppResult;
use client::{RetryPolicy, SheetClient};
use http::HttpTransport;
use std::sync::Arc;
use std::time::Duration;

/// Build the HTTP-backed client described by the configuration.
pub fn http_client(cfg: &Config, session: Arc<AuthSession>) -> AppResult<SheetClient<HttpTransport>> {
    cfg.require_spreadsheet()?;
    let transport = HttpTransport::new(&cfg.api_base_url, &cfg.spreadsheet_id)?;
    Ok(SheetClient::new(transport, session, cfg.sheet_name.clone())
        .with_api_key(cfg.api_key.clone())
        .with_retry(RetryPolicy {
            max_retries: cfg.max_retries,
            base_delay: Duration::from_millis(cfg.retry_base_delay_ms),
        }))
}
