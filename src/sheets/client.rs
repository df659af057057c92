//! Record-level operations over a sheet.
//!
//! Reads work without authorization (bearer token if one is held, API key
//! otherwise). Writes always authorize first. Any operation whose bearer
//! token is rejected clears the session before the error is returned.

use crate::auth::session::AuthSession;
use crate::auth::token::AccessToken;
use crate::core::codec::{decode, encode};
use crate::errors::{AppError, AppResult};
use crate::models::record::{FIRST_DATA_ROW, HEADER_ROW, Record};
use crate::sheets::range::SheetRange;
use crate::sheets::transport::{Credential, SheetsTransport, ValueInputMode, WriteRequest};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Bounded exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

pub struct SheetClient<T: SheetsTransport> {
    transport: T,
    session: Arc<AuthSession>,
    sheet: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    create_lock: Mutex<()>,
}

impl<T: SheetsTransport> SheetClient<T> {
    pub fn new(transport: T, session: Arc<AuthSession>, sheet: impl Into<String>) -> Self {
        Self {
            transport,
            session,
            sheet: sheet.into(),
            api_key: None,
            retry: RetryPolicy::default(),
            create_lock: Mutex::new(()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// All data rows in sheet order.
    pub fn list_records(&self) -> AppResult<Vec<Record>> {
        let range = SheetRange::data_rows(&self.sheet);
        let rows = self.read(&range)?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, row)| decode(row, index))
            .collect())
    }

    /// The record at `row_position`. A row without data decodes to a record
    /// whose fields are all empty.
    pub fn get_record(&self, row_position: u32) -> AppResult<Record> {
        check_row_position(row_position)?;
        let range = SheetRange::row(&self.sheet, row_position);
        let rows = self.read(&range)?;
        let cells: &[String] = rows.first().map(Vec::as_slice).unwrap_or(&[]);
        Ok(decode(cells, (row_position - FIRST_DATA_ROW) as usize))
    }

    /// Append a record. The serial number is `number of records + 1`, computed
    /// from a fresh read; concurrent creates in this process are serialized,
    /// creates from other processes can still collide.
    ///
    /// Not retried: a repeated append would add a duplicate row.
    pub fn create_record(&self, fields: &Record) -> AppResult<Record> {
        let _guard = self
            .create_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let token = self.session.authorize()?;
        let count = self.list_records()?.len();

        let record = Record {
            row_position: None,
            serial_number: (count + 1).to_string(),
            ..fields.clone()
        };

        let request =
            WriteRequest::single_row(SheetRange::append_target(&self.sheet), encode(&record));
        self.guarded(&token, |auth| self.transport.append_row(&request, auth))?;
        Ok(record)
    }

    /// Overwrite the row at `row_position` with `fields`, serial number included.
    pub fn update_record(&self, row_position: u32, fields: &Record) -> AppResult<()> {
        check_row_position(row_position)?;
        let token = self.session.authorize()?;
        let request =
            WriteRequest::single_row(SheetRange::row(&self.sheet, row_position), encode(fields));
        self.with_retry_loop(|| {
            self.guarded(&token, |auth| self.transport.write_range(&request, auth))
        })
    }

    /// Clear the values at `row_position`. The row itself stays, so the
    /// positions of later records do not shift.
    pub fn delete_record(&self, row_position: u32) -> AppResult<()> {
        check_row_position(row_position)?;
        let token = self.session.authorize()?;
        let range = SheetRange::row(&self.sheet, row_position);
        self.with_retry_loop(|| {
            self.guarded(&token, |auth| self.transport.clear_range(&range, auth))
        })
    }

    /// Write the column titles into the header row, verbatim.
    pub fn initialize_sheet(&self) -> AppResult<()> {
        let token = self.session.authorize()?;
        let header = HEADER_ROW.iter().map(|s| s.to_string()).collect();
        let request = WriteRequest {
            input_mode: ValueInputMode::Raw,
            ..WriteRequest::single_row(SheetRange::row(&self.sheet, 1), header)
        };
        self.with_retry_loop(|| {
            self.guarded(&token, |auth| self.transport.write_range(&request, auth))
        })
    }

    fn read(&self, range: &SheetRange) -> AppResult<Vec<Vec<String>>> {
        self.with_retry_loop(|| match self.session.current_token() {
            Some(token) => self.guarded(&token, |auth| self.transport.read_range(range, auth)),
            None => {
                let auth = match &self.api_key {
                    Some(key) => Credential::ApiKey(key),
                    None => Credential::None,
                };
                self.transport.read_range(range, auth)
            }
        })
    }

    /// Run a bearer-authenticated call; on rejection, drop the token first.
    fn guarded<R>(
        &self,
        token: &AccessToken,
        call: impl FnOnce(Credential<'_>) -> AppResult<R>,
    ) -> AppResult<R> {
        match call(Credential::Bearer(token)) {
            Err(e) if e.is_auth_rejection() => {
                self.session.invalidate_token(token)?;
                Err(AppError::AuthRejected(match e {
                    AppError::AuthRejected(msg) => msg,
                    other => other.to_string(),
                }))
            }
            other => other,
        }
    }

    fn with_retry_loop<R>(&self, mut call: impl FnMut() -> AppResult<R>) -> AppResult<R> {
        let mut attempt = 0;
        loop {
            match call() {
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    thread::sleep(self.retry.delay_for(attempt));
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

fn check_row_position(row_position: u32) -> AppResult<()> {
    if row_position < FIRST_DATA_ROW {
        return Err(AppError::InvalidRowPosition(row_position));
    }
    Ok(())
}
