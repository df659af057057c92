#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rsheetcrud::auth::consent::ConsentFlow;
use rsheetcrud::auth::session::AuthSession;
use rsheetcrud::auth::store::{MemoryTokenStore, TokenStore};
use rsheetcrud::auth::token::AccessToken;
use rsheetcrud::errors::{AppError, AppResult};
use rsheetcrud::models::record::HEADER_ROW;
use rsheetcrud::sheets::client::{RetryPolicy, SheetClient};
use rsheetcrud::sheets::http::error_from_status;
use rsheetcrud::sheets::range::{RowSpan, SheetRange};
use rsheetcrud::sheets::transport::{Credential, SheetsTransport, ValueInputMode, WriteRequest};
use axum::Json;
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub fn rsc() -> Command {
    cargo_bin_cmd!("rsheetcrud")
}

/// Fresh, empty directory used as HOME for one CLI test.
pub fn temp_home(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rsheetcrud_test_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp home");
    path
}

/// Unique state database path inside the system temp dir.
pub fn temp_state_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rsheetcrud.sqlite", name));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Which credential a transport call carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    ApiKey(String),
    Bearer(String),
    None,
}

impl From<Credential<'_>> for Seen {
    fn from(c: Credential<'_>) -> Self {
        match c {
            Credential::ApiKey(k) => Seen::ApiKey(k.to_string()),
            Credential::Bearer(t) => Seen::Bearer(t.secret().to_string()),
            Credential::None => Seen::None,
        }
    }
}

/// In-memory sheet behaving like the remote store: row 1 is the header,
/// trailing empty cells and trailing empty rows are not returned by reads,
/// appends land after the last row holding data.
#[derive(Default)]
pub struct MemorySheet {
    pub rows: Mutex<Vec<Vec<String>>>,
    /// (verb, credential) of every call, in order.
    pub calls: Mutex<Vec<(String, Seen)>>,
    /// Input mode of every append and write, in order.
    pub input_modes: Mutex<Vec<ValueInputMode>>,
    /// Upstream failures (verb, status, code) returned by the next calls;
    /// a `None` verb matches any call.
    pub failures: Mutex<VecDeque<(Option<String>, u16, String)>>,
}

impl MemorySheet {
    pub fn with_header() -> Self {
        let sheet = Self::default();
        sheet
            .rows
            .lock()
            .unwrap()
            .push(HEADER_ROW.iter().map(|s| s.to_string()).collect());
        sheet
    }

    pub fn with_records(records: &[&[&str]]) -> Self {
        let sheet = Self::with_header();
        {
            let mut rows = sheet.rows.lock().unwrap();
            for r in records {
                rows.push(r.iter().map(|s| s.to_string()).collect());
            }
        }
        sheet
    }

    pub fn fail_next(&self, status: u16, code: &str) {
        self.failures
            .lock()
            .unwrap()
            .push_back((None, status, code.to_string()));
    }

    /// Fail the next call of `verb` only; other verbs pass through.
    pub fn fail_next_on(&self, verb: &str, status: u16, code: &str) {
        self.failures
            .lock()
            .unwrap()
            .push_back((Some(verb.to_string()), status, code.to_string()));
    }

    pub fn row(&self, position: u32) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .get(position as usize - 1)
            .cloned()
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn calls_of(&self, verb: &str) -> Vec<Seen> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(v, _)| v == verb)
            .map(|(_, s)| s.clone())
            .collect()
    }

    fn enter(&self, verb: &str, auth: Credential<'_>) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((verb.to_string(), Seen::from(auth)));
        let mut failures = self.failures.lock().unwrap();
        let hit = failures
            .front()
            .is_some_and(|(v, _, _)| v.as_deref().is_none_or(|v| v == verb));
        if !hit {
            return Ok(());
        }
        match failures.pop_front() {
            Some((_, status, code)) => Err(error_from_status(
                status,
                code,
                format!("injected {status}"),
            )),
            None => Ok(()),
        }
    }

    fn bounds(range: &SheetRange, len: usize) -> (usize, usize) {
        match range.rows {
            RowSpan::All => (1, len),
            RowSpan::From(start) => (start as usize, len),
            RowSpan::Rows(start, end) => (start as usize, end as usize),
        }
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.is_empty())
}

fn trim_cells(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

impl SheetsTransport for MemorySheet {
    fn read_range(
        &self,
        range: &SheetRange,
        auth: Credential<'_>,
    ) -> AppResult<Vec<Vec<String>>> {
        self.enter("read", auth)?;
        let rows = self.rows.lock().unwrap();
        let (start, end) = Self::bounds(range, rows.len());

        let mut out: Vec<Vec<String>> = (start..=end)
            .filter_map(|pos| rows.get(pos - 1))
            .map(|r| trim_cells(r.clone()))
            .collect();
        while out.last().is_some_and(|r| r.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    fn append_row(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        self.enter("append", auth)?;
        self.input_modes.lock().unwrap().push(request.input_mode);
        let mut rows = self.rows.lock().unwrap();
        while rows.last().is_some_and(|r| is_blank(r)) {
            rows.pop();
        }
        rows.extend(request.values.iter().cloned());
        Ok(())
    }

    fn write_range(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        self.enter("write", auth)?;
        self.input_modes.lock().unwrap().push(request.input_mode);
        let mut rows = self.rows.lock().unwrap();
        let (start, _) = Self::bounds(&request.range, rows.len());
        for (offset, values) in request.values.iter().enumerate() {
            let index = start - 1 + offset;
            if rows.len() <= index {
                rows.resize(index + 1, Vec::new());
            }
            rows[index] = values.clone();
        }
        Ok(())
    }

    fn clear_range(&self, range: &SheetRange, auth: Credential<'_>) -> AppResult<()> {
        self.enter("clear", auth)?;
        let mut rows = self.rows.lock().unwrap();
        let (start, end) = Self::bounds(range, rows.len());
        for pos in start..=end {
            if let Some(row) = rows.get_mut(pos - 1) {
                for cell in row.iter_mut() {
                    cell.clear();
                }
            }
        }
        Ok(())
    }
}

/// Consent flow that grants (or denies) without any user interaction and
/// counts how often it was asked.
pub struct CountingConsent {
    pub calls: Arc<AtomicUsize>,
    pub grant: Option<String>,
}

impl CountingConsent {
    pub fn granting(token: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                grant: Some(token.to_string()),
            },
            calls,
        )
    }

    pub fn denying() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                grant: None,
            },
            calls,
        )
    }
}

impl ConsentFlow for CountingConsent {
    fn request_token(&self) -> AppResult<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.grant {
            Some(t) => Ok(AccessToken::new(t.clone())),
            None => Err(AppError::ConsentDenied("access_denied".to_string())),
        }
    }
}

/// Store shared between a session and the test body.
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<MemoryTokenStore>);

impl TokenStore for SharedStore {
    fn load(&self) -> AppResult<Option<AccessToken>> {
        self.0.load()
    }
    fn save(&self, token: &AccessToken) -> AppResult<()> {
        self.0.save(token)
    }
    fn clear(&self) -> AppResult<()> {
        self.0.clear()
    }
}

/// Client over `sheet` with no retry delay; returns the consent counter too.
pub fn client_for<'a>(
    sheet: &'a MemorySheet,
    persisted: Option<&str>,
) -> (SheetClient<&'a MemorySheet>, Arc<AtomicUsize>) {
    let store = match persisted {
        Some(t) => MemoryTokenStore::with_token(AccessToken::new(t)),
        None => MemoryTokenStore::default(),
    };
    let (consent, calls) = CountingConsent::granting("fresh-token");
    let session = Arc::new(AuthSession::restore(store, consent).expect("session"));
    let client = SheetClient::new(sheet, session, "Sheet1").with_retry(RetryPolicy {
        max_retries: 2,
        base_delay: Duration::ZERO,
    });
    (client, calls)
}

/// Stand-in for the Sheets HTTP API answering every request with `body`.
/// Returns the base URL to put in `api_base_url`; the server lives until the
/// test process exits.
pub fn fake_sheets_api(body: Value) -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind fake api");
    let base = format!("http://127.0.0.1:{}/v4", listener.local_addr().unwrap().port());
    listener.set_nonblocking(true).unwrap();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("fake api listener");
            let app = Router::new().fallback(move || {
                let body = body.clone();
                async move { Json(body) }
            });
            axum::serve(listener, app).await.ok();
        });
    });

    base
}

/// Write a config file into `home` the way `init` + `config --edit` would.
pub fn write_config(home: &std::path::Path, yaml: &str) {
    let dir = home.join(".rsheetcrud");
    fs::create_dir_all(&dir).expect("create config dir");
    fs::write(dir.join("rsheetcrud.conf"), yaml).expect("write config");
}
