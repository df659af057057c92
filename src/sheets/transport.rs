//! The four verbs the remote store exposes, independent of HTTP.

use crate::auth::token::AccessToken;
use crate::errors::AppResult;
use crate::sheets::range::SheetRange;

/// How the request is authenticated.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Low-privilege key, enough for reads of a shared sheet.
    ApiKey(&'a str),
    Bearer(&'a AccessToken),
    None,
}

/// How the store interprets written cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueInputMode {
    /// Parsed as if typed by a user (numbers, dates, formulas).
    #[default]
    UserEntered,
    /// Stored verbatim.
    Raw,
}

impl ValueInputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputMode::UserEntered => "USER_ENTERED",
            ValueInputMode::Raw => "RAW",
        }
    }
}

/// Payload of an append or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub range: SheetRange,
    pub input_mode: ValueInputMode,
    pub values: Vec<Vec<String>>,
}

impl WriteRequest {
    pub fn single_row(range: SheetRange, row: Vec<String>) -> Self {
        Self {
            range,
            input_mode: ValueInputMode::default(),
            values: vec![row],
        }
    }
}

pub trait SheetsTransport {
    /// Rows in the range, top to bottom. Trailing empty cells and trailing
    /// empty rows may be omitted by the store.
    fn read_range(&self, range: &SheetRange, auth: Credential<'_>)
    -> AppResult<Vec<Vec<String>>>;

    /// Append after the last row holding data within the range.
    fn append_row(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()>;

    /// Overwrite the cells of the range.
    fn write_range(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()>;

    /// Clear the cell values of the range; the rows stay in place.
    fn clear_range(&self, range: &SheetRange, auth: Credential<'_>) -> AppResult<()>;
}

impl<T: SheetsTransport + ?Sized> SheetsTransport for &T {
    fn read_range(
        &self,
        range: &SheetRange,
        auth: Credential<'_>,
    ) -> AppResult<Vec<Vec<String>>> {
        (**self).read_range(range, auth)
    }

    fn append_row(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        (**self).append_row(request, auth)
    }

    fn write_range(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        (**self).write_range(request, auth)
    }

    fn clear_range(&self, range: &SheetRange, auth: Credential<'_>) -> AppResult<()> {
        (**self).clear_range(range, auth)
    }
}
