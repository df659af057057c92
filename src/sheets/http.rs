//! Google Sheets API v4 transport over `ureq`.

use crate::errors::{AppError, AppResult};
use crate::sheets::range::SheetRange;
use crate::sheets::transport::{Credential, SheetsTransport, WriteRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";

pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: Url,
    spreadsheet_id: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct ValuesBody<'a> {
    range: String,
    #[serde(rename = "majorDimension")]
    major_dimension: &'a str,
    values: &'a [Vec<String>],
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: RemoteErrorBody,
}

#[derive(Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, spreadsheet_id: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid api_base_url '{base_url}': {e}")))?;
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build();
        Ok(Self {
            agent,
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    /// `<base>/spreadsheets/<id>/values/<range><suffix>`
    fn values_url(&self, range: &SheetRange, suffix: &str) -> AppResult<Url> {
        let target = format!("{range}{suffix}");
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("api_base_url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                target.as_str(),
            ]);
        Ok(url)
    }

    fn request(&self, method: &str, mut url: Url, auth: Credential<'_>) -> ureq::Request {
        if let Credential::ApiKey(key) = auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        let mut request = self
            .agent
            .request(method, url.as_str())
            .set("Accept", "application/json");
        if let Credential::Bearer(token) = auth {
            request = request.set("Authorization", &format!("Bearer {}", token.secret()));
        }
        request
    }

    fn send_values(
        &self,
        method: &str,
        url: Url,
        request: &WriteRequest,
        auth: Credential<'_>,
    ) -> AppResult<()> {
        let body = ValuesBody {
            range: request.range.to_string(),
            major_dimension: "ROWS",
            values: &request.values,
        };
        let payload = serde_json::to_string(&body)
            .map_err(|e| AppError::Other(format!("failed to encode request json: {e}")))?;

        let response = self
            .request(method, url, auth)
            .query("valueInputOption", request.input_mode.as_str())
            .set("Content-Type", "application/json")
            .send_string(&payload);
        check_response(response).map(|_| ())
    }
}

impl SheetsTransport for HttpTransport {
    fn read_range(
        &self,
        range: &SheetRange,
        auth: Credential<'_>,
    ) -> AppResult<Vec<Vec<String>>> {
        let url = self.values_url(range, "")?;
        let response = check_response(self.request("GET", url, auth).call())?;
        let body = response
            .into_string()
            .map_err(|e| AppError::Transport(format!("failed to read response body: {e}")))?;
        let parsed: ValueRange = serde_json::from_str(&body)
            .map_err(|e| AppError::Other(format!("invalid response json: {e}")))?;

        Ok(parsed
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn append_row(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        let mut url = self.values_url(&request.range, ":append")?;
        url.query_pairs_mut()
            .append_pair("insertDataOption", "INSERT_ROWS");
        self.send_values("POST", url, request, auth)
    }

    fn write_range(&self, request: &WriteRequest, auth: Credential<'_>) -> AppResult<()> {
        let url = self.values_url(&request.range, "")?;
        self.send_values("PUT", url, request, auth)
    }

    fn clear_range(&self, range: &SheetRange, auth: Credential<'_>) -> AppResult<()> {
        let url = self.values_url(range, ":clear")?;
        let response = self
            .request("POST", url, auth)
            .set("Content-Type", "application/json")
            .send_string("{}");
        check_response(response).map(|_| ())
    }
}

fn check_response(
    response: Result<ureq::Response, ureq::Error>,
) -> AppResult<ureq::Response> {
    match response {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(code, resp)),
        Err(ureq::Error::Transport(err)) => Err(AppError::Transport(err.to_string())),
    }
}

fn parse_error_response(status: u16, response: ureq::Response) -> AppError {
    let body = response.into_string().unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => (envelope.error.status, envelope.error.message),
        Err(_) => (String::new(), format!("remote error status {status}")),
    };
    error_from_status(status, code, message)
}

/// Map an upstream status to the error taxonomy.
pub fn error_from_status(status: u16, code: String, message: String) -> AppError {
    if status == 401 || code == "UNAUTHENTICATED" {
        return AppError::AuthRejected(message);
    }
    let code = if code.is_empty() {
        status.to_string()
    } else {
        code
    };
    AppError::Remote {
        status,
        code,
        message,
    }
}

/// Formatted values come back as strings; anything else is rendered as text.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
