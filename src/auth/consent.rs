//! Interactive OAuth consent (installed-application flow).
//!
//! The user opens an authorization URL in a browser; Google redirects to a
//! listener on 127.0.0.1 with an authorization code, which is exchanged for
//! an access token at the token endpoint.

use crate::auth::token::AccessToken;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// How long the browser has to come back with the redirect.
const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

const PAGE_DONE: &str = "<html><body><p>Authorization complete. You can close this tab.</p></body></html>";
const PAGE_FAILED: &str = "<html><body><p>Authorization failed. You can close this tab.</p></body></html>";
const PAGE_NOT_FOUND: &str = "<html><body><p>Not found.</p></body></html>";

/// Produces a fresh token, usually by asking the user.
pub trait ConsentFlow: Send + Sync {
    fn request_token(&self) -> AppResult<AccessToken>;
}

pub struct LoopbackConsent {
    client_id: String,
    client_secret: String,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl LoopbackConsent {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
        }
    }

    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> AppResult<Url> {
        let mut url = Url::parse(AUTH_ENDPOINT).map_err(|e| AppError::Other(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SPREADSHEETS_SCOPE)
            .append_pair("prompt", "consent")
            .append_pair("state", state);
        Ok(url)
    }

    fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<AccessToken> {
        let response = self.agent.post(TOKEN_ENDPOINT).send_form(&[
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ]);

        let body = match response {
            Ok(resp) => resp.into_string()?,
            Err(ureq::Error::Status(_, resp)) => resp.into_string().unwrap_or_default(),
            Err(ureq::Error::Transport(err)) => return Err(AppError::Transport(err.to_string())),
        };

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::ConsentDenied(format!("invalid token response: {e}")))?;

        match parsed.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(AppError::ConsentDenied(
                parsed
                    .error_description
                    .or(parsed.error)
                    .unwrap_or_else(|| "token endpoint returned no access token".to_string()),
            )),
        }
    }
}

impl ConsentFlow for LoopbackConsent {
    fn request_token(&self) -> AppResult<AccessToken> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::Config(
                "client_id is not set (edit the config file or set RSHEETCRUD_CLIENT_ID)"
                    .to_string(),
            ));
        }

        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());
        let state = consent_state()?;
        let url = self.authorization_url(&redirect_uri, &state)?;

        info("Open this URL in your browser to authorize access to the sheet:");
        println!("{url}");

        let code = receive_redirect(listener, &state, CONSENT_TIMEOUT)?;
        let token = self.exchange_code(&code, &redirect_uri)?;
        success("Authorization granted");
        Ok(token)
    }
}

/// Extract the authorization code from the redirect target
/// (`/?state=..&code=..`).
///
/// `Ok(None)` means the request is not an OAuth redirect at all.
pub fn parse_redirect(target: &str, expected_state: &str) -> AppResult<Option<String>> {
    let url = Url::parse(&format!("http://127.0.0.1{target}"))
        .map_err(|e| AppError::ConsentDenied(format!("malformed redirect: {e}")))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AppError::ConsentDenied(error));
    }
    let Some(code) = code else {
        return Ok(None);
    };
    if state.as_deref() != Some(expected_state) {
        return Err(AppError::ConsentDenied("state mismatch".to_string()));
    }
    Ok(Some(code))
}

struct RedirectState {
    expected: String,
    outcome: Mutex<Option<oneshot::Sender<AppResult<String>>>>,
}

impl RedirectState {
    /// Only the first redirect counts; later ones find the sender gone.
    fn deliver(&self, result: AppResult<String>) {
        let sender = self
            .outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender {
            let _ = sender.send(result);
        }
    }
}

async fn redirect_handler(
    State(shared): State<Arc<RedirectState>>,
    uri: Uri,
) -> (StatusCode, Html<&'static str>) {
    let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    match parse_redirect(target, &shared.expected) {
        Ok(Some(code)) => {
            shared.deliver(Ok(code));
            (StatusCode::OK, Html(PAGE_DONE))
        }
        Ok(None) => (StatusCode::NOT_FOUND, Html(PAGE_NOT_FOUND)),
        Err(e) => {
            shared.deliver(Err(e));
            (StatusCode::OK, Html(PAGE_FAILED))
        }
    }
}

/// Serve the redirect URI on `listener` until the OAuth redirect arrives,
/// then return its authorization code. Unrelated requests get a 404.
pub fn receive_redirect(
    listener: TcpListener,
    expected_state: &str,
    timeout: Duration,
) -> AppResult<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Other(format!("failed to start runtime: {e}")))?;
    runtime.block_on(serve_redirect(listener, expected_state, timeout))
}

async fn serve_redirect(
    listener: TcpListener,
    expected_state: &str,
    timeout: Duration,
) -> AppResult<String> {
    listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(listener)?;

    let (outcome_tx, outcome_rx) = oneshot::channel();
    let shared = Arc::new(RedirectState {
        expected: expected_state.to_string(),
        outcome: Mutex::new(Some(outcome_tx)),
    });
    let app = Router::new()
        .route("/", get(redirect_handler))
        .with_state(shared);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = match tokio::time::timeout(timeout, outcome_rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) | Err(_) => Err(AppError::ConsentDenied(
            "no authorization response received".to_string(),
        )),
    };

    // let the browser receive its page before the listener goes away
    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(Duration::from_secs(5), server).await;
    outcome
}

/// Unguessable `state` value binding the redirect to this consent request.
pub fn consent_state() -> AppResult<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|e| AppError::Other(format!("failed to generate consent state: {e}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
