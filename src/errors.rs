//! Unified application error type.
//! All modules (db, core, sheets, auth, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::core::validation::FieldErrors;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local state database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Form validation
    // ---------------------------
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(FieldErrors),

    #[error("Invalid row position: {0} (data rows start at 2)")]
    InvalidRowPosition(u32),

    #[error("Invalid work mode: {0}")]
    InvalidWorkMode(String),

    // ---------------------------
    // Authorization
    // ---------------------------
    #[error("Authorization denied: {0}")]
    ConsentDenied(String),

    #[error("Authorization rejected by the server: {0}")]
    AuthRejected(String),

    // ---------------------------
    // Remote store
    // ---------------------------
    #[error("Remote error {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Transport(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True when the upstream refused the bearer token.
    pub fn is_auth_rejection(&self) -> bool {
        match self {
            AppError::AuthRejected(_) => true,
            AppError::Remote { status, code, .. } => *status == 401 || code == "UNAUTHENTICATED",
            _ => false,
        }
    }

    /// Network failures, quota exhaustion and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Transport(_) => true,
            AppError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn join_messages(errors: &FieldErrors) -> String {
    errors.values().cloned().collect::<Vec<_>>().join(", ")
}

pub type AppResult<T> = Result<T, AppError>;
