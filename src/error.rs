//! Error types for folio.

use std::io;

/// Errors produced by the data store and the terminal driver.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}")]
    Api { status: u16 },

    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("no portfolio data available")]
    NoDocument,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FolioError>;
