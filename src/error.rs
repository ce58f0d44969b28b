//! Error taxonomy shared by every component.
//!
//! Component functions return `Result<T, TriageError>`; the binary maps
//! any error to `error: <message>` on stderr and exit status 1.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

/// Classes of remote API failure. Only rate limits and transient
/// failures are worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Auth,
    NotFound,
    RateLimited,
    Transient,
    Other,
}

impl ApiErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ApiErrorKind::Auth => "authentication failed",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::RateLimited => "rate limit exhausted",
            ApiErrorKind::Transient => "transient failure",
            ApiErrorKind::Other => "unexpected response",
        }
    }
}

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no cached data at {}", .0.display())]
    CacheMiss(PathBuf),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("GitHub API: {} ({message})", .kind.label())]
    RemoteApi { kind: ApiErrorKind, message: String },

    #[error("ownership manifest: {0}")]
    Manifest(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriageError {
    pub fn api(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        TriageError::RemoteApi {
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TriageError::RemoteApi {
                kind: ApiErrorKind::RateLimited | ApiErrorKind::Transient,
                ..
            }
        )
    }
}
