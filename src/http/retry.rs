//! Classification of failed page requests into the fetch loop's error taxonomy.

use reqwest::StatusCode;
use std::fmt;

/// Why a single page request failed.
///
/// The fetch loop matches on this exhaustively to decide between retrying,
/// stopping with partial results and aborting.
#[derive(Debug)]
pub enum PageError {
    /// The requested user does not exist (HTTP 404)
    NotFound,
    /// Rate limit exhausted (HTTP 403 or 429). `reset` is the epoch second
    /// at which the quota refills, when the response reported one.
    QuotaExhausted { reset: Option<u64> },
    /// Transient server-side failure (HTTP 5xx)
    Server { status: u16 },
    /// Anything else: other client errors, connection failures, bad bodies
    Unexpected(anyhow::Error),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotFound => write!(f, "Not found"),
            PageError::QuotaExhausted { reset: Some(reset) } => {
                write!(f, "Rate limit exceeded, resets at epoch {}", reset)
            }
            PageError::QuotaExhausted { reset: None } => {
                write!(f, "Rate limit exceeded, reset time unknown")
            }
            PageError::Server { status } => write!(f, "Server error (HTTP {})", status),
            PageError::Unexpected(e) => write!(f, "Request error: {:#}", e),
        }
    }
}

impl std::error::Error for PageError {}

/// Classifies a response status.
/// Returns `None` for success statuses, the matching [`PageError`] otherwise.
pub fn classify_status(status: StatusCode, reset: Option<u64>) -> Option<PageError> {
    if status.is_success() {
        return None;
    }

    let error = match status {
        StatusCode::NOT_FOUND => PageError::NotFound,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            PageError::QuotaExhausted { reset }
        }
        s if s.is_server_error() => PageError::Server { status: s.as_u16() },
        s => PageError::Unexpected(anyhow::anyhow!(
            "Unexpected HTTP {} response from GitHub API",
            s.as_u16()
        )),
    };

    Some(error)
}

/// Classifies a transport-level error (no usable response).
/// Connection failures are not retried; only HTTP statuses drive retries.
pub fn classify_error(error: reqwest::Error) -> PageError {
    match error.status() {
        Some(status) => {
            classify_status(status, None).unwrap_or_else(|| PageError::Unexpected(error.into()))
        }
        None => PageError::Unexpected(
            anyhow::Error::from(error).context("Failed to send request to GitHub API"),
        ),
    }
}
