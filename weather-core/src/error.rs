//! Errors raised while talking to the weather backend.

use reqwest::StatusCode;
use thiserror::Error;

use crate::locale::Locale;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Giving up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    pub(crate) fn http(status: StatusCode, body: &str) -> Self {
        Self::Http {
            status,
            body: truncate_body(body),
        }
    }

    /// Transport failures and bad statuses may clear up on their own.
    /// A body that failed to parse will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }

    /// The error behind any retry wrapping.
    pub fn root(&self) -> &FetchError {
        match self {
            Self::Exhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// Generic text shown to the user for a failed load. Details go to the log.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        locale.load_failed()
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
