//! Tagged result of one call to the vision model.

use std::fmt;

/// Exactly one of these is produced per [`crate::ai::VisionClient::analyze`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Generated text, passed through untouched.
    Success(String),
    /// 2xx response without usable text.
    EmptyOrUnparsable,
    /// HTTP 429.
    RateLimited,
    /// HTTP 404: the configured model ID is unknown to the provider.
    ModelNotFound,
    /// Any other non-2xx status.
    TransportError { status: u16, body: String },
    /// The request never produced an HTTP status (connect, timeout, body read).
    ClientException(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Rate limits and server-side failures may clear up on their own.
    /// `ModelNotFound` never does with the same model ID.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::TransportError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(_) => write!(f, "success"),
            Self::EmptyOrUnparsable => write!(f, "empty or unparsable response"),
            Self::RateLimited => write!(f, "rate limited (429)"),
            Self::ModelNotFound => write!(f, "model not found (404)"),
            Self::TransportError { status, .. } => write!(f, "HTTP error {}", status),
            Self::ClientException(message) => write!(f, "client exception: {}", message),
        }
    }
}

/// Maps a received HTTP response onto an [`Outcome`].
///
/// `extract_text` is only consulted for 2xx bodies and returns `None` when the
/// provider-specific text field is missing. Blank text counts as missing.
pub fn classify<F>(status: u16, body: String, extract_text: F) -> Outcome
where
    F: FnOnce(&str) -> Option<String>,
{
    match status {
        200..=299 => match extract_text(&body) {
            Some(text) if !text.trim().is_empty() => Outcome::Success(text),
            _ => {
                tracing::warn!("Response had no usable text: {}", truncate(&body, 500));
                Outcome::EmptyOrUnparsable
            }
        },
        404 => Outcome::ModelNotFound,
        429 => Outcome::RateLimited,
        _ => {
            tracing::error!("Vision API error (status {}): {}", status, body);
            Outcome::TransportError { status, body }
        }
    }
}

/// Folds a send/receive failure into [`Outcome::ClientException`].
///
/// The request URL is dropped from the message since it may carry the `key=`
/// query parameter.
pub fn from_request_error(error: reqwest::Error) -> Outcome {
    let error = error.without_url();
    let message = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("could not connect: {}", error)
    } else {
        error.to_string()
    };
    tracing::error!("Failed to reach vision API: {}", message);
    Outcome::ClientException(message)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
