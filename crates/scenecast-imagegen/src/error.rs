//! Image generation error types.

use thiserror::Error;

pub type ImageGenResult<T> = Result<T, ImageGenError>;

/// Stage name reported in errors.
pub const STAGE: &str = "image-generation";

/// Longest vendor body kept in an error message.
const MAX_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{stage} failed with status {status}: {body}")]
    Remote {
        stage: &'static str,
        status: u16,
        body: String,
    },

    #[error("{stage} returned a malformed response: {message}")]
    MalformedResponse {
        stage: &'static str,
        message: String,
    },

    #[error("{stage} timed out after {secs} seconds")]
    Timeout { stage: &'static str, secs: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ImageGenError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            stage: STAGE,
            status,
            body: snippet(&body.into()),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage: STAGE,
            message: msg.into(),
        }
    }

    /// HTTP status returned by the vendor, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ImageGenError::Remote { status, .. } => Some(*status),
            ImageGenError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
