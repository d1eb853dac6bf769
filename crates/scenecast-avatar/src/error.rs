//! Avatar/video client error types.

use thiserror::Error;

/// Result type for avatar/video operations.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Longest response body kept in an error message.
const MAX_BODY_CHARS: usize = 500;

/// Errors that can occur talking to the avatar/video vendor.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{operation} failed with status {status}: {body}")]
    Remote {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} rejected by vendor (code {code}): {message}")]
    Vendor {
        operation: &'static str,
        code: i64,
        message: String,
    },

    #[error("{operation} returned a malformed response: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} timed out after {secs} seconds")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AvatarError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP failure, keeping at most the first few hundred characters of the body.
    pub fn remote(operation: &'static str, status: u16, body: &str) -> Self {
        Self::Remote {
            operation,
            status,
            body: snippet(body),
        }
    }

    pub fn malformed(operation: &'static str, msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            message: msg.into(),
        }
    }

    /// Operation the error came from, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            AvatarError::Remote { operation, .. }
            | AvatarError::Vendor { operation, .. }
            | AvatarError::MalformedResponse { operation, .. }
            | AvatarError::Timeout { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// HTTP status returned by the vendor, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            AvatarError::Remote { status, .. } => Some(*status),
            AvatarError::Network(e) => e.status().map(|s| s.as_u16()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_body_truncated() {
        let body = "x".repeat(2000);
        match AvatarError::remote("media-upload", 500, &body) {
            AvatarError::Remote { body, .. } => {
                assert_eq!(body.chars().count(), MAX_BODY_CHARS + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("Expected Remote, got {:?}", other),
        }
    }

    #[test]
    fn test_short_body_kept() {
        let err = AvatarError::remote("avatar-create", 403, "forbidden");
        assert_eq!(err.to_string(), "avatar-create failed with status 403: forbidden");
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(err.operation(), Some("avatar-create"));
    }

    #[test]
    fn test_vendor_error_display() {
        let err = AvatarError::Vendor {
            operation: "video-generate",
            code: 40001,
            message: "avatar not ready".into(),
        };
        assert_eq!(
            err.to_string(),
            "video-generate rejected by vendor (code 40001): avatar not ready"
        );
        assert_eq!(err.http_status(), None);
    }
}
