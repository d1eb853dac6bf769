//! Remote video generation job state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::VideoJobId;

/// Status reported by the video vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoJobStatus {
    /// Accepted but not started
    #[default]
    Queued,
    /// Rendering in progress
    Processing,
    /// Video is ready
    Completed,
    /// Rendering failed
    Failed,
    /// Any status string the vendor adds later; treated as still running
    #[serde(other)]
    Unknown,
}

impl VideoJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoJobStatus::Queued => "queued",
            VideoJobStatus::Processing => "processing",
            VideoJobStatus::Completed => "completed",
            VideoJobStatus::Failed => "failed",
            VideoJobStatus::Unknown => "unknown",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoJobStatus::Completed | VideoJobStatus::Failed)
    }
}

impl std::fmt::Display for VideoJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a remote video job, as read by one status poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoJob {
    pub id: VideoJobId,
    pub status: VideoJobStatus,
    /// Vendor-reported progress percentage (0-100)
    pub progress: u8,
    /// Download URL, present once completed
    pub result_url: Option<String>,
    /// Failure reason, present once failed
    pub error_message: Option<String>,
}

impl VideoJob {
    /// Create a job in the given status with no progress.
    pub fn new(id: VideoJobId, status: VideoJobStatus) -> Self {
        Self {
            id,
            status,
            progress: 0,
            result_url: None,
            error_message: None,
        }
    }

    /// Set the vendor progress, clamped to 100.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_result_url(mut self, url: impl Into<String>) -> Self {
        self.result_url = Some(url.into());
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
