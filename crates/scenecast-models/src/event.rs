//! Progress events sent to the presentation layer.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::VideoJobId;
use crate::stage::PipelineStage;

/// Progress event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A new stage started
    Stage {
        stage: PipelineStage,
        label: String,
    },

    /// Overall progress (0-100)
    Progress { value: u8 },

    /// Free-form status line with timestamp
    Log {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Video is ready
    Completed {
        #[serde(rename = "videoUrl")]
        video_url: String,
    },

    /// Run ended with an error or a vendor-reported failure
    Failed {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Polling gave up before the job finished
    TimedOut {
        #[serde(rename = "jobId")]
        job_id: VideoJobId,
    },
}

impl ProgressEvent {
    pub fn stage(stage: PipelineStage) -> Self {
        ProgressEvent::Stage {
            stage,
            label: stage.label().to_string(),
        }
    }

    /// Create a progress event, clamped to 100.
    pub fn progress(value: u8) -> Self {
        ProgressEvent::Progress {
            value: value.min(100),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        ProgressEvent::Log {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn completed(video_url: impl Into<String>) -> Self {
        ProgressEvent::Completed {
            video_url: video_url.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ProgressEvent::Failed {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn timed_out(job_id: VideoJobId) -> Self {
        ProgressEvent::TimedOut { job_id }
    }

    /// Whether no further events follow this one.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. } | ProgressEvent::TimedOut { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ProgressEvent::stage(PipelineStage::AvatarCreating);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"stage\""));
        assert!(json.contains("\"stage\":\"avatar_creating\""));
        assert!(json.contains("\"label\":\"Creating avatar\""));
    }

    #[test]
    fn test_progress_clamped() {
        if let ProgressEvent::Progress { value } = ProgressEvent::progress(150) {
            assert_eq!(value, 100);
        } else {
            panic!("Expected Progress event");
        }
    }

    #[test]
    fn test_completed_uses_camel_case_url() {
        let json = serde_json::to_string(&ProgressEvent::completed("https://x/v.mp4")).unwrap();
        assert!(json.contains("\"videoUrl\":\"https://x/v.mp4\""));
    }

    #[test]
    fn test_final_events() {
        assert!(ProgressEvent::completed("u").is_final());
        assert!(ProgressEvent::failed("boom").is_final());
        assert!(ProgressEvent::timed_out(VideoJobId::from("v")).is_final());
        assert!(!ProgressEvent::progress(50).is_final());
    }
}
