//! Final result of a pipeline run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::VideoJobId;
use crate::stage::PipelineStage;

/// How a run that got as far as polling ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The vendor finished rendering.
    Completed { job_id: VideoJobId, video_url: String },
    /// The vendor reported the job as failed.
    Failed { job_id: VideoJobId, message: String },
    /// Polling ran out before the job finished. The job may still complete.
    TimedOut { job_id: VideoJobId },
}

impl PipelineOutcome {
    pub fn job_id(&self) -> &VideoJobId {
        match self {
            PipelineOutcome::Completed { job_id, .. }
            | PipelineOutcome::Failed { job_id, .. }
            | PipelineOutcome::TimedOut { job_id } => job_id,
        }
    }

    pub fn video_url(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Completed { video_url, .. } => Some(video_url),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed { .. })
    }

    /// Final stage the run ends in.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineOutcome::Completed { .. } => PipelineStage::Completed,
            PipelineOutcome::Failed { .. } => PipelineStage::Failed,
            PipelineOutcome::TimedOut { .. } => PipelineStage::TimedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let done = PipelineOutcome::Completed {
            job_id: VideoJobId::from("v1"),
            video_url: "https://cdn.example/v1.mp4".into(),
        };
        assert!(done.is_completed());
        assert_eq!(done.video_url(), Some("https://cdn.example/v1.mp4"));
        assert_eq!(done.stage(), PipelineStage::Completed);

        let late = PipelineOutcome::TimedOut {
            job_id: VideoJobId::from("v2"),
        };
        assert_eq!(late.video_url(), None);
        assert_eq!(late.job_id().as_str(), "v2");
        assert_eq!(late.stage(), PipelineStage::TimedOut);
    }

    #[test]
    fn test_outcome_serialization() {
        let failed = PipelineOutcome::Failed {
            job_id: VideoJobId::from("v3"),
            message: "bad photos".into(),
        };
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"outcome\":\"failed\""));
        assert!(json.contains("\"message\":\"bad photos\""));
    }
}
