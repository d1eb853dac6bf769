//! Pipeline stages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Idle,
    SceneGenerating,
    SceneUploading,
    AvatarCreating,
    VideoSubmitting,
    VideoPolling,
    Completed,
    Failed,
    TimedOut,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::SceneGenerating => "scene_generating",
            PipelineStage::SceneUploading => "scene_uploading",
            PipelineStage::AvatarCreating => "avatar_creating",
            PipelineStage::VideoSubmitting => "video_submitting",
            PipelineStage::VideoPolling => "video_polling",
            PipelineStage::Completed => "completed",
            PipelineStage::Failed => "failed",
            PipelineStage::TimedOut => "timed_out",
        }
    }

    /// Status line shown to the user while the stage runs.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "Waiting to start",
            PipelineStage::SceneGenerating => "Generating scene image",
            PipelineStage::SceneUploading => "Uploading scene to video platform",
            PipelineStage::AvatarCreating => "Creating avatar",
            PipelineStage::VideoSubmitting => "Submitting video job",
            PipelineStage::VideoPolling => "Rendering video",
            PipelineStage::Completed => "Video ready",
            PipelineStage::Failed => "Generation failed",
            PipelineStage::TimedOut => "Still rendering, check back later",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
