//! Shared data models for the SceneCast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests and their validation
//! - Actions and their vendor animation presets
//! - Avatar pose labels
//! - Remote video jobs and their status
//! - Pipeline stages, progress events and outcomes
//! - Redacted vendor API keys

pub mod action;
pub mod event;
pub mod ids;
pub mod job;
pub mod outcome;
pub mod pose;
pub mod request;
pub mod secret;
pub mod stage;

// Re-export common types
pub use action::{resolve_preset, Action, ActionParseError, DEFAULT_PRESET};
pub use event::ProgressEvent;
pub use ids::{AvatarId, MediaId, RunId, VideoJobId};
pub use job::{VideoJob, VideoJobStatus};
pub use outcome::PipelineOutcome;
pub use pose::{map_poses, PoseLabel, MIN_POSED_PHOTOS};
pub use request::{GenerationRequest, RequestValidationError, MAX_PHOTOS, MIN_PHOTOS};
pub use secret::ApiKey;
pub use stage::PipelineStage;
