//! Scene-to-avatar-video pipeline.
//!
//! Validates a [`GenerationRequest`](scenecast_models::GenerationRequest),
//! then sequences the image vendor and the avatar/video vendor:
//! scene image, scene upload, avatar creation, video submission and
//! status polling. Progress goes to a caller-supplied
//! [`ProgressObserver`].

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod poll;
pub mod service;

pub use clock::{Clock, TokioClock};
pub use config::{ConfigError, PipelineConfig, PipelineSettings};
pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use observer::{
    ChannelObserver, NoopObserver, ProgressObserver, ProgressTracker, TracingObserver,
};
pub use pipeline::Pipeline;
pub use poll::{PollDecision, PollPolicy, PollState};
pub use service::{AvatarVideoService, SceneImageGenerator};
