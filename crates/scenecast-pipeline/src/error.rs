//! Pipeline error types.

use thiserror::Error;

use scenecast_avatar::AvatarError;
use scenecast_imagegen::ImageGenError;
use scenecast_models::{PipelineStage, RequestValidationError};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// A vendor-reported job failure and a poll timeout are outcomes, not errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] RequestValidationError),

    #[error("Scene generation error: {0}")]
    ImageGen(#[from] ImageGenError),

    #[error("Avatar service error: {0}")]
    Avatar(#[from] AvatarError),

    #[error("{stage} returned a malformed response: {message}")]
    MalformedResponse {
        stage: PipelineStage,
        message: String,
    },

    #[error("Run cancelled during {stage}")]
    Cancelled { stage: PipelineStage },
}

/// Coarse classification of a pipeline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input problem, nothing was sent
    Validation,
    /// Vendor answered with an HTTP failure or a rejection code
    RemoteService,
    /// Vendor answered but the payload was unusable
    MalformedResponse,
    /// Transport failure or request timeout
    Network,
    Cancelled,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::RemoteService => "remote_service",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Network => "network",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Config => "config",
        }
    }
}

impl PipelineError {
    pub fn malformed(stage: PipelineStage, msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage,
            message: msg.into(),
        }
    }

    pub fn cancelled(stage: PipelineStage) -> Self {
        Self::Cancelled { stage }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::ImageGen(e) => match e {
                ImageGenError::Config(_) => ErrorKind::Config,
                ImageGenError::Remote { .. } => ErrorKind::RemoteService,
                ImageGenError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
                ImageGenError::Timeout { .. } | ImageGenError::Network(_) => ErrorKind::Network,
            },
            PipelineError::Avatar(e) => match e {
                AvatarError::Config(_) => ErrorKind::Config,
                AvatarError::Validation(_) => ErrorKind::Validation,
                AvatarError::Remote { .. } | AvatarError::Vendor { .. } => {
                    ErrorKind::RemoteService
                }
                AvatarError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
                AvatarError::Timeout { .. } | AvatarError::Network(_) => ErrorKind::Network,
            },
            PipelineError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            PipelineError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}
