//! Pipeline configuration.

use std::time::Duration;

use thiserror::Error;

use scenecast_avatar::{AvatarConfig, AvatarError};
use scenecast_imagegen::{client::DEFAULT_SCENE_SIZE, ImageGenConfig, ImageGenError};

use crate::poll::PollPolicy;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("image vendor: {0}")]
    ImageGen(#[source] ImageGenError),

    #[error("avatar vendor: {0}")]
    Avatar(#[source] AvatarError),

    #[error("{0}")]
    Invalid(String),
}

/// Run-level knobs shared by every pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Status polling schedule
    pub poll: PollPolicy,
    /// Scene image width in pixels
    pub scene_width: u32,
    /// Scene image height in pixels
    pub scene_height: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            scene_width: DEFAULT_SCENE_SIZE,
            scene_height: DEFAULT_SCENE_SIZE,
        }
    }
}

impl PipelineSettings {
    /// Create settings from environment variables.
    ///
    /// Unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            poll: PollPolicy::from_env(),
            scene_width: std::env::var("PIPELINE_SCENE_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SCENE_SIZE),
            scene_height: std::env::var("PIPELINE_SCENE_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SCENE_SIZE),
        }
    }

    /// Upper bound on time spent waiting between status reads.
    pub fn max_poll_wait(&self) -> Duration {
        self.poll.interval * self.poll.max_attempts.saturating_sub(1)
    }
}

/// Everything the binary needs to build a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub imagegen: ImageGenConfig,
    pub avatar: AvatarConfig,
    pub settings: PipelineSettings,
    /// Probe the image vendor key before the first run
    pub validate_keys: bool,
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// Both vendor keys are required. A blank or missing key is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let imagegen = ImageGenConfig::from_env().map_err(ConfigError::ImageGen)?;
        let avatar = AvatarConfig::from_env().map_err(ConfigError::Avatar)?;
        let settings = PipelineSettings::from_env();

        if settings.scene_width == 0 || settings.scene_height == 0 {
            return Err(ConfigError::Invalid(
                "scene dimensions must be non-zero".to_string(),
            ));
        }

        let validate_keys = std::env::var("PIPELINE_VALIDATE_KEYS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            imagegen,
            avatar,
            settings,
            validate_keys,
        })
    }
}
