//! Generation request submitted by the user.

use std::fmt;

use thiserror::Error;

use crate::action::resolve_preset;

/// Minimum number of photos accepted.
pub const MIN_PHOTOS: usize = 3;

/// Maximum number of photos accepted.
pub const MAX_PHOTOS: usize = 10;

/// Everything needed for one pipeline run.
#[derive(Clone)]
pub struct GenerationRequest {
    /// Raw image bytes, in upload order
    pub photos: Vec<Vec<u8>>,
    /// Text description of the scene to generate
    pub scene_prompt: String,
    /// Action name as selected by the user
    pub action: String,
    /// What the avatar should say
    pub script: String,
}

/// Reasons a request is rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("At least {min} photos are required, got {count}")]
    TooFewPhotos { count: usize, min: usize },

    #[error("At most {max} photos are allowed, got {count}")]
    TooManyPhotos { count: usize, max: usize },

    #[error("Photo {index} is empty")]
    EmptyPhoto { index: usize },

    #[error("Scene description must not be empty")]
    EmptyScenePrompt,

    #[error("Dialogue script must not be empty")]
    EmptyScript,
}

impl GenerationRequest {
    pub fn new(
        photos: Vec<Vec<u8>>,
        scene_prompt: impl Into<String>,
        action: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            photos,
            scene_prompt: scene_prompt.into(),
            action: action.into(),
            script: script.into(),
        }
    }

    /// Validate the request.
    ///
    /// Reports the first problem found; photo count is checked first.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        let count = self.photos.len();
        if count < MIN_PHOTOS {
            return Err(RequestValidationError::TooFewPhotos {
                count,
                min: MIN_PHOTOS,
            });
        }

        if count > MAX_PHOTOS {
            return Err(RequestValidationError::TooManyPhotos {
                count,
                max: MAX_PHOTOS,
            });
        }

        if let Some(index) = self.photos.iter().position(|p| p.is_empty()) {
            return Err(RequestValidationError::EmptyPhoto { index: index + 1 });
        }

        if self.scene_prompt.trim().is_empty() {
            return Err(RequestValidationError::EmptyScenePrompt);
        }

        if self.script.trim().is_empty() {
            return Err(RequestValidationError::EmptyScript);
        }

        Ok(())
    }

    /// Animation preset for the selected action.
    pub fn preset_id(&self) -> &'static str {
        resolve_preset(&self.action)
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<usize> = self.photos.iter().map(Vec::len).collect();
        f.debug_struct("GenerationRequest")
            .field("photo_sizes", &sizes)
            .field("scene_prompt", &self.scene_prompt)
            .field("action", &self.action)
            .field("script", &self.script)
            .finish()
    }
}
