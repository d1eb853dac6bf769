//! Text-to-image request/response types.

use serde::{Deserialize, Serialize};

/// One weighted text prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPrompt {
    pub text: String,
}

/// Request body for the text-to-image endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub width: u32,
    pub height: u32,
    /// Number of images to generate
    pub samples: u32,
    /// Diffusion step count
    pub steps: u32,
    /// Guidance scale
    pub cfg_scale: f32,
    pub output_format: String,
}

/// Generated image, base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub base64: String,
    #[serde(rename = "finishReason", default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Response from the text-to-image endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextToImageResponse {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// Entry in the engine listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
