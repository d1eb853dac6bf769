//! Client for the text-to-image vendor.
//!
//! Turns a scene description into a PNG used as the video background, and
//! can probe whether the configured API key is accepted.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ImageGenClient, ImageGenConfig};
pub use error::{ImageGenError, ImageGenResult};
pub use types::{Artifact, Engine, TextPrompt, TextToImageRequest, TextToImageResponse};
