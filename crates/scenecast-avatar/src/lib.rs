//! Client for the avatar/video vendor.
//!
//! This crate provides:
//! - Avatar creation from a posed photo set
//! - Media upload (scene backgrounds)
//! - Video job submission and status reads
//! - Voice selection from the script text
//! - Result video download
//!
//! Endpoint paths are configurable because the vendor contract is versioned.

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;
pub mod voice;

pub use client::AvatarClient;
pub use config::{AvatarConfig, VendorEndpoints};
pub use error::{AvatarError, AvatarResult};
pub use types::{Background, VendorEnvelope};
pub use voice::{uses_secondary_language, VoiceConfig};
