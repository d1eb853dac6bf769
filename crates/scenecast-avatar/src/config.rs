//! Avatar/video client configuration.

use std::time::Duration;

use scenecast_models::ApiKey;

use crate::error::{AvatarError, AvatarResult};
use crate::voice::VoiceConfig;

/// Endpoint paths relative to the base URL.
///
/// Different vendor API versions have used different paths (notably for media
/// upload), so none of these are hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorEndpoints {
    pub avatar_create: String,
    pub media_upload: String,
    pub video_generate: String,
    /// Status path; `{id}` is replaced with the video job id
    pub video_status: String,
}

impl Default for VendorEndpoints {
    fn default() -> Self {
        Self {
            avatar_create: "avatar/create".to_string(),
            media_upload: "media".to_string(),
            video_generate: "video/generate".to_string(),
            video_status: "videos/{id}".to_string(),
        }
    }
}

impl VendorEndpoints {
    /// Default paths, overridden by `AVATAR_PATH_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            avatar_create: std::env::var("AVATAR_PATH_CREATE").unwrap_or(defaults.avatar_create),
            media_upload: std::env::var("AVATAR_PATH_MEDIA").unwrap_or(defaults.media_upload),
            video_generate: std::env::var("AVATAR_PATH_GENERATE")
                .unwrap_or(defaults.video_generate),
            video_status: std::env::var("AVATAR_PATH_STATUS").unwrap_or(defaults.video_status),
        }
    }

    pub fn status_path(&self, job_id: &str) -> String {
        self.video_status
            .replace("{id}", &urlencoding::encode(job_id))
    }
}

/// Configuration for the avatar/video client.
#[derive(Debug, Clone)]
pub struct AvatarConfig {
    /// Vendor base URL, including the API version prefix
    pub base_url: String,
    /// Vendor API key, sent as `X-Api-Key`
    pub api_key: ApiKey,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Timeout for fetching a finished video, which can be large
    pub download_timeout: Duration,
    pub endpoints: VendorEndpoints,
    pub voices: VoiceConfig,
    /// Style tag sent with avatar creation
    pub avatar_style: String,
    /// Background used when no scene image is available
    pub background_color: String,
}

impl AvatarConfig {
    /// Config with vendor defaults for the given key.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            base_url: "https://api.heygen.com/v1".to_string(),
            api_key,
            timeout: Duration::from_secs(60),
            download_timeout: Duration::from_secs(600),
            endpoints: VendorEndpoints::default(),
            voices: VoiceConfig::default(),
            avatar_style: "realistic".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }

    /// Create config from environment variables.
    ///
    /// `HEYGEN_API_KEY` is required; there is no fallback key.
    pub fn from_env() -> AvatarResult<Self> {
        let api_key = ApiKey::from_env("HEYGEN_API_KEY")
            .ok_or_else(|| AvatarError::config("HEYGEN_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("AVATAR_BASE_URL") {
            config.base_url = url;
        }
        config.timeout = Duration::from_secs(
            std::env::var("AVATAR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        );
        config.download_timeout = Duration::from_secs(
            std::env::var("AVATAR_DOWNLOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
        );
        config.endpoints = VendorEndpoints::from_env();
        if let Ok(voice) = std::env::var("AVATAR_DEFAULT_VOICE_ID") {
            config.voices.default_voice_id = voice;
        }
        if let Ok(voice) = std::env::var("AVATAR_SECONDARY_VOICE_ID") {
            config.voices.secondary_voice_id = voice;
        }
        Ok(config)
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_endpoints() {
        let endpoints = VendorEndpoints::default();
        assert_eq!(endpoints.status_path("abc"), "videos/abc");
        assert_eq!(endpoints.media_upload, "media");
    }

    #[test]
    fn test_status_path_encodes_job_id() {
        let endpoints = VendorEndpoints::default();
        assert_eq!(endpoints.status_path("a/b?c#d"), "videos/a%2Fb%3Fc%23d");
        assert_eq!(endpoints.status_path("vid_1-x.y~z"), "videos/vid_1-x.y~z");
    }

    #[test]
    fn test_download_timeout_default() {
        let config = AvatarConfig::new(ApiKey::new("k").unwrap());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.download_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_url_joining() {
        let mut config = AvatarConfig::new(ApiKey::new("k").unwrap());
        config.base_url = "https://vendor.example/v2/".to_string();
        assert_eq!(config.url("/media"), "https://vendor.example/v2/media");
        assert_eq!(config.url("avatar/create"), "https://vendor.example/v2/avatar/create");
    }

    #[test]
    #[serial]
    fn test_config_requires_key() {
        std::env::remove_var("HEYGEN_API_KEY");
        assert!(matches!(AvatarConfig::from_env(), Err(AvatarError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_config_env_overrides() {
        std::env::set_var("HEYGEN_API_KEY", "hg-key");
        std::env::set_var("AVATAR_PATH_MEDIA", "media/upload");
        std::env::set_var("AVATAR_PATH_STATUS", "video_status.get?video_id={id}");
        std::env::set_var("AVATAR_TIMEOUT_SECS", "15");
        std::env::set_var("AVATAR_DOWNLOAD_TIMEOUT_SECS", "900");

        let config = AvatarConfig::from_env().unwrap();
        assert_eq!(config.api_key.expose(), "hg-key");
        assert_eq!(config.endpoints.media_upload, "media/upload");
        assert_eq!(
            config.endpoints.status_path("v9"),
            "video_status.get?video_id=v9"
        );
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.download_timeout, Duration::from_secs(900));
        assert_eq!(config.endpoints.avatar_create, "avatar/create");

        for var in [
            "HEYGEN_API_KEY",
            "AVATAR_PATH_MEDIA",
            "AVATAR_PATH_STATUS",
            "AVATAR_TIMEOUT_SECS",
            "AVATAR_DOWNLOAD_TIMEOUT_SECS",
        ] {
            std::env::remove_var(var);
        }
    }
}
