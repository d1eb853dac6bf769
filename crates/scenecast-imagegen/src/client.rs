//! Text-to-image HTTP client.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, info, warn};

use scenecast_models::ApiKey;

use crate::error::{ImageGenError, ImageGenResult, STAGE};
use crate::types::{Engine, TextPrompt, TextToImageRequest, TextToImageResponse};

/// Default scene width and height in pixels.
pub const DEFAULT_SCENE_SIZE: u32 = 1024;

/// Configuration for the image client.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// Vendor base URL
    pub base_url: String,
    /// Engine used for text-to-image
    pub engine_id: String,
    /// Vendor API key
    pub api_key: ApiKey,
    /// Timeout for generation requests
    pub timeout: Duration,
    /// Timeout for the key validation probe
    pub validate_timeout: Duration,
    /// Diffusion steps per image
    pub steps: u32,
    /// Guidance scale
    pub cfg_scale: f32,
    /// Images generated per request
    pub samples: u32,
}

impl ImageGenConfig {
    /// Config with vendor defaults for the given key.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            base_url: "https://api.stability.ai".to_string(),
            engine_id: "stable-diffusion-xl-1024-v1-0".to_string(),
            api_key,
            timeout: Duration::from_secs(120),
            validate_timeout: Duration::from_secs(10),
            steps: 30,
            cfg_scale: 7.0,
            samples: 1,
        }
    }

    /// Create config from environment variables.
    ///
    /// `STABILITY_API_KEY` is required; there is no fallback key.
    pub fn from_env() -> ImageGenResult<Self> {
        let api_key = ApiKey::from_env("STABILITY_API_KEY")
            .ok_or_else(|| ImageGenError::config("STABILITY_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("IMAGEGEN_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(engine) = std::env::var("IMAGEGEN_ENGINE_ID") {
            config.engine_id = engine;
        }
        config.timeout = Duration::from_secs(
            std::env::var("IMAGEGEN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
        );
        Ok(config)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn text_to_image_url(&self) -> String {
        self.url(&format!("v1/generation/{}/text-to-image", self.engine_id))
    }

    fn engines_url(&self) -> String {
        self.url("v1/engines/list")
    }
}

/// Client for the text-to-image vendor.
pub struct ImageGenClient {
    http: Client,
    config: ImageGenConfig,
}

impl ImageGenClient {
    /// Create a new image client.
    pub fn new(config: ImageGenConfig) -> ImageGenResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ImageGenError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ImageGenResult<Self> {
        Self::new(ImageGenConfig::from_env()?)
    }

    pub fn config(&self) -> &ImageGenConfig {
        &self.config
    }

    /// Generate a square scene image at the default size.
    pub async fn generate_scene(&self, prompt: &str) -> ImageGenResult<Vec<u8>> {
        self.generate_image(prompt, DEFAULT_SCENE_SIZE, DEFAULT_SCENE_SIZE)
            .await
    }

    /// Generate one PNG image from a text prompt.
    ///
    /// Single attempt; the caller decides whether to abort.
    pub async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> ImageGenResult<Vec<u8>> {
        let url = self.config.text_to_image_url();
        let request = TextToImageRequest {
            text_prompts: vec![TextPrompt {
                text: prompt.to_string(),
            }],
            width,
            height,
            samples: self.config.samples,
            steps: self.config.steps,
            cfg_scale: self.config.cfg_scale,
            output_format: "png".to_string(),
        };

        debug!(width, height, "Sending text-to-image request to {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.expose())
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ImageGenError::remote(status.as_u16(), body));
        }

        let parsed: TextToImageResponse = serde_json::from_str(&body)
            .map_err(|e| ImageGenError::malformed(format!("invalid JSON: {}", e)))?;

        let artifact = parsed
            .artifacts
            .first()
            .ok_or_else(|| ImageGenError::malformed("no image data in response"))?;

        if let Some(reason) = &artifact.finish_reason {
            debug!(finish_reason = %reason, seed = ?artifact.seed, "Artifact received");
        }

        let image = STANDARD
            .decode(artifact.base64.trim())
            .map_err(|e| ImageGenError::malformed(format!("image data decoding failed: {}", e)))?;

        info!(bytes = image.len(), "Scene image generated");
        Ok(image)
    }

    /// Check whether the configured key is accepted by the vendor.
    ///
    /// 200 with at least one engine is valid; 401 and any other status are
    /// not. Transport failures are logged and reported as invalid.
    pub async fn validate_api_key(&self) -> bool {
        let url = self.config.engines_url();

        let response = match self
            .http
            .get(&url)
            .bearer_auth(self.config.api_key.expose())
            .header(header::ACCEPT, "application/json")
            .timeout(self.config.validate_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("API key validation failed: {}", e);
                return false;
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<Vec<Engine>>().await {
                Ok(engines) if !engines.is_empty() => {
                    let names: Vec<&str> = engines.iter().take(2).map(|e| e.id.as_str()).collect();
                    info!("API key valid, available models: {}", names.join(", "));
                    true
                }
                Ok(_) => {
                    warn!("API key accepted but no engines available");
                    false
                }
                Err(e) => {
                    warn!("Could not parse engine list: {}", e);
                    false
                }
            },
            StatusCode::UNAUTHORIZED => {
                warn!("Invalid API key or unauthorized");
                false
            }
            status => {
                warn!("API key validation indeterminate, status code: {}", status);
                false
            }
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ImageGenError {
        if e.is_timeout() {
            ImageGenError::Timeout {
                stage: STAGE,
                secs: self.config.timeout.as_secs(),
            }
        } else {
            ImageGenError::Network(e)
        }
    }
}
