//! HTTP client for the avatar/video vendor.

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use scenecast_models::{
    map_poses, AvatarId, MediaId, VideoJob, VideoJobId, MIN_POSED_PHOTOS,
};

use crate::config::AvatarConfig;
use crate::error::{AvatarError, AvatarResult};
use crate::metrics;
use crate::types::{
    Animation, AvatarCreated, Background, CreateAvatarRequest, GenerateVideoRequest,
    MediaUploaded, PoseImage, UploadMediaRequest, VendorEnvelope, VideoInput,
    VideoStatusData, VideoSubmitted, Voice,
};

const OP_CREATE_AVATAR: &str = "avatar-create";
const OP_UPLOAD_MEDIA: &str = "media-upload";
const OP_GENERATE_VIDEO: &str = "video-generate";
const OP_CHECK_STATUS: &str = "video-status";
const OP_DOWNLOAD: &str = "video-download";

/// Client for the avatar/video vendor.
///
/// Every call is a single attempt bounded by the configured timeout.
pub struct AvatarClient {
    http: Client,
    config: AvatarConfig,
}

impl AvatarClient {
    /// Create a new avatar client.
    pub fn new(config: AvatarConfig) -> AvatarResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AvatarError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AvatarResult<Self> {
        Self::new(AvatarConfig::from_env()?)
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    /// Create an avatar from posed photos.
    ///
    /// Photos are assigned to poses by position; anything past the sixth is
    /// ignored. Fewer than three mapped photos fails without a network call.
    pub async fn create_avatar(&self, photos: &[Vec<u8>], name: &str) -> AvatarResult<AvatarId> {
        let posed = map_poses(photos);
        if posed.len() < MIN_POSED_PHOTOS {
            return Err(AvatarError::validation(format!(
                "need at least {} photos for avatar creation, got {}",
                MIN_POSED_PHOTOS,
                posed.len()
            )));
        }
        if photos.len() > posed.len() {
            debug!(
                ignored = photos.len() - posed.len(),
                "Ignoring photos beyond the pose set"
            );
        }

        let request = CreateAvatarRequest {
            avatar_name: name.to_string(),
            avatar_style: self.config.avatar_style.clone(),
            avatar_images: posed
                .into_iter()
                .map(|(pose, bytes)| PoseImage {
                    pose,
                    image: STANDARD.encode(bytes),
                })
                .collect(),
        };

        let created: AvatarCreated = self
            .post_json(OP_CREATE_AVATAR, &self.config.endpoints.avatar_create, &request)
            .await?;

        info!(avatar_id = %created.avatar_id, name, "Avatar created");
        Ok(AvatarId::from_string(created.avatar_id))
    }

    /// Upload an image for use as a video background.
    pub async fn upload_media(&self, image: &[u8]) -> AvatarResult<MediaId> {
        let request = UploadMediaRequest {
            media: STANDARD.encode(image),
            media_type: "image".to_string(),
        };

        let uploaded: MediaUploaded = self
            .post_json(OP_UPLOAD_MEDIA, &self.config.endpoints.media_upload, &request)
            .await?;

        info!(media_id = %uploaded.media_id, bytes = image.len(), "Media uploaded");
        Ok(MediaId::from_string(uploaded.media_id))
    }

    /// Submit a video job.
    ///
    /// Without a background media id the video gets a plain white background.
    pub async fn generate_video(
        &self,
        avatar_id: &AvatarId,
        script: &str,
        background: Option<&MediaId>,
        preset_id: &str,
    ) -> AvatarResult<VideoJobId> {
        let voice_id = self.config.voices.select(script).to_string();
        let background = match background {
            Some(media) => Background::Media(media.as_str().to_string()),
            None => Background::Color(self.config.background_color.clone()),
        };

        let request = GenerateVideoRequest {
            video_input: VideoInput {
                avatar_id: avatar_id.as_str().to_string(),
                voice: Voice { voice_id },
                background,
                animation: Animation::preset(preset_id),
                text: script.to_string(),
            },
        };

        let submitted: VideoSubmitted = self
            .post_json(OP_GENERATE_VIDEO, &self.config.endpoints.video_generate, &request)
            .await?;

        info!(video_id = %submitted.video_id, preset_id, "Video job submitted");
        Ok(VideoJobId::from_string(submitted.video_id))
    }

    /// Read the current state of a video job once.
    pub async fn check_status(&self, job_id: &VideoJobId) -> AvatarResult<VideoJob> {
        let path = self.config.endpoints.status_path(job_id.as_str());
        let data: VideoStatusData = self.get_json(OP_CHECK_STATUS, &path).await?;

        let mut job = VideoJob::new(job_id.clone(), data.status)
            .with_progress(data.progress_percent());
        if let Some(url) = data.video_url {
            job = job.with_result_url(url);
        }
        if let Some(message) = data.error_message {
            job = job.with_error_message(message);
        }

        debug!(
            job_id = %job_id,
            status = %job.status,
            progress = job.progress,
            "Video status read"
        );
        Ok(job)
    }

    /// Fetch a finished video from its result URL.
    ///
    /// Result URLs are pre-signed, so no vendor key is sent.
    pub async fn download_video(&self, url: &str) -> AvatarResult<Vec<u8>> {
        let start = Instant::now();
        let limit = self.config.download_timeout;
        let response = match self.http.get(url).timeout(limit).send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_request(OP_DOWNLOAD, 0, elapsed_ms(start));
                return Err(map_send_error(OP_DOWNLOAD, limit, e));
            }
        };

        let status = response.status();
        metrics::record_request(OP_DOWNLOAD, status.as_u16(), elapsed_ms(start));
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AvatarError::remote(OP_DOWNLOAD, status.as_u16(), &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_send_error(OP_DOWNLOAD, limit, e))?;
        info!(bytes = bytes.len(), "Video downloaded");
        Ok(bytes.to_vec())
    }

    async fn post_json<B, T>(&self, operation: &'static str, path: &str, body: &B) -> AvatarResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url(path);
        debug!(operation, "POST {}", url);
        self.execute(operation, self.http.post(&url).json(body)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> AvatarResult<T> {
        let url = self.config.url(path);
        debug!(operation, "GET {}", url);
        self.execute(operation, self.http.get(&url)).await
    }

    /// Send an authenticated request and unwrap the vendor envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> AvatarResult<T> {
        let start = Instant::now();
        let response = match request
            .header("X-Api-Key", self.config.api_key.expose())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                metrics::record_request(operation, 0, elapsed_ms(start));
                return Err(map_send_error(operation, self.config.timeout, e));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        metrics::record_request(operation, status.as_u16(), elapsed_ms(start));

        if !status.is_success() {
            warn!(operation, status = status.as_u16(), "Vendor request failed");
            return Err(AvatarError::remote(operation, status.as_u16(), &body));
        }

        let envelope: VendorEnvelope<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| AvatarError::malformed(operation, format!("invalid JSON: {}", e)))?;

        if let Some(code) = envelope.code.filter(|c| *c != 0) {
            warn!(operation, code, msg = ?envelope.msg, "Vendor rejected request");
            metrics::record_vendor_error(operation, code);
        }

        envelope.into_data(operation)
    }
}

fn map_send_error(operation: &'static str, limit: Duration, e: reqwest::Error) -> AvatarError {
    if e.is_timeout() {
        AvatarError::Timeout {
            operation,
            secs: limit.as_secs(),
        }
    } else {
        AvatarError::Network(e)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecast_models::{ApiKey, VideoJobStatus};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AvatarClient {
        let mut config = AvatarConfig::new(ApiKey::new("hg-test").unwrap());
        config.base_url = base_url.to_string();
        config.timeout = Duration::from_secs(5);
        AvatarClient::new(config).unwrap()
    }

    fn photos(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8 + 1; 4]).collect()
    }

    #[tokio::test]
    async fn test_create_avatar_maps_first_six_photos() {
        let server = MockServer::start().await;
        let photos = photos(8);

        Mock::given(method("POST"))
            .and(path("/avatar/create"))
            .and(header("x-api-key", "hg-test"))
            .and(body_partial_json(json!({
                "avatar_name": "avatar_1700000000",
                "avatar_style": "realistic",
                "avatar_images": [
                    {"pose": "front", "image": STANDARD.encode(&photos[0])},
                    {"pose": "left", "image": STANDARD.encode(&photos[1])},
                    {"pose": "right", "image": STANDARD.encode(&photos[2])},
                    {"pose": "front_full", "image": STANDARD.encode(&photos[3])},
                    {"pose": "left_full", "image": STANDARD.encode(&photos[4])},
                    {"pose": "right_full", "image": STANDARD.encode(&photos[5])}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"avatar_id": "av_123"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let avatar = test_client(&server.uri())
            .create_avatar(&photos, "avatar_1700000000")
            .await
            .unwrap();
        assert_eq!(avatar.as_str(), "av_123");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["avatar_images"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_create_avatar_too_few_photos_is_local() {
        let server = MockServer::start().await;

        let err = test_client(&server.uri())
            .create_avatar(&photos(2), "avatar_1")
            .await
            .unwrap_err();

        assert!(matches!(err, AvatarError::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_media() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/media"))
            .and(body_partial_json(json!({
                "media": STANDARD.encode(b"scene"),
                "media_type": "image"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"media_id": "m_42"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = test_client(&server.uri()).upload_media(b"scene").await.unwrap();
        assert_eq!(media.as_str(), "m_42");
    }

    #[tokio::test]
    async fn test_upload_media_vendor_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 40102,
                "msg": "unsupported media"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).upload_media(b"x").await.unwrap_err();
        match err {
            AvatarError::Vendor { operation, code, message } => {
                assert_eq!(operation, "media-upload");
                assert_eq!(code, 40102);
                assert_eq!(message, "unsupported media");
            }
            other => panic!("Expected Vendor error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).upload_media(b"x").await.unwrap_err();
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(err.to_string(), "media-upload failed with status 403: forbidden");
    }

    #[tokio::test]
    async fn test_non_json_success_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).upload_media(b"x").await.unwrap_err();
        assert!(matches!(err, AvatarError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_generate_video_with_media_background() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/video/generate"))
            .and(body_partial_json(json!({
                "video_input": {
                    "avatar_id": "av_1",
                    "voice": {"voice_id": "2d5b0e6cf36f460aa7fc47e3eee4ba54"},
                    "background": {"type": "media", "value": "m_1"},
                    "animation": {"type": "preset", "preset_id": "wedding_ceremony"},
                    "text": "Hello everyone"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"video_id": "v_9"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job = test_client(&server.uri())
            .generate_video(
                &AvatarId::from_string("av_1"),
                "Hello everyone",
                Some(&MediaId::from_string("m_1")),
                "wedding_ceremony",
            )
            .await
            .unwrap();
        assert_eq!(job.as_str(), "v_9");
    }

    #[tokio::test]
    async fn test_generate_video_color_background_and_secondary_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/video/generate"))
            .and(body_partial_json(json!({
                "video_input": {
                    "voice": {"voice_id": "b8e9d294b1d54b3daa0e7d3c4a3a2c7a"},
                    "background": {"type": "color", "value": "#ffffff"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"video_id": "v_10"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job = test_client(&server.uri())
            .generate_video(&AvatarId::from_string("av_1"), "你好", None, "talking_01")
            .await
            .unwrap();
        assert_eq!(job.as_str(), "v_10");
    }

    #[tokio::test]
    async fn test_check_status_completed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/v_9"))
            .and(header("x-api-key", "hg-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {
                    "status": "completed",
                    "progress": 100,
                    "video_url": "https://cdn.example/v_9.mp4"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job = test_client(&server.uri())
            .check_status(&VideoJobId::from_string("v_9"))
            .await
            .unwrap();
        assert_eq!(job.status, VideoJobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.result_url.as_deref(), Some("https://cdn.example/v_9.mp4"));
        assert!(job.is_terminal());
    }

    #[tokio::test]
    async fn test_check_status_unknown_status_is_not_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/v_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"status": "rendering_preview"}
            })))
            .mount(&server)
            .await;

        let job = test_client(&server.uri())
            .check_status(&VideoJobId::from_string("v_1"))
            .await
            .unwrap();
        assert_eq!(job.status, VideoJobStatus::Unknown);
        assert!(!job.is_terminal());
    }

    #[tokio::test]
    async fn test_check_status_missing_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/v_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .check_status(&VideoJobId::from_string("v_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::MalformedResponse { operation: "video-status", .. }));
    }

    #[tokio::test]
    async fn test_download_video() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/v_9.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4data".to_vec()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let bytes = client
            .download_video(&format!("{}/files/v_9.mp4", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, b"mp4data".to_vec());

        let err = client
            .download_video(&format!("{}/files/missing.mp4", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(404));
    }

    #[tokio::test]
    async fn test_download_video_uses_download_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/slow.mp4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"mp4data".to_vec())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = AvatarConfig::new(ApiKey::new("hg-test").unwrap());
        config.base_url = server.uri();
        config.timeout = Duration::from_secs(30);
        config.download_timeout = Duration::from_secs(1);
        let client = AvatarClient::new(config).unwrap();

        let err = client
            .download_video(&format!("{}/files/slow.mp4", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AvatarError::Timeout {
                operation: "video-download",
                secs: 1
            }
        ));
    }
}
