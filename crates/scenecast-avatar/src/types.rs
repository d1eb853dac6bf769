//! Avatar/video vendor request and response types.

use serde::{Deserialize, Serialize};

use scenecast_models::{PoseLabel, VideoJobStatus};

use crate::error::{AvatarError, AvatarResult};

/// Response envelope shared by every vendor endpoint.
///
/// A call succeeded only when `code` is present and zero and `data` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorEnvelope<T> {
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl VendorEnvelope<serde_json::Value> {
    /// Check the embedded status code and decode the data record.
    pub fn into_data<T: serde::de::DeserializeOwned>(
        self,
        operation: &'static str,
    ) -> AvatarResult<T> {
        match self.code {
            None => return Err(AvatarError::malformed(operation, "missing status code")),
            Some(0) => {}
            Some(code) => {
                return Err(AvatarError::Vendor {
                    operation,
                    code,
                    message: self.msg.unwrap_or_else(|| "Unknown error".to_string()),
                })
            }
        }

        let data = self
            .data
            .ok_or_else(|| AvatarError::malformed(operation, "missing data"))?;

        serde_json::from_value(data)
            .map_err(|e| AvatarError::malformed(operation, format!("unexpected data: {}", e)))
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One photo assigned to a pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseImage {
    pub pose: PoseLabel,
    /// Base64-encoded image bytes
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvatarRequest {
    pub avatar_name: String,
    pub avatar_style: String,
    pub avatar_images: Vec<PoseImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMediaRequest {
    /// Base64-encoded media bytes
    pub media: String,
    pub media_type: String,
}

/// Video background: an uploaded media item or a plain color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Background {
    Media(String),
    Color(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    #[serde(rename = "type")]
    pub kind: String,
    pub preset_id: String,
}

impl Animation {
    pub fn preset(preset_id: impl Into<String>) -> Self {
        Self {
            kind: "preset".to_string(),
            preset_id: preset_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInput {
    pub avatar_id: String,
    pub voice: Voice,
    pub background: Background,
    pub animation: Animation,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateVideoRequest {
    pub video_input: VideoInput,
}

// =============================================================================
// Response data records
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarCreated {
    pub avatar_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUploaded {
    pub media_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSubmitted {
    pub video_id: String,
}

/// Job record returned by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatusData {
    pub status: VideoJobStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl VideoStatusData {
    /// Vendor progress as a whole percentage in 0..=100.
    pub fn progress_percent(&self) -> u8 {
        self.progress
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(0.0, 100.0) as u8)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> VendorEnvelope<serde_json::Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_envelope_success() {
        let data: MediaUploaded = envelope(json!({"code": 0, "data": {"media_id": "m1"}}))
            .into_data("media-upload")
            .unwrap();
        assert_eq!(data.media_id, "m1");
    }

    #[test]
    fn test_envelope_vendor_failure_surfaces_message() {
        let err = envelope(json!({"code": 10002, "msg": "quota exceeded"}))
            .into_data::<MediaUploaded>("media-upload")
            .unwrap_err();
        match err {
            AvatarError::Vendor { code, message, .. } => {
                assert_eq!(code, 10002);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("Expected Vendor error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_vendor_failure_without_message() {
        let err = envelope(json!({"code": 1}))
            .into_data::<MediaUploaded>("media-upload")
            .unwrap_err();
        assert!(err.to_string().contains("Unknown error"));
    }

    #[test]
    fn test_envelope_malformed_cases() {
        for body in [
            json!({"data": {"media_id": "m1"}}),
            json!({"code": 0}),
            json!({"code": 0, "data": {"id": "m1"}}),
        ] {
            let err = envelope(body).into_data::<MediaUploaded>("media-upload").unwrap_err();
            assert!(matches!(err, AvatarError::MalformedResponse { .. }));
        }
    }

    #[test]
    fn test_background_serialization() {
        let media = serde_json::to_value(Background::Media("m1".into())).unwrap();
        assert_eq!(media, json!({"type": "media", "value": "m1"}));

        let color = serde_json::to_value(Background::Color("#ffffff".into())).unwrap();
        assert_eq!(color, json!({"type": "color", "value": "#ffffff"}));
    }

    #[test]
    fn test_status_progress_clamped() {
        let data: VideoStatusData =
            serde_json::from_value(json!({"status": "processing", "progress": 140.5})).unwrap();
        assert_eq!(data.progress_percent(), 100);

        let data: VideoStatusData = serde_json::from_value(json!({"status": "queued"})).unwrap();
        assert_eq!(data.progress_percent(), 0);
    }
}
