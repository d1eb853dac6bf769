//! Service seams between the orchestrator and the vendor clients.

use async_trait::async_trait;

use scenecast_avatar::{AvatarClient, AvatarResult};
use scenecast_imagegen::{ImageGenClient, ImageGenResult};
use scenecast_models::{AvatarId, MediaId, VideoJob, VideoJobId};

/// Produces scene images from text.
#[async_trait]
pub trait SceneImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str, width: u32, height: u32)
        -> ImageGenResult<Vec<u8>>;
}

/// Avatar creation, media upload and video job calls.
#[async_trait]
pub trait AvatarVideoService: Send + Sync {
    async fn upload_media(&self, image: &[u8]) -> AvatarResult<MediaId>;

    async fn create_avatar(&self, photos: &[Vec<u8>], name: &str) -> AvatarResult<AvatarId>;

    async fn generate_video(
        &self,
        avatar_id: &AvatarId,
        script: &str,
        background: Option<&MediaId>,
        preset_id: &str,
    ) -> AvatarResult<VideoJobId>;

    async fn check_status(&self, job_id: &VideoJobId) -> AvatarResult<VideoJob>;
}

#[async_trait]
impl SceneImageGenerator for ImageGenClient {
    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> ImageGenResult<Vec<u8>> {
        ImageGenClient::generate_image(self, prompt, width, height).await
    }
}

#[async_trait]
impl AvatarVideoService for AvatarClient {
    async fn upload_media(&self, image: &[u8]) -> AvatarResult<MediaId> {
        AvatarClient::upload_media(self, image).await
    }

    async fn create_avatar(&self, photos: &[Vec<u8>], name: &str) -> AvatarResult<AvatarId> {
        AvatarClient::create_avatar(self, photos, name).await
    }

    async fn generate_video(
        &self,
        avatar_id: &AvatarId,
        script: &str,
        background: Option<&MediaId>,
        preset_id: &str,
    ) -> AvatarResult<VideoJobId> {
        AvatarClient::generate_video(self, avatar_id, script, background, preset_id).await
    }

    async fn check_status(&self, job_id: &VideoJobId) -> AvatarResult<VideoJob> {
        AvatarClient::check_status(self, job_id).await
    }
}
