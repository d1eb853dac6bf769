//! Pipeline orchestrator.
//!
//! One run is strictly linear:
//! generate scene -> upload scene -> create avatar -> submit video -> poll.
//! The first error aborts the run; nothing is retried.

use std::future::Future;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use scenecast_models::{
    GenerationRequest, PipelineOutcome, PipelineStage, RunId, VideoJobId,
};

use crate::clock::{Clock, TokioClock};
use crate::config::PipelineSettings;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::observer::{ProgressObserver, ProgressTracker};
use crate::poll::{PollDecision, PollState, SUBMITTED_PROGRESS};
use crate::service::{AvatarVideoService, SceneImageGenerator};

/// Progress after the scene image is generated.
pub const SCENE_GENERATED_PROGRESS: u8 = 20;
/// Progress after the scene image is uploaded.
pub const SCENE_UPLOADED_PROGRESS: u8 = 40;
/// Progress after the avatar is created.
pub const AVATAR_CREATED_PROGRESS: u8 = 60;

const OPERATION: &str = "scene_video";

/// Drives one generation request through both vendors.
pub struct Pipeline<G, A, C = TokioClock> {
    images: G,
    avatars: A,
    clock: C,
    settings: PipelineSettings,
}

impl<G, A> Pipeline<G, A, TokioClock>
where
    G: SceneImageGenerator,
    A: AvatarVideoService,
{
    pub fn new(images: G, avatars: A, settings: PipelineSettings) -> Self {
        Self {
            images,
            avatars,
            clock: TokioClock,
            settings,
        }
    }
}

impl<G, A, C> Pipeline<G, A, C>
where
    G: SceneImageGenerator,
    A: AvatarVideoService,
    C: Clock,
{
    /// Replace the clock used between status reads.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Pipeline<G, A, C2> {
        Pipeline {
            images: self.images,
            avatars: self.avatars,
            clock,
            settings: self.settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn images(&self) -> &G {
        &self.images
    }

    pub fn avatars(&self) -> &A {
        &self.avatars
    }

    /// Run one request to a terminal outcome.
    ///
    /// Returns `Ok` for a completed video, a vendor-reported failure and a
    /// poll timeout. Validation, vendor and transport errors and cancellation
    /// come back as `Err` after `on_error` has been sent to the observer.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> PipelineResult<PipelineOutcome> {
        let logger = RunLogger::new(&RunId::new(), OPERATION);
        let span = logger.create_span();

        let result = self
            .execute(request, observer, cancel, &logger)
            .instrument(span)
            .await;

        match &result {
            Ok(outcome) => metrics::record_run(outcome.stage().as_str()),
            Err(e) => {
                metrics::record_run(e.kind().as_str());
                let message = e.to_string();
                logger.log_error(&message);
                observer.on_stage(PipelineStage::Failed);
                observer.on_error(&message);
            }
        }

        result
    }

    async fn execute(
        &self,
        request: &GenerationRequest,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
        logger: &RunLogger,
    ) -> PipelineResult<PipelineOutcome> {
        request.validate()?;

        let preset_id = request.preset_id();
        logger.log_start(&format!(
            "{} photos, action {} ({})",
            request.photos.len(),
            request.action,
            preset_id
        ));

        let mut tracker = ProgressTracker::new();

        self.enter(PipelineStage::SceneGenerating, observer, cancel, logger)?;
        let scene = timed(
            PipelineStage::SceneGenerating,
            self.images.generate_image(
                &request.scene_prompt,
                self.settings.scene_width,
                self.settings.scene_height,
            ),
        )
        .await?;
        observer.on_log(&format!("Scene image generated ({} bytes)", scene.len()));
        tracker.report(SCENE_GENERATED_PROGRESS, observer);

        self.enter(PipelineStage::SceneUploading, observer, cancel, logger)?;
        let media_id = timed(
            PipelineStage::SceneUploading,
            self.avatars.upload_media(&scene),
        )
        .await?;
        drop(scene);
        observer.on_log(&format!("Scene uploaded as media {}", media_id));
        tracker.report(SCENE_UPLOADED_PROGRESS, observer);

        self.enter(PipelineStage::AvatarCreating, observer, cancel, logger)?;
        let avatar_name = format!("avatar_{}", Utc::now().timestamp());
        let avatar_id = timed(
            PipelineStage::AvatarCreating,
            self.avatars.create_avatar(&request.photos, &avatar_name),
        )
        .await?;
        observer.on_log(&format!("Avatar {} created", avatar_id));
        tracker.report(AVATAR_CREATED_PROGRESS, observer);

        self.enter(PipelineStage::VideoSubmitting, observer, cancel, logger)?;
        let job_id = timed(
            PipelineStage::VideoSubmitting,
            self.avatars
                .generate_video(&avatar_id, &request.script, Some(&media_id), preset_id),
        )
        .await?;
        observer.on_log(&format!("Video job {} submitted", job_id));
        tracker.report(SUBMITTED_PROGRESS, observer);

        self.enter(PipelineStage::VideoPolling, observer, cancel, logger)?;
        let outcome = self
            .poll(&job_id, observer, cancel, logger, &mut tracker)
            .await?;

        tracker.report(100, observer);
        observer.on_stage(outcome.stage());
        observer.on_finish(&outcome);

        match &outcome {
            PipelineOutcome::Completed { video_url, .. } => {
                logger.log_completion(&format!("video ready at {}", video_url))
            }
            PipelineOutcome::Failed { message, .. } => {
                logger.log_warning(&format!("vendor failed job {}: {}", job_id, message))
            }
            PipelineOutcome::TimedOut { .. } => logger.log_warning(&format!(
                "job {} still running after {} status reads",
                job_id, self.settings.poll.max_attempts
            )),
        }

        Ok(outcome)
    }

    fn enter(
        &self,
        stage: PipelineStage,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
        logger: &RunLogger,
    ) -> PipelineResult<()> {
        if cancel.is_cancelled() {
            return Err(PipelineError::cancelled(stage));
        }
        logger.log_stage(stage);
        observer.on_stage(stage);
        Ok(())
    }

    /// Read job status until it is terminal or the attempt budget is spent.
    async fn poll(
        &self,
        job_id: &VideoJobId,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
        logger: &RunLogger,
        tracker: &mut ProgressTracker,
    ) -> PipelineResult<PipelineOutcome> {
        let stage = PipelineStage::VideoPolling;
        let policy = self.settings.poll.clone();
        let mut state = PollState::new(policy.clone());
        let start = Instant::now();

        let result = loop {
            if state.is_exhausted() {
                break Ok(PipelineOutcome::TimedOut {
                    job_id: job_id.clone(),
                });
            }
            if cancel.is_cancelled() {
                break Err(PipelineError::cancelled(stage));
            }

            let job = match self.avatars.check_status(job_id).await {
                Ok(job) => job,
                Err(e) => break Err(e.into()),
            };

            match state.observe(&job) {
                PollDecision::Wait { progress } => {
                    tracker.report(progress, observer);
                    let line = format!(
                        "Video {}, vendor progress {}% ({}/{})",
                        job.status,
                        job.progress,
                        state.attempt(),
                        policy.max_attempts
                    );
                    logger.log_progress(&line);
                    observer.on_log(&line);

                    if cancel.is_cancelled() {
                        break Err(PipelineError::cancelled(stage));
                    }
                    tokio::select! {
                        _ = cancel.cancelled() => break Err(PipelineError::cancelled(stage)),
                        _ = self.clock.sleep(policy.interval) => {}
                    }
                }
                PollDecision::Completed { video_url } => {
                    break Ok(PipelineOutcome::Completed {
                        job_id: job_id.clone(),
                        video_url,
                    })
                }
                PollDecision::Failed { message } => {
                    break Ok(PipelineOutcome::Failed {
                        job_id: job_id.clone(),
                        message,
                    })
                }
                PollDecision::MissingResultUrl => {
                    break Err(PipelineError::malformed(
                        stage,
                        "job completed without a video url",
                    ))
                }
                PollDecision::TimedOut => {
                    break Ok(PipelineOutcome::TimedOut {
                        job_id: job_id.clone(),
                    })
                }
            }
        };

        metrics::record_poll_attempts(state.attempt());
        metrics::record_stage(stage.as_str(), result.is_ok(), elapsed_ms(start));
        result
    }
}

/// Await a stage call and record its duration.
async fn timed<T, E, F>(stage: PipelineStage, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = call.await;
    metrics::record_stage(stage.as_str(), result.is_ok(), elapsed_ms(start));
    result
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
