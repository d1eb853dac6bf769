//! Progress reporting to the presentation layer.
//!
//! The orchestrator never touches UI state directly; it reports stage
//! transitions, progress and log lines to a [`ProgressObserver`] passed in
//! per run.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use scenecast_models::{PipelineOutcome, PipelineStage, ProgressEvent};

/// Receiver of run progress.
///
/// Calls are made from the run's task, in order, and must not block.
pub trait ProgressObserver: Send + Sync {
    fn on_stage(&self, stage: PipelineStage);

    /// Overall progress in percent; never lower than the previous call.
    fn on_progress(&self, percent: u8);

    fn on_log(&self, message: &str);

    /// Final result of a run that reached a terminal vendor state.
    fn on_finish(&self, _outcome: &PipelineOutcome) {}

    /// Run aborted with an error.
    fn on_error(&self, _message: &str) {}
}

/// Observer that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_stage(&self, _stage: PipelineStage) {}
    fn on_progress(&self, _percent: u8) {}
    fn on_log(&self, _message: &str) {}
}

/// Observer that writes structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_stage(&self, stage: PipelineStage) {
        info!(stage = %stage, "{}", stage.label());
    }

    fn on_progress(&self, percent: u8) {
        debug!(progress = percent, "Progress");
    }

    fn on_log(&self, message: &str) {
        info!("{}", message);
    }

    fn on_finish(&self, outcome: &PipelineOutcome) {
        info!(
            outcome = %outcome.stage(),
            job_id = %outcome.job_id(),
            video_url = outcome.video_url().unwrap_or(""),
            "Run finished"
        );
    }

    fn on_error(&self, message: &str) {
        warn!("Run failed: {}", message);
    }
}

/// Observer that forwards [`ProgressEvent`]s over a channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Create an observer together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            debug!("Progress receiver dropped");
        }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_stage(&self, stage: PipelineStage) {
        self.send(ProgressEvent::stage(stage));
    }

    fn on_progress(&self, percent: u8) {
        self.send(ProgressEvent::progress(percent));
    }

    fn on_log(&self, message: &str) {
        self.send(ProgressEvent::log(message));
    }

    fn on_finish(&self, outcome: &PipelineOutcome) {
        let event = match outcome {
            PipelineOutcome::Completed { video_url, .. } => ProgressEvent::completed(video_url.clone()),
            PipelineOutcome::Failed { message, .. } => ProgressEvent::failed(message.clone()),
            PipelineOutcome::TimedOut { job_id } => ProgressEvent::timed_out(job_id.clone()),
        };
        self.send(event);
    }

    fn on_error(&self, message: &str) {
        self.send(ProgressEvent::failed(message));
    }
}

/// Keeps reported progress monotonic.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    current: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    /// Move to `value` (clamped to 100).
    ///
    /// Returns the new value if it is higher than the current one, `None`
    /// for a regression or repeat.
    pub fn advance(&mut self, value: u8) -> Option<u8> {
        let value = value.min(100);
        if value > self.current {
            self.current = value;
            Some(value)
        } else {
            None
        }
    }

    /// Advance and report to the observer when progress moved.
    pub fn report(&mut self, value: u8, observer: &dyn ProgressObserver) {
        if let Some(v) = self.advance(value) {
            observer.on_progress(v);
        }
    }
}
