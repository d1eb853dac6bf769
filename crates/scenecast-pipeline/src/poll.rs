//! Video job polling policy.
//!
//! `PollState` is a pure state machine: it sees one job snapshot per attempt
//! and decides what the orchestrator does next. Sleeping and I/O stay with
//! the caller.

use std::time::Duration;

use scenecast_models::{VideoJob, VideoJobStatus};

/// Progress reported once the video job has been submitted.
pub const SUBMITTED_PROGRESS: u8 = 80;

/// Highest progress reported while the job is still running.
pub const MAX_POLLING_PROGRESS: u8 = 99;

/// Message used when the vendor fails a job without saying why.
pub const UNKNOWN_FAILURE: &str = "Unknown error";

/// Fixed-count polling schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Status reads before giving up
    pub max_attempts: u32,
    /// Delay between consecutive reads
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(10),
        }
    }
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Create policy from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: std::env::var("PIPELINE_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.max_attempts),
            interval: std::env::var("PIPELINE_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
        }
    }

    /// Progress shown after the given 1-based attempt.
    pub fn progress_for_attempt(&self, attempt: u32) -> u8 {
        if self.max_attempts == 0 {
            return MAX_POLLING_PROGRESS;
        }
        let step = 20 * u64::from(attempt) / u64::from(self.max_attempts);
        (u64::from(SUBMITTED_PROGRESS) + step).min(u64::from(MAX_POLLING_PROGRESS)) as u8
    }
}

/// What to do after observing a job snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Job still running; sleep one interval and read again
    Wait { progress: u8 },
    Completed { video_url: String },
    Failed { message: String },
    /// Job reported completion without a result URL
    MissingResultUrl,
    /// Last attempt used and the job is still running
    TimedOut,
}

/// Attempt counter for one polling session.
#[derive(Debug, Clone)]
pub struct PollState {
    policy: PollPolicy,
    attempt: u32,
}

impl PollState {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Attempts made so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.policy.max_attempts
    }

    pub fn progress_for_attempt(&self, attempt: u32) -> u8 {
        self.policy.progress_for_attempt(attempt)
    }

    /// Record one status read and decide the next step.
    pub fn observe(&mut self, job: &VideoJob) -> PollDecision {
        self.attempt += 1;

        match job.status {
            VideoJobStatus::Completed => match job.result_url.as_deref() {
                Some(url) if !url.trim().is_empty() => PollDecision::Completed {
                    video_url: url.to_string(),
                },
                _ => PollDecision::MissingResultUrl,
            },
            VideoJobStatus::Failed => PollDecision::Failed {
                message: job
                    .error_message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            },
            VideoJobStatus::Queued | VideoJobStatus::Processing | VideoJobStatus::Unknown => {
                if self.is_exhausted() {
                    PollDecision::TimedOut
                } else {
                    PollDecision::Wait {
                        progress: self.progress_for_attempt(self.attempt),
                    }
                }
            }
        }
    }
}
