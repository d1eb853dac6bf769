//! Pipeline metrics.
//!
//! Nothing is exported from here; values reach a backend only when the host
//! process installs a `metrics` recorder.

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Stage executions by stage and result.
    pub const STAGES_TOTAL: &str = "pipeline_stages_total";

    /// Stage duration in seconds by stage.
    pub const STAGE_DURATION_SECONDS: &str = "pipeline_stage_duration_seconds";

    /// Finished runs by outcome (or error kind).
    pub const RUNS_TOTAL: &str = "pipeline_runs_total";

    /// Status reads per polling session.
    pub const POLL_ATTEMPTS: &str = "pipeline_poll_attempts";
}

/// Record one stage execution.
pub fn record_stage(stage: &str, success: bool, duration_ms: f64) {
    counter!(
        names::STAGES_TOTAL,
        "stage" => stage.to_string(),
        "result" => if success { "ok" } else { "error" }
    )
    .increment(1);

    histogram!(
        names::STAGE_DURATION_SECONDS,
        "stage" => stage.to_string()
    )
    .record(duration_ms / 1000.0);
}

/// Record the end of a run.
pub fn record_run(result: &str) {
    counter!(names::RUNS_TOTAL, "result" => result.to_string()).increment(1);
}

pub fn record_poll_attempts(attempts: u32) {
    histogram!(names::POLL_ATTEMPTS).record(f64::from(attempts));
}
