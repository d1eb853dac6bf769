//! Avatar vendor request metrics.

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Total vendor requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "avatar_vendor_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "avatar_vendor_latency_seconds";

    /// Non-zero embedded vendor codes by operation.
    pub const VENDOR_ERRORS_TOTAL: &str = "avatar_vendor_errors_total";
}

/// Record metrics for a completed vendor request.
///
/// `status` is 0 when no HTTP response was received.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a vendor-level rejection carried inside a 2xx response.
pub fn record_vendor_error(operation: &str, code: i64) {
    counter!(
        names::VENDOR_ERRORS_TOTAL,
        "operation" => operation.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}
