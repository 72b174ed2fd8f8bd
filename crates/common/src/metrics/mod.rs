//! Metrics and observability utilities
//!
//! Prometheus metrics for the analysis pipeline with
//! standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ThesisAI metrics
pub const METRICS_PREFIX: &str = "thesisai";

/// Buckets for model call and full run latency (in seconds)
pub const ANALYSIS_BUCKETS: &[f64] = &[
    1.0,    // 1s
    2.5,    // 2.5s
    5.0,    // 5s
    10.0,   // 10s
    20.0,   // 20s
    30.0,   // 30s
    60.0,   // 1m
    90.0,   // 1.5m
    120.0,  // 2m - default model timeout
    180.0,  // 3m
    300.0,  // 5m
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Document metrics
    describe_counter!(
        format!("{}_documents_uploaded_total", METRICS_PREFIX),
        Unit::Count,
        "Total documents uploaded"
    );

    describe_counter!(
        format!("{}_documents_deleted_total", METRICS_PREFIX),
        Unit::Count,
        "Total documents deleted"
    );

    // Analysis metrics
    describe_counter!(
        format!("{}_analyses_requested_total", METRICS_PREFIX),
        Unit::Count,
        "Total analysis runs requested"
    );

    describe_counter!(
        format!("{}_analyses_completed_total", METRICS_PREFIX),
        Unit::Count,
        "Total analysis runs completed"
    );

    describe_counter!(
        format!("{}_analyses_failed_total", METRICS_PREFIX),
        Unit::Count,
        "Total analysis runs failed"
    );

    describe_histogram!(
        format!("{}_analysis_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "End-to-end analysis run latency in seconds"
    );

    // Model call metrics
    describe_counter!(
        format!("{}_ai_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total model API requests"
    );

    describe_histogram!(
        format!("{}_ai_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Model API call latency in seconds"
    );

    describe_counter!(
        format!("{}_ai_tokens_total", METRICS_PREFIX),
        Unit::Count,
        "Total tokens consumed by model calls"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record an accepted upload
pub fn record_upload(format: &str, word_count: usize) {
    counter!(
        format!("{}_documents_uploaded_total", METRICS_PREFIX),
        "format" => format.to_string()
    )
    .increment(1);

    tracing::debug!(format, word_count, "Upload recorded");
}

/// Helper to record a document deletion
pub fn record_delete() {
    counter!(format!("{}_documents_deleted_total", METRICS_PREFIX)).increment(1);
}

/// Helper to record an accepted analysis request
pub fn record_analysis_requested(kind: &str) {
    counter!(
        format!("{}_analyses_requested_total", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Helper to record the terminal outcome of an analysis run.
/// Failed runs are labelled with the failure kind.
pub fn record_analysis_outcome(kind: &str, duration_secs: f64, failure: Option<&str>) {
    match failure {
        None => counter!(
            format!("{}_analyses_completed_total", METRICS_PREFIX),
            "kind" => kind.to_string()
        )
        .increment(1),
        Some(reason) => counter!(
            format!("{}_analyses_failed_total", METRICS_PREFIX),
            "kind" => kind.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1),
    }

    histogram!(
        format!("{}_analysis_duration_seconds", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .record(duration_secs);
}

/// Helper to record model call metrics
pub fn record_ai_call(duration_secs: f64, model: &str, tokens: Option<u64>, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_ai_requests_total", METRICS_PREFIX),
        "model" => model.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_ai_request_duration_seconds", METRICS_PREFIX),
        "model" => model.to_string(),
        "status" => status.to_string()
    )
    .record(duration_secs);

    if let Some(tokens) = tokens {
        counter!(
            format!("{}_ai_tokens_total", METRICS_PREFIX),
            "model" => model.to_string()
        )
        .increment(tokens);
    }
}
