//! Metric recording helpers for the animation service.

use std::time::Duration;

use metrics::{counter, histogram};

use stc_common::BrainError;

/// Record a page load.
pub fn record_page_request() {
    counter!("brain_page_requests_total").increment(1);
}

/// Record a generation request, before any validation.
pub fn record_generate_request() {
    counter!("brain_generate_requests_total").increment(1);
}

/// Record a completed job with its duration and frame count.
pub fn record_job_success(duration: Duration, frames: usize) {
    counter!("brain_jobs_completed_total").increment(1);
    histogram!("brain_job_duration_seconds").record(duration.as_secs_f64());
    histogram!("brain_job_frames").record(frames as f64);
}

/// Record a failed request, attributed to a pipeline stage.
pub fn record_job_failure(err: &BrainError) {
    counter!("brain_job_failures_total", "stage" => failure_stage(err)).increment(1);
}

/// Pipeline stage a failure is attributed to.
pub fn failure_stage(err: &BrainError) -> &'static str {
    match err {
        BrainError::MissingUpload | BrainError::InvalidParameter { .. } => "request",
        BrainError::UnsupportedFormat(_) | BrainError::ParseError(_) => "decode",
        BrainError::SurfaceMismatch { .. } | BrainError::SurfaceUnavailable(_) => "surface",
        BrainError::RenderError(_) => "render",
        BrainError::EncodeError(_) => "encode",
        BrainError::InternalError(_) => "internal",
    }
}
