//! The animation endpoint: multipart form in, GIF attachment out.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use stc_common::{
    BackgroundColor, BrainError, BrainResult, Colormap, CortexStyle, Hemisphere, RenderOptions,
    SamplingOptions, ViewAngle,
};

use crate::job::{self, FinishedAnimation, Upload};
use crate::metrics;
use crate::state::AppState;

/// POST /generate - run one animation job and return the artifact.
pub async fn generate_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    metrics::record_generate_request();
    match run(state, multipart).await {
        Ok(animation) => {
            let disposition = format!("attachment; filename=\"{}\"", animation.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/gif".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                animation.payload,
            )
                .into_response()
        }
        Err(err) => {
            metrics::record_job_failure(&err);
            error_response(&err)
        }
    }
}

async fn run(state: Arc<AppState>, multipart: Multipart) -> BrainResult<FinishedAnimation> {
    let mut form = read_form(multipart).await?;

    // No decoding or rendering happens for an absent or empty upload.
    let upload = match form.upload.take() {
        Some(upload) if !upload.filename.is_empty() && !upload.bytes.is_empty() => upload,
        _ => return Err(BrainError::MissingUpload),
    };
    let (options, sampling) = parse_parameters(&form)?;

    info!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        hemi = %options.hemisphere,
        views = options.views.len(),
        "Starting animation job"
    );

    tokio::task::spawn_blocking(move || job::run_job(&state, upload, &options, &sampling))
        .await
        .map_err(|e| BrainError::InternalError(format!("render task failed: {}", e)))?
}

fn error_response(err: &BrainError) -> Response {
    let message = match err {
        BrainError::MissingUpload => err.to_string(),
        _ => format!("An error occurred during GIF generation: {}", err),
    };
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!(status = %status, error = %err, "Animation request failed");
    (
        status,
        Json(serde_json::json!({ "success": false, "message": message })),
    )
        .into_response()
}

// ============================================================================
// Multipart form decoding
// ============================================================================

/// Form fields accumulated from the multipart body. Absent fields keep the
/// documented defaults.
#[derive(Default)]
struct GenerateForm {
    upload: Option<Upload>,
    colormap: Option<String>,
    transparent: bool,
    background: Option<String>,
    colorbar: bool,
    cortex: Option<String>,
    hemi: Option<String>,
    views: Vec<String>,
    smoothing_steps: Option<String>,
    time_stride: Option<String>,
    frame_duration: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> BrainResult<GenerateForm> {
    let mut form = GenerateForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BrainError::ParseError(format!("malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    BrainError::ParseError(format!("failed to read upload: {}", e))
                })?;
                form.upload = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "colormap" => form.colormap = Some(text(field).await?),
            "transparent" => form.transparent = is_on(&text(field).await?),
            "background" => form.background = Some(text(field).await?),
            "colorbar" => form.colorbar = is_on(&text(field).await?),
            "cortex" => form.cortex = Some(text(field).await?),
            "hemi" => form.hemi = Some(text(field).await?),
            "views" => form.views.push(text(field).await?),
            "smoothing_steps" => form.smoothing_steps = Some(text(field).await?),
            "time_stride" => form.time_stride = Some(text(field).await?),
            "frame_duration" => form.frame_duration = Some(text(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

async fn text(field: axum::extract::multipart::Field<'_>) -> BrainResult<String> {
    field
        .text()
        .await
        .map_err(|e| BrainError::ParseError(format!("failed to read form field: {}", e)))
}

/// Checkbox values: browsers send "on" for a bare checked box.
fn is_on(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "on" | "true" | "1")
}

fn parse_parameters(form: &GenerateForm) -> BrainResult<(RenderOptions, SamplingOptions)> {
    let mut options = RenderOptions::default();
    let mut sampling = SamplingOptions::default();

    if let Some(value) = &form.colormap {
        options.colormap = Colormap::parse(value)?;
    }
    options.transparent = form.transparent;
    if let Some(value) = &form.background {
        options.background = BackgroundColor::parse(value)?;
    }
    options.colorbar = form.colorbar;
    if let Some(value) = &form.cortex {
        options.cortex = CortexStyle::parse(value)?;
    }
    if let Some(value) = &form.hemi {
        options.hemisphere = Hemisphere::parse(value)?;
    }
    if !form.views.is_empty() {
        options.views = form
            .views
            .iter()
            .map(|v| ViewAngle::parse(v))
            .collect::<BrainResult<Vec<_>>>()?;
    }
    if let Some(value) = &form.smoothing_steps {
        options.smoothing_steps = parse_number("smoothing_steps", value)?;
    }
    if let Some(value) = &form.time_stride {
        sampling.stride = parse_number("time_stride", value)?;
    }
    if let Some(value) = &form.frame_duration {
        sampling.frame_duration = parse_number("frame_duration", value)?;
    }

    options.validate()?;
    sampling.validate()?;
    Ok((options, sampling))
}

fn parse_number<T: std::str::FromStr>(param: &str, value: &str) -> BrainResult<T> {
    value.trim().parse().map_err(|_| BrainError::InvalidParameter {
        param: param.to_string(),
        message: format!("'{}' is not a valid number", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_checkbox_values_count_as_on() {
        assert!(is_on("on"));
        assert!(is_on("true"));
        assert!(is_on("1"));
        assert!(!is_on("off"));
        assert!(!is_on(""));
    }

    #[test]
    fn absent_fields_keep_the_documented_defaults() {
        let form = GenerateForm::default();
        let (options, sampling) = parse_parameters(&form).unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(sampling.stride, 20);
        assert!((sampling.frame_duration - 0.1).abs() < 1e-6);
    }

    #[test]
    fn unknown_colormap_is_rejected_with_the_parameter_name() {
        let form = GenerateForm {
            colormap: Some("jet".to_string()),
            ..GenerateForm::default()
        };
        let err = parse_parameters(&form).unwrap_err();
        match err {
            BrainError::InvalidParameter { param, .. } => assert_eq!(param, "colormap"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn out_of_range_stride_is_rejected() {
        let form = GenerateForm {
            time_stride: Some("90".to_string()),
            ..GenerateForm::default()
        };
        assert!(parse_parameters(&form).is_err());
    }

    #[test]
    fn non_numeric_smoothing_is_rejected() {
        let form = GenerateForm {
            smoothing_steps: Some("many".to_string()),
            ..GenerateForm::default()
        };
        let err = parse_parameters(&form).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn repeated_views_accumulate_and_duplicates_fail_validation() {
        let form = GenerateForm {
            views: vec!["lateral".to_string(), "dorsal".to_string()],
            ..GenerateForm::default()
        };
        let (options, _) = parse_parameters(&form).unwrap();
        assert_eq!(options.views, vec![ViewAngle::Lateral, ViewAngle::Dorsal]);

        let form = GenerateForm {
            views: vec!["lateral".to_string(), "lateral".to_string()],
            ..GenerateForm::default()
        };
        assert!(parse_parameters(&form).is_err());
    }
}
