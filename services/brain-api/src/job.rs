//! The render job: uploaded bytes in, finished GIF out.
//!
//! Jobs run synchronously on a blocking worker and share no mutable state;
//! everything request-scoped, including the background mode, travels in the
//! options passed down the call chain. All intermediate artifacts live in a
//! per-job temporary directory removed on drop, success or failure.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tempfile::TempDir;
use tracing::info;

use brain_renderer::{
    assemble_gif, delay_centiseconds, encode_png, ActivityScale, FrameRenderer, HemiScene,
    RenderError, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use stc_common::{BrainError, BrainResult, HemiSide, RenderOptions, SamplingOptions};
use stc_parser::{read_source_estimate, StcError};
use surface::SurfaceError;

use crate::metrics;
use crate::state::{AppState, PreparedHemi};

/// An uploaded source estimate as received from the form.
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Output of a finished job.
pub struct FinishedAnimation {
    pub payload: Vec<u8>,
    pub filename: String,
}

/// Run one animation job start to finish.
pub fn run_job(
    state: &AppState,
    upload: Upload,
    options: &RenderOptions,
    sampling: &SamplingOptions,
) -> BrainResult<FinishedAnimation> {
    let started = Instant::now();
    let surfaces = state.surfaces_blocking()?;

    let workdir = TempDir::new()?;

    // Persist the upload under its client name, stripped of any path parts.
    let safe_name = Path::new(&upload.filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BrainError::ParseError("upload filename is not usable".to_string()))?
        .to_string();
    let upload_path = workdir.path().join(&safe_name);
    fs::write(&upload_path, &upload.bytes)?;
    let raw = fs::read(&upload_path)?;

    let (estimate, data_side) = read_source_estimate(&safe_name, &raw).map_err(decode_error)?;
    let hemi = surfaces.hemi(data_side);
    if let Some(max) = estimate.max_vertex() {
        if (max as usize) >= hemi.n_vertices() {
            return Err(BrainError::SurfaceMismatch {
                index: max as usize,
                vertex_count: hemi.n_vertices(),
            });
        }
    }

    // Display thresholds come from the whole estimate so the color scale is
    // constant across frames.
    let scale = ActivityScale::from_data(&estimate.data);

    let renderer = FrameRenderer::new(
        Some(scene(&surfaces.left)),
        Some(scene(&surfaces.right)),
        options,
        scale,
        state.font.as_ref(),
    )
    .map_err(render_error)?;

    let samples = estimate.sample_indices(sampling.stride);
    info!(
        filename = %safe_name,
        n_times = estimate.n_times(),
        frames = samples.len(),
        side = %data_side,
        "Rendering frames"
    );

    let frames_dir = workdir.path().join("frames");
    fs::create_dir(&frames_dir)?;
    for (i, &t_idx) in samples.iter().enumerate() {
        let full = surface::spread_activity(
            &hemi.adjacency,
            &estimate.vertices,
            estimate.values_at(t_idx),
            options.smoothing_steps,
        )
        .map_err(smoothing_error)?;
        let (left_activity, right_activity) = match data_side {
            HemiSide::Left => (Some(full.as_slice()), None),
            HemiSide::Right => (None, Some(full.as_slice())),
        };
        let label = if estimate.n_times() > 1 {
            Some(format!("t = {:.0} ms", estimate.time_at(t_idx) * 1000.0))
        } else {
            None
        };
        let frame = renderer
            .render_frame(left_activity, right_activity, label.as_deref())
            .map_err(render_error)?;
        let png = encode_png(frame.as_raw(), CANVAS_WIDTH, CANVAS_HEIGHT)
            .map_err(|e| BrainError::EncodeError(e.to_string()))?;
        fs::write(frames_dir.join(format!("frame_{:03}.png", i)), png)?;
    }

    // Re-read the stills in sorted name order, equal to time order.
    let mut frame_files = Vec::new();
    for entry in fs::read_dir(&frames_dir)? {
        frame_files.push(entry?.path());
    }
    frame_files.sort();
    let mut stills = Vec::with_capacity(frame_files.len());
    for path in &frame_files {
        let data = fs::read(path)?;
        let still = image::load_from_memory(&data)
            .map_err(|e| {
                BrainError::InternalError(format!(
                    "failed to re-read frame {}: {}",
                    path.display(),
                    e
                ))
            })?
            .to_rgba8();
        stills.push(still);
    }

    let payload = assemble_gif(&stills, delay_centiseconds(sampling.frame_duration))
        .map_err(|e| BrainError::EncodeError(e.to_string()))?;
    fs::write(workdir.path().join("brain_animation.gif"), &payload)?;

    metrics::record_job_success(started.elapsed(), stills.len());
    info!(
        frames = stills.len(),
        bytes = payload.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Animation assembled"
    );

    Ok(FinishedAnimation {
        payload,
        filename: options.hemisphere.artifact_filename(),
    })
    // workdir drops here, taking the upload, stills, and gif with it
}

fn scene(hemi: &PreparedHemi) -> HemiScene<'_> {
    HemiScene {
        geometry: &hemi.surface.geometry,
        curvature: &hemi.surface.curvature,
        normals: &hemi.normals,
    }
}

fn decode_error(err: StcError) -> BrainError {
    match err {
        StcError::UnsupportedExtension(name) => BrainError::UnsupportedFormat(name),
        other => BrainError::ParseError(other.to_string()),
    }
}

fn render_error(err: RenderError) -> BrainError {
    BrainError::RenderError(err.to_string())
}

fn smoothing_error(err: SurfaceError) -> BrainError {
    match err {
        SurfaceError::VertexOutOfRange {
            index,
            vertex_count,
        } => BrainError::SurfaceMismatch {
            index,
            vertex_count,
        },
        other => BrainError::RenderError(other.to_string()),
    }
}
