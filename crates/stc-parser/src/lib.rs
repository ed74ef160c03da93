//! Source estimate file parsing.
//!
//! This crate provides a pure Rust implementation for decoding the two
//! source-estimate formats accepted by the upload form:
//!
//! - `.stc`: MNE binary source estimates, a time series of activity values
//!   over a set of cortical surface vertices,
//! - `.w`: FreeSurfer value files, a single activity value per vertex,
//!   loaded as a one-time-point estimate.
//!
//! Both formats are big-endian and are decoded from in-memory byte slices
//! with explicit bounds checks; no external decoding library is involved.

pub mod error;
pub mod stc;
pub mod w;

pub use error::{StcError, StcResult};

use stc_common::HemiSide;

/// A decoded source estimate: activity values over a subset of cortical
/// surface vertices, sampled at regular time intervals.
#[derive(Debug, Clone)]
pub struct SourceEstimate {
    /// Surface vertex indices carrying data, strictly increasing.
    pub vertices: Vec<u32>,
    /// Samples in file order, one full vertex slice per time point:
    /// `data[t * vertices.len() + v]`.
    pub data: Vec<f32>,
    /// Time of the first sample, in seconds.
    pub tmin: f32,
    /// Spacing between samples, in seconds.
    pub tstep: f32,
    n_times: usize,
}

impl SourceEstimate {
    /// Build an estimate after checking the internal consistency of its parts.
    pub fn new(
        vertices: Vec<u32>,
        data: Vec<f32>,
        tmin: f32,
        tstep: f32,
        n_times: usize,
    ) -> StcResult<Self> {
        let expected = vertices
            .len()
            .checked_mul(n_times)
            .ok_or_else(|| StcError::InvalidFormat("vertex/time counts overflow".to_string()))?;
        if data.len() != expected {
            return Err(StcError::InvalidFormat(format!(
                "data length {} does not match {} vertices x {} time points",
                data.len(),
                vertices.len(),
                n_times
            )));
        }
        for pair in vertices.windows(2) {
            if pair[1] <= pair[0] {
                return Err(StcError::InvalidFormat(format!(
                    "vertex indices not strictly increasing ({} then {})",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self {
            vertices,
            data,
            tmin,
            tstep,
            n_times,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Time of sample `t_idx`, in seconds.
    pub fn time_at(&self, t_idx: usize) -> f32 {
        self.tmin + self.tstep * t_idx as f32
    }

    /// All vertex values at one time point, in `vertices` order.
    pub fn values_at(&self, t_idx: usize) -> &[f32] {
        let n = self.vertices.len();
        &self.data[t_idx * n..(t_idx + 1) * n]
    }

    /// Indices of the time points sampled with the given stride, ascending.
    /// The count is always `ceil(n_times / stride)`.
    pub fn sample_indices(&self, stride: u32) -> Vec<usize> {
        (0..self.n_times).step_by(stride.max(1) as usize).collect()
    }

    /// Largest vertex index referenced by the estimate, if any.
    pub fn max_vertex(&self) -> Option<u32> {
        self.vertices.last().copied()
    }
}

/// Decode an uploaded source estimate, selecting the format by file
/// extension. Returns the estimate together with the hemisphere the file
/// is labeled for.
pub fn read_source_estimate(filename: &str, data: &[u8]) -> StcResult<(SourceEstimate, HemiSide)> {
    let (stem, ext) = split_extension(filename);
    let estimate = match ext.to_ascii_lowercase().as_str() {
        "stc" => stc::parse_stc(data)?,
        "w" => w::parse_w(data)?,
        _ => return Err(StcError::UnsupportedExtension(filename.to_string())),
    };
    Ok((estimate, infer_side(stem)))
}

fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (filename, ""),
    }
}

/// Infer which hemisphere a file is labeled for. MNE names estimates
/// `name-lh.stc` / `name-rh.stc`; FreeSurfer value files commonly carry the
/// hemisphere as a `lh.` / `rh.` prefix. Unlabeled files default to left.
fn infer_side(stem: &str) -> HemiSide {
    if stem.ends_with("-rh") || stem.starts_with("rh.") || stem == "rh" {
        HemiSide::Right
    } else {
        HemiSide::Left
    }
}
