//! MNE binary source estimate (`.stc`) decoding.
//!
//! File layout, all fields big-endian:
//!
//! - `f32` tmin, in milliseconds
//! - `f32` tstep, in milliseconds
//! - `i32` vertex count
//! - `i32` x count: vertex indices
//! - `i32` time count
//! - `f32` x (count x times): data, one full vertex slice per time point
//!
//! Times are stored in milliseconds and converted to seconds on load.

use crate::error::{StcError, StcResult};
use crate::SourceEstimate;

pub(crate) fn take<'a>(data: &'a [u8], offset: &mut usize, needed: usize) -> StcResult<&'a [u8]> {
    let end = offset.checked_add(needed).ok_or(StcError::Truncated {
        offset: *offset,
        needed,
        available: data.len().saturating_sub(*offset),
    })?;
    if data.len() < end {
        return Err(StcError::Truncated {
            offset: *offset,
            needed,
            available: data.len().saturating_sub(*offset),
        });
    }
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}

pub(crate) fn read_f32(data: &[u8], offset: &mut usize) -> StcResult<f32> {
    let b = take(data, offset, 4)?;
    Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

pub(crate) fn read_i32(data: &[u8], offset: &mut usize) -> StcResult<i32> {
    let b = take(data, offset, 4)?;
    Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Parse a `.stc` payload.
pub fn parse_stc(data: &[u8]) -> StcResult<SourceEstimate> {
    let mut offset = 0;

    let tmin_ms = read_f32(data, &mut offset)?;
    let tstep_ms = read_f32(data, &mut offset)?;
    if !tmin_ms.is_finite() || !tstep_ms.is_finite() {
        return Err(StcError::InvalidFormat(
            "non-finite time header fields".to_string(),
        ));
    }

    let n_vertices = read_i32(data, &mut offset)?;
    if n_vertices < 0 {
        return Err(StcError::InvalidFormat(format!(
            "negative vertex count: {}",
            n_vertices
        )));
    }
    let n_vertices = n_vertices as usize;

    let vertex_bytes = take(data, &mut offset, n_vertices * 4)?;
    let mut vertices = Vec::with_capacity(n_vertices);
    for chunk in vertex_bytes.chunks_exact(4) {
        let v = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if v < 0 {
            return Err(StcError::InvalidFormat(format!(
                "negative vertex index: {}",
                v
            )));
        }
        vertices.push(v as u32);
    }

    let n_times = read_i32(data, &mut offset)?;
    if n_times <= 0 {
        return Err(StcError::InvalidFormat(format!(
            "file contains no time points (count {})",
            n_times
        )));
    }
    let n_times = n_times as usize;
    if n_times > 1 && tstep_ms <= 0.0 {
        return Err(StcError::InvalidFormat(format!(
            "non-positive time step: {} ms",
            tstep_ms
        )));
    }

    let n_values = n_vertices
        .checked_mul(n_times)
        .ok_or_else(|| StcError::InvalidFormat("vertex/time counts overflow".to_string()))?;
    let value_bytes = take(data, &mut offset, n_values * 4)?;
    let mut values = Vec::with_capacity(n_values);
    for chunk in value_bytes.chunks_exact(4) {
        values.push(f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    if offset != data.len() {
        return Err(StcError::InvalidFormat(format!(
            "{} trailing bytes after data section",
            data.len() - offset
        )));
    }

    SourceEstimate::new(vertices, values, tmin_ms / 1000.0, tstep_ms / 1000.0, n_times)
}
