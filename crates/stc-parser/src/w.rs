//! FreeSurfer value file (`.w`) decoding.
//!
//! File layout, big-endian:
//!
//! - 2 pad bytes
//! - 3-byte vertex count
//! - per vertex: 3-byte vertex index, `f32` value
//!
//! A `.w` file carries one value per listed vertex and no time axis; it is
//! loaded as a single-time-point estimate (tmin 0, tstep 1).

use crate::error::{StcError, StcResult};
use crate::stc::{read_f32, take};
use crate::SourceEstimate;

fn read_u24(data: &[u8], offset: &mut usize) -> StcResult<u32> {
    let b = take(data, offset, 3)?;
    Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
}

/// Parse a `.w` payload.
pub fn parse_w(data: &[u8]) -> StcResult<SourceEstimate> {
    let mut offset = 0;

    take(data, &mut offset, 2)?; // pad
    let n_vertices = read_u24(data, &mut offset)? as usize;
    if n_vertices == 0 {
        return Err(StcError::InvalidFormat(
            "file lists no vertices".to_string(),
        ));
    }

    let mut vertices = Vec::with_capacity(n_vertices);
    let mut values = Vec::with_capacity(n_vertices);
    for _ in 0..n_vertices {
        vertices.push(read_u24(data, &mut offset)?);
        values.push(read_f32(data, &mut offset)?);
    }

    if offset != data.len() {
        return Err(StcError::InvalidFormat(format!(
            "{} trailing bytes after vertex records",
            data.len() - offset
        )));
    }

    SourceEstimate::new(vertices, values, 0.0, 1.0, 1)
}
