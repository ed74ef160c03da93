//! FreeSurfer surface and curvature file decoding.
//!
//! Triangle surface files (`lh.inflated`, `rh.inflated`), big-endian:
//!
//! - 3-byte magic `0xFFFFFE`
//! - creator comment terminated by a blank line (`\n\n`)
//! - `i32` vertex count, `i32` face count
//! - `3 x f32` per vertex, `3 x i32` per face
//!
//! New-format curvature files (`lh.curv`, `rh.curv`), big-endian:
//!
//! - 3-byte magic `0xFFFFFF`
//! - `i32` vertex count, `i32` face count, `i32` values per vertex (must be 1)
//! - `f32` per vertex; positive curvature marks sulci
//!
//! Both readers ignore trailing tag sections after the payload, which real
//! FreeSurfer tools append to surface files.

use std::fs;
use std::path::Path;

use crate::error::{SurfaceError, SurfaceResult};

const TRIANGLE_FILE_MAGIC: u32 = 0xFF_FF_FE;
const QUAD_FILE_MAGIC: u32 = 0xFF_FF_FF;
const NEW_QUAD_FILE_MAGIC: u32 = 0xFF_FF_FD;
const NEW_CURV_MAGIC: u32 = 0xFF_FF_FF;

/// A triangle mesh as stored in a FreeSurfer surface file.
#[derive(Debug, Clone)]
pub struct SurfaceGeometry {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceGeometry {
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }
}

fn take<'a>(data: &'a [u8], offset: &mut usize, needed: usize) -> SurfaceResult<&'a [u8]> {
    let end = offset.checked_add(needed).ok_or(SurfaceError::Truncated {
        offset: *offset,
        needed,
        available: data.len().saturating_sub(*offset),
    })?;
    if data.len() < end {
        return Err(SurfaceError::Truncated {
            offset: *offset,
            needed,
            available: data.len().saturating_sub(*offset),
        });
    }
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}

fn read_u24(data: &[u8], offset: &mut usize) -> SurfaceResult<u32> {
    let b = take(data, offset, 3)?;
    Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
}

fn read_i32(data: &[u8], offset: &mut usize) -> SurfaceResult<i32> {
    let b = take(data, offset, 4)?;
    Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_f32(data: &[u8], offset: &mut usize) -> SurfaceResult<f32> {
    let b = take(data, offset, 4)?;
    Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_count(data: &[u8], offset: &mut usize, what: &str) -> SurfaceResult<usize> {
    let count = read_i32(data, offset)?;
    if count < 0 {
        return Err(SurfaceError::InvalidFormat(format!(
            "negative {} count: {}",
            what, count
        )));
    }
    Ok(count as usize)
}

/// Parse a FreeSurfer triangle surface file.
pub fn parse_surface(data: &[u8]) -> SurfaceResult<SurfaceGeometry> {
    let mut offset = 0;

    let magic = read_u24(data, &mut offset)?;
    match magic {
        TRIANGLE_FILE_MAGIC => {}
        QUAD_FILE_MAGIC | NEW_QUAD_FILE_MAGIC => {
            return Err(SurfaceError::UnsupportedFormat(
                "quad-format surface files are not supported".to_string(),
            ));
        }
        other => {
            return Err(SurfaceError::InvalidFormat(format!(
                "not a FreeSurfer surface file (magic {:#08x})",
                other
            )));
        }
    }

    // Creator comment runs until a blank line.
    let terminator = data[offset..]
        .windows(2)
        .position(|w| w == b"\n\n")
        .ok_or_else(|| {
            SurfaceError::InvalidFormat("unterminated creator comment".to_string())
        })?;
    offset += terminator + 2;

    let n_vertices = read_count(data, &mut offset, "vertex")?;
    let n_faces = read_count(data, &mut offset, "face")?;

    let vertex_bytes = take(data, &mut offset, n_vertices * 12)?;
    let mut vertices = Vec::with_capacity(n_vertices);
    for chunk in vertex_bytes.chunks_exact(12) {
        vertices.push([
            f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            f32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
            f32::from_be_bytes([chunk[8], chunk[9], chunk[10], chunk[11]]),
        ]);
    }

    let face_bytes = take(data, &mut offset, n_faces * 12)?;
    let mut faces = Vec::with_capacity(n_faces);
    for chunk in face_bytes.chunks_exact(12) {
        let mut face = [0u32; 3];
        for (i, idx_bytes) in chunk.chunks_exact(4).enumerate() {
            let idx = i32::from_be_bytes([idx_bytes[0], idx_bytes[1], idx_bytes[2], idx_bytes[3]]);
            if idx < 0 || idx as usize >= n_vertices {
                return Err(SurfaceError::InvalidFormat(format!(
                    "face references vertex {} (surface has {})",
                    idx, n_vertices
                )));
            }
            face[i] = idx as u32;
        }
        faces.push(face);
    }

    Ok(SurfaceGeometry { vertices, faces })
}

/// Parse a FreeSurfer new-format curvature file, returning one value per
/// vertex.
pub fn parse_curv(data: &[u8]) -> SurfaceResult<Vec<f32>> {
    let mut offset = 0;

    let magic = read_u24(data, &mut offset)?;
    if magic != NEW_CURV_MAGIC {
        return Err(SurfaceError::UnsupportedFormat(format!(
            "not a new-format curvature file (magic {:#08x})",
            magic
        )));
    }

    let n_vertices = read_count(data, &mut offset, "vertex")?;
    let _n_faces = read_count(data, &mut offset, "face")?;
    let vals_per_vertex = read_i32(data, &mut offset)?;
    if vals_per_vertex != 1 {
        return Err(SurfaceError::InvalidFormat(format!(
            "expected 1 value per vertex, got {}",
            vals_per_vertex
        )));
    }

    let mut values = Vec::with_capacity(n_vertices);
    for _ in 0..n_vertices {
        values.push(read_f32(data, &mut offset)?);
    }
    Ok(values)
}

/// Read and parse a surface file from disk.
pub fn load_surface(path: &Path) -> SurfaceResult<SurfaceGeometry> {
    let data = fs::read(path)?;
    parse_surface(&data)
}

/// Read and parse a curvature file from disk.
pub fn load_curv(path: &Path) -> SurfaceResult<Vec<f32>> {
    let data = fs::read(path)?;
    parse_curv(&data)
}
