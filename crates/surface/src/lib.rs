//! Cortical surface geometry for the brain-animator services.
//!
//! This crate decodes FreeSurfer surface and curvature files, builds vertex
//! adjacency, and scatters sparse source-estimate activity onto the full
//! mesh by iterative neighbor averaging.

pub mod error;
pub mod freesurfer;
pub mod mesh;
pub mod smooth;

pub use error::{SurfaceError, SurfaceResult};
pub use freesurfer::{parse_curv, parse_surface, SurfaceGeometry};
pub use mesh::{vertex_normals, Adjacency};
pub use smooth::spread_activity;

use std::path::Path;

use stc_common::HemiSide;

/// One hemisphere's display surface: inflated geometry plus per-vertex
/// curvature for the binarized gray base coloring.
#[derive(Debug, Clone)]
pub struct CorticalSurface {
    pub geometry: SurfaceGeometry,
    pub curvature: Vec<f32>,
}

impl CorticalSurface {
    /// Load `{side}.inflated` and `{side}.curv` from a FreeSurfer-style
    /// surface directory.
    pub fn load(dir: &Path, side: HemiSide) -> SurfaceResult<Self> {
        let geometry =
            freesurfer::load_surface(&dir.join(format!("{}.inflated", side.as_str())))?;
        let curvature = freesurfer::load_curv(&dir.join(format!("{}.curv", side.as_str())))?;
        if curvature.len() != geometry.n_vertices() {
            return Err(SurfaceError::InvalidFormat(format!(
                "curvature has {} values but the surface has {} vertices",
                curvature.len(),
                geometry.n_vertices()
            )));
        }
        Ok(Self {
            geometry,
            curvature,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.geometry.n_vertices()
    }
}

/// File names a surface directory must provide, one pair per hemisphere.
pub const REQUIRED_SURFACE_FILES: [&str; 4] =
    ["lh.inflated", "rh.inflated", "lh.curv", "rh.curv"];
