//! Application state and shared resources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use rusttype::Font;
use tokio::sync::RwLock;
use tracing::{info, warn};

use brain_renderer::load_label_font;
use stc_common::{BrainError, BrainResult, HemiSide};
use surface::{vertex_normals, Adjacency, CorticalSurface, REQUIRED_SURFACE_FILES};

/// Service configuration resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding `{lh,rh}.{inflated,curv}`.
    pub surface_dir: PathBuf,
    /// Explicit font for frame annotations, tried before system fallbacks.
    pub font_path: Option<PathBuf>,
    /// Request body cap for `/generate`.
    pub max_upload_bytes: usize,
}

/// One hemisphere ready for rendering: geometry and curvature, neighbor
/// lists for activity spreading, per-vertex normals for shading.
pub struct PreparedHemi {
    pub surface: CorticalSurface,
    pub adjacency: Adjacency,
    pub normals: Vec<[f32; 3]>,
}

impl PreparedHemi {
    fn prepare(surface: CorticalSurface) -> Self {
        let adjacency =
            Adjacency::from_faces(surface.geometry.n_vertices(), &surface.geometry.faces);
        let normals = vertex_normals(&surface.geometry);
        Self {
            surface,
            adjacency,
            normals,
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.surface.n_vertices()
    }
}

/// Both hemispheres of the display subject.
pub struct SurfaceSet {
    pub left: PreparedHemi,
    pub right: PreparedHemi,
}

impl SurfaceSet {
    pub fn load(dir: &Path) -> BrainResult<Self> {
        let left = CorticalSurface::load(dir, HemiSide::Left)
            .map_err(|e| BrainError::SurfaceUnavailable(e.to_string()))?;
        let right = CorticalSurface::load(dir, HemiSide::Right)
            .map_err(|e| BrainError::SurfaceUnavailable(e.to_string()))?;
        info!(
            left_vertices = left.n_vertices(),
            right_vertices = right.n_vertices(),
            dir = %dir.display(),
            "Loaded cortical surfaces"
        );
        Ok(Self {
            left: PreparedHemi::prepare(left),
            right: PreparedHemi::prepare(right),
        })
    }

    pub fn hemi(&self, side: HemiSide) -> &PreparedHemi {
        match side {
            HemiSide::Left => &self.left,
            HemiSide::Right => &self.right,
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,
    pub prometheus: PrometheusHandle,
    pub font: Option<Font<'static>>,
    surfaces: RwLock<Option<Arc<SurfaceSet>>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, prometheus: PrometheusHandle) -> Self {
        let font = load_label_font(config.font_path.as_deref());
        Self {
            config,
            prometheus,
            font,
            surfaces: RwLock::new(None),
        }
    }

    /// Surfaces for rendering, loaded on first use and cached. Blocking
    /// file I/O; call from a blocking worker, never a runtime thread.
    pub fn surfaces_blocking(&self) -> BrainResult<Arc<SurfaceSet>> {
        if let Some(set) = self.surfaces.blocking_read().as_ref() {
            return Ok(Arc::clone(set));
        }
        let mut slot = self.surfaces.blocking_write();
        if let Some(set) = slot.as_ref() {
            return Ok(Arc::clone(set));
        }
        let set = Arc::new(SurfaceSet::load(&self.config.surface_dir)?);
        *slot = Some(Arc::clone(&set));
        Ok(set)
    }

    /// Attempt the initial surface load without failing startup; missing
    /// surfaces leave `/ready` reporting not-ready until the files appear.
    pub async fn warm_surfaces(self: &Arc<Self>) {
        let state = Arc::clone(self);
        let result =
            tokio::task::spawn_blocking(move || state.surfaces_blocking().map(|_| ())).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Surfaces not loaded yet"),
            Err(e) => warn!(error = %e, "Surface load task failed"),
        }
    }

    /// Required surface files not currently on disk.
    pub fn missing_surface_files(&self) -> Vec<&'static str> {
        REQUIRED_SURFACE_FILES
            .iter()
            .copied()
            .filter(|name| !self.config.surface_dir.join(name).is_file())
            .collect()
    }
}
