//! Frame composition: cell layout, per-view projection, shading, annotation.
//!
//! A `FrameRenderer` is built once per job. It fixes everything that must
//! stay constant across an animation: the cell layout, each cell's camera
//! and mesh-to-cell fit, the per-vertex lighting, the color LUT, and the
//! activity thresholds. `render_frame` then only blends per-vertex colors
//! for one time point and rasterizes.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rayon::prelude::*;
use rusttype::{Font, Scale as FontScale};
use tracing::warn;

use stc_common::{BackgroundColor, CortexStyle, HemiSide, Hemisphere, RenderOptions, ViewAngle};
use surface::SurfaceGeometry;

use crate::camera::{camera_for, dot};
use crate::colorbar::draw_colorbar;
use crate::colormap::ColorLut;
use crate::error::{RenderError, RenderResult};
use crate::raster::{Canvas, ClipRect};
use crate::scale::ActivityScale;

pub const CANVAS_WIDTH: usize = 1600;
pub const CANVAS_HEIGHT: usize = 800;

/// Fraction of each cell left empty on every side of the fitted mesh.
const FIT_MARGIN: f32 = 0.05;

/// Headlight shading terms. The diffuse term is double-sided so geometry
/// facing away from the camera shades instead of going black.
const AMBIENT: f32 = 0.35;
const DIFFUSE: f32 = 0.65;

const LABEL_SCALE: f32 = 28.0;
const LABEL_X: i32 = 16;
const LABEL_Y: i32 = 12;

/// Binarized curvature grays (gyral, sulcal) per cortex preset. Positive
/// curvature marks sulci.
fn cortex_grays(style: CortexStyle) -> (f32, f32) {
    match style {
        CortexStyle::LowContrast => (0.55, 0.45),
        CortexStyle::Classic => (0.60, 0.35),
        CortexStyle::HighContrast => (0.70, 0.20),
    }
}

// ============================================================================
// Cell layout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSlot {
    pub side: HemiSide,
    pub view_index: usize,
    pub rect: ClipRect,
}

/// Cell layout over the fixed canvas. Split mode stacks one row per view
/// with the left hemisphere in the left column; single-hemisphere mode puts
/// all views in one row. Boundaries are computed cumulatively so the cells
/// tile the canvas exactly for any view count.
pub fn layout_cells(hemisphere: Hemisphere, n_views: usize) -> Vec<CellSlot> {
    let mut cells = Vec::new();
    match hemisphere {
        Hemisphere::Split => {
            for view_index in 0..n_views {
                let top = view_index * CANVAS_HEIGHT / n_views;
                let bottom = (view_index + 1) * CANVAS_HEIGHT / n_views;
                for (column, &side) in hemisphere.sides().iter().enumerate() {
                    cells.push(CellSlot {
                        side,
                        view_index,
                        rect: ClipRect {
                            x: column * CANVAS_WIDTH / 2,
                            y: top,
                            width: CANVAS_WIDTH / 2,
                            height: bottom - top,
                        },
                    });
                }
            }
        }
        Hemisphere::Left | Hemisphere::Right => {
            let side = hemisphere.sides()[0];
            for view_index in 0..n_views {
                let left = view_index * CANVAS_WIDTH / n_views;
                let right = (view_index + 1) * CANVAS_WIDTH / n_views;
                cells.push(CellSlot {
                    side,
                    view_index,
                    rect: ClipRect {
                        x: left,
                        y: 0,
                        width: right - left,
                        height: CANVAS_HEIGHT,
                    },
                });
            }
        }
    }
    cells
}

// ============================================================================
// Frame renderer
// ============================================================================

/// Borrowed display data for one hemisphere, prepared once at startup.
#[derive(Clone, Copy)]
pub struct HemiScene<'a> {
    pub geometry: &'a SurfaceGeometry,
    pub curvature: &'a [f32],
    pub normals: &'a [[f32; 3]],
}

struct PreparedCell {
    side: HemiSide,
    rect: ClipRect,
    /// Per-vertex `[screen x, screen y, depth]` in canvas pixels.
    screen: Vec<[f32; 3]>,
    /// Per-vertex headlight factor under this cell's camera.
    light: Vec<f32>,
}

pub struct FrameRenderer<'a> {
    options: RenderOptions,
    scale: ActivityScale,
    lut: ColorLut,
    left: Option<HemiScene<'a>>,
    right: Option<HemiScene<'a>>,
    cells: Vec<PreparedCell>,
    font: Option<&'a Font<'static>>,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        left: Option<HemiScene<'a>>,
        right: Option<HemiScene<'a>>,
        options: &RenderOptions,
        scale: ActivityScale,
        font: Option<&'a Font<'static>>,
    ) -> RenderResult<Self> {
        if options.views.is_empty() {
            return Err(RenderError::InvalidInput("no views selected".to_string()));
        }
        if let Some(scene) = &left {
            check_scene(scene, HemiSide::Left)?;
        }
        if let Some(scene) = &right {
            check_scene(scene, HemiSide::Right)?;
        }

        let renderer = Self {
            options: options.clone(),
            scale,
            lut: ColorLut::build(options.colormap),
            left,
            right,
            cells: Vec::new(),
            font,
        };
        for &side in options.hemisphere.sides() {
            if renderer.scene(side).is_none() {
                return Err(RenderError::InvalidInput(format!(
                    "{} hemisphere surface is not loaded",
                    side
                )));
            }
        }

        let mut cells = Vec::new();
        for slot in layout_cells(options.hemisphere, options.views.len()) {
            // Presence was checked above.
            let scene = match renderer.scene(slot.side) {
                Some(scene) => scene,
                None => continue,
            };
            cells.push(prepare_cell(&scene, slot, options.views[slot.view_index]));
        }

        Ok(Self { cells, ..renderer })
    }

    fn scene(&self, side: HemiSide) -> Option<HemiScene<'a>> {
        match side {
            HemiSide::Left => self.left,
            HemiSide::Right => self.right,
        }
    }

    /// Render one time point. Activity slices are per-vertex values for the
    /// respective hemisphere; `None` draws the bare cortex. The time label
    /// is drawn verbatim when given.
    pub fn render_frame(
        &self,
        left_activity: Option<&[f32]>,
        right_activity: Option<&[f32]>,
        time_label: Option<&str>,
    ) -> RenderResult<RgbaImage> {
        let background = if self.options.transparent {
            None
        } else {
            Some(self.options.background.rgba())
        };
        let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, background);

        let mut side_colors: [Option<Vec<[f32; 3]>>; 2] = [None, None];
        for &side in self.options.hemisphere.sides() {
            let scene = match self.scene(side) {
                Some(scene) => scene,
                None => continue,
            };
            let activity = match side {
                HemiSide::Left => left_activity,
                HemiSide::Right => right_activity,
            };
            side_colors[side_index(side)] = Some(self.blend_side_colors(&scene, activity)?);
        }

        for cell in &self.cells {
            let scene = match self.scene(cell.side) {
                Some(scene) => scene,
                None => continue,
            };
            let colors = match &side_colors[side_index(cell.side)] {
                Some(colors) => colors,
                None => continue,
            };
            for face in &scene.geometry.faces {
                let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
                let points = [cell.screen[a], cell.screen[b], cell.screen[c]];
                let shaded = [
                    lit(colors[a], cell.light[a]),
                    lit(colors[b], cell.light[b]),
                    lit(colors[c], cell.light[c]),
                ];
                canvas.fill_triangle(&cell.rect, points, shaded);
            }
        }

        let mut image = RgbaImage::from_raw(
            CANVAS_WIDTH as u32,
            CANVAS_HEIGHT as u32,
            canvas.into_rgba(),
        )
        .ok_or_else(|| RenderError::InvalidInput("frame buffer size mismatch".to_string()))?;

        if self.options.colorbar {
            draw_colorbar(
                &mut image,
                &self.lut,
                &self.scale,
                self.options.colormap.is_diverging(),
                self.annotation_ink(),
                self.font,
            );
        }
        if let Some(label) = time_label {
            self.draw_time_label(&mut image, label);
        }

        Ok(image)
    }

    /// Base gray from binarized curvature, overlay alpha-blended on top.
    fn blend_side_colors(
        &self,
        scene: &HemiScene<'_>,
        activity: Option<&[f32]>,
    ) -> RenderResult<Vec<[f32; 3]>> {
        let n = scene.geometry.n_vertices();
        if let Some(values) = activity {
            if values.len() != n {
                return Err(RenderError::ActivityMismatch {
                    activity: values.len(),
                    vertices: n,
                });
            }
        }

        let (gyral, sulcal) = cortex_grays(self.options.cortex);
        let diverging = self.options.colormap.is_diverging();
        let colors = (0..n)
            .into_par_iter()
            .map(|v| {
                let base = if scene.curvature[v] > 0.0 { sulcal } else { gyral };
                let mut rgb = [base, base, base];
                if let Some(values) = activity {
                    let value = values[v];
                    let alpha = self.scale.opacity(value);
                    if alpha > 0.0 {
                        let overlay = self.lut.sample(self.scale.lut_position(value, diverging));
                        for channel in 0..3 {
                            rgb[channel] = rgb[channel] * (1.0 - alpha)
                                + overlay[channel] as f32 / 255.0 * alpha;
                        }
                    }
                }
                rgb
            })
            .collect();
        Ok(colors)
    }

    fn annotation_ink(&self) -> Rgba<u8> {
        if self.options.transparent || self.options.background == BackgroundColor::Black {
            Rgba([230, 230, 230, 255])
        } else {
            Rgba([30, 30, 30, 255])
        }
    }

    fn draw_time_label(&self, image: &mut RgbaImage, label: &str) {
        match self.font {
            Some(font) => draw_text_mut(
                image,
                self.annotation_ink(),
                LABEL_X,
                LABEL_Y,
                FontScale::uniform(LABEL_SCALE),
                font,
                label,
            ),
            None => warn!("no font available, skipping time label"),
        }
    }
}

fn side_index(side: HemiSide) -> usize {
    match side {
        HemiSide::Left => 0,
        HemiSide::Right => 1,
    }
}

fn lit(color: [f32; 3], light: f32) -> [f32; 3] {
    [color[0] * light, color[1] * light, color[2] * light]
}

fn check_scene(scene: &HemiScene<'_>, side: HemiSide) -> RenderResult<()> {
    let n = scene.geometry.n_vertices();
    if n == 0 {
        return Err(RenderError::InvalidInput(format!(
            "{} surface has no vertices",
            side
        )));
    }
    if scene.curvature.len() != n || scene.normals.len() != n {
        return Err(RenderError::InvalidInput(format!(
            "{} surface arrays disagree: {} vertices, {} curvature values, {} normals",
            side,
            n,
            scene.curvature.len(),
            scene.normals.len()
        )));
    }
    Ok(())
}

/// Project the mesh into its cell: camera-space coordinates, a fit that
/// centers the bounding box with the margin applied, and per-vertex
/// lighting. Computed once per job so scale is constant across frames.
fn prepare_cell(scene: &HemiScene<'_>, slot: CellSlot, view: ViewAngle) -> PreparedCell {
    let cam = camera_for(view, slot.side);
    let basis = cam.basis();
    let view_dir = cam.direction();

    let mut screen: Vec<[f32; 3]> = scene
        .geometry
        .vertices
        .par_iter()
        .map(|&v| [dot(v, basis.right), dot(v, basis.up), dot(v, basis.forward)])
        .collect();

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in &screen {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }

    let usable_w = slot.rect.width as f32 * (1.0 - 2.0 * FIT_MARGIN);
    let usable_h = slot.rect.height as f32 * (1.0 - 2.0 * FIT_MARGIN);
    let span_x = (max_x - min_x).max(1e-6);
    let span_y = (max_y - min_y).max(1e-6);
    let fit = (usable_w / span_x).min(usable_h / span_y);

    let center_x = 0.5 * (min_x + max_x);
    let center_y = 0.5 * (min_y + max_y);
    let cell_cx = slot.rect.x as f32 + slot.rect.width as f32 / 2.0;
    let cell_cy = slot.rect.y as f32 + slot.rect.height as f32 / 2.0;

    screen.par_iter_mut().for_each(|p| {
        *p = [
            cell_cx + (p[0] - center_x) * fit,
            cell_cy - (p[1] - center_y) * fit,
            p[2],
        ];
    });

    let light: Vec<f32> = scene
        .normals
        .par_iter()
        .map(|&n| AMBIENT + DIFFUSE * dot(n, view_dir).abs())
        .collect();

    PreparedCell {
        side: slot.side,
        rect: slot.rect,
        screen,
        light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(cells: &[CellSlot]) {
        let mut covered = vec![false; CANVAS_WIDTH * CANVAS_HEIGHT];
        for cell in cells {
            for y in cell.rect.y..cell.rect.bottom() {
                for x in cell.rect.x..cell.rect.right() {
                    let i = y * CANVAS_WIDTH + x;
                    assert!(!covered[i], "cells overlap at ({}, {})", x, y);
                    covered[i] = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c), "cells leave canvas gaps");
    }

    #[test]
    fn split_layout_tiles_the_canvas_for_all_view_counts() {
        for n_views in 1..=8 {
            let cells = layout_cells(Hemisphere::Split, n_views);
            assert_eq!(cells.len(), n_views * 2);
            assert_tiles(&cells);
        }
    }

    #[test]
    fn single_hemisphere_layout_tiles_the_canvas_for_all_view_counts() {
        for hemisphere in [Hemisphere::Left, Hemisphere::Right] {
            for n_views in 1..=8 {
                let cells = layout_cells(hemisphere, n_views);
                assert_eq!(cells.len(), n_views);
                assert_tiles(&cells);
            }
        }
    }

    #[test]
    fn split_rows_put_the_left_hemisphere_in_the_left_column() {
        let cells = layout_cells(Hemisphere::Split, 3);
        for row in 0..3 {
            let left = &cells[row * 2];
            let right = &cells[row * 2 + 1];
            assert_eq!(left.side, HemiSide::Left);
            assert_eq!(right.side, HemiSide::Right);
            assert_eq!(left.view_index, row);
            assert_eq!(right.view_index, row);
            assert_eq!(left.rect.x, 0);
            assert_eq!(right.rect.x, CANVAS_WIDTH / 2);
            assert_eq!(left.rect.y, right.rect.y);
        }
    }

    #[test]
    fn cortex_presets_order_their_contrast() {
        let (low_g, low_s) = cortex_grays(CortexStyle::LowContrast);
        let (classic_g, classic_s) = cortex_grays(CortexStyle::Classic);
        let (high_g, high_s) = cortex_grays(CortexStyle::HighContrast);
        assert!(low_g - low_s < classic_g - classic_s);
        assert!(classic_g - classic_s < high_g - high_s);
        // Gyral is always the brighter gray.
        for (g, s) in [(low_g, low_s), (classic_g, classic_s), (high_g, high_s)] {
            assert!(g > s);
        }
    }
}
