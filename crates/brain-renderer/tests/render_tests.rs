//! Frame composition and artifact encoding against synthetic meshes.

use brain_renderer::{
    assemble_gif, delay_centiseconds, encode_png, ActivityScale, FrameRenderer, HemiScene,
    RenderError, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use image::RgbaImage;
use stc_common::{Colormap, Hemisphere, RenderOptions, ViewAngle};
use surface::{vertex_normals, SurfaceGeometry};
use test_utils::{create_test_curv, subdivided_octahedron};

const WHITE: [u8; 4] = [255, 255, 255, 255];

struct Scene {
    geometry: SurfaceGeometry,
    curvature: Vec<f32>,
    normals: Vec<[f32; 3]>,
}

impl Scene {
    fn sphere() -> Self {
        let mesh = subdivided_octahedron(50.0, 3);
        let geometry = SurfaceGeometry {
            vertices: mesh.vertices,
            faces: mesh.faces,
        };
        let curvature = create_test_curv(geometry.n_vertices());
        let normals = vertex_normals(&geometry);
        Self {
            geometry,
            curvature,
            normals,
        }
    }

    fn as_hemi(&self) -> HemiScene<'_> {
        HemiScene {
            geometry: &self.geometry,
            curvature: &self.curvature,
            normals: &self.normals,
        }
    }
}

fn test_scale() -> ActivityScale {
    ActivityScale {
        fmin: 1.0,
        fmid: 2.0,
        fmax: 4.0,
    }
}

fn pixel(image: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    image.get_pixel(x, y).0
}

// ============================================================================
// Frame composition
// ============================================================================

#[test]
fn default_split_frame_shows_both_hemispheres_on_white() {
    let scene = Scene::sphere();
    let renderer = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &RenderOptions::default(),
        test_scale(),
        None,
    )
    .unwrap();

    let frame = renderer.render_frame(None, None, None).unwrap();
    assert_eq!(frame.width(), CANVAS_WIDTH as u32);
    assert_eq!(frame.height(), CANVAS_HEIGHT as u32);

    // Cell centers land on the mesh, corners stay background.
    assert_ne!(pixel(&frame, 400, 400), WHITE);
    assert_ne!(pixel(&frame, 1200, 400), WHITE);
    assert_eq!(pixel(&frame, 2, 2), WHITE);
    assert_eq!(pixel(&frame, 1597, 797), WHITE);
}

#[test]
fn transparent_mode_leaves_uncovered_pixels_clear() {
    let scene = Scene::sphere();
    let options = RenderOptions {
        transparent: true,
        hemisphere: Hemisphere::Left,
        ..RenderOptions::default()
    };
    let renderer =
        FrameRenderer::new(Some(scene.as_hemi()), None, &options, test_scale(), None).unwrap();

    let frame = renderer.render_frame(None, None, None).unwrap();
    assert_eq!(pixel(&frame, 2, 2)[3], 0);
    // The single lateral view centers the mesh on the canvas.
    assert_eq!(pixel(&frame, 800, 400)[3], 255);
}

#[test]
fn single_hemisphere_views_spread_across_one_row() {
    let scene = Scene::sphere();
    let options = RenderOptions {
        hemisphere: Hemisphere::Right,
        views: vec![ViewAngle::Lateral, ViewAngle::Medial],
        ..RenderOptions::default()
    };
    let renderer =
        FrameRenderer::new(None, Some(scene.as_hemi()), &options, test_scale(), None).unwrap();

    let frame = renderer.render_frame(None, None, None).unwrap();
    assert_ne!(pixel(&frame, 400, 400), WHITE);
    assert_ne!(pixel(&frame, 1200, 400), WHITE);
}

#[test]
fn saturated_activity_recolors_the_mesh() {
    let scene = Scene::sphere();
    let renderer = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &RenderOptions::default(),
        test_scale(),
        None,
    )
    .unwrap();

    // Everything far above fmax under the default hot palette.
    let activity = vec![100.0f32; scene.geometry.n_vertices()];
    let bare = renderer.render_frame(None, None, None).unwrap();
    let hot = renderer
        .render_frame(Some(&activity), Some(&activity), None)
        .unwrap();

    assert_ne!(bare.as_raw(), hot.as_raw());
    // The saturated hot end is white-ish but never blue-dominant; the bare
    // cortex is a neutral gray. Probe a mesh pixel.
    let p = pixel(&hot, 400, 400);
    assert!(p[0] >= p[2], "hot overlay should not be blue-dominant");
    let b = pixel(&bare, 400, 400);
    assert_eq!(b[0], b[1]);
    assert_eq!(b[1], b[2]);
}

#[test]
fn sub_threshold_activity_leaves_the_cortex_gray() {
    let scene = Scene::sphere();
    let renderer = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &RenderOptions::default(),
        test_scale(),
        None,
    )
    .unwrap();

    let activity = vec![0.5f32; scene.geometry.n_vertices()];
    let bare = renderer.render_frame(None, None, None).unwrap();
    let quiet = renderer
        .render_frame(Some(&activity), Some(&activity), None)
        .unwrap();
    assert_eq!(bare.as_raw(), quiet.as_raw());
}

#[test]
fn colorbar_marks_the_right_edge_when_enabled() {
    let scene = Scene::sphere();
    let mut options = RenderOptions::default();
    options.colorbar = true;
    options.colormap = Colormap::Viridis;
    let with_bar = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &options,
        test_scale(),
        None,
    )
    .unwrap()
    .render_frame(None, None, None)
    .unwrap();

    options.colorbar = false;
    let without_bar = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &options,
        test_scale(),
        None,
    )
    .unwrap()
    .render_frame(None, None, None)
    .unwrap();

    let bar_x = CANVAS_WIDTH as u32 - 28;
    let bar_y = CANVAS_HEIGHT as u32 / 2;
    assert_ne!(pixel(&with_bar, bar_x, bar_y), pixel(&without_bar, bar_x, bar_y));
}

#[test]
fn missing_required_hemisphere_is_rejected_up_front() {
    let scene = Scene::sphere();
    let err = FrameRenderer::new(
        Some(scene.as_hemi()),
        None,
        &RenderOptions::default(), // split needs both
        test_scale(),
        None,
    )
    .err()
    .expect("split without a right hemisphere must fail");
    assert!(matches!(err, RenderError::InvalidInput(_)));
}

#[test]
fn wrong_activity_length_is_a_typed_mismatch() {
    let scene = Scene::sphere();
    let options = RenderOptions {
        hemisphere: Hemisphere::Left,
        ..RenderOptions::default()
    };
    let renderer =
        FrameRenderer::new(Some(scene.as_hemi()), None, &options, test_scale(), None).unwrap();

    let short = vec![1.0f32; 7];
    let err = renderer
        .render_frame(Some(&short), None, None)
        .err()
        .expect("short activity must fail");
    assert!(matches!(err, RenderError::ActivityMismatch { activity: 7, .. }));
}

#[test]
fn missing_font_skips_the_time_label_without_failing() {
    let scene = Scene::sphere();
    let renderer = FrameRenderer::new(
        Some(scene.as_hemi()),
        Some(scene.as_hemi()),
        &RenderOptions::default(),
        test_scale(),
        None,
    )
    .unwrap();
    let frame = renderer
        .render_frame(None, None, Some("t = 120 ms"))
        .unwrap();
    assert_eq!(frame.width(), CANVAS_WIDTH as u32);
}

// ============================================================================
// Stills to animation
// ============================================================================

#[test]
fn frames_survive_png_and_reassemble_into_a_looping_gif() {
    let scene = Scene::sphere();
    let options = RenderOptions {
        hemisphere: Hemisphere::Left,
        ..RenderOptions::default()
    };
    let renderer =
        FrameRenderer::new(Some(scene.as_hemi()), None, &options, test_scale(), None).unwrap();

    let n_vertices = scene.geometry.n_vertices();
    let mut stills = Vec::new();
    for step in 0..3 {
        let activity: Vec<f32> = (0..n_vertices)
            .map(|v| if v % 3 == step { 10.0 } else { 0.0 })
            .collect();
        let frame = renderer
            .render_frame(Some(&activity), None, None)
            .unwrap();
        stills.push(encode_png(frame.as_raw(), CANVAS_WIDTH, CANVAS_HEIGHT).unwrap());
    }

    // Same re-read path the job uses: decode the stills, then assemble.
    let frames: Vec<RgbaImage> = stills
        .iter()
        .map(|png| image::load_from_memory(png).unwrap().to_rgba8())
        .collect();
    let payload = assemble_gif(&frames, delay_centiseconds(0.1)).unwrap();

    assert_eq!(&payload[0..6], b"GIF89a");
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(&payload[..]).unwrap();
    let mut count = 0;
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        assert_eq!(frame.delay, 10);
        count += 1;
    }
    assert_eq!(count, 3);
}
