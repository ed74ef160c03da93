//! Per-view orthographic cameras.
//!
//! Views are named in surface coordinates (x right, y anterior, z superior).
//! Each view is an azimuth/elevation pair giving the camera direction
//! `(-sin(az)*cos(el), cos(az)*cos(el), sin(el))`, so azimuth 0 looks from
//! the front and azimuth 90 from the subject's left. Side-specific views
//! (lateral, medial, frontal, parietal) mirror their azimuth for the right
//! hemisphere so both hemispheres show the same aspect.

use stc_common::{HemiSide, ViewAngle};

const UP_SUPERIOR: [f32; 3] = [0.0, 0.0, 1.0];
// Top/bottom views look along z, so "up" on screen is anterior instead.
const UP_ANTERIOR: [f32; 3] = [0.0, 1.0, 0.0];

/// Camera placement for one named view of one hemisphere.
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub up_hint: [f32; 3],
}

/// Screen-space basis of an orthographic camera: `right` and `up` span the
/// image plane, `forward` points into the scene and orders depth.
#[derive(Debug, Clone, Copy)]
pub struct CameraBasis {
    pub right: [f32; 3],
    pub up: [f32; 3],
    pub forward: [f32; 3],
}

pub fn camera_for(view: ViewAngle, side: HemiSide) -> ViewCamera {
    let (azimuth, elevation, up_hint) = match view {
        ViewAngle::Lateral => (90.0, 0.0, UP_SUPERIOR),
        ViewAngle::Medial => (270.0, 0.0, UP_SUPERIOR),
        ViewAngle::Rostral => (0.0, 0.0, UP_SUPERIOR),
        ViewAngle::Caudal => (180.0, 0.0, UP_SUPERIOR),
        ViewAngle::Dorsal => (0.0, 90.0, UP_ANTERIOR),
        ViewAngle::Ventral => (0.0, -90.0, UP_ANTERIOR),
        ViewAngle::Frontal => (35.0, 15.0, UP_SUPERIOR),
        ViewAngle::Parietal => (145.0, 25.0, UP_SUPERIOR),
    };
    let azimuth = if side == HemiSide::Right && mirrors_between_sides(view) {
        -azimuth
    } else {
        azimuth
    };
    ViewCamera {
        azimuth_deg: azimuth,
        elevation_deg: elevation,
        up_hint,
    }
}

fn mirrors_between_sides(view: ViewAngle) -> bool {
    matches!(
        view,
        ViewAngle::Lateral | ViewAngle::Medial | ViewAngle::Frontal | ViewAngle::Parietal
    )
}

impl ViewCamera {
    /// Unit direction from the mesh toward the camera.
    pub fn direction(&self) -> [f32; 3] {
        let azimuth = self.azimuth_deg.to_radians();
        let elevation = self.elevation_deg.to_radians();
        [
            -azimuth.sin() * elevation.cos(),
            azimuth.cos() * elevation.cos(),
            elevation.sin(),
        ]
    }

    pub fn basis(&self) -> CameraBasis {
        let position = self.direction();
        let forward = scale(position, -1.0);
        let mut right = cross(forward, self.up_hint);
        if length(right) < 1e-6 {
            right = [1.0, 0.0, 0.0];
        }
        let right = normalize(right);
        let up = normalize(cross(right, forward));
        CameraBasis { right, up, forward }
    }
}

// === Small vector helpers shared with frame composition ===

pub(crate) fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

pub(crate) fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len > 0.0 {
        scale(v, 1.0 / len)
    } else {
        v
    }
}

pub(crate) fn scale(v: [f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(got: [f32; 3], want: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (got[i] - want[i]).abs() < 1e-5,
                "component {}: {:?} vs {:?}",
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn lateral_cameras_sit_outside_their_hemisphere() {
        let left = camera_for(ViewAngle::Lateral, HemiSide::Left);
        assert_vec_close(left.direction(), [-1.0, 0.0, 0.0]);
        let right = camera_for(ViewAngle::Lateral, HemiSide::Right);
        assert_vec_close(right.direction(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn medial_cameras_face_the_midline() {
        let left = camera_for(ViewAngle::Medial, HemiSide::Left);
        assert_vec_close(left.direction(), [1.0, 0.0, 0.0]);
        let right = camera_for(ViewAngle::Medial, HemiSide::Right);
        assert_vec_close(right.direction(), [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn front_back_top_bottom_views_are_side_independent() {
        for view in [
            ViewAngle::Rostral,
            ViewAngle::Caudal,
            ViewAngle::Dorsal,
            ViewAngle::Ventral,
        ] {
            let left = camera_for(view, HemiSide::Left).direction();
            let right = camera_for(view, HemiSide::Right).direction();
            assert_vec_close(left, right);
        }
        assert_vec_close(
            camera_for(ViewAngle::Dorsal, HemiSide::Left).direction(),
            [0.0, 0.0, 1.0],
        );
        assert_vec_close(
            camera_for(ViewAngle::Ventral, HemiSide::Left).direction(),
            [0.0, 0.0, -1.0],
        );
    }

    #[test]
    fn basis_is_orthonormal_for_every_view_and_side() {
        for view in ViewAngle::ALL {
            for side in [HemiSide::Left, HemiSide::Right] {
                let basis = camera_for(view, side).basis();
                assert!((length(basis.right) - 1.0).abs() < 1e-5);
                assert!((length(basis.up) - 1.0).abs() < 1e-5);
                assert!((length(basis.forward) - 1.0).abs() < 1e-5);
                assert!(dot(basis.right, basis.up).abs() < 1e-5);
                assert!(dot(basis.right, basis.forward).abs() < 1e-5);
                assert!(dot(basis.up, basis.forward).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn superior_stays_up_on_screen_for_lateral_views() {
        let basis = camera_for(ViewAngle::Lateral, HemiSide::Left).basis();
        assert!(dot(basis.up, [0.0, 0.0, 1.0]) > 0.99);
    }

    #[test]
    fn anterior_stays_up_on_screen_for_the_dorsal_view() {
        let basis = camera_for(ViewAngle::Dorsal, HemiSide::Left).basis();
        assert!(dot(basis.up, [0.0, 1.0, 0.0]) > 0.99);
    }
}
