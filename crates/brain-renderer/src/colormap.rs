//! Color lookup tables for the activity overlay.
//!
//! Each named palette is stored as a short list of anchored color stops and
//! expanded once per job into a 256-entry LUT with linear interpolation
//! between anchors. The anchor values approximate the matplotlib palettes of
//! the same names closely enough that rendered overlays are visually
//! indistinguishable from them.

use stc_common::Colormap;

/// Anchor stop: position in [0, 1] and the RGB color at that position.
type Anchor = (f32, [u8; 3]);

/// Black body radiation ramp: black, red, yellow, white.
const HOT: &[Anchor] = &[
    (0.0, [11, 0, 0]),
    (0.365, [255, 0, 0]),
    (0.746, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const VIRIDIS: &[Anchor] = &[
    (0.0, [68, 1, 84]),
    (0.125, [72, 40, 120]),
    (0.25, [62, 74, 137]),
    (0.375, [49, 104, 142]),
    (0.5, [38, 130, 142]),
    (0.625, [31, 158, 137]),
    (0.75, [53, 183, 121]),
    (0.875, [109, 205, 89]),
    (1.0, [253, 231, 37]),
];

const PLASMA: &[Anchor] = &[
    (0.0, [13, 8, 135]),
    (0.25, [126, 3, 168]),
    (0.5, [204, 71, 120]),
    (0.75, [248, 149, 64]),
    (1.0, [240, 249, 33]),
];

const INFERNO: &[Anchor] = &[
    (0.0, [0, 0, 4]),
    (0.25, [87, 16, 110]),
    (0.5, [188, 55, 84]),
    (0.75, [249, 142, 9]),
    (1.0, [252, 255, 164]),
];

const MAGMA: &[Anchor] = &[
    (0.0, [0, 0, 4]),
    (0.25, [81, 18, 124]),
    (0.5, [183, 55, 121]),
    (0.75, [252, 137, 97]),
    (1.0, [252, 253, 191]),
];

/// Diverging blue-gray-red (Moreland's smooth cool/warm).
const COOLWARM: &[Anchor] = &[
    (0.0, [59, 76, 192]),
    (0.25, [144, 178, 254]),
    (0.5, [221, 221, 221]),
    (0.75, [245, 156, 125]),
    (1.0, [180, 4, 38]),
];

/// Diverging ColorBrewer RdBu, reversed so red is the positive end.
const RDBU_R: &[Anchor] = &[
    (0.0, [5, 48, 97]),
    (0.25, [67, 147, 195]),
    (0.5, [247, 247, 247]),
    (0.75, [214, 96, 77]),
    (1.0, [103, 0, 31]),
];

fn anchors(colormap: Colormap) -> &'static [Anchor] {
    match colormap {
        Colormap::Hot => HOT,
        Colormap::Viridis => VIRIDIS,
        Colormap::Plasma => PLASMA,
        Colormap::Inferno => INFERNO,
        Colormap::Magma => MAGMA,
        Colormap::Coolwarm => COOLWARM,
        Colormap::RdBuR => RDBU_R,
    }
}

/// Linear interpolation between two anchor colors.
fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    [
        (a[0] as f32 * t_inv + b[0] as f32 * t).round() as u8,
        (a[1] as f32 * t_inv + b[1] as f32 * t).round() as u8,
        (a[2] as f32 * t_inv + b[2] as f32 * t).round() as u8,
    ]
}

/// Color at position `t` in [0, 1] along the anchor list.
fn color_at(stops: &[Anchor], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut low = stops[0];
    for &stop in stops {
        if stop.0 <= t {
            low = stop;
        } else {
            let span = stop.0 - low.0;
            let frac = if span > 0.0 { (t - low.0) / span } else { 0.0 };
            return lerp_color(low.1, stop.1, frac);
        }
    }
    low.1
}

/// A palette expanded to 256 discrete entries.
#[derive(Debug, Clone)]
pub struct ColorLut {
    entries: Vec<[u8; 3]>,
}

impl ColorLut {
    pub const SIZE: usize = 256;

    /// Expand the named palette into its 256-entry table.
    pub fn build(colormap: Colormap) -> Self {
        let stops = anchors(colormap);
        let entries = (0..Self::SIZE)
            .map(|i| color_at(stops, i as f32 / (Self::SIZE - 1) as f32))
            .collect();
        Self { entries }
    }

    /// Color at normalized position `t` in [0, 1], clamped at the ends.
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let index = (t * (Self::SIZE - 1) as f32).round() as usize;
        self.entries[index.min(Self::SIZE - 1)]
    }

    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }
}
