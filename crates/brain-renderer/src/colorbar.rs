//! Vertical colorbar drawn along the right edge of a composed frame.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale as FontScale};
use tracing::warn;

use crate::colormap::ColorLut;
use crate::scale::ActivityScale;

const BAR_WIDTH: u32 = 24;
const BAR_RIGHT_MARGIN: u32 = 16;
/// Bar height as a fraction of the frame height.
const BAR_HEIGHT_FRACTION: f32 = 0.6;
const TICK_LENGTH: u32 = 6;
const TICK_FONT_SCALE: f32 = 20.0;

/// Draw the active LUT as a vertical gradient with threshold tick labels.
/// High values sit at the top. Tick labels need a font; without one only
/// the bar and tick marks are drawn.
pub(crate) fn draw_colorbar(
    image: &mut RgbaImage,
    lut: &ColorLut,
    scale: &ActivityScale,
    diverging: bool,
    ink: Rgba<u8>,
    font: Option<&Font<'_>>,
) {
    let (width, height) = image.dimensions();
    let bar_height = ((height as f32 * BAR_HEIGHT_FRACTION) as u32).min(height);
    if bar_height < 2 || width < BAR_RIGHT_MARGIN + BAR_WIDTH {
        return;
    }
    let bar_top = (height - bar_height) / 2;
    let bar_left = width - BAR_RIGHT_MARGIN - BAR_WIDTH;

    for row in 0..bar_height {
        let t = 1.0 - row as f32 / (bar_height - 1) as f32;
        let [r, g, b] = lut.sample(t);
        for col in 0..BAR_WIDTH {
            image.put_pixel(bar_left + col, bar_top + row, Rgba([r, g, b, 255]));
        }
    }

    for row in 0..bar_height {
        image.put_pixel(bar_left, bar_top + row, ink);
        image.put_pixel(bar_left + BAR_WIDTH - 1, bar_top + row, ink);
    }
    for col in 0..BAR_WIDTH {
        image.put_pixel(bar_left + col, bar_top, ink);
        image.put_pixel(bar_left + col, bar_top + bar_height - 1, ink);
    }

    for (t, label) in ticks(scale, diverging) {
        let row = bar_top + ((1.0 - t) * (bar_height - 1) as f32).round() as u32;
        for i in 1..=TICK_LENGTH {
            if bar_left >= i {
                image.put_pixel(bar_left - i, row, ink);
            }
        }
        if let Some(font) = font {
            let font_scale = FontScale::uniform(TICK_FONT_SCALE);
            let (text_w, text_h) = text_size(font_scale, font, &label);
            let x = bar_left as i32 - TICK_LENGTH as i32 - 4 - text_w;
            let y = row as i32 - text_h / 2;
            draw_text_mut(image, ink, x.max(0), y.max(0), font_scale, font, &label);
        }
    }

    if font.is_none() {
        warn!("no font available, skipping colorbar tick labels");
    }
}

/// Tick positions along the bar (0 = bottom, 1 = top) and their labels.
/// Sequential palettes span fmin..fmax; diverging palettes span the signed
/// range with zero at the midpoint.
fn ticks(scale: &ActivityScale, diverging: bool) -> Vec<(f32, String)> {
    if diverging {
        vec![
            (0.0, format_tick(-scale.fmax)),
            (0.5, "0".to_string()),
            (1.0, format_tick(scale.fmax)),
        ]
    } else {
        let mid = ((scale.fmid - scale.fmin) / (scale.fmax - scale.fmin)).clamp(0.0, 1.0);
        vec![
            (0.0, format_tick(scale.fmin)),
            (mid, format_tick(scale.fmid)),
            (1.0, format_tick(scale.fmax)),
        ]
    }
}

/// Source estimates range from unit-scaled values to ~1e-10 ampere-meters,
/// so switch to scientific notation outside a comfortable decimal window.
fn format_tick(value: f32) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if (0.01..10000.0).contains(&magnitude) {
        format!("{:.2}", value)
    } else {
        format!("{:.1e}", value)
    }
}
