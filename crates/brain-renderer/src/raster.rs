//! Software triangle rasterization against a z-buffer.
//!
//! The canvas is a plain RGBA byte buffer plus one depth value per pixel.
//! Triangles arrive in screen space with a depth and an RGB color per
//! vertex; the fill walks the clipped bounding box, tests pixel centers with
//! edge functions, and interpolates depth and color barycentrically. Both
//! winding orders are filled since the inflated surfaces are closed and the
//! depth test alone resolves visibility.

/// Pixel-aligned clip region, used to confine each view to its layout cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl ClipRect {
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    depth: Vec<f32>,
}

impl Canvas {
    /// `background` of `None` leaves uncovered pixels fully transparent.
    pub fn new(width: usize, height: usize, background: Option<[u8; 4]>) -> Self {
        let pixels = match background {
            Some(color) => color.repeat(width * height),
            None => vec![0u8; width * height * 4],
        };
        Self {
            width,
            height,
            pixels,
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Fill one triangle. `points` are `[x, y, depth]` in canvas pixels,
    /// `colors` are RGB in [0, 1]. Smaller depth wins the z-test.
    pub fn fill_triangle(
        &mut self,
        clip: &ClipRect,
        points: [[f32; 3]; 3],
        colors: [[f32; 3]; 3],
    ) {
        let [mut p0, mut p1, mut p2] = points;
        let [c0, mut c1, mut c2] = colors;

        let mut area = edge(p0, p1, p2);
        if area.abs() < 1e-9 {
            return;
        }
        // Normalize winding so the edge functions are positive inside.
        if area < 0.0 {
            std::mem::swap(&mut p1, &mut p2);
            std::mem::swap(&mut c1, &mut c2);
            area = -area;
        }

        let min_x = p0[0].min(p1[0]).min(p2[0]).floor().max(clip.x as f32) as usize;
        let max_x = p0[0]
            .max(p1[0])
            .max(p2[0])
            .ceil()
            .min(clip.right() as f32) as usize;
        let min_y = p0[1].min(p1[1]).min(p2[1]).floor().max(clip.y as f32) as usize;
        let max_y = p0[1]
            .max(p1[1])
            .max(p2[1])
            .ceil()
            .min(clip.bottom() as f32) as usize;
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let inv_area = 1.0 / area;
        for y in min_y..max_y {
            for x in min_x..max_x {
                let sample = [x as f32 + 0.5, y as f32 + 0.5, 0.0];
                let w0 = edge(p1, p2, sample);
                let w1 = edge(p2, p0, sample);
                let w2 = edge(p0, p1, sample);
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let b0 = w0 * inv_area;
                let b1 = w1 * inv_area;
                let b2 = w2 * inv_area;
                let depth = b0 * p0[2] + b1 * p1[2] + b2 * p2[2];

                let index = y * self.width + x;
                if depth >= self.depth[index] {
                    continue;
                }
                self.depth[index] = depth;

                let pixel = index * 4;
                for channel in 0..3 {
                    let value = b0 * c0[channel] + b1 * c1[channel] + b2 * c2[channel];
                    self.pixels[pixel + channel] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
                self.pixels[pixel + 3] = 255;
            }
        }
    }
}

/// Signed doubled area of the triangle (a, b, c); positive when c lies left
/// of the a->b edge.
fn edge(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [[f32; 3]; 3] = [[1.0, 0.0, 0.0]; 3];
    const GREEN: [[f32; 3]; 3] = [[0.0, 1.0, 0.0]; 3];

    fn full_clip(canvas: &Canvas) -> ClipRect {
        ClipRect {
            x: 0,
            y: 0,
            width: canvas.width(),
            height: canvas.height(),
        }
    }

    #[test]
    fn triangle_covers_its_interior_and_not_its_exterior() {
        let mut canvas = Canvas::new(32, 32, None);
        let clip = full_clip(&canvas);
        canvas.fill_triangle(
            &clip,
            [[2.0, 2.0, 0.0], [30.0, 2.0, 0.0], [2.0, 30.0, 0.0]],
            RED,
        );
        assert_eq!(canvas.pixel(5, 5), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(30, 30), [0, 0, 0, 0]);
    }

    #[test]
    fn both_winding_orders_fill() {
        let mut canvas = Canvas::new(32, 32, None);
        let clip = full_clip(&canvas);
        canvas.fill_triangle(
            &clip,
            [[2.0, 2.0, 0.0], [2.0, 30.0, 0.0], [30.0, 2.0, 0.0]],
            RED,
        );
        assert_eq!(canvas.pixel(5, 5), [255, 0, 0, 255]);
    }

    #[test]
    fn nearer_triangle_wins_the_depth_test() {
        let mut canvas = Canvas::new(32, 32, None);
        let clip = full_clip(&canvas);
        let cover = [[0.0, 0.0, 0.0], [32.0, 0.0, 0.0], [0.0, 32.0, 0.0]];
        let mut far = cover;
        for p in &mut far {
            p[2] = 5.0;
        }
        canvas.fill_triangle(&clip, far, RED);
        let mut near = cover;
        for p in &mut near {
            p[2] = -5.0;
        }
        canvas.fill_triangle(&clip, near, GREEN);
        assert_eq!(canvas.pixel(5, 5), [0, 255, 0, 255]);

        // Drawing the far one again must not overwrite the near one.
        canvas.fill_triangle(&clip, far, RED);
        assert_eq!(canvas.pixel(5, 5), [0, 255, 0, 255]);
    }

    #[test]
    fn fills_stay_inside_the_clip_rect() {
        let mut canvas = Canvas::new(32, 32, None);
        let clip = ClipRect {
            x: 0,
            y: 0,
            width: 16,
            height: 32,
        };
        canvas.fill_triangle(
            &clip,
            [[0.0, 0.0, 0.0], [32.0, 0.0, 0.0], [0.0, 32.0, 0.0]],
            RED,
        );
        assert_eq!(canvas.pixel(8, 8), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(20, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let mut canvas = Canvas::new(16, 16, None);
        let clip = full_clip(&canvas);
        canvas.fill_triangle(
            &clip,
            [[2.0, 2.0, 0.0], [8.0, 8.0, 0.0], [14.0, 14.0, 0.0]],
            RED,
        );
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(canvas.pixel(x, y)[3], 0);
            }
        }
    }

    #[test]
    fn background_color_fills_uncovered_pixels() {
        let canvas = Canvas::new(4, 4, Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 0), [255, 255, 255, 255]);
        let transparent = Canvas::new(4, 4, None);
        assert_eq!(transparent.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn colors_interpolate_across_the_face() {
        let mut canvas = Canvas::new(64, 64, None);
        let clip = full_clip(&canvas);
        canvas.fill_triangle(
            &clip,
            [[0.0, 0.0, 0.0], [63.0, 0.0, 0.0], [0.0, 63.0, 0.0]],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        );
        let near_a = canvas.pixel(2, 2);
        let near_b = canvas.pixel(60, 1);
        assert!(near_a[0] > near_a[1] && near_a[0] > near_a[2]);
        assert!(near_b[1] > near_b[0] && near_b[1] > near_b[2]);
    }
}
