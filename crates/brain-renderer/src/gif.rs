//! Animated GIF assembly from rendered frame stills.
//!
//! Frames must already be in ascending time order. The writer sets an
//! infinite loop count and restore-to-background disposal on every frame;
//! without that disposal mode, transparent-background animations would
//! accumulate each frame on top of the last.

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Quantization speed for `Frame::from_rgba_speed`: 1 is slowest/best,
/// 30 fastest. 10 keeps banding invisible on shaded surfaces.
const QUANTIZATION_SPEED: i32 = 10;

/// GIF delays tick in centiseconds.
pub fn delay_centiseconds(frame_duration_secs: f32) -> u16 {
    (frame_duration_secs * 100.0).round().max(1.0) as u16
}

/// Encode the frames into one looping GIF.
pub fn assemble_gif(frames: &[RgbaImage], delay_cs: u16) -> RenderResult<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| RenderError::GifEncoding("no frames to assemble".to_string()))?;
    let (width, height) = (first.width(), first.height());
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(RenderError::GifEncoding(format!(
            "frame size {}x{} exceeds the GIF limit",
            width, height
        )));
    }

    let mut payload = Vec::new();
    {
        let mut encoder = Encoder::new(&mut payload, width as u16, height as u16, &[])?;
        encoder.set_repeat(Repeat::Infinite)?;

        for (index, image) in frames.iter().enumerate() {
            if image.width() != width || image.height() != height {
                return Err(RenderError::GifEncoding(format!(
                    "frame {} is {}x{} but frame 0 is {}x{}",
                    index,
                    image.width(),
                    image.height(),
                    width,
                    height
                )));
            }
            let mut rgba = image.as_raw().clone();
            let mut frame =
                Frame::from_rgba_speed(width as u16, height as u16, &mut rgba, QUANTIZATION_SPEED);
            frame.delay = delay_cs;
            frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&frame)?;
        }
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(rgba))
    }

    fn decode_frame_count(payload: &[u8]) -> (usize, Vec<u16>) {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options.read_info(payload).unwrap();
        let mut count = 0;
        let mut delays = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            count += 1;
            delays.push(frame.delay);
        }
        (count, delays)
    }

    #[test]
    fn duration_converts_to_centiseconds() {
        assert_eq!(delay_centiseconds(0.1), 10);
        assert_eq!(delay_centiseconds(0.05), 5);
        assert_eq!(delay_centiseconds(0.5), 50);
        assert_eq!(delay_centiseconds(0.07), 7);
        // Sub-tick durations still produce a nonzero delay.
        assert_eq!(delay_centiseconds(0.001), 1);
    }

    #[test]
    fn frame_count_and_delays_survive_encoding() {
        let frames = vec![
            solid_frame(20, 10, [255, 0, 0, 255]),
            solid_frame(20, 10, [0, 255, 0, 255]),
            solid_frame(20, 10, [0, 0, 255, 255]),
        ];
        let payload = assemble_gif(&frames, 12).unwrap();
        assert_eq!(&payload[0..6], b"GIF89a");

        let (count, delays) = decode_frame_count(&payload);
        assert_eq!(count, 3);
        assert!(delays.iter().all(|&d| d == 12));
    }

    #[test]
    fn loop_forever_extension_is_present() {
        let frames = vec![solid_frame(8, 8, [10, 20, 30, 255])];
        let payload = assemble_gif(&frames, 10).unwrap();
        // NETSCAPE2.0 application extension with loop count 0 = forever.
        let pos = payload
            .windows(11)
            .position(|w| w == b"NETSCAPE2.0")
            .expect("missing looping extension");
        let trailer = &payload[pos + 11..pos + 16];
        assert_eq!(trailer, &[3, 1, 0, 0, 0]);
    }

    #[test]
    fn empty_frame_list_is_rejected() {
        let err = assemble_gif(&[], 10).unwrap_err();
        assert!(matches!(err, RenderError::GifEncoding(_)));
    }

    #[test]
    fn mismatched_frame_sizes_are_rejected() {
        let frames = vec![
            solid_frame(8, 8, [0, 0, 0, 255]),
            solid_frame(9, 8, [0, 0, 0, 255]),
        ];
        assert!(assemble_gif(&frames, 10).is_err());
    }
}
