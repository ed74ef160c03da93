//! Label font loading.
//!
//! Time and colorbar labels need a TrueType font. The font is looked up on
//! disk at render-service startup: an explicitly configured path first, then
//! a list of common system locations. When nothing usable is found the
//! renderer skips labels instead of failing the job.

use std::fs;
use std::path::{Path, PathBuf};

use rusttype::Font;
use tracing::warn;

const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

/// Load the first usable font from the explicit path and the fallbacks.
pub fn load_label_font(explicit: Option<&Path>) -> Option<Font<'static>> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    candidates.extend(FALLBACK_FONT_PATHS.iter().map(PathBuf::from));

    for (i, path) in candidates.iter().enumerate() {
        let explicit_candidate = explicit.is_some() && i == 0;
        match fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => return Some(font),
                None => {
                    warn!(path = %path.display(), "font file is not a usable TrueType font")
                }
            },
            Err(err) if explicit_candidate => {
                warn!(path = %path.display(), error = %err, "configured font path is unreadable, trying fallbacks");
            }
            Err(_) => {}
        }
    }

    warn!("no label font found; time and colorbar labels will be skipped");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_not_accepted_as_a_font() {
        assert!(Font::try_from_vec(b"definitely not sfnt data".to_vec()).is_none());
    }

    #[test]
    fn missing_explicit_path_falls_back_without_panicking() {
        let _ = load_label_font(Some(Path::new("/nonexistent/font.ttf")));
    }
}
