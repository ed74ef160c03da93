//! User-selectable visualization options.
//!
//! Every control on the page maps to one of these closed sets. Values arrive as
//! multipart text fields and are parsed through the `parse` constructors, which
//! reject anything outside the set before a job starts.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{BrainError, BrainResult};

/// Valid range for surface smoothing steps.
pub const SMOOTHING_RANGE: RangeInclusive<u32> = 1..=20;

/// Valid range for the time-sampling stride.
pub const STRIDE_RANGE: RangeInclusive<u32> = 1..=50;

/// Valid range for the per-frame display duration, in seconds.
pub const DURATION_RANGE: RangeInclusive<f32> = 0.05..=0.5;

fn unknown_value(param: &str, value: &str, choices: &[&'static str]) -> BrainError {
    BrainError::InvalidParameter {
        param: param.to_string(),
        message: format!(
            "unknown value '{}', expected one of: {}",
            value,
            choices.join(", ")
        ),
    }
}

fn out_of_range(param: &str, value: impl fmt::Display, lo: impl fmt::Display, hi: impl fmt::Display) -> BrainError {
    BrainError::InvalidParameter {
        param: param.to_string(),
        message: format!("{} is outside the allowed range {}..={}", value, lo, hi),
    }
}

// ============================================================================
// Closed option sets
// ============================================================================

/// Color palette applied to the activity overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    Hot,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Coolwarm,
    #[serde(rename = "RdBu_r")]
    RdBuR,
}

impl Colormap {
    pub const ALL: [Colormap; 7] = [
        Colormap::Hot,
        Colormap::Viridis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
        Colormap::Coolwarm,
        Colormap::RdBuR,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Colormap::Hot => "hot",
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Coolwarm => "coolwarm",
            Colormap::RdBuR => "RdBu_r",
        }
    }

    /// Diverging palettes map signed values around their midpoint instead of
    /// mapping magnitudes from the low end.
    pub fn is_diverging(&self) -> bool {
        matches!(self, Colormap::Coolwarm | Colormap::RdBuR)
    }

    pub fn parse(value: &str) -> BrainResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| unknown_value("colormap", value, &Self::ALL.map(|c| c.as_str())))
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Solid background color used when transparency is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    White,
    Black,
}

impl BackgroundColor {
    pub const ALL: [BackgroundColor; 2] = [BackgroundColor::White, BackgroundColor::Black];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundColor::White => "white",
            BackgroundColor::Black => "black",
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        match self {
            BackgroundColor::White => [255, 255, 255, 255],
            BackgroundColor::Black => [0, 0, 0, 255],
        }
    }

    pub fn parse(value: &str) -> BrainResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| unknown_value("background", value, &Self::ALL.map(|c| c.as_str())))
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cortex surface shading preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CortexStyle {
    LowContrast,
    Classic,
    HighContrast,
}

impl CortexStyle {
    pub const ALL: [CortexStyle; 3] = [
        CortexStyle::LowContrast,
        CortexStyle::Classic,
        CortexStyle::HighContrast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CortexStyle::LowContrast => "low_contrast",
            CortexStyle::Classic => "classic",
            CortexStyle::HighContrast => "high_contrast",
        }
    }

    pub fn parse(value: &str) -> BrainResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| unknown_value("cortex", value, &Self::ALL.map(|c| c.as_str())))
    }
}

impl fmt::Display for CortexStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete cortical hemisphere. Uploads and surface files are labeled
/// with the FreeSurfer names `lh` and `rh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HemiSide {
    #[serde(rename = "lh")]
    Left,
    #[serde(rename = "rh")]
    Right,
}

impl HemiSide {
    pub const ALL: [HemiSide; 2] = [HemiSide::Left, HemiSide::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            HemiSide::Left => "lh",
            HemiSide::Right => "rh",
        }
    }

    pub fn opposite(&self) -> HemiSide {
        match self {
            HemiSide::Left => HemiSide::Right,
            HemiSide::Right => HemiSide::Left,
        }
    }
}

impl fmt::Display for HemiSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hemisphere selection for the rendered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    /// Both hemispheres side by side, left column and right column.
    #[serde(rename = "split")]
    Split,
    #[serde(rename = "lh")]
    Left,
    #[serde(rename = "rh")]
    Right,
}

impl Hemisphere {
    pub const ALL: [Hemisphere; 3] = [Hemisphere::Split, Hemisphere::Left, Hemisphere::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Split => "split",
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }

    /// The concrete hemispheres this selection draws, in column order.
    pub fn sides(&self) -> &'static [HemiSide] {
        match self {
            Hemisphere::Split => &[HemiSide::Left, HemiSide::Right],
            Hemisphere::Left => &[HemiSide::Left],
            Hemisphere::Right => &[HemiSide::Right],
        }
    }

    /// Deterministic name for the downloadable artifact.
    pub fn artifact_filename(&self) -> String {
        format!("brain_animation_{}.gif", self.as_str())
    }

    pub fn parse(value: &str) -> BrainResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| unknown_value("hemi", value, &Self::ALL.map(|c| c.as_str())))
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named camera angle for one rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAngle {
    Lateral,
    Medial,
    Rostral,
    Caudal,
    Dorsal,
    Ventral,
    Frontal,
    Parietal,
}

impl ViewAngle {
    pub const ALL: [ViewAngle; 8] = [
        ViewAngle::Lateral,
        ViewAngle::Medial,
        ViewAngle::Rostral,
        ViewAngle::Caudal,
        ViewAngle::Dorsal,
        ViewAngle::Ventral,
        ViewAngle::Frontal,
        ViewAngle::Parietal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewAngle::Lateral => "lateral",
            ViewAngle::Medial => "medial",
            ViewAngle::Rostral => "rostral",
            ViewAngle::Caudal => "caudal",
            ViewAngle::Dorsal => "dorsal",
            ViewAngle::Ventral => "ventral",
            ViewAngle::Frontal => "frontal",
            ViewAngle::Parietal => "parietal",
        }
    }

    pub fn parse(value: &str) -> BrainResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| unknown_value("views", value, &Self::ALL.map(|c| c.as_str())))
    }
}

impl fmt::Display for ViewAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Option records
// ============================================================================

/// Display configuration for one render job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub colormap: Colormap,
    /// Leave uncovered pixels fully transparent instead of filling the
    /// background color.
    pub transparent: bool,
    /// Solid background color. Inert while `transparent` is set.
    pub background: BackgroundColor,
    pub colorbar: bool,
    pub cortex: CortexStyle,
    pub hemisphere: Hemisphere,
    /// Views rendered side by side, in selection order.
    pub views: Vec<ViewAngle>,
    pub smoothing_steps: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colormap: Colormap::Hot,
            transparent: false,
            background: BackgroundColor::White,
            colorbar: false,
            cortex: CortexStyle::LowContrast,
            hemisphere: Hemisphere::Split,
            views: vec![ViewAngle::Lateral],
            smoothing_steps: 5,
        }
    }
}

impl RenderOptions {
    /// Reject values a well-behaved client cannot produce.
    pub fn validate(&self) -> BrainResult<()> {
        if self.views.is_empty() {
            return Err(BrainError::InvalidParameter {
                param: "views".to_string(),
                message: "at least one view must be selected".to_string(),
            });
        }
        for (i, view) in self.views.iter().enumerate() {
            if self.views[..i].contains(view) {
                return Err(BrainError::InvalidParameter {
                    param: "views".to_string(),
                    message: format!("view '{}' selected more than once", view),
                });
            }
        }
        if !SMOOTHING_RANGE.contains(&self.smoothing_steps) {
            return Err(out_of_range(
                "smoothing_steps",
                self.smoothing_steps,
                SMOOTHING_RANGE.start(),
                SMOOTHING_RANGE.end(),
            ));
        }
        Ok(())
    }
}

/// Time sampling and animation pacing for one render job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Sample every Nth time point.
    pub stride: u32,
    /// How long each frame is shown, in seconds.
    pub frame_duration: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            stride: 20,
            frame_duration: 0.1,
        }
    }
}

impl SamplingOptions {
    pub fn validate(&self) -> BrainResult<()> {
        if !STRIDE_RANGE.contains(&self.stride) {
            return Err(out_of_range(
                "time_stride",
                self.stride,
                STRIDE_RANGE.start(),
                STRIDE_RANGE.end(),
            ));
        }
        if !self.frame_duration.is_finite() || !DURATION_RANGE.contains(&self.frame_duration) {
            return Err(out_of_range(
                "frame_duration",
                self.frame_duration,
                DURATION_RANGE.start(),
                DURATION_RANGE.end(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_controls() {
        let opts = RenderOptions::default();
        assert_eq!(opts.colormap, Colormap::Hot);
        assert!(!opts.transparent);
        assert_eq!(opts.background, BackgroundColor::White);
        assert!(!opts.colorbar);
        assert_eq!(opts.cortex, CortexStyle::LowContrast);
        assert_eq!(opts.hemisphere, Hemisphere::Split);
        assert_eq!(opts.views, vec![ViewAngle::Lateral]);
        assert_eq!(opts.smoothing_steps, 5);

        let sampling = SamplingOptions::default();
        assert_eq!(sampling.stride, 20);
        assert!((sampling.frame_duration - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn every_colormap_round_trips_through_parse() {
        for cmap in Colormap::ALL {
            assert_eq!(Colormap::parse(cmap.as_str()).unwrap(), cmap);
        }
        assert_eq!(Colormap::parse("RdBu_r").unwrap(), Colormap::RdBuR);
    }

    #[test]
    fn unknown_colormap_is_rejected_with_choices() {
        let err = Colormap::parse("jet").unwrap_err();
        match err {
            BrainError::InvalidParameter { param, message } => {
                assert_eq!(param, "colormap");
                assert!(message.contains("jet"));
                assert!(message.contains("viridis"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn diverging_palettes_are_flagged() {
        assert!(Colormap::Coolwarm.is_diverging());
        assert!(Colormap::RdBuR.is_diverging());
        assert!(!Colormap::Hot.is_diverging());
        assert!(!Colormap::Viridis.is_diverging());
    }

    #[test]
    fn hemisphere_sides_and_filenames() {
        assert_eq!(Hemisphere::Split.sides(), &[HemiSide::Left, HemiSide::Right]);
        assert_eq!(Hemisphere::Left.sides(), &[HemiSide::Left]);
        assert_eq!(Hemisphere::Right.sides(), &[HemiSide::Right]);

        assert_eq!(Hemisphere::Split.artifact_filename(), "brain_animation_split.gif");
        assert_eq!(Hemisphere::Left.artifact_filename(), "brain_animation_lh.gif");
        assert_eq!(Hemisphere::Right.artifact_filename(), "brain_animation_rh.gif");
    }

    #[test]
    fn every_view_round_trips_through_parse() {
        for view in ViewAngle::ALL {
            assert_eq!(ViewAngle::parse(view.as_str()).unwrap(), view);
        }
        assert!(ViewAngle::parse("sagittal").is_err());
    }

    #[test]
    fn duplicate_views_are_rejected() {
        let opts = RenderOptions {
            views: vec![ViewAngle::Lateral, ViewAngle::Dorsal, ViewAngle::Lateral],
            ..RenderOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn empty_view_list_is_rejected() {
        let opts = RenderOptions {
            views: vec![],
            ..RenderOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn smoothing_bounds_are_enforced() {
        let mut opts = RenderOptions::default();
        opts.smoothing_steps = 0;
        assert!(opts.validate().is_err());
        opts.smoothing_steps = 21;
        assert!(opts.validate().is_err());
        opts.smoothing_steps = 20;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn sampling_bounds_are_enforced() {
        let mut sampling = SamplingOptions::default();
        assert!(sampling.validate().is_ok());

        sampling.stride = 0;
        assert!(sampling.validate().is_err());
        sampling.stride = 51;
        assert!(sampling.validate().is_err());
        sampling.stride = 50;
        assert!(sampling.validate().is_ok());

        sampling.frame_duration = 0.04;
        assert!(sampling.validate().is_err());
        sampling.frame_duration = 0.51;
        assert!(sampling.validate().is_err());
        sampling.frame_duration = f32::NAN;
        assert!(sampling.validate().is_err());
        sampling.frame_duration = 0.5;
        assert!(sampling.validate().is_ok());
    }

    #[test]
    fn background_colors_map_to_rgba() {
        assert_eq!(BackgroundColor::White.rgba(), [255, 255, 255, 255]);
        assert_eq!(BackgroundColor::Black.rgba(), [0, 0, 0, 255]);
    }
}
