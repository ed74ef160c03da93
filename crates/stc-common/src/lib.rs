//! Common types shared across the brain-animator crates and services.

pub mod error;
pub mod options;

pub use error::{BrainError, BrainResult};
pub use options::{
    BackgroundColor, Colormap, CortexStyle, HemiSide, Hemisphere, RenderOptions,
    SamplingOptions, ViewAngle,
};
