//! Software rendering of cortical activity animations.
//!
//! Pipeline pieces, in the order a job uses them:
//! - Activity thresholds from the whole estimate (`scale`)
//! - Named palettes expanded to lookup tables (`colormap`)
//! - Per-view orthographic cameras (`camera`)
//! - Z-buffer triangle rasterization (`raster`)
//! - Frame composition with layout, shading, colorbar and time label
//!   (`compose`, `colorbar`, `font`)
//! - Still and animation encoding (`png`, `gif`)

pub mod camera;
pub mod colorbar;
pub mod colormap;
pub mod compose;
pub mod error;
pub mod font;
pub mod gif;
pub mod png;
pub mod raster;
pub mod scale;

pub use camera::{camera_for, CameraBasis, ViewCamera};
pub use colormap::ColorLut;
pub use compose::{
    layout_cells, CellSlot, FrameRenderer, HemiScene, CANVAS_HEIGHT, CANVAS_WIDTH,
};
pub use error::{RenderError, RenderResult};
pub use font::load_label_font;
pub use gif::{assemble_gif, delay_centiseconds};
pub use png::encode_png;
pub use raster::{Canvas, ClipRect};
pub use scale::ActivityScale;
