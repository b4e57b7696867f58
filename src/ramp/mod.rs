//! Color ramps for value-to-color rendering

pub mod color_ramp;
pub mod palette;

pub use color_ramp::{ColorRamp, LegendSwatch};
pub use palette::{palette_names, Palette, RgbColor};
