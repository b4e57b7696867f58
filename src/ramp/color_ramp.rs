//! Color ramp: palette + display range + clamp behavior
//!
//! The ramp is the renderer state an overlay draws through. It is mutable
//! in place; every mutation bumps a revision counter so an attached overlay
//! knows its cached pixels are stale and re-renders.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::errors::MapResult;
use crate::ramp::palette::{Palette, RgbColor};

/// Legend image token published for UI consumption
///
/// The UI layer decides where and how to show it; the engine only renders
/// the swatch.
#[derive(Debug, Clone)]
pub struct LegendSwatch {
    /// Name of the palette the swatch was rendered from
    pub palette: String,
    /// Horizontal gradient, low values on the left
    pub image: RgbaImage,
}

/// Maps scalar values to display colors over a configurable window
#[derive(Debug, Clone)]
pub struct ColorRamp {
    palette: Palette,
    display_min: f64,
    display_max: f64,
    clamp_low: bool,
    clamp_high: bool,
    revision: u64,
}

impl ColorRamp {
    /// Create a ramp over a named palette
    ///
    /// A reversed range is swapped rather than rejected, so callers can
    /// hand over slider bounds without ordering them first.
    pub fn new(
        palette_name: &str,
        display_min: f64,
        display_max: f64,
        clamp_low: bool,
        clamp_high: bool,
    ) -> MapResult<Self> {
        let palette = Palette::named(palette_name)?;
        let (lo, hi) = order_range(display_min, display_max);
        Ok(ColorRamp {
            palette,
            display_min: lo,
            display_max: hi,
            clamp_low,
            clamp_high,
            revision: 0,
        })
    }

    /// Name of the current palette
    pub fn palette_name(&self) -> &str {
        &self.palette.name
    }

    /// Lower bound of the display range
    pub fn display_min(&self) -> f64 {
        self.display_min
    }

    /// Upper bound of the display range
    pub fn display_max(&self) -> f64 {
        self.display_max
    }

    /// Whether values below the range render at the boundary color
    pub fn clamp_low(&self) -> bool {
        self.clamp_low
    }

    /// Whether values above the range render at the boundary color
    pub fn clamp_high(&self) -> bool {
        self.clamp_high
    }

    /// Revision counter, bumped on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the palette
    ///
    /// Fails with `UnknownPalette` for unrecognized names; the current
    /// palette is kept in that case.
    pub fn set_palette(&mut self, name: &str) -> MapResult<()> {
        self.palette = Palette::named(name)?;
        self.revision += 1;
        debug!("Ramp palette set to {}", name);
        Ok(())
    }

    /// Update the visible value window
    ///
    /// Reversed bounds are swapped.
    pub fn set_display_range(&mut self, min: f64, max: f64) {
        let (lo, hi) = order_range(min, max);
        self.display_min = lo;
        self.display_max = hi;
        self.revision += 1;
        debug!("Ramp display range set to [{}, {}]", lo, hi);
    }

    /// Update the clamp flags
    pub fn set_clamp(&mut self, clamp_low: bool, clamp_high: bool) {
        self.clamp_low = clamp_low;
        self.clamp_high = clamp_high;
        self.revision += 1;
    }

    /// Map a value to its display color
    ///
    /// Pure and deterministic for a given ramp state. `None` means the
    /// value renders transparent (no-data, or out of range with the
    /// corresponding clamp flag unset).
    pub fn map_value(&self, value: f64) -> Option<RgbColor> {
        if value.is_nan() {
            return None;
        }

        if value < self.display_min {
            return if self.clamp_low {
                Some(self.palette.min_color())
            } else {
                None
            };
        }

        if value > self.display_max {
            return if self.clamp_high {
                Some(self.palette.max_color())
            } else {
                None
            };
        }

        let span = self.display_max - self.display_min;
        let t = if span > 0.0 {
            (value - self.display_min) / span
        } else {
            0.0
        };

        Some(self.palette.color_at(t))
    }

    /// Render the palette swatch for the legend
    pub fn legend(&self, width: u32, height: u32) -> LegendSwatch {
        let mut image = RgbaImage::new(width, height);
        for x in 0..width {
            let t = if width > 1 {
                x as f64 / (width - 1) as f64
            } else {
                0.0
            };
            let color = self.palette.color_at(t);
            for y in 0..height {
                image.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
            }
        }

        LegendSwatch {
            palette: self.palette.name.clone(),
            image,
        }
    }
}

/// Order a possibly reversed range
fn order_range(min: f64, max: f64) -> (f64, f64) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> ColorRamp {
        ColorRamp::new("viridis", 0.0, 1.0, false, false).unwrap()
    }

    #[test]
    fn map_value_is_deterministic() {
        let r = ramp();
        assert_eq!(r.map_value(0.37), r.map_value(0.37));
    }

    #[test]
    fn map_value_is_monotone_distinct() {
        let r = ramp();
        let samples = [0.0, 0.25, 0.5, 0.75, 1.0];
        for pair in samples.windows(2) {
            let lo = r.map_value(pair[0]).unwrap();
            let hi = r.map_value(pair[1]).unwrap();
            assert_ne!(lo, hi, "{} and {} mapped to the same color", pair[0], pair[1]);
        }
    }

    #[test]
    fn boundaries_hit_boundary_stops() {
        let mut r = ramp();
        r.set_display_range(10.0, 20.0);
        let palette = Palette::named("viridis").unwrap();
        assert_eq!(r.map_value(10.0).unwrap(), palette.min_color());
        assert_eq!(r.map_value(20.0).unwrap(), palette.max_color());
    }

    #[test]
    fn reversed_range_is_swapped() {
        let mut r = ramp();
        r.set_display_range(0.9, 0.1);
        assert_eq!(r.display_min(), 0.1);
        assert_eq!(r.display_max(), 0.9);
    }

    #[test]
    fn out_of_range_respects_clamp_flags() {
        let mut r = ramp();
        r.set_display_range(0.40, 1.0);

        // clamp_low unset: below-range values are transparent
        assert!(r.map_value(0.39).is_none());
        // the lower boundary itself renders as the first stop
        let palette = Palette::named("viridis").unwrap();
        assert_eq!(r.map_value(0.40).unwrap(), palette.min_color());

        r.set_clamp(true, false);
        assert_eq!(r.map_value(0.39).unwrap(), palette.min_color());

        r.set_clamp(false, true);
        assert!(r.map_value(0.39).is_none());
        assert_eq!(r.map_value(1.5).unwrap(), palette.max_color());
    }

    #[test]
    fn nan_is_transparent() {
        let r = ramp();
        assert!(r.map_value(f64::NAN).is_none());
    }

    #[test]
    fn mutations_bump_revision() {
        let mut r = ramp();
        let before = r.revision();
        r.set_display_range(0.2, 0.8);
        assert!(r.revision() > before);

        let before = r.revision();
        r.set_palette("inferno").unwrap();
        assert!(r.revision() > before);
        assert_eq!(r.palette_name(), "inferno");

        // a failed palette swap keeps state and revision
        let before = r.revision();
        assert!(r.set_palette("nope").is_err());
        assert_eq!(r.revision(), before);
        assert_eq!(r.palette_name(), "inferno");
    }

    #[test]
    fn legend_gradient_spans_palette() {
        let r = ramp();
        let swatch = r.legend(256, 10);
        assert_eq!(swatch.palette, "viridis");
        let palette = Palette::named("viridis").unwrap();
        let first = swatch.image.get_pixel(0, 5);
        let last = swatch.image.get_pixel(255, 5);
        let min = palette.min_color();
        let max = palette.max_color();
        assert_eq!([first[0], first[1], first[2]], [min.r, min.g, min.b]);
        assert_eq!([last[0], last[1], last[2]], [max.r, max.g, max.b]);
    }
}
