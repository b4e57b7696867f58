//! Renderable raster overlay
//!
//! An overlay composes one raster source with whatever ramp the map
//! currently carries. Rendered pixels are cached against the ramp revision,
//! so palette and range changes invalidate the cache and nothing else does.

use image::{Rgba, RgbaImage};
use log::debug;
use std::sync::Arc;

use crate::ramp::ColorRamp;
use crate::raster::RasterSource;

/// A raster layer ready to draw on the map
pub struct RasterOverlay {
    source: Arc<RasterSource>,
    opacity: f64,
    rendered: Option<(u64, RgbaImage)>,
}

impl RasterOverlay {
    /// Create an overlay over a loaded source
    pub fn new(source: Arc<RasterSource>, opacity: f64) -> Self {
        RasterOverlay {
            source,
            opacity: opacity.clamp(0.0, 1.0),
            rendered: None,
        }
    }

    /// The raster source this overlay draws
    pub fn source(&self) -> &RasterSource {
        &self.source
    }

    /// Identifier of the underlying raster
    pub fn identifier(&self) -> &str {
        self.source.identifier()
    }

    /// Overlay opacity in [0,1]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Render the overlay through the given ramp
    ///
    /// Re-renders only when the ramp revision moved since the last call.
    pub fn render(&mut self, ramp: &ColorRamp) -> &RgbaImage {
        let revision = ramp.revision();
        let stale = self
            .rendered
            .as_ref()
            .map(|(rev, _)| *rev != revision)
            .unwrap_or(true);

        if stale {
            debug!(
                "Rendering overlay '{}' at ramp revision {}",
                self.identifier(),
                revision
            );
            let image = self.paint(ramp);
            self.rendered = Some((revision, image));
        }

        let (_, image) = self
            .rendered
            .as_ref()
            .expect("overlay render cache populated above");
        image
    }

    /// Paint every cell through the ramp
    fn paint(&self, ramp: &ColorRamp) -> RgbaImage {
        let width = self.source.width();
        let height = self.source.height();
        let alpha = (self.opacity * 255.0).round() as u8;

        let mut image = RgbaImage::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let pixel = match self.source.sample(col, row).and_then(|v| ramp.map_value(v)) {
                    Some(color) => Rgba([color.r, color.g, color.b, alpha]),
                    None => Rgba([0, 0, 0, 0]),
                };
                image.put_pixel(col, row, pixel);
            }
        }
        image
    }
}
