//! Affine transform between pixel and geographic coordinates
//!
//! The transform carries the GeoTIFF origin + pixel size model. Rotation
//! terms are not represented: north-up rasters only.

use super::bbox::BoundingBox;

/// Affine mapping from pixel (col, row) to world (x, y) coordinates
#[derive(Debug, Clone, Copy)]
pub struct GeoTransform {
    /// X coordinate of the top-left corner of the top-left pixel
    pub origin_x: f64,
    /// Y coordinate of the top-left corner of the top-left pixel
    pub origin_y: f64,
    /// Pixel width in map units
    pub pixel_width: f64,
    /// Pixel height in map units (negative: rows grow southward)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a new transform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Convert pixel coordinates to world coordinates
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Convert world coordinates to fractional pixel coordinates
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Geographic extent of a grid with the given dimensions
    pub fn bounds(&self, width: u32, height: u32) -> BoundingBox {
        let min_x = self.origin_x;
        let max_y = self.origin_y;
        let max_x = min_x + width as f64 * self.pixel_width;
        let min_y = max_y + height as f64 * self.pixel_height;
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }
}
