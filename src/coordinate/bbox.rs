//! Bounding box structure for geographic extents

use super::point::LatLng;

/// A geographic bounding box in map units (degrees for EPSG:4326)
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Minimum X coordinate (west)
    pub min_x: f64,
    /// Minimum Y coordinate (south)
    pub min_y: f64,
    /// Maximum X coordinate (east)
    pub max_x: f64,
    /// Maximum Y coordinate (north)
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> LatLng {
        LatLng::new(
            self.min_y + self.height() / 2.0,
            self.min_x + self.width() / 2.0,
        )
    }

    /// Check if this bounding box contains a position
    pub fn contains(&self, position: &LatLng) -> bool {
        position.lng >= self.min_x
            && position.lng <= self.max_x
            && position.lat >= self.min_y
            && position.lat <= self.max_y
    }
}
