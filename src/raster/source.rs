//! Loaded raster source
//!
//! A RasterSource is the immutable, fully decoded form of one raster asset:
//! cell values, placement, nodata handling. It is owned by whichever overlay
//! loaded it and dropped when that overlay is replaced.

use crate::coordinate::{BoundingBox, GeoTransform, LatLng};
use crate::geotiff::{DecodedRaster, RasterGrid};

/// A georeferenced raster loaded for display
#[derive(Debug, Clone)]
pub struct RasterSource {
    identifier: String,
    grid: RasterGrid,
    transform: GeoTransform,
    extent: BoundingBox,
}

impl RasterSource {
    /// Wrap a decoded raster under its catalog identifier
    pub fn new(identifier: &str, decoded: DecodedRaster) -> Self {
        RasterSource {
            identifier: identifier.to_string(),
            grid: decoded.grid,
            transform: decoded.transform,
            extent: decoded.extent,
        }
    }

    /// Catalog identifier this source was loaded for
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Grid height in cells
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Geographic extent of the raster
    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    /// The decoded cell values
    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    /// Sample a cell by grid position
    pub fn sample(&self, col: u32, row: u32) -> Option<f64> {
        self.grid.sample(col, row)
    }

    /// Sample the cell under a geographic position
    ///
    /// Returns None outside the extent and for nodata cells.
    pub fn value_at(&self, position: &LatLng) -> Option<f64> {
        if !self.extent.contains(position) {
            return None;
        }

        let (col, row) = self.transform.geo_to_pixel(position.lng, position.lat);
        if col < 0.0 || row < 0.0 {
            return None;
        }

        self.grid.sample(col.floor() as u32, row.floor() as u32)
    }
}
