//! Point-value queries against the attached overlay

use crate::coordinate::LatLng;
use crate::overlay::RasterOverlay;

/// Result of sampling the raster under a clicked position
///
/// Never partially valid: either a value or the no-data sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSample {
    /// The raster's value at the queried point
    Value(f64),
    /// The point falls outside the raster's valid extent
    NoData,
}

impl ValueSample {
    /// The sampled value, if any
    pub fn value(&self) -> Option<f64> {
        match self {
            ValueSample::Value(v) => Some(*v),
            ValueSample::NoData => None,
        }
    }

    /// Whether the sample is the no-data sentinel
    pub fn is_no_data(&self) -> bool {
        matches!(self, ValueSample::NoData)
    }
}

/// Resolve the raster value under a geographic position
///
/// Out-of-extent coordinates yield `NoData`; this never fails.
pub fn value_at(overlay: &RasterOverlay, position: &LatLng) -> ValueSample {
    match overlay.source().value_at(position) {
        Some(value) => ValueSample::Value(value),
        None => ValueSample::NoData,
    }
}

/// Popup text for a sample, two decimal places
///
/// `NoData` suppresses the popup. So do negative values: a negative
/// magnitude is the sensor-floor sentinel in the source data, not a
/// displayable reading.
pub fn popup_text(sample: &ValueSample) -> Option<String> {
    match sample {
        ValueSample::Value(v) if *v >= 0.0 => Some(format!("Value at point: {:.2}", v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;
    use crate::geotiff::{DecodedRaster, RasterGrid};
    use crate::raster::RasterSource;
    use std::sync::Arc;

    fn overlay() -> RasterOverlay {
        // 2x2 grid over [-76,-75] x [42,43], nodata -9999 in the SE cell
        let transform = GeoTransform::new(-76.0, 43.0, 0.5, -0.5);
        let grid = RasterGrid::new(
            2,
            2,
            vec![0.125, 0.5, -3.0, -9999.0],
            Some(-9999.0),
        )
        .unwrap();
        let extent = transform.bounds(2, 2);
        let decoded = DecodedRaster {
            grid,
            transform,
            extent,
        };
        RasterOverlay::new(Arc::new(RasterSource::new("wells", decoded)), 0.3)
    }

    #[test]
    fn samples_the_cell_under_the_click() {
        let overlay = overlay();
        let sample = value_at(&overlay, &LatLng::new(42.9, -75.9));
        assert_eq!(sample, ValueSample::Value(0.125));
    }

    #[test]
    fn out_of_extent_is_no_data() {
        let overlay = overlay();
        assert!(value_at(&overlay, &LatLng::new(10.0, 10.0)).is_no_data());
        assert!(value_at(&overlay, &LatLng::new(-42.9, -75.9)).is_no_data());
    }

    #[test]
    fn nodata_cell_is_no_data() {
        let overlay = overlay();
        let sample = value_at(&overlay, &LatLng::new(42.1, -75.1));
        assert!(sample.is_no_data());
    }

    #[test]
    fn popup_formats_two_decimals() {
        assert_eq!(
            popup_text(&ValueSample::Value(0.125)),
            Some("Value at point: 0.12".to_string())
        );
    }

    #[test]
    fn popup_suppressed_for_no_data_and_negatives() {
        assert_eq!(popup_text(&ValueSample::NoData), None);
        assert_eq!(popup_text(&ValueSample::Value(-3.0)), None);
    }
}
