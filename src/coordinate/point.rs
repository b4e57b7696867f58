//! Geographic point structure

/// A geographic position in WGS84 (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl LatLng {
    /// Create a new position
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}
