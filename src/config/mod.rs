//! Viewer configuration
//!
//! A TOML file describes the initial view, the asset locations and the ramp
//! defaults. Every field has a default matching the values the engine
//! shipped with, so a missing or partial file still produces a working map.

use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinate::LatLng;
use crate::errors::{MapError, MapResult};

/// Viewer configuration loaded at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Initial map center as [lat, lng]
    pub center: [f64; 2],
    /// Initial zoom level
    pub zoom: u8,
    /// Raster selected at startup, if any
    pub initial_raster: Option<String>,
    /// Directory the raster assets live in
    pub raster_dir: PathBuf,
    /// GeoJSON point-feature file fetched once at startup
    pub features_path: Option<PathBuf>,
    /// Ramp palette name
    pub palette: String,
    /// Lower bound of the display range
    pub display_min: f64,
    /// Upper bound of the display range
    pub display_max: f64,
    /// Render below-range values at the boundary color
    pub clamp_low: bool,
    /// Render above-range values at the boundary color
    pub clamp_high: bool,
    /// Overlay opacity in [0,1]
    pub opacity: f64,
    /// Zoom level at which the feature layer hides
    pub feature_zoom_cutoff: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            center: [42.9, -75.6],
            zoom: 7,
            initial_raster: None,
            raster_dir: PathBuf::from("./tif"),
            features_path: None,
            palette: "viridis".to_string(),
            display_min: 0.0,
            display_max: 1.0,
            clamp_low: false,
            clamp_high: false,
            opacity: 0.3,
            feature_zoom_cutoff: 12,
        }
    }
}

impl ViewerConfig {
    /// Load the configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        info!("Loading viewer configuration from {}", path.as_ref().display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> MapResult<Self> {
        let config: ViewerConfig =
            toml::from_str(text).map_err(|e| MapError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The initial center as a position
    pub fn center_latlng(&self) -> LatLng {
        LatLng::new(self.center[0], self.center[1])
    }

    /// Reject configurations the engine cannot run with
    fn validate(&self) -> MapResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(MapError::ConfigError(format!(
                "opacity {} outside [0, 1]",
                self.opacity
            )));
        }
        if !self.display_min.is_finite() || !self.display_max.is_finite() {
            return Err(MapError::ConfigError(
                "display range bounds must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
