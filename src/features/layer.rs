//! GeoJSON point-feature layer
//!
//! The layer is loaded once at startup from a FeatureCollection of point
//! features. Every marker gets the same fixed style. Visibility follows the
//! zoom level: the layer hides at and above the cutoff and re-shows below.

use geojson::{GeoJson, Value};
use log::{debug, info};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::Path;

use crate::coordinate::LatLng;
use crate::errors::{MapError, MapResult};

/// Fixed circle-marker style applied to every feature
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// Marker radius in pixels
    pub radius: f64,
    /// Fill color
    pub fill_color: String,
    /// Outline color
    pub color: String,
    /// Outline width in pixels
    pub weight: f64,
    /// Outline opacity
    pub opacity: f64,
    /// Fill opacity
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            radius: 8.0,
            fill_color: "#ff7800".to_string(),
            color: "#000".to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// One rendered point feature
#[derive(Debug, Clone)]
pub struct PointMarker {
    /// Marker position
    pub position: LatLng,
    /// Feature properties carried through for popups and styling hooks
    pub properties: Option<Map<String, JsonValue>>,
}

/// A point-feature layer with zoom-dependent visibility
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    markers: Vec<PointMarker>,
    style: MarkerStyle,
    visible: bool,
}

impl FeatureLayer {
    /// Load the layer from a GeoJSON file
    pub fn from_geojson_file<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        info!("Loading feature layer from {}", path.as_ref().display());
        let text = fs::read_to_string(path)?;
        Self::from_geojson_str(&text)
    }

    /// Build the layer from GeoJSON text
    ///
    /// The input must be a FeatureCollection; non-point geometries are
    /// skipped. Malformed input is an external-data error.
    pub fn from_geojson_str(text: &str) -> MapResult<Self> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| MapError::DecodeError(format!("Malformed GeoJSON: {}", e)))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => {
                return Err(MapError::DecodeError(
                    "Expected a GeoJSON FeatureCollection".to_string(),
                ))
            }
        };

        let mut markers = Vec::new();
        for feature in collection.features {
            let geometry = match feature.geometry {
                Some(geometry) => geometry,
                None => continue,
            };

            if let Value::Point(coords) = geometry.value {
                if coords.len() >= 2 {
                    // GeoJSON positions are [lng, lat]
                    markers.push(PointMarker {
                        position: LatLng::new(coords[1], coords[0]),
                        properties: feature.properties,
                    });
                }
            }
        }

        info!("Feature layer holds {} point markers", markers.len());
        Ok(FeatureLayer {
            markers,
            style: MarkerStyle::default(),
            visible: true,
        })
    }

    /// The layer's markers
    pub fn markers(&self) -> &[PointMarker] {
        &self.markers
    }

    /// The fixed marker style
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Whether the layer is currently shown on the map
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Apply the zoom cutoff; returns true when visibility flipped
    pub fn update_visibility(&mut self, zoom: u8, cutoff: u8) -> bool {
        let show = zoom < cutoff;
        if show != self.visible {
            self.visible = show;
            debug!(
                "Feature layer {} at zoom {}",
                if show { "shown" } else { "hidden" },
                zoom
            );
            return true;
        }
        false
    }
}
