//! Point-feature overlay data

pub mod layer;

pub use layer::{FeatureLayer, MarkerStyle, PointMarker};
