pub mod commands;
pub mod config;
pub mod coordinate;
pub mod errors;
pub mod features;
pub mod geotiff;
pub mod map;
pub mod overlay;
pub mod query;
pub mod ramp;
pub mod raster;
pub mod utils;

pub use crate::map::MapContext;

pub use config::ViewerConfig;
pub use coordinate::{BoundingBox, GeoTransform, LatLng};
pub use errors::{MapError, MapResult};
pub use features::{FeatureLayer, MarkerStyle};
pub use geotiff::GeoTiffDecoder;
pub use overlay::{OverlayPhase, OverlaySlot, RasterLoader, RasterOverlay};
pub use query::ValueSample;
pub use ramp::{ColorRamp, LegendSwatch, Palette, RgbColor};
pub use raster::{RasterCatalog, RasterSource};
