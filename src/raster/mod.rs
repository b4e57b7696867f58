//! Raster sources and the asset catalog

pub mod catalog;
pub mod source;

pub use catalog::RasterCatalog;
pub use source::RasterSource;
