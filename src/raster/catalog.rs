//! Raster asset catalog
//!
//! Maps opaque raster identifiers to files on the asset host and loads
//! them. The mapping is deterministic: `<root>/<identifier>.4326.tif`,
//! with the CRS suffix fixed at EPSG:4326.

use log::info;
use std::path::{Path, PathBuf};

use crate::errors::{MapError, MapResult};
use crate::geotiff::GeoTiffDecoder;
use crate::raster::RasterSource;

/// Suffix every overlay asset carries: CRS code plus extension
const ASSET_SUFFIX: &str = "4326.tif";

/// Resolves and loads raster assets by identifier
#[derive(Debug, Clone)]
pub struct RasterCatalog {
    /// Directory the assets live in
    root: PathBuf,
}

impl RasterCatalog {
    /// Create a catalog over the given asset directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        RasterCatalog {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The asset directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an identifier to its asset path
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        self.root.join(format!("{}.{}", identifier, ASSET_SUFFIX))
    }

    /// Load the raster asset for an identifier
    ///
    /// A missing file is `NotFound`; malformed content surfaces as a decode
    /// error. One attempt only, the caller re-invokes to retry.
    pub fn load(&self, identifier: &str) -> MapResult<RasterSource> {
        let path = self.resolve(identifier);
        info!("Loading raster '{}' from {}", identifier, path.display());

        if !path.is_file() {
            return Err(MapError::NotFound(identifier.to_string()));
        }

        let mut decoder = GeoTiffDecoder::new();
        let decoded = decoder.decode_file(&path)?;

        Ok(RasterSource::new(identifier, decoded))
    }
}
