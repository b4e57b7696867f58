//! Custom error types for the raster map engine

use std::fmt;
use std::io;

/// Errors produced while loading rasters, building ramps or wiring the map
#[derive(Debug)]
pub enum MapError {
    /// I/O error
    IoError(io::Error),
    /// Raster asset does not exist for the given identifier
    NotFound(String),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Layout or sample type the decoder does not handle
    UnsupportedFormat(String),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Image dimensions not found
    MissingDimensions,
    /// Raster carries no usable georeferencing tags
    MissingGeoreference,
    /// Malformed raster content
    DecodeError(String),
    /// Palette name not present in the registry
    UnknownPalette(String),
    /// Invalid viewer configuration
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::IoError(e) => write!(f, "I/O error: {}", e),
            MapError::NotFound(id) => write!(f, "Raster not found: {}", id),
            MapError::InvalidHeader => write!(f, "Invalid TIFF header"),
            MapError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            MapError::UnsupportedFormat(what) => write!(f, "Unsupported raster format: {}", what),
            MapError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            MapError::MissingDimensions => write!(f, "Image dimensions not found"),
            MapError::MissingGeoreference => write!(f, "Raster has no georeferencing information"),
            MapError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            MapError::UnknownPalette(name) => write!(f, "Unknown palette: {}", name),
            MapError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MapError::GenericError(msg) => write!(f, "Map error: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

impl From<io::Error> for MapError {
    fn from(error: io::Error) -> Self {
        MapError::IoError(error)
    }
}

impl From<String> for MapError {
    fn from(msg: String) -> Self {
        MapError::GenericError(msg)
    }
}

/// Result type for map engine operations
pub type MapResult<T> = Result<T, MapError>;
