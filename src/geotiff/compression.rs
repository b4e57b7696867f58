//! Strip decompression for raster data
//!
//! Overlay assets in the wild arrive uncompressed, Deflate-compressed or
//! Zstd-compressed. Each method gets its own handler behind a common
//! strategy trait, selected by compression code.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::errors::{MapError, MapResult};
use crate::geotiff::constants::compression;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    fn decompress(&self, data: &[u8]) -> MapResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}

/// Handler for uncompressed data (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8]) -> MapResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "None"
    }

    fn code(&self) -> u64 {
        compression::NONE
    }
}

/// Adobe Deflate (Zlib) compression handler (compression code 8)
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> MapResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        match decoder.read_to_end(&mut decompressed) {
            Ok(_) => Ok(decompressed),
            Err(e) => Err(MapError::IoError(e)),
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        compression::ADOBE_DEFLATE
    }
}

/// Zstandard compression handler (compression code 14)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> MapResult<Vec<u8>> {
        zstd::decode_all(data).map_err(MapError::IoError)
    }

    fn name(&self) -> &'static str {
        "Zstd"
    }

    fn code(&self) -> u64 {
        compression::ZSTD
    }
}

/// Create a compression handler for the given compression code
pub fn create_handler(code: u64) -> MapResult<Box<dyn CompressionHandler>> {
    match code {
        compression::NONE => Ok(Box::new(UncompressedHandler)),
        compression::ADOBE_DEFLATE => Ok(Box::new(AdobeDeflateHandler)),
        compression::ZSTD => Ok(Box::new(ZstdHandler)),
        _ => Err(MapError::UnsupportedCompression(code)),
    }
}
