//! GeoTIFF decoding for value rasters
//!
//! This module reads the single-band georeferenced TIFF assets the viewer
//! overlays on the map. It is deliberately narrower than a general TIFF
//! library: one IFD, strip layout, scalar samples decoded to f64.

pub mod byte_order;
pub(crate) mod constants;
pub mod ifd;
pub mod compression;
pub mod decoder;

#[cfg(test)]
mod tests;

use std::io::{Read, Seek};

pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use decoder::{DecodedRaster, GeoTiffDecoder, RasterGrid};
pub use ifd::{Ifd, IfdEntry};

/// Trait for readers that can both read and seek
///
/// Combines the Read and Seek traits for the decoder's input sources
/// (files on disk, in-memory cursors in tests).
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Magic number of a classic TIFF file
pub const TIFF_VERSION: u16 = 42;
/// Magic number of a BigTIFF file (recognized, not supported)
pub const BIGTIFF_VERSION: u16 = 43;
