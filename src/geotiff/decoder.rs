//! GeoTIFF decoder producing value grids
//!
//! This is the fetch-and-decode half of a raster overlay: it turns a
//! georeferenced TIFF asset into a grid of f64 samples plus the affine
//! transform and extent needed to place the grid on the map.
//!
//! The decoding process:
//! 1. Detect byte order (little/big endian)
//! 2. Validate the classic TIFF magic number
//! 3. Parse the first IFD
//! 4. Read and decompress strips, decoding samples to f64
//! 5. Extract georeferencing from ModelPixelScale + ModelTiepoint

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::coordinate::{BoundingBox, GeoTransform};
use crate::errors::{MapError, MapResult};
use crate::geotiff::byte_order::{ByteOrder, ByteOrderHandler};
use crate::geotiff::compression;
use crate::geotiff::constants::{field_types, sample_formats, tags};
use crate::geotiff::ifd::{Ifd, IfdEntry};
use crate::geotiff::{SeekableReader, BIGTIFF_VERSION, TIFF_VERSION};

/// A decoded grid of scalar cell values
///
/// Immutable once built. Cells that carry the nodata value (or NaN) read
/// back as `None` from [`RasterGrid::sample`].
#[derive(Debug, Clone)]
pub struct RasterGrid {
    width: u32,
    height: u32,
    samples: Vec<f64>,
    nodata: Option<f64>,
}

impl RasterGrid {
    /// Build a grid from decoded samples
    ///
    /// The sample vector must hold exactly width * height values in
    /// row-major order.
    pub fn new(width: u32, height: u32, samples: Vec<f64>, nodata: Option<f64>) -> MapResult<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(MapError::DecodeError(format!(
                "Sample count mismatch: got {}, expected {}",
                samples.len(),
                expected
            )));
        }
        Ok(RasterGrid {
            width,
            height,
            samples,
            nodata,
        })
    }

    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The nodata sentinel declared by the asset, if any
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Sample the cell at (col, row)
    ///
    /// Returns None outside the grid and for nodata/NaN cells.
    pub fn sample(&self, col: u32, row: u32) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let value = self.samples[row as usize * self.width as usize + col as usize];
        if value.is_nan() {
            return None;
        }
        if let Some(nodata) = self.nodata {
            if value == nodata {
                return None;
            }
        }
        Some(value)
    }

    /// Minimum and maximum of the valid cell values
    ///
    /// Returns None when every cell is nodata.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for row in 0..self.height {
            for col in 0..self.width {
                if let Some(v) = self.sample(col, row) {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
            }
        }
        range
    }
}

/// A fully decoded raster: cell values plus placement on the map
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    /// The decoded cell values
    pub grid: RasterGrid,
    /// Affine pixel-to-geographic mapping
    pub transform: GeoTransform,
    /// Geographic extent covered by the grid
    pub extent: BoundingBox,
}

/// Decoder for georeferenced single-band TIFF assets
pub struct GeoTiffDecoder {
    /// Current byte order handler, set once the header is read
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
}

impl GeoTiffDecoder {
    /// Creates a new decoder
    pub fn new() -> Self {
        GeoTiffDecoder {
            byte_order_handler: None,
        }
    }

    /// Returns the byte order handler, with proper error handling for the
    /// not-yet-determined case
    fn handler(&self) -> MapResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| MapError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Decodes a raster asset from a file path
    ///
    /// # Arguments
    /// * `path` - Path to the GeoTIFF file
    ///
    /// # Returns
    /// The decoded raster or a decode error
    pub fn decode_file(&mut self, path: &Path) -> MapResult<DecodedRaster> {
        info!("Decoding raster asset: {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        self.decode(&mut reader)
    }

    /// Decodes a raster asset from any seekable reader
    pub fn decode(&mut self, reader: &mut dyn SeekableReader) -> MapResult<DecodedRaster> {
        let byte_order = ByteOrder::detect(reader)?;
        self.byte_order_handler = Some(byte_order.create_handler());

        let magic = self.handler()?.read_u16(reader)?;
        match magic {
            TIFF_VERSION => {}
            BIGTIFF_VERSION => {
                return Err(MapError::UnsupportedFormat(
                    "BigTIFF assets are not supported".to_string(),
                ))
            }
            _ => return Err(MapError::InvalidHeader),
        }

        let first_ifd_offset = self.handler()?.read_u32(reader)? as u64;
        debug!("First IFD offset: {}", first_ifd_offset);

        let ifd = self.read_ifd(reader, first_ifd_offset)?;

        let (width, height) = ifd.dimensions().ok_or(MapError::MissingDimensions)?;
        debug!("Raster dimensions: {}x{}", width, height);

        let transform = self.read_georeference(reader, &ifd)?;
        let nodata = self.read_nodata(reader, &ifd);
        let samples = self.read_samples(reader, &ifd)?;

        let grid = RasterGrid::new(width, height, samples, nodata)?;
        let extent = transform.bounds(width, height);

        info!(
            "Decoded {}x{} raster, extent {:.4},{:.4} .. {:.4},{:.4}",
            width, height, extent.min_x, extent.min_y, extent.max_x, extent.max_y
        );

        Ok(DecodedRaster {
            grid,
            transform,
            extent,
        })
    }

    /// Reads the IFD at the given offset
    fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64) -> MapResult<Ifd> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = self.handler()?.read_u16(reader)?;
        debug!("IFD entry count: {}", entry_count);

        let mut ifd = Ifd::new(offset);
        for _ in 0..entry_count {
            let handler = self.handler()?;
            let tag = handler.read_u16(reader)?;
            let field_type = handler.read_u16(reader)?;
            let count = handler.read_u32(reader)? as u64;
            let value_offset = handler.read_u32(reader)? as u64;
            ifd.add_entry(IfdEntry::new(tag, field_type, count, value_offset));
        }

        Ok(ifd)
    }

    /// Reads a tag's values as a vector of u64
    ///
    /// Handles SHORT and LONG arrays, both inline and at an external offset.
    fn read_tag_values(
        &self,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
        tag: u16,
    ) -> MapResult<Vec<u64>> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| MapError::DecodeError(format!("Required tag {} missing", tag)))?;

        if entry.is_value_inline() {
            if entry.count == 1 {
                return Ok(vec![entry.value_offset]);
            }
            return Err(MapError::UnsupportedFormat(format!(
                "Packed inline array for tag {}",
                tag
            )));
        }

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);
        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::SHORT => handler.read_u16(reader)? as u64,
                field_types::LONG => handler.read_u32(reader)? as u64,
                other => {
                    return Err(MapError::UnsupportedFormat(format!(
                        "Field type {} for tag {}",
                        other, tag
                    )))
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Reads a DOUBLE array tag (pixel scale, tiepoints)
    fn read_tag_doubles(
        &self,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
        tag: u16,
    ) -> MapResult<Vec<f64>> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| MapError::DecodeError(format!("Required tag {} missing", tag)))?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);
        for _ in 0..entry.count {
            values.push(handler.read_f64(reader)?);
        }
        Ok(values)
    }

    /// Reads an ASCII tag, trimming trailing nulls
    fn read_tag_ascii(
        &self,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
        tag: u16,
    ) -> MapResult<String> {
        let entry = ifd
            .get_entry(tag)
            .ok_or_else(|| MapError::DecodeError(format!("Required tag {} missing", tag)))?;

        let mut buffer = vec![0u8; entry.count as usize];
        if entry.is_value_inline() {
            // Inline ASCII lives in the raw bytes of the value field. The
            // entry was parsed as a little-endian u32, so undo that here;
            // big-endian files store nodata out-of-line in practice.
            let raw = (entry.value_offset as u32).to_le_bytes();
            buffer.copy_from_slice(&raw[..entry.count as usize]);
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            reader.read_exact(&mut buffer)?;
        }

        while let Some(0) = buffer.last() {
            buffer.pop();
        }

        String::from_utf8(buffer)
            .map_err(|e| MapError::DecodeError(format!("Invalid ASCII tag value: {}", e)))
    }

    /// Extracts the affine georeference from pixel scale + tiepoint tags
    ///
    /// A raster without both tags cannot be placed on the map and is
    /// rejected here rather than attached blind.
    fn read_georeference(
        &self,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> MapResult<GeoTransform> {
        if !ifd.has_tag(tags::MODEL_PIXEL_SCALE) || !ifd.has_tag(tags::MODEL_TIEPOINT) {
            return Err(MapError::MissingGeoreference);
        }

        let pixel_scale = self.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE)?;
        if pixel_scale.len() < 2 || pixel_scale[0] == 0.0 || pixel_scale[1] == 0.0 {
            return Err(MapError::MissingGeoreference);
        }

        let tiepoint = self.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT)?;
        if tiepoint.len() < 6 {
            return Err(MapError::MissingGeoreference);
        }

        // Tiepoint maps raster (i,j) to world (x,y); the origin is the
        // top-left corner, with y decreasing down the rows.
        let origin_x = tiepoint[3] - tiepoint[0] * pixel_scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * pixel_scale[1];

        debug!(
            "Georeference: origin ({:.6}, {:.6}), pixel size ({:.6}, {:.6})",
            origin_x, origin_y, pixel_scale[0], pixel_scale[1]
        );

        Ok(GeoTransform::new(
            origin_x,
            origin_y,
            pixel_scale[0],
            -pixel_scale[1],
        ))
    }

    /// Reads the GDAL nodata tag, when present and parseable
    fn read_nodata(&self, reader: &mut dyn SeekableReader, ifd: &Ifd) -> Option<f64> {
        if !ifd.has_tag(tags::GDAL_NODATA) {
            return None;
        }
        match self.read_tag_ascii(reader, ifd, tags::GDAL_NODATA) {
            Ok(text) => match text.trim().parse::<f64>() {
                Ok(value) => {
                    debug!("Nodata value: {}", value);
                    Some(value)
                }
                Err(_) => {
                    warn!("Unparseable nodata value: {:?}", text);
                    None
                }
            },
            Err(e) => {
                warn!("Could not read nodata tag: {}", e);
                None
            }
        }
    }

    /// Reads and decodes all strips into a row-major f64 sample vector
    fn read_samples(&self, reader: &mut dyn SeekableReader, ifd: &Ifd) -> MapResult<Vec<f64>> {
        if ifd.has_tag(tags::TILE_WIDTH) {
            return Err(MapError::UnsupportedFormat(
                "Tiled layout is not supported".to_string(),
            ));
        }

        let bits = ifd.get_tag_value(tags::BITS_PER_SAMPLE).unwrap_or(8);
        let format = ifd
            .get_tag_value(tags::SAMPLE_FORMAT)
            .unwrap_or(sample_formats::UNSIGNED);
        let samples_per_pixel = ifd.samples_per_pixel() as usize;
        let compression_code = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1);

        let handler = compression::create_handler(compression_code)?;
        debug!(
            "Sample layout: {} bits, format {}, {} samples/pixel, compression {}",
            bits,
            format,
            samples_per_pixel,
            handler.name()
        );

        let offsets = self.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?;
        if offsets.len() != byte_counts.len() {
            return Err(MapError::DecodeError(format!(
                "Strip offset/count mismatch: {} vs {}",
                offsets.len(),
                byte_counts.len()
            )));
        }

        let mut samples = Vec::new();
        for (offset, byte_count) in offsets.iter().zip(byte_counts.iter()) {
            reader.seek(SeekFrom::Start(*offset))?;
            let mut compressed = vec![0u8; *byte_count as usize];
            reader.read_exact(&mut compressed)?;

            let raw = handler.decompress(&compressed)?;
            self.decode_strip(&raw, bits, format, samples_per_pixel, &mut samples)?;
        }

        Ok(samples)
    }

    /// Decodes one decompressed strip, keeping band 0 of interleaved pixels
    fn decode_strip(
        &self,
        raw: &[u8],
        bits: u64,
        format: u64,
        samples_per_pixel: usize,
        out: &mut Vec<f64>,
    ) -> MapResult<()> {
        let bytes_per_sample = match bits {
            8 | 16 | 32 | 64 => (bits / 8) as usize,
            other => {
                return Err(MapError::UnsupportedFormat(format!(
                    "{} bits per sample",
                    other
                )))
            }
        };

        if raw.len() % bytes_per_sample != 0 {
            return Err(MapError::DecodeError(format!(
                "Strip length {} not a multiple of sample size {}",
                raw.len(),
                bytes_per_sample
            )));
        }

        let handler = self.handler()?;
        let count = raw.len() / bytes_per_sample;
        let mut cursor = Cursor::new(raw.to_vec());

        for index in 0..count {
            let value = match (format, bits) {
                (sample_formats::UNSIGNED, 8) => {
                    let mut byte = [0u8; 1];
                    cursor.read_exact(&mut byte)?;
                    byte[0] as f64
                }
                (sample_formats::UNSIGNED, 16) => handler.read_u16(&mut cursor)? as f64,
                (sample_formats::UNSIGNED, 32) => handler.read_u32(&mut cursor)? as f64,
                (sample_formats::UNSIGNED, 64) => handler.read_u64(&mut cursor)? as f64,
                (sample_formats::SIGNED, 8) => {
                    let mut byte = [0u8; 1];
                    cursor.read_exact(&mut byte)?;
                    byte[0] as i8 as f64
                }
                (sample_formats::SIGNED, 16) => handler.read_i16(&mut cursor)? as f64,
                (sample_formats::SIGNED, 32) => handler.read_i32(&mut cursor)? as f64,
                (sample_formats::SIGNED, 64) => handler.read_i64(&mut cursor)? as f64,
                (sample_formats::IEEE_FLOAT, 32) => handler.read_f32(&mut cursor)? as f64,
                (sample_formats::IEEE_FLOAT, 64) => handler.read_f64(&mut cursor)?,
                (other, _) => {
                    return Err(MapError::UnsupportedFormat(format!(
                        "Sample format {}",
                        other
                    )))
                }
            };

            if index % samples_per_pixel == 0 {
                out.push(value);
            }
        }

        Ok(())
    }
}

impl Default for GeoTiffDecoder {
    fn default() -> Self {
        Self::new()
    }
}
