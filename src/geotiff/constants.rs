//! TIFF tag and field type constants used by the decoder

/// TIFF tag identifiers
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const TILE_WIDTH: u16 = 322;
    pub const SAMPLE_FORMAT: u16 = 339;
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    pub const MODEL_TIEPOINT: u16 = 33922;
    pub const GDAL_NODATA: u16 = 42113;
}

/// TIFF field type identifiers
pub mod field_types {
    pub const BYTE: u16 = 1;
    pub const ASCII: u16 = 2;
    pub const SHORT: u16 = 3;
    pub const LONG: u16 = 4;
    pub const RATIONAL: u16 = 5;
    pub const SBYTE: u16 = 6;
    pub const UNDEFINED: u16 = 7;
    pub const SSHORT: u16 = 8;
    pub const SLONG: u16 = 9;
    pub const SRATIONAL: u16 = 10;
    pub const FLOAT: u16 = 11;
    pub const DOUBLE: u16 = 12;
}

/// SampleFormat tag values
pub mod sample_formats {
    pub const UNSIGNED: u64 = 1;
    pub const SIGNED: u64 = 2;
    pub const IEEE_FLOAT: u64 = 3;
}

/// Compression tag values the decoder understands
pub mod compression {
    pub const NONE: u64 = 1;
    pub const ADOBE_DEFLATE: u64 = 8;
    pub const ZSTD: u64 = 14;
}
