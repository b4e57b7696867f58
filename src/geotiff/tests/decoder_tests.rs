//! Tests for the GeoTIFF decoder

use std::io::Cursor;

use crate::errors::MapError;
use crate::geotiff::decoder::GeoTiffDecoder;
use crate::geotiff::tests::test_utils::TiffFixture;

fn decode(bytes: Vec<u8>) -> Result<crate::geotiff::DecodedRaster, MapError> {
    let mut decoder = GeoTiffDecoder::new();
    let mut cursor = Cursor::new(bytes);
    decoder.decode(&mut cursor)
}

#[test]
fn decodes_uncompressed_float_grid() {
    let bytes = TiffFixture::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).build();
    let decoded = decode(bytes).unwrap();

    assert_eq!(decoded.grid.width(), 2);
    assert_eq!(decoded.grid.height(), 2);
    assert_eq!(decoded.grid.sample(0, 0), Some(0.1f32 as f64));
    assert_eq!(decoded.grid.sample(1, 1), Some(0.4f32 as f64));

    // 2x2 grid of half-degree cells anchored at (-76, 43)
    assert_eq!(decoded.extent.min_x, -76.0);
    assert_eq!(decoded.extent.max_y, 43.0);
    assert_eq!(decoded.extent.max_x, -75.0);
    assert_eq!(decoded.extent.min_y, 42.0);
}

#[test]
fn decodes_deflate_compressed_grid() {
    let plain = TiffFixture::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).build();
    let compressed = TiffFixture::new(2, 2, vec![0.1, 0.2, 0.3, 0.4])
        .with_deflate()
        .build();

    let a = decode(plain).unwrap();
    let b = decode(compressed).unwrap();
    for row in 0..2 {
        for col in 0..2 {
            assert_eq!(a.grid.sample(col, row), b.grid.sample(col, row));
        }
    }
}

#[test]
fn nodata_cells_read_as_none() {
    let bytes = TiffFixture::new(2, 2, vec![0.1, -9999.0, 0.3, 0.4])
        .with_nodata("-9999")
        .build();
    let decoded = decode(bytes).unwrap();

    assert_eq!(decoded.grid.nodata(), Some(-9999.0));
    assert_eq!(decoded.grid.sample(1, 0), None);
    assert_eq!(decoded.grid.sample(0, 0), Some(0.1f32 as f64));
}

#[test]
fn nan_cells_read_as_none() {
    let bytes = TiffFixture::new(2, 1, vec![f32::NAN, 2.0]).build();
    let decoded = decode(bytes).unwrap();
    assert_eq!(decoded.grid.sample(0, 0), None);
    assert_eq!(decoded.grid.sample(1, 0), Some(2.0));
}

#[test]
fn out_of_grid_samples_are_none() {
    let bytes = TiffFixture::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).build();
    let decoded = decode(bytes).unwrap();
    assert_eq!(decoded.grid.sample(2, 0), None);
    assert_eq!(decoded.grid.sample(0, 7), None);
}

#[test]
fn value_range_skips_nodata() {
    let bytes = TiffFixture::new(2, 2, vec![0.5, -9999.0, 0.25, 1.5])
        .with_nodata("-9999")
        .build();
    let decoded = decode(bytes).unwrap();
    let (lo, hi) = decoded.grid.value_range().unwrap();
    assert_eq!(lo, 0.25f32 as f64);
    assert_eq!(hi, 1.5);
}

#[test]
fn rejects_invalid_magic() {
    let mut bytes = TiffFixture::new(1, 1, vec![1.0]).build();
    bytes[2] = 99; // clobber the magic number
    match decode(bytes) {
        Err(MapError::InvalidHeader) => {}
        other => panic!("Expected InvalidHeader, got {:?}", other.err()),
    }
}

#[test]
fn reports_bigtiff_as_unsupported() {
    let mut bytes = TiffFixture::new(1, 1, vec![1.0]).build();
    bytes[2] = 43; // BigTIFF magic
    match decode(bytes) {
        Err(MapError::UnsupportedFormat(what)) => assert!(what.contains("BigTIFF")),
        other => panic!("Expected UnsupportedFormat, got {:?}", other.err()),
    }
}

#[test]
fn rejects_unknown_byte_order() {
    match decode(vec![0x41, 0x41, 0, 0]) {
        Err(MapError::InvalidByteOrder(_)) => {}
        other => panic!("Expected InvalidByteOrder, got {:?}", other.err()),
    }
}

#[test]
fn rejects_missing_georeference() {
    let bytes = TiffFixture::new(1, 1, vec![1.0]).without_georeference().build();
    match decode(bytes) {
        Err(MapError::MissingGeoreference) => {}
        other => panic!("Expected MissingGeoreference, got {:?}", other.err()),
    }
}

#[test]
fn truncated_input_is_a_decode_failure() {
    let bytes = TiffFixture::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).build();
    let truncated = bytes[..bytes.len() - 6].to_vec();
    assert!(decode(truncated).is_err());
}
