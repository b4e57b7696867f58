//! Integration tests for the map engine
//!
//! These drive the public API end to end: synthetic GeoTIFF assets are
//! written to a scratch directory, then selected, queried and re-rendered
//! through a MapContext the way a UI shell would.

use std::fs;
use std::path::PathBuf;

use rastermap::{LatLng, MapContext, OverlayPhase, ViewerConfig};

/// Build a little-endian single-strip f32 GeoTIFF
///
/// The grid is anchored at (-76, 43) with half-degree cells, the same
/// layout the viewer's production assets use.
fn tiff_bytes(width: u32, height: u32, samples: &[f32], nodata: Option<&str>) -> Vec<u8> {
    let mut strip = Vec::with_capacity(samples.len() * 4);
    for value in samples {
        strip.extend_from_slice(&value.to_le_bytes());
    }

    let nodata_bytes = nodata.map(|s| {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        bytes
    });

    let mut entry_count = 11u16;
    if nodata_bytes.is_some() {
        entry_count += 1;
    }

    let ifd_size = 2 + 12 * entry_count as u32 + 4;
    let ext_start = 8 + ifd_size;
    let scale_offset = ext_start;
    let tiepoint_offset = ext_start + 24;
    let after_geo = ext_start + 72;
    let (nodata_offset, data_offset) = match &nodata_bytes {
        Some(bytes) => (after_geo, after_geo + bytes.len() as u32),
        None => (0, after_geo),
    };

    let mut buffer = Vec::new();
    buffer.extend_from_slice(&[0x49, 0x49]); // "II" little-endian
    buffer.extend_from_slice(&42u16.to_le_bytes());
    buffer.extend_from_slice(&8u32.to_le_bytes());

    buffer.extend_from_slice(&entry_count.to_le_bytes());
    write_entry(&mut buffer, 256, 4, 1, width);
    write_entry(&mut buffer, 257, 4, 1, height);
    write_entry(&mut buffer, 258, 3, 1, 32);
    write_entry(&mut buffer, 259, 3, 1, 1);
    write_entry(&mut buffer, 273, 4, 1, data_offset);
    write_entry(&mut buffer, 277, 3, 1, 1);
    write_entry(&mut buffer, 278, 4, 1, height);
    write_entry(&mut buffer, 279, 4, 1, strip.len() as u32);
    write_entry(&mut buffer, 339, 3, 1, 3);
    write_entry(&mut buffer, 33550, 12, 3, scale_offset);
    write_entry(&mut buffer, 33922, 12, 6, tiepoint_offset);
    if let Some(bytes) = &nodata_bytes {
        write_entry(&mut buffer, 42113, 2, bytes.len() as u32, nodata_offset);
    }
    buffer.extend_from_slice(&0u32.to_le_bytes());

    for value in [0.5f64, 0.5, 0.0] {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
    for value in [0.0f64, 0.0, 0.0, -76.0, 43.0, 0.0] {
        buffer.extend_from_slice(&value.to_le_bytes());
    }

    if let Some(bytes) = &nodata_bytes {
        buffer.extend_from_slice(bytes);
    }
    buffer.extend_from_slice(&strip);
    buffer
}

fn write_entry(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    buffer.extend_from_slice(&tag.to_le_bytes());
    buffer.extend_from_slice(&field_type.to_le_bytes());
    buffer.extend_from_slice(&count.to_le_bytes());
    buffer.extend_from_slice(&value.to_le_bytes());
}

/// Create a scratch asset directory unique to one test
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rastermap-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_asset(dir: &PathBuf, identifier: &str, bytes: &[u8]) {
    fs::write(dir.join(format!("{}.4326.tif", identifier)), bytes).unwrap();
}

fn context_over(dir: &PathBuf) -> MapContext {
    let mut config = ViewerConfig::default();
    config.raster_dir = dir.clone();
    MapContext::new(&config).unwrap()
}

#[test]
fn selection_attaches_and_publishes_legend() {
    let dir = scratch_dir("attach");
    write_asset(&dir, "alpha", &tiff_bytes(2, 2, &[0.25, 0.5, 0.75, 1.0], None));

    let mut context = context_over(&dir);
    assert_eq!(context.phase(), OverlayPhase::Empty);

    context.select_raster("alpha");
    assert_eq!(context.phase(), OverlayPhase::Loading);

    assert!(context.pump_blocking());
    assert_eq!(context.phase(), OverlayPhase::Attached);
    assert_eq!(context.attached_identifier(), Some("alpha"));

    let legend = context.legend().expect("legend published on attach");
    assert_eq!(legend.palette, "viridis");
    assert_eq!(legend.image.width(), 256);

    let image = context.render().expect("attached overlay renders");
    assert_eq!((image.width(), image.height()), (2, 2));
}

#[test]
fn last_selection_wins_across_concurrent_loads() {
    let dir = scratch_dir("last-wins");
    write_asset(&dir, "alpha", &tiff_bytes(2, 2, &[0.1, 0.2, 0.3, 0.4], None));
    write_asset(&dir, "beta", &tiff_bytes(2, 2, &[0.9, 0.8, 0.7, 0.6], None));

    let mut context = context_over(&dir);

    // B is selected while A is still in flight; whichever load finishes
    // first, B must end up attached and A's completion discarded.
    context.select_raster("alpha");
    context.select_raster("beta");

    assert!(context.pump_blocking());
    assert!(context.pump_blocking());

    assert_eq!(context.phase(), OverlayPhase::Attached);
    assert_eq!(context.attached_identifier(), Some("beta"));
}

#[test]
fn reselecting_the_same_raster_keeps_one_overlay() {
    let dir = scratch_dir("idempotent");
    write_asset(&dir, "alpha", &tiff_bytes(2, 2, &[0.1, 0.2, 0.3, 0.4], None));

    let mut context = context_over(&dir);
    context.select_raster("alpha");
    context.select_raster("alpha");

    assert!(context.pump_blocking());
    assert!(context.pump_blocking());

    assert_eq!(context.phase(), OverlayPhase::Attached);
    assert_eq!(context.attached_identifier(), Some("alpha"));
}

#[test]
fn decode_failure_leaves_error_state_then_recovers() {
    let dir = scratch_dir("decode-failure");
    fs::write(dir.join("broken.4326.tif"), b"this is not a tiff").unwrap();
    write_asset(&dir, "good", &tiff_bytes(1, 1, &[0.5], None));

    let mut context = context_over(&dir);
    context.select_raster("broken");
    assert!(context.pump_blocking());

    assert_eq!(context.phase(), OverlayPhase::Failed);
    assert!(context.failure().is_some());
    assert!(context.attached_identifier().is_none());
    assert!(context.render().is_none());

    // re-selecting is the retry path
    context.select_raster("good");
    assert!(context.pump_blocking());
    assert_eq!(context.phase(), OverlayPhase::Attached);
}

#[test]
fn click_reports_value_with_two_decimals() {
    let dir = scratch_dir("click");
    write_asset(&dir, "alpha", &tiff_bytes(2, 2, &[0.25, 0.5, 0.75, 1.0], None));

    let mut context = context_over(&dir);
    context.select_raster("alpha");
    assert!(context.pump_blocking());

    // cell (0,0) covers lng [-76.0,-75.5] x lat [42.5,43.0]
    assert_eq!(
        context.click(&LatLng::new(42.75, -75.75)),
        Some("Value at point: 0.25".to_string())
    );
    assert_eq!(
        context.click(&LatLng::new(42.75, -75.25)),
        Some("Value at point: 0.50".to_string())
    );
}

#[test]
fn click_is_suppressed_for_no_data_and_negative_values() {
    let dir = scratch_dir("suppressed");
    write_asset(
        &dir,
        "alpha",
        &tiff_bytes(2, 1, &[-4.5, -9999.0], Some("-9999")),
    );

    let mut context = context_over(&dir);
    context.select_raster("alpha");
    assert!(context.pump_blocking());

    // outside the raster extent entirely
    assert_eq!(context.click(&LatLng::new(10.0, 10.0)), None);
    // nodata cell
    assert_eq!(context.click(&LatLng::new(42.75, -75.25)), None);
    // negative magnitude means below the sensor floor
    assert_eq!(context.click(&LatLng::new(42.75, -75.75)), None);
}

#[test]
fn slider_rescales_the_attached_overlay() {
    let dir = scratch_dir("slider");
    write_asset(&dir, "alpha", &tiff_bytes(2, 1, &[0.39, 0.41], None));

    let mut context = context_over(&dir);
    context.select_raster("alpha");
    assert!(context.pump_blocking());

    let before = context.render().unwrap().clone();
    assert_ne!(before.get_pixel(0, 0)[3], 0, "0.39 visible at full range");

    context.slider_input(40);

    let after = context.render().unwrap().clone();
    // below the new lower bound and clamp_low unset: transparent
    assert_eq!(after.get_pixel(0, 0)[3], 0);
    // still inside the window: painted
    assert_ne!(after.get_pixel(1, 0)[3], 0);
}

#[test]
fn zoom_threshold_toggles_the_feature_layer() {
    let dir = scratch_dir("zoom");
    write_asset(&dir, "alpha", &tiff_bytes(1, 1, &[0.5], None));

    let wells = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-75.5, 42.9]},
                "properties": {"site": "W-1"}
            }
        ]
    }"#;
    let wells_path = dir.join("priority_wells.json");
    fs::write(&wells_path, wells).unwrap();

    let mut config = ViewerConfig::default();
    config.raster_dir = dir.clone();
    config.features_path = Some(wells_path);
    config.zoom = 11;
    let mut context = MapContext::new(&config).unwrap();

    assert!(context.features().unwrap().is_visible());

    context.zoom_to(12);
    assert!(!context.features().unwrap().is_visible());

    context.zoom_to(11);
    assert!(context.features().unwrap().is_visible());
}
