//! Owning context for the map's mutable state
//!
//! One context owns the view, the single overlay slot, the ramp, the
//! loader and the feature layer. UI events call into it; it produces
//! render outputs (overlay image, legend swatch, popup text) and never
//! touches widgets itself.

use image::RgbaImage;
use log::{info, warn};
use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::coordinate::LatLng;
use crate::errors::MapResult;
use crate::features::FeatureLayer;
use crate::overlay::{Completion, LoadOutcome, OverlayPhase, OverlaySlot, RasterLoader, RasterOverlay};
use crate::query;
use crate::ramp::{ColorRamp, LegendSwatch};
use crate::raster::RasterCatalog;

/// Legend swatch dimensions published to the UI
const LEGEND_WIDTH: u32 = 256;
const LEGEND_HEIGHT: u32 = 16;

/// Current viewport
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    /// Map center
    pub center: LatLng,
    /// Zoom level
    pub zoom: u8,
}

/// The map's owning context
pub struct MapContext {
    view: MapView,
    ramp: ColorRamp,
    slot: OverlaySlot,
    loader: RasterLoader,
    features: Option<FeatureLayer>,
    feature_zoom_cutoff: u8,
    opacity: f64,
    legend: Option<LegendSwatch>,
}

impl MapContext {
    /// Build a context from configuration
    ///
    /// The feature layer is fetched here, once; raster selection happens
    /// afterwards through [`MapContext::select_raster`].
    pub fn new(config: &ViewerConfig) -> MapResult<Self> {
        let ramp = ColorRamp::new(
            &config.palette,
            config.display_min,
            config.display_max,
            config.clamp_low,
            config.clamp_high,
        )?;

        let mut features = match &config.features_path {
            Some(path) => Some(FeatureLayer::from_geojson_file(path)?),
            None => None,
        };
        if let Some(layer) = features.as_mut() {
            layer.update_visibility(config.zoom, config.feature_zoom_cutoff);
        }

        let catalog = RasterCatalog::new(&config.raster_dir);

        Ok(MapContext {
            view: MapView {
                center: config.center_latlng(),
                zoom: config.zoom,
            },
            ramp,
            slot: OverlaySlot::new(),
            loader: RasterLoader::new(catalog),
            features,
            feature_zoom_cutoff: config.feature_zoom_cutoff,
            opacity: config.opacity,
            legend: None,
        })
    }

    /// Current viewport
    pub fn view(&self) -> MapView {
        self.view
    }

    /// Lifecycle phase of the overlay slot
    pub fn phase(&self) -> OverlayPhase {
        self.slot.phase()
    }

    /// Identifier of the attached overlay, if any
    pub fn attached_identifier(&self) -> Option<&str> {
        self.slot.attached().map(|overlay| overlay.identifier())
    }

    /// Failure message when the last load failed
    pub fn failure(&self) -> Option<&str> {
        self.slot.failure()
    }

    /// The current legend swatch, if an overlay has been attached
    pub fn legend(&self) -> Option<&LegendSwatch> {
        self.legend.as_ref()
    }

    /// The point-feature layer, if configured
    pub fn features(&self) -> Option<&FeatureLayer> {
        self.features.as_ref()
    }

    /// The ramp state driving the attached overlay
    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Select a raster by identifier
    ///
    /// The current overlay is discarded synchronously, then the load runs
    /// in the background. If another selection arrives first, this one's
    /// completion is discarded: last selection wins.
    pub fn select_raster(&mut self, identifier: &str) {
        info!("Raster selected: {}", identifier);
        let generation = self.slot.begin_load(identifier);
        self.loader.request(generation, identifier);
    }

    /// Drain load outcomes; returns how many were processed
    ///
    /// Call from the event loop. Attaching publishes a fresh legend swatch.
    pub fn pump(&mut self) -> usize {
        let outcomes = self.loader.try_outcomes();
        let mut processed = 0;
        for outcome in outcomes {
            processed += 1;
            self.apply_outcome(outcome);
        }
        processed
    }

    /// Block until one outcome arrives and apply it
    ///
    /// Only sensible while a load is known to be in flight; the CLI uses
    /// this, the interactive path pumps.
    pub fn pump_blocking(&mut self) -> bool {
        match self.loader.recv_outcome() {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            generation,
            identifier,
            result,
        } = outcome;

        let result =
            result.map(|source| RasterOverlay::new(Arc::new(source), self.opacity));

        match self.slot.complete(generation, result) {
            Completion::Attached => {
                self.legend = Some(self.ramp.legend(LEGEND_WIDTH, LEGEND_HEIGHT));
            }
            Completion::Failed => {
                warn!("Selection '{}' failed; map shows no overlay", identifier);
            }
            Completion::Stale => {}
        }
    }

    /// Change the zoom level, toggling the feature layer at the cutoff
    pub fn zoom_to(&mut self, zoom: u8) {
        self.view.zoom = zoom;
        if let Some(layer) = &mut self.features {
            layer.update_visibility(zoom, self.feature_zoom_cutoff);
        }
    }

    /// Move the map center
    pub fn pan_to(&mut self, center: LatLng) {
        self.view.center = center;
    }

    /// Handle a map click: popup text for the value under the cursor
    ///
    /// Synchronous; operates only against the attached overlay. No overlay,
    /// no-data and below-floor values all yield no popup.
    pub fn click(&self, position: &LatLng) -> Option<String> {
        let overlay = self.slot.attached()?;
        let sample = query::value_at(overlay, position);
        query::popup_text(&sample)
    }

    /// Handle range-slider input (0-100)
    ///
    /// The raw value becomes the lower display bound on the [0,1] scale;
    /// the upper bound keeps its current value.
    pub fn slider_input(&mut self, raw: u8) {
        let raw = raw.min(100);
        let lower = raw as f64 / 100.0;
        let upper = self.ramp.display_max();
        self.ramp.set_display_range(lower, upper);
    }

    /// Swap the ramp palette, refreshing the legend
    pub fn set_palette(&mut self, name: &str) -> MapResult<()> {
        self.ramp.set_palette(name)?;
        if self.slot.attached().is_some() {
            self.legend = Some(self.ramp.legend(LEGEND_WIDTH, LEGEND_HEIGHT));
        }
        Ok(())
    }

    /// Render the attached overlay through the current ramp
    ///
    /// Returns None in every phase but Attached. Rendering is cached per
    /// ramp revision, so repeated calls between mutations are cheap.
    pub fn render(&mut self) -> Option<&RgbaImage> {
        let ramp = &self.ramp;
        self.slot
            .attached_mut()
            .map(|overlay| overlay.render(ramp))
    }
}
