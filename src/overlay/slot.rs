//! The single-writer overlay slot
//!
//! The map carries at most one raster overlay. This slot owns it and runs
//! the selection lifecycle: Empty -> Loading -> Attached/Failed, with every
//! new selection synchronously releasing whatever came before. Loads are
//! tagged with a monotonically increasing generation; a completion whose
//! generation is no longer current is discarded, which is what makes the
//! last selection win regardless of arrival order.

use log::{debug, info, warn};

use crate::errors::MapResult;
use crate::overlay::RasterOverlay;

/// Externally visible lifecycle phase of the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// No overlay, nothing in flight
    Empty,
    /// A load is in flight
    Loading,
    /// An overlay is attached to the map
    Attached,
    /// The last load failed; nothing is attached
    Failed,
}

/// What happened to a load completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The overlay was attached
    Attached,
    /// The load failed and the slot records the failure
    Failed,
    /// The completion belonged to a superseded selection and was discarded
    Stale,
}

enum SlotState {
    Empty,
    Loading { identifier: String },
    Attached(RasterOverlay),
    Failed(String),
}

/// Holder of the current overlay and its load lifecycle
pub struct OverlaySlot {
    generation: u64,
    state: SlotState,
}

impl OverlaySlot {
    /// Create an empty slot
    pub fn new() -> Self {
        OverlaySlot {
            generation: 0,
            state: SlotState::Empty,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> OverlayPhase {
        match &self.state {
            SlotState::Empty => OverlayPhase::Empty,
            SlotState::Loading { .. } => OverlayPhase::Loading,
            SlotState::Attached(_) => OverlayPhase::Attached,
            SlotState::Failed(_) => OverlayPhase::Failed,
        }
    }

    /// Generation of the most recent selection
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new selection
    ///
    /// Any attached overlay is released here, before the new load begins,
    /// so no state ever holds two overlays. Returns the generation the
    /// eventual completion must present.
    pub fn begin_load(&mut self, identifier: &str) -> u64 {
        if let SlotState::Attached(previous) = &self.state {
            info!("Releasing overlay '{}'", previous.identifier());
        }

        self.generation += 1;
        self.state = SlotState::Loading {
            identifier: identifier.to_string(),
        };

        debug!(
            "Loading '{}' as generation {}",
            identifier, self.generation
        );
        self.generation
    }

    /// Deliver a load completion
    ///
    /// Completions for superseded generations are discarded without
    /// touching the slot.
    pub fn complete(&mut self, generation: u64, result: MapResult<RasterOverlay>) -> Completion {
        if generation != self.generation {
            debug!(
                "Discarding stale completion (generation {}, current {})",
                generation, self.generation
            );
            return Completion::Stale;
        }

        match result {
            Ok(overlay) => {
                info!("Overlay '{}' attached", overlay.identifier());
                self.state = SlotState::Attached(overlay);
                Completion::Attached
            }
            Err(e) => {
                warn!("Overlay load failed: {}", e);
                self.state = SlotState::Failed(e.to_string());
                Completion::Failed
            }
        }
    }

    /// The attached overlay, if any
    pub fn attached(&self) -> Option<&RasterOverlay> {
        match &self.state {
            SlotState::Attached(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Mutable access to the attached overlay
    pub fn attached_mut(&mut self) -> Option<&mut RasterOverlay> {
        match &mut self.state {
            SlotState::Attached(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Identifier of the in-flight selection, if loading
    pub fn loading_identifier(&self) -> Option<&str> {
        match &self.state {
            SlotState::Loading { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Message of the last failure, if the slot is in the failed phase
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SlotState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl Default for OverlaySlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;
    use crate::errors::MapError;
    use crate::geotiff::{DecodedRaster, RasterGrid};
    use crate::raster::RasterSource;
    use std::sync::Arc;

    fn overlay(identifier: &str) -> RasterOverlay {
        let transform = GeoTransform::new(-76.0, 43.0, 0.5, -0.5);
        let grid = RasterGrid::new(2, 2, vec![0.1, 0.2, 0.3, 0.4], None).unwrap();
        let extent = transform.bounds(2, 2);
        let decoded = DecodedRaster {
            grid,
            transform,
            extent,
        };
        RasterOverlay::new(Arc::new(RasterSource::new(identifier, decoded)), 0.3)
    }

    #[test]
    fn starts_empty() {
        let slot = OverlaySlot::new();
        assert_eq!(slot.phase(), OverlayPhase::Empty);
        assert!(slot.attached().is_none());
    }

    #[test]
    fn select_then_success_attaches() {
        let mut slot = OverlaySlot::new();
        let generation = slot.begin_load("alpha");
        assert_eq!(slot.phase(), OverlayPhase::Loading);
        assert_eq!(slot.loading_identifier(), Some("alpha"));

        assert_eq!(
            slot.complete(generation, Ok(overlay("alpha"))),
            Completion::Attached
        );
        assert_eq!(slot.phase(), OverlayPhase::Attached);
        assert_eq!(slot.attached().unwrap().identifier(), "alpha");
    }

    #[test]
    fn failure_leaves_failed_with_no_overlay() {
        let mut slot = OverlaySlot::new();
        let generation = slot.begin_load("alpha");
        assert_eq!(
            slot.complete(generation, Err(MapError::NotFound("alpha".to_string()))),
            Completion::Failed
        );
        assert_eq!(slot.phase(), OverlayPhase::Failed);
        assert!(slot.attached().is_none());
        assert!(slot.failure().unwrap().contains("alpha"));

        // a failed slot accepts a new selection
        slot.begin_load("beta");
        assert_eq!(slot.phase(), OverlayPhase::Loading);
    }

    #[test]
    fn last_selection_wins() {
        let mut slot = OverlaySlot::new();
        let gen_a = slot.begin_load("slow");
        let gen_b = slot.begin_load("fast");

        // the faster second selection attaches first
        assert_eq!(
            slot.complete(gen_b, Ok(overlay("fast"))),
            Completion::Attached
        );
        assert_eq!(slot.attached().unwrap().identifier(), "fast");

        // the slow first selection resolves later and is discarded
        assert_eq!(
            slot.complete(gen_a, Ok(overlay("slow"))),
            Completion::Stale
        );
        assert_eq!(slot.attached().unwrap().identifier(), "fast");
    }

    #[test]
    fn stale_failure_does_not_clobber_attached_overlay() {
        let mut slot = OverlaySlot::new();
        let gen_a = slot.begin_load("first");
        let gen_b = slot.begin_load("second");

        assert_eq!(
            slot.complete(gen_b, Ok(overlay("second"))),
            Completion::Attached
        );
        assert_eq!(
            slot.complete(gen_a, Err(MapError::NotFound("first".to_string()))),
            Completion::Stale
        );
        assert_eq!(slot.phase(), OverlayPhase::Attached);
    }

    #[test]
    fn reselection_is_idempotent() {
        let mut slot = OverlaySlot::new();
        let gen_a = slot.begin_load("same");
        let gen_b = slot.begin_load("same");

        assert_eq!(slot.complete(gen_a, Ok(overlay("same"))), Completion::Stale);
        assert_eq!(
            slot.complete(gen_b, Ok(overlay("same"))),
            Completion::Attached
        );
        assert_eq!(slot.phase(), OverlayPhase::Attached);
        assert_eq!(slot.attached().unwrap().identifier(), "same");
    }
}
