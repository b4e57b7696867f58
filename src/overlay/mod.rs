//! Raster overlay, its lifecycle slot and the background loader

pub mod loader;
pub mod raster_overlay;
pub mod slot;

pub use loader::{LoadOutcome, RasterLoader};
pub use raster_overlay::RasterOverlay;
pub use slot::{Completion, OverlayPhase, OverlaySlot};
