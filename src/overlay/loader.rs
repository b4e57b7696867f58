//! Background raster loading
//!
//! Loading is the only suspending operation in the engine: the fetch and
//! decode run on a worker thread and the outcome comes back over a channel,
//! tagged with the generation of the selection that requested it. The map
//! drains the channel on its event loop; clicks and slider input never wait
//! on a load.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::thread;

use crate::errors::MapResult;
use crate::raster::{RasterCatalog, RasterSource};

/// Result of one background load, tagged with its selection generation
pub struct LoadOutcome {
    /// Generation the requesting selection was given by the slot
    pub generation: u64,
    /// Identifier the load was for
    pub identifier: String,
    /// The loaded source, or the load failure
    pub result: MapResult<RasterSource>,
}

/// Spawns raster loads and collects their outcomes
pub struct RasterLoader {
    catalog: RasterCatalog,
    outcome_tx: Sender<LoadOutcome>,
    outcome_rx: Receiver<LoadOutcome>,
}

impl RasterLoader {
    /// Create a loader over a catalog
    pub fn new(catalog: RasterCatalog) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        RasterLoader {
            catalog,
            outcome_tx,
            outcome_rx,
        }
    }

    /// The catalog this loader reads from
    pub fn catalog(&self) -> &RasterCatalog {
        &self.catalog
    }

    /// Start a background load for the given selection generation
    pub fn request(&self, generation: u64, identifier: &str) {
        let catalog = self.catalog.clone();
        let tx = self.outcome_tx.clone();
        let identifier = identifier.to_string();

        debug!("Dispatching load of '{}' (generation {})", identifier, generation);
        thread::spawn(move || {
            let result = catalog.load(&identifier);
            // The receiver disappears only on teardown; nothing to do then.
            let _ = tx.send(LoadOutcome {
                generation,
                identifier,
                result,
            });
        });
    }

    /// Drain whatever outcomes have arrived, without blocking
    pub fn try_outcomes(&self) -> Vec<LoadOutcome> {
        self.outcome_rx.try_iter().collect()
    }

    /// Block for the next outcome
    ///
    /// Test and CLI convenience; the interactive path uses try_outcomes.
    pub fn recv_outcome(&self) -> Option<LoadOutcome> {
        self.outcome_rx.recv().ok()
    }
}
