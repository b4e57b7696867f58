//! Headless viewer session command
//!
//! Drives the full map context from a configuration file: selects the
//! initial raster, waits for the load, then writes the overlay and legend
//! images a UI shell would display. Useful for smoke-testing a deployment's
//! assets and configuration from the terminal.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::config::ViewerConfig;
use crate::errors::{MapError, MapResult};
use crate::map::MapContext;
use crate::overlay::OverlayPhase;
use crate::utils::logger::Logger;

/// Command that runs a configured map session headlessly
pub struct ViewCommand<'a> {
    config_path: PathBuf,
    raster_override: Option<String>,
    output: Option<PathBuf>,
    legend_output: Option<PathBuf>,
    logger: &'a Logger,
}

impl<'a> ViewCommand<'a> {
    /// Create a new view command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> MapResult<Self> {
        let config_path = args
            .get_one::<String>("config")
            .map(PathBuf::from)
            .ok_or_else(|| MapError::GenericError("Missing configuration file".to_string()))?;

        Ok(ViewCommand {
            config_path,
            raster_override: args.get_one::<String>("raster").cloned(),
            output: args.get_one::<String>("output").map(PathBuf::from),
            legend_output: args.get_one::<String>("legend").map(PathBuf::from),
            logger,
        })
    }
}

impl<'a> Command for ViewCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        let config = ViewerConfig::load(&self.config_path)?;
        let mut context = MapContext::new(&config)?;

        let selection = self
            .raster_override
            .clone()
            .or_else(|| config.initial_raster.clone())
            .ok_or_else(|| {
                MapError::ConfigError(
                    "No raster to show: pass one or set initial_raster".to_string(),
                )
            })?;

        context.select_raster(&selection);
        context.pump_blocking();

        match context.phase() {
            OverlayPhase::Attached => {}
            OverlayPhase::Failed => {
                return Err(MapError::GenericError(format!(
                    "Selection failed: {}",
                    context.failure().unwrap_or("unknown error")
                )))
            }
            phase => {
                return Err(MapError::GenericError(format!(
                    "Unexpected overlay phase after load: {:?}",
                    phase
                )))
            }
        }

        info!(
            "Session attached '{}' at zoom {}",
            selection,
            context.view().zoom
        );

        if let Some(path) = &self.output {
            let image = context
                .render()
                .ok_or_else(|| MapError::GenericError("No overlay to render".to_string()))?
                .clone();
            image
                .save(path)
                .map_err(|e| MapError::GenericError(format!("Could not write image: {}", e)))?;
            info!("Overlay written to {}", path.display());
        }

        if let Some(path) = &self.legend_output {
            let swatch = context
                .legend()
                .ok_or_else(|| MapError::GenericError("No legend published".to_string()))?;
            swatch
                .image
                .save(path)
                .map_err(|e| MapError::GenericError(format!("Could not write legend: {}", e)))?;
            info!("Legend written to {}", path.display());
        }

        self.logger.log(&format!(
            "Viewer session rendered '{}' from {}",
            selection,
            self.config_path.display()
        ))?;

        Ok(())
    }
}
