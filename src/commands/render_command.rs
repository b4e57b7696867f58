//! Overlay rendering command
//!
//! Loads one raster asset, paints it through a ramp and writes the result
//! as a PNG, optionally alongside the legend swatch.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::command_traits::Command;
use crate::errors::{MapError, MapResult};
use crate::overlay::RasterOverlay;
use crate::ramp::ColorRamp;
use crate::raster::RasterCatalog;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Command that renders a raster overlay to an image file
pub struct RenderCommand<'a> {
    identifier: String,
    data_dir: PathBuf,
    output: PathBuf,
    legend_output: Option<PathBuf>,
    palette: String,
    display_range: (f64, f64),
    clamp_low: bool,
    clamp_high: bool,
    opacity: f64,
    verbose: bool,
    logger: &'a Logger,
}

impl<'a> RenderCommand<'a> {
    /// Create a new render command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> MapResult<Self> {
        let identifier = args
            .get_one::<String>("raster")
            .ok_or_else(|| MapError::GenericError("Missing raster identifier".to_string()))?
            .clone();

        let data_dir = PathBuf::from(
            args.get_one::<String>("data-dir")
                .map(String::as_str)
                .unwrap_or("./tif"),
        );

        let output = args
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.png", identifier)));

        let legend_output = args.get_one::<String>("legend").map(PathBuf::from);

        let palette = args
            .get_one::<String>("palette")
            .cloned()
            .unwrap_or_else(|| "viridis".to_string());

        let display_range = match args.get_one::<String>("range") {
            Some(spec) => parse_range(spec)?,
            None => (0.0, 1.0),
        };

        let opacity = match args.get_one::<String>("opacity") {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| MapError::GenericError(format!("Invalid opacity: {}", raw)))?,
            None => 0.3,
        };

        Ok(RenderCommand {
            identifier,
            data_dir,
            output,
            legend_output,
            palette,
            display_range,
            clamp_low: args.get_flag("clamp-low"),
            clamp_high: args.get_flag("clamp-high"),
            opacity,
            verbose: args.get_flag("verbose"),
            logger,
        })
    }
}

impl<'a> Command for RenderCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        info!(
            "Rendering '{}' with palette {} over [{}, {}]",
            self.identifier, self.palette, self.display_range.0, self.display_range.1
        );

        let progress = ProgressTracker::new(3, "Loading raster");

        let catalog = RasterCatalog::new(&self.data_dir);
        let source = catalog.load(&self.identifier)?;
        if self.verbose {
            info!("Raster is {}x{} cells", source.width(), source.height());
            if let Some((lo, hi)) = source.grid().value_range() {
                info!("Value range: {} to {}", lo, hi);
            }
        }
        progress.increment(1);
        progress.set_message("Painting overlay");

        let ramp = ColorRamp::new(
            &self.palette,
            self.display_range.0,
            self.display_range.1,
            self.clamp_low,
            self.clamp_high,
        )?;

        let mut overlay = RasterOverlay::new(Arc::new(source), self.opacity);
        let image = overlay.render(&ramp).clone();
        progress.increment(1);
        progress.set_message("Writing output");

        image
            .save(&self.output)
            .map_err(|e| MapError::GenericError(format!("Could not write image: {}", e)))?;

        if let Some(legend_path) = &self.legend_output {
            let swatch = ramp.legend(256, 16);
            swatch
                .image
                .save(legend_path)
                .map_err(|e| MapError::GenericError(format!("Could not write legend: {}", e)))?;
        }
        progress.increment(1);
        progress.finish("Done");

        self.logger.log(&format!(
            "Rendered {} to {}",
            self.identifier,
            self.output.display()
        ))?;

        Ok(())
    }
}

/// Parse a "min,max" range specification
fn parse_range(spec: &str) -> MapResult<(f64, f64)> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(MapError::GenericError(format!(
            "Range must be 'min,max', got '{}'",
            spec
        )));
    }
    let min = parts[0]
        .parse::<f64>()
        .map_err(|_| MapError::GenericError(format!("Invalid range minimum: {}", parts[0])))?;
    let max = parts[1]
        .parse::<f64>()
        .map_err(|_| MapError::GenericError(format!("Invalid range maximum: {}", parts[1])))?;
    Ok((min, max))
}
