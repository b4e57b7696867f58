//! Palette listing and swatch export command

use clap::ArgMatches;
use std::fs;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::errors::{MapError, MapResult};
use crate::ramp::{palette_names, ColorRamp};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Command that lists built-in palettes, optionally exporting swatches
pub struct PalettesCommand<'a> {
    swatch_dir: Option<PathBuf>,
    logger: &'a Logger,
}

impl<'a> PalettesCommand<'a> {
    /// Create a new palettes command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> MapResult<Self> {
        Ok(PalettesCommand {
            swatch_dir: args.get_one::<String>("swatch-dir").map(PathBuf::from),
            logger,
        })
    }
}

impl<'a> Command for PalettesCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        let names = palette_names();

        println!("Available palettes:");
        for name in &names {
            println!("  {}", name);
        }

        if let Some(dir) = &self.swatch_dir {
            fs::create_dir_all(dir)?;
            let progress = ProgressTracker::new(names.len() as u64, "Exporting swatches");

            for name in &names {
                let ramp = ColorRamp::new(name, 0.0, 1.0, false, false)?;
                let swatch = ramp.legend(256, 16);
                let path = dir.join(format!("{}.png", name));
                swatch.image.save(&path).map_err(|e| {
                    MapError::GenericError(format!("Could not write swatch: {}", e))
                })?;
                progress.increment(1);
            }
            progress.finish("Swatches exported");

            self.logger.log(&format!(
                "Exported {} palette swatches to {}",
                names.len(),
                dir.display()
            ))?;
        }

        Ok(())
    }
}
