//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod palettes_command;
pub mod query_command;
pub mod render_command;
pub mod view_command;

pub use command_traits::{Command, CommandFactory};
pub use palettes_command::PalettesCommand;
pub use query_command::QueryCommand;
pub use render_command::RenderCommand;
pub use view_command::ViewCommand;

use clap::ArgMatches;

use crate::errors::MapResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct RastermapCommandFactory;

impl RastermapCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RastermapCommandFactory
    }
}

impl Default for RastermapCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for RastermapCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        logger: &'a Logger,
    ) -> MapResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.get_flag("palettes") {
            Ok(Box::new(PalettesCommand::new(args, logger)?))
        } else if args.contains_id("query") {
            Ok(Box::new(QueryCommand::new(args, logger)?))
        } else if args.contains_id("config") {
            Ok(Box::new(ViewCommand::new(args, logger)?))
        } else {
            // Default to rendering the selected raster
            Ok(Box::new(RenderCommand::new(args, logger)?))
        }
    }
}
