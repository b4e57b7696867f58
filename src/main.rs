use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use rastermap::commands::{CommandFactory, RastermapCommandFactory};
use rastermap::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("RasterMap")
        .version("0.1")
        .about("Render and query value-mapped raster overlays")
        .arg(
            Arg::new("raster")
                .help("Raster identifier to show")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory holding the raster assets")
                .value_name("DIR")
                .default_value("./tif")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output image file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("legend")
                .long("legend")
                .help("Write the legend swatch to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("palette")
                .long("palette")
                .help("Color palette name")
                .value_name("NAME")
                .default_value("viridis")
                .required(false),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .help("Display range as 'min,max'")
                .value_name("MIN,MAX")
                .required(false),
        )
        .arg(
            Arg::new("clamp-low")
                .long("clamp-low")
                .help("Render below-range values at the boundary color")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("clamp-high")
                .long("clamp-high")
                .help("Render above-range values at the boundary color")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("opacity")
                .long("opacity")
                .help("Overlay opacity in [0,1]")
                .value_name("VALUE")
                .required(false),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .help("Sample the raster at a coordinate in 'lat,lng' format")
                .value_name("COORDINATE")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Run a headless viewer session from a TOML configuration")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("palettes")
                .long("palettes")
                .help("List the built-in palettes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("swatch-dir")
                .long("swatch-dir")
                .help("Export palette swatches to this directory")
                .value_name("DIR")
                .required(false),
        )
        .get_matches();

    let log_file = "rastermap.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("rastermap-global.log") {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = RastermapCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
