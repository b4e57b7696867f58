//! Point-value query command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::command_traits::Command;
use crate::coordinate::LatLng;
use crate::errors::{MapError, MapResult};
use crate::overlay::RasterOverlay;
use crate::query;
use crate::raster::RasterCatalog;
use crate::utils::logger::Logger;

/// Command that samples a raster at a geographic coordinate
pub struct QueryCommand<'a> {
    identifier: String,
    data_dir: PathBuf,
    position: LatLng,
    logger: &'a Logger,
}

impl<'a> QueryCommand<'a> {
    /// Create a new query command from CLI arguments
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

        let spec = args
            .get_one::<String>("query")
            .ok_or_else(|| MapError::GenericError("Missing query coordinate".to_string()))?;
        let position = parse_latlng(spec)?;

        Ok(QueryCommand {
            identifier,
            data_dir,
            position,
            logger,
        })
    }
}

impl<'a> Command for QueryCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        info!(
            "Querying '{}' at ({}, {})",
            self.identifier, self.position.lat, self.position.lng
        );

        let catalog = RasterCatalog::new(&self.data_dir);
        let source = catalog.load(&self.identifier)?;
        let overlay = RasterOverlay::new(Arc::new(source), 1.0);

        let sample = query::value_at(&overlay, &self.position);
        match query::popup_text(&sample) {
            Some(text) => println!("{}", text),
            None => println!("No displayable value at point"),
        }

        self.logger.log(&format!(
            "Queried {} at {},{}: {:?}",
            self.identifier, self.position.lat, self.position.lng, sample
        ))?;

        Ok(())
    }
}

/// Parse a "lat,lng" coordinate specification
fn parse_latlng(spec: &str) -> MapResult<LatLng> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(MapError::GenericError(format!(
            "Coordinate must be 'lat,lng', got '{}'",
            spec
        )));
    }
    let lat = parts[0]
        .parse::<f64>()
        .map_err(|_| MapError::GenericError(format!("Invalid latitude: {}", parts[0])))?;
    let lng = parts[1]
        .parse::<f64>()
        .map_err(|_| MapError::GenericError(format!("Invalid longitude: {}", parts[1])))?;
    Ok(LatLng::new(lat, lng))
}
