//! Named color palettes
//!
//! A palette is an ordered table of RGB stops interpolated linearly over
//! the normalized [0,1] range. The built-in set mirrors the scales the
//! viewer's legacy assets were styled with.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::errors::{MapError, MapResult};

/// Simple RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Create a new RGB color
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// Convert to hex string (#RRGGBB format)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Create from hex string
    ///
    /// # Arguments
    /// * `hex` - Hex color string (with or without # prefix)
    ///
    /// # Returns
    /// The parsed color or an error for malformed input
    pub fn from_hex(hex: &str) -> MapResult<Self> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 {
            return Err(MapError::GenericError(format!(
                "Invalid hex color code: {} - must be 6 hexadecimal digits",
                hex
            )));
        }

        let r = parse_hex_component(&hex[0..2], hex)?;
        let g = parse_hex_component(&hex[2..4], hex)?;
        let b = parse_hex_component(&hex[4..6], hex)?;

        Ok(RgbColor { r, g, b })
    }

    /// Linear interpolation toward another color
    pub fn lerp(&self, other: &RgbColor, t: f64) -> RgbColor {
        RgbColor {
            r: lerp_component(self.r, other.r, t),
            g: lerp_component(self.g, other.g, t),
            b: lerp_component(self.b, other.b, t),
        }
    }
}

/// Helper function to parse a hex color component
fn parse_hex_component(hex_part: &str, full_hex: &str) -> MapResult<u8> {
    u8::from_str_radix(hex_part, 16)
        .map_err(|_| MapError::GenericError(format!("Invalid hex color: {}", full_hex)))
}

/// Helper function to interpolate a single color component
fn lerp_component(start: u8, end: u8, t: f64) -> u8 {
    (start as f64 * (1.0 - t) + end as f64 * t).round() as u8
}

/// A named color scale defined by equally spaced RGB stops
#[derive(Debug, Clone)]
pub struct Palette {
    /// Palette name as used by the UI
    pub name: String,
    /// Ordered color stops, at least two
    pub stops: Vec<RgbColor>,
}

impl Palette {
    /// Build a palette from hex stop strings
    pub fn from_hex_stops(name: &str, hex_stops: &[&str]) -> MapResult<Self> {
        if hex_stops.len() < 2 {
            return Err(MapError::GenericError(format!(
                "Palette {} needs at least two stops",
                name
            )));
        }

        let mut stops = Vec::with_capacity(hex_stops.len());
        for hex in hex_stops {
            stops.push(RgbColor::from_hex(hex)?);
        }

        Ok(Palette {
            name: name.to_string(),
            stops,
        })
    }

    /// Look up a built-in palette by name
    pub fn named(name: &str) -> MapResult<Palette> {
        PALETTES
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::UnknownPalette(name.to_string()))
    }

    /// Color at a normalized position
    ///
    /// `t` is clamped to [0,1]; 0 yields the first stop exactly and 1 the
    /// last, so display-range boundaries hit the boundary colors.
    pub fn color_at(&self, t: f64) -> RgbColor {
        let t = t.clamp(0.0, 1.0);
        let segments = self.stops.len() - 1;
        let scaled = t * segments as f64;
        let index = scaled.floor() as usize;

        if index >= segments {
            return self.stops[segments];
        }

        let frac = scaled - index as f64;
        self.stops[index].lerp(&self.stops[index + 1], frac)
    }

    /// First stop of the palette
    pub fn min_color(&self) -> RgbColor {
        self.stops[0]
    }

    /// Last stop of the palette
    pub fn max_color(&self) -> RgbColor {
        self.stops[self.stops.len() - 1]
    }
}

/// Names of all built-in palettes, sorted
pub fn palette_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "viridis",
        &[
            "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
            "#6ece58", "#b5de2b", "#fde725",
        ],
    ),
    (
        "inferno",
        &[
            "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925",
            "#fb9b06", "#f7d13d", "#fcffa4",
        ],
    ),
    (
        "plasma",
        &[
            "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
            "#fb9f3a", "#fdca26", "#f0f921",
        ],
    ),
    (
        "magma",
        &[
            "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d",
            "#fd9668", "#feca8d", "#fcfdbf",
        ],
    ),
    (
        "jet",
        &[
            "#00007f", "#0000ff", "#007fff", "#00ffff", "#7fff7f", "#ffff00", "#ff7f00",
            "#ff0000", "#7f0000",
        ],
    ),
    ("hot", &["#000000", "#ff0000", "#ffff00", "#ffffff"]),
    (
        "rainbow",
        &["#0000ff", "#00ffff", "#00ff00", "#ffff00", "#ff0000"],
    ),
    ("greys", &["#000000", "#ffffff"]),
];

lazy_static! {
    /// Built-in palette registry keyed by name
    static ref PALETTES: HashMap<&'static str, Palette> = {
        let mut map = HashMap::new();
        for (name, hex_stops) in BUILTIN {
            let palette = Palette::from_hex_stops(name, hex_stops)
                .expect("built-in palette stops are valid hex");
            map.insert(*name, palette);
        }
        map
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_returns_builtin() {
        let palette = Palette::named("viridis").unwrap();
        assert_eq!(palette.name, "viridis");
        assert_eq!(palette.stops.len(), 10);
    }

    #[test]
    fn named_rejects_unknown() {
        match Palette::named("no-such-scale") {
            Err(MapError::UnknownPalette(name)) => assert_eq!(name, "no-such-scale"),
            other => panic!("Expected UnknownPalette, got {:?}", other.map(|p| p.name)),
        }
    }

    #[test]
    fn color_at_hits_exact_stops() {
        let palette = Palette::named("greys").unwrap();
        assert_eq!(palette.color_at(0.0), RgbColor::new(0, 0, 0));
        assert_eq!(palette.color_at(1.0), RgbColor::new(255, 255, 255));
        assert_eq!(palette.color_at(0.5), RgbColor::new(128, 128, 128));
    }

    #[test]
    fn color_at_clamps_out_of_range_positions() {
        let palette = Palette::named("viridis").unwrap();
        assert_eq!(palette.color_at(-0.5), palette.min_color());
        assert_eq!(palette.color_at(1.5), palette.max_color());
    }

    #[test]
    fn hex_round_trip() {
        let color = RgbColor::from_hex("#ff7800").unwrap();
        assert_eq!(color, RgbColor::new(255, 120, 0));
        assert_eq!(color.to_hex(), "#ff7800");
    }

    #[test]
    fn hex_rejects_malformed_input() {
        assert!(RgbColor::from_hex("#ff78").is_err());
        assert!(RgbColor::from_hex("zzzzzz").is_err());
    }
}
