//! Palette registry for loading and accessing color palettes
//!
//! Loads palettes from palettes.json (embedded at compile time) and provides
//! access by name.
//!
//! Palette types:
//! - `categorical`: Discrete colors for chart series (colors repeat after exhausting the list)
//! - `sequential`: Gradient from low to high device counts
//!
//! A sequential palette may pin its colors to relative positions with
//! `stops` (fractions of the saturating value); without them the colors are
//! spread evenly over [0, 1].

use crate::scales::color::ColorPalette;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Global palette registry, initialized lazily on first access
pub static PALETTE_REGISTRY: Lazy<PaletteRegistry> = Lazy::new(|| {
    PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
        error!("Failed to load palettes.json: {}", e);
        PaletteRegistry::default()
    })
});

/// Default heatmap palette name
pub const DEFAULT_SEQUENTIAL_PALETTE: &str = "Aileen";

/// Radial chart series colors (day, average)
pub const SERIES_PALETTE: &str = "Series";

/// Fallback when a palette or a color is missing
const FALLBACK_COLOR: [u8; 3] = [128, 128, 128];

/// Palette type as defined in palettes.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    Categorical,
    Sequential,
}

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub palette_type: PaletteType,
    pub colors: Vec<String>,
    #[serde(default)]
    pub stops: Option<Vec<f64>>,
}

impl PaletteDefinition {
    /// Get a color by index (wraps around for categorical palettes)
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        let idx = index % self.colors.len();
        parse_hex_color(&self.colors[idx]).unwrap_or(FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Relative stop positions in [0, 1], one per color
    pub fn relative_stops(&self) -> Vec<f64> {
        let n = self.colors.len();
        if let Some(stops) = &self.stops {
            if stops.len() == n {
                return stops.clone();
            }
            warn!(
                "Palette '{}' has {} stops for {} colors, spreading evenly",
                self.name,
                stops.len(),
                n
            );
        }
        if n <= 1 {
            return vec![0.0; n];
        }
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    /// Color stops scaled onto `[0, max_value]`
    pub fn to_color_palette(&self, max_value: f64) -> ColorPalette {
        let mut palette = ColorPalette::new();
        for (i, position) in self.relative_stops().into_iter().enumerate() {
            palette.push_stop(position * max_value, self.get_color(i));
        }
        palette
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// All palettes by name (lowercase keys for case-insensitive lookup)
    palettes: HashMap<String, PaletteDefinition>,
    categorical_names: Vec<String>,
    sequential_names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse palettes JSON: {}", e))?;

        let mut registry = Self::default();

        for def in definitions {
            let name = def.name.clone();
            match def.palette_type {
                PaletteType::Categorical => registry.categorical_names.push(name.clone()),
                PaletteType::Sequential => registry.sequential_names.push(name.clone()),
            }
            registry.palettes.insert(name.to_lowercase(), def);
        }

        debug!(
            "PaletteRegistry: loaded {} palettes ({} categorical, {} sequential)",
            registry.palettes.len(),
            registry.categorical_names.len(),
            registry.sequential_names.len()
        );

        Ok(registry)
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    pub fn default_sequential(&self) -> Option<&PaletteDefinition> {
        self.get(DEFAULT_SEQUENTIAL_PALETTE)
    }

    pub fn categorical_palettes(&self) -> &[String] {
        &self.categorical_names
    }

    pub fn sequential_palettes(&self) -> &[String] {
        &self.sequential_names
    }
}

/// Parse a hex color string to RGB array
///
/// Supports `#RRGGBB`, `#RRGGBBAA` (alpha ignored) and both without `#`.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 && hex.len() != 8 {
        warn!("Invalid hex color length '{}': {}", hex, hex.len());
        return None;
    }

    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

    Some([r, g, b])
}

/// Heatmap color stops for a saturating value, from a named sequential palette
///
/// Falls back to the default heatmap palette if the name is unknown.
pub fn sequential_palette(name: &str, max_value: f64) -> ColorPalette {
    let definition = PALETTE_REGISTRY.get(name).or_else(|| {
        warn!(
            "Unknown palette '{}', using '{}'",
            name, DEFAULT_SEQUENTIAL_PALETTE
        );
        PALETTE_REGISTRY.default_sequential()
    });
    match definition {
        Some(def) => def.to_color_palette(max_value),
        None => {
            let mut palette = ColorPalette::new();
            palette.push_stop(0.0, FALLBACK_COLOR);
            palette.push_stop(max_value, FALLBACK_COLOR);
            palette
        }
    }
}

/// Series color by index from the series palette
pub fn series_color(index: usize) -> [u8; 3] {
    PALETTE_REGISTRY
        .get(SERIES_PALETTE)
        .map(|p| p.get_color(index))
        .unwrap_or(FALLBACK_COLOR)
}
