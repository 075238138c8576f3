//! Persistent heatmap settings
//!
//! Recording parameters (grid placement, sample interval, weight) and overlay
//! parameters (scale, normalization, color ramp) saved to/loaded from
//! heatmap_settings.json in the config directory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::heatmap::color::{ColorPoint, default_ramp, rgba_serde};
use crate::heatmap::visual::{HeatmapScale, Normalization, ShapeMultipliers, Visualization};

/// Path to the settings file
pub const SETTINGS_FILE: &str = "config/heatmap_settings.json";

/// How tiles are turned into overlay shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub scale: HeatmapScale,
    pub normalization: Normalization,
    pub visualization: Visualization,
    pub shapes: ShapeMultipliers,
    /// Amount added to RGB on the subject's tile
    pub color_highlight: f32,
    /// Fraction of a channel's maximum below which tiles are hidden (0.0-1.0)
    pub cleanliness: f32,
    #[serde(with = "rgba_serde")]
    pub grid_color: LinearRgba,
    pub color_points: Vec<ColorPoint>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: HeatmapScale::Linear,
            normalization: Normalization::ColorAndSize,
            visualization: Visualization::default(),
            shapes: ShapeMultipliers::default(),
            color_highlight: COLOR_HIGHLIGHT,
            cleanliness: CLEANLINESS,
            grid_color: GRID_COLOR,
            color_points: default_ramp(),
        }
    }
}

/// Recording and overlay settings for one heatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    /// World position the pivot is anchored to
    #[serde(with = "vec2_serde")]
    pub origin: Vec2,
    /// Point of the grid (0-1 per axis) placed on the origin
    #[serde(with = "vec2_serde")]
    pub pivot: Vec2,
    /// Seconds between samples (0 = every tick)
    pub interval: f32,
    /// Weight added per sample
    pub weight: f32,
    /// Grid extent in world units (used when no file is loaded)
    #[serde(with = "vec2_serde")]
    pub size: Vec2,
    /// World units per tile
    #[serde(with = "vec2_serde")]
    pub division: Vec2,
    /// Heatmap to load on startup (name inside `heatmap_dir`), None = new grid
    pub file: Option<String>,
    pub heatmap_dir: String,
    /// Save to AutoSave when the app exits
    pub autosave: bool,
    pub render: RenderSettings,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            pivot: DEFAULT_PIVOT,
            interval: DEFAULT_INTERVAL,
            weight: DEFAULT_WEIGHT,
            size: DEFAULT_GRID_SIZE,
            division: DEFAULT_DIVISION,
            file: None,
            heatmap_dir: HEATMAP_DIR.to_string(),
            autosave: true,
            render: RenderSettings::default(),
        }
    }
}

impl HeatmapSettings {
    /// Load settings from the default file, or return defaults if it's missing or broken
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            info!("No heatmap_settings.json found, using defaults");
            return Self::default();
        }

        match Self::from_file(SETTINGS_FILE) {
            Ok(settings) => {
                info!("Loaded settings from {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from a JSON file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        let settings: Self =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))?;
        settings
            .validate()
            .map_err(|e| format!("Invalid settings in {}: {}", path, e))?;
        Ok(settings)
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to(&self, path: &str) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved settings to {}", path);
        Ok(())
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(SETTINGS_FILE)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.division.x > 0.0 && self.division.y > 0.0) {
            return Err(format!(
                "division must be positive, got ({}, {})",
                self.division.x, self.division.y
            ));
        }
        if self.size.x < 0.0 || self.size.y < 0.0 {
            return Err(format!(
                "size must not be negative, got ({}, {})",
                self.size.x, self.size.y
            ));
        }
        if !(0.0..=1.0).contains(&self.render.cleanliness) {
            return Err(format!(
                "cleanliness must be within 0.0-1.0, got {}",
                self.render.cleanliness
            ));
        }
        Ok(())
    }

    /// Directory holding heatmap snapshots
    pub fn heatmap_dir(&self) -> PathBuf {
        PathBuf::from(&self.heatmap_dir)
    }
}

/// Serialize vectors as `[x, y]`
mod vec2_serde {
    use bevy::prelude::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}
