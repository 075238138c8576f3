//! JSON snapshot of a heatmap grid, plus save/load helpers for the heatmap directory

use bevy::prelude::*;
use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::data::HeatmapData;
use super::error::HeatmapError;
use super::tile::{Channel, HeatmapTile};
use crate::constants::{HEATMAP_DIR, HEATMAP_EXTENSION};

/// Serialized form of one tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub position_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub position_weight_log10: f32,
    pub shooting_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub shooting_weight_log10: f32,
    pub running_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub running_weight_log10: f32,
}

/// Serialized form of a whole grid; tiles are row-major.
///
/// The `*Log10` fields (tile and maxima) are written for readers of the file
/// but ignored on decode: they are recomputed from the linear weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSnapshot {
    pub width: i64,
    pub height: i64,
    pub max_position_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_position_weight_log10: f32,
    pub max_shooting_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_shooting_weight_log10: f32,
    pub max_running_weight: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_running_weight_log10: f32,
    pub tiles: Vec<TileSnapshot>,
}

/// Log fields of weights at or below -1 are NaN, which JSON writes as `null`
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl From<&HeatmapTile> for TileSnapshot {
    fn from(tile: &HeatmapTile) -> Self {
        Self {
            position_weight: tile.position_weight(),
            position_weight_log10: tile.position_weight_log10(),
            shooting_weight: tile.shooting_weight(),
            shooting_weight_log10: tile.shooting_weight_log10(),
            running_weight: tile.running_weight(),
            running_weight_log10: tile.running_weight_log10(),
        }
    }
}

impl From<&HeatmapData> for HeatmapSnapshot {
    fn from(data: &HeatmapData) -> Self {
        Self {
            width: data.width() as i64,
            height: data.height() as i64,
            max_position_weight: data.max_position_weight(),
            max_position_weight_log10: data.max_position_weight_log10(),
            max_shooting_weight: data.max_shooting_weight(),
            max_shooting_weight_log10: data.max_shooting_weight_log10(),
            max_running_weight: data.max_running_weight(),
            max_running_weight_log10: data.max_running_weight_log10(),
            tiles: data.tiles_raw().iter().map(TileSnapshot::from).collect(),
        }
    }
}

impl TryFrom<HeatmapSnapshot> for HeatmapData {
    type Error = HeatmapError;

    /// Stored log values are ignored and recomputed from the linear weights
    fn try_from(snapshot: HeatmapSnapshot) -> Result<Self, Self::Error> {
        if snapshot.width < 0 || snapshot.height < 0 {
            return Err(HeatmapError::InvalidDimension {
                width: snapshot.width,
                height: snapshot.height,
            });
        }
        let tiles = snapshot
            .tiles
            .iter()
            .map(|t| HeatmapTile::new(t.position_weight, t.shooting_weight, t.running_weight))
            .collect();
        let mut max_linear = [0.0; 3];
        max_linear[Channel::Position.index()] = snapshot.max_position_weight;
        max_linear[Channel::Shooting.index()] = snapshot.max_shooting_weight;
        max_linear[Channel::Running.index()] = snapshot.max_running_weight;

        HeatmapData::from_parts(
            snapshot.width as usize,
            snapshot.height as usize,
            max_linear,
            tiles,
        )
    }
}

impl HeatmapData {
    pub fn to_snapshot(&self) -> HeatmapSnapshot {
        HeatmapSnapshot::from(self)
    }

    pub fn from_snapshot(snapshot: HeatmapSnapshot) -> Result<Self, HeatmapError> {
        Self::try_from(snapshot)
    }

    pub fn to_json(&self) -> Result<String, HeatmapError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, HeatmapError> {
        let snapshot: HeatmapSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Read a snapshot file
    pub fn load_from_file(path: &Path) -> Result<Self, HeatmapError> {
        let content = fs::read_to_string(path)?;
        let data = Self::from_json(&content)?;
        info!(
            "Loaded {}x{} heatmap from {}",
            data.width(),
            data.height(),
            path.display()
        );
        Ok(data)
    }

    /// Write a snapshot file, creating parent directories and replacing any existing file
    pub fn save_to_file(&self, path: &Path) -> Result<(), HeatmapError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!("Saved heatmap to {}", path.display());
        Ok(())
    }
}

/// Path of a named heatmap inside `dir`
pub fn heatmap_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, HEATMAP_EXTENSION))
}

/// Path of a named heatmap inside the default heatmap directory
pub fn default_heatmap_path(name: &str) -> PathBuf {
    heatmap_path(Path::new(HEATMAP_DIR), name)
}

/// Timestamped name for a recording session
pub fn session_name() -> String {
    format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn sample_grid() -> HeatmapData {
        let mut grid = HeatmapData::new(3, 2).unwrap();
        grid.add_position_weight(0, 0, 1.0).unwrap();
        grid.add_position_weight(2, 1, 0.1).unwrap();
        grid.add_position_weight(2, 1, 0.2).unwrap();
        grid.add_shooting_weight(1, 0, 3.75).unwrap();
        grid.add_running_weight(1, 1, 1e-7).unwrap();
        grid
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let grid = sample_grid();
        let json = grid.to_json().unwrap();
        let restored = HeatmapData::from_json(&json).unwrap();
        assert_eq!(restored, grid);
        assert_eq!(
            restored.tile_at(2, 1).unwrap().position_weight().to_bits(),
            grid.tile_at(2, 1).unwrap().position_weight().to_bits()
        );
    }

    #[test]
    fn test_weight_below_minus_one_round_trips() {
        let mut grid = HeatmapData::new(2, 1).unwrap();
        grid.add_position_weight(0, 0, -2.0).unwrap();
        grid.add_position_weight(1, 0, 3.0).unwrap();

        let json = grid.to_json().unwrap();
        assert!(json.contains("\"positionWeightLog10\": null"));

        let restored = HeatmapData::from_json(&json).unwrap();
        let tile = restored.tile_at(0, 0).unwrap();
        assert_eq!(tile.position_weight(), -2.0);
        assert!(tile.position_weight_log10().is_nan());
        assert_eq!(restored.tile_at(1, 0).unwrap(), grid.tile_at(1, 0).unwrap());
        assert_eq!(restored.max_position_weight(), 3.0);
    }

    #[test]
    fn test_empty_grid_round_trip() {
        let grid = HeatmapData::new(0, 5).unwrap();
        let restored = HeatmapData::from_json(&grid.to_json().unwrap()).unwrap();
        assert_eq!(restored.width(), 0);
        assert_eq!(restored.height(), 5);
        assert_eq!(restored.tile_count(), 0);
    }

    #[test]
    fn test_field_names_are_camel_case() {
        let json = serde_json::to_value(sample_grid().to_snapshot()).unwrap();
        assert_eq!(json["width"], 3);
        assert!(json.get("maxPositionWeightLog10").is_some());
        assert!(json["tiles"][0].get("positionWeight").is_some());
        assert!(json["tiles"][0].get("runningWeightLog10").is_some());
    }

    #[test]
    fn test_stale_log_values_are_recomputed() {
        let mut snapshot = sample_grid().to_snapshot();
        snapshot.tiles[0].position_weight_log10 = 42.0;
        let restored = HeatmapData::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.tile_at(0, 0).unwrap().position_weight_log10(), 2.0f32.log10());
    }

    #[test]
    fn test_tile_count_mismatch_is_malformed() {
        let mut snapshot = sample_grid().to_snapshot();
        snapshot.tiles.pop();
        assert!(matches!(
            HeatmapData::from_snapshot(snapshot),
            Err(HeatmapError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let snapshot = HeatmapSnapshot {
            width: -2,
            ..Default::default()
        };
        assert!(matches!(
            HeatmapData::from_snapshot(snapshot),
            Err(HeatmapError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_missing_fields_fail_to_parse() {
        assert!(matches!(
            HeatmapData::from_json(r#"{"width": 1}"#),
            Err(HeatmapError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("heatgrid_snapshot_test_{}", nanos));
        let path = heatmap_path(&dir, "grid");

        let grid = sample_grid();
        grid.save_to_file(&path).expect("save heatmap");
        let loaded = HeatmapData::load_from_file(&path).expect("load heatmap");
        assert_eq!(loaded, grid);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_session_name_prefix() {
        assert!(session_name().starts_with("session_"));
    }
}
