//! Tunable constants for heatgrid
//!
//! Default recording and overlay values live here for easy tweaking.

use bevy::prelude::*;

// =============================================================================
// FILE LOCATIONS
// =============================================================================

/// Directory where heatmap snapshots are saved and loaded
pub const HEATMAP_DIR: &str = "heatmaps";

/// File extension for heatmap snapshots
pub const HEATMAP_EXTENSION: &str = "json";

/// Snapshot name written when the app exits without an explicit save
pub const AUTOSAVE_NAME: &str = "AutoSave";

// =============================================================================
// RECORDING
// =============================================================================

pub const DEFAULT_PIVOT: Vec2 = Vec2::new(0.5, 0.5); // Center of the grid
pub const DEFAULT_INTERVAL: f32 = 1.0; // Seconds between samples
pub const DEFAULT_WEIGHT: f32 = 1.0; // Weight added per sample
pub const DEFAULT_GRID_SIZE: Vec2 = Vec2::new(3.0, 3.0); // World units
pub const DEFAULT_DIVISION: Vec2 = Vec2::new(1.0, 1.0); // World units per tile

// =============================================================================
// OVERLAY
// =============================================================================

pub const CUBE_HEIGHT_MULTIPLIER: f32 = 3.0; // Box height at full weight
pub const SPHERE_RADIUS_MULTIPLIER: f32 = 1.0;
pub const CIRCLE_RADIUS_MULTIPLIER: f32 = 1.0;
pub const COLOR_HIGHLIGHT: f32 = 0.125; // Added to RGB on the subject's tile
pub const CLEANLINESS: f32 = 0.0625; // Fraction of max below which tiles hide

pub const GRID_COLOR: LinearRgba = LinearRgba::new(1.0, 1.0, 1.0, 0.25);

/// Default color ramp: (progress, r, g, b, a)
pub const DEFAULT_RAMP: [(f32, f32, f32, f32, f32); 5] = [
    (0.00, 0.0, 0.0, 1.0, 0.12), // Blue
    (0.25, 0.0, 1.0, 1.0, 0.24), // Cyan
    (0.50, 0.0, 1.0, 0.0, 0.36), // Green
    (0.75, 1.0, 1.0, 0.0, 0.48), // Yellow
    (1.00, 1.0, 0.0, 0.0, 0.60), // Red
];
