//! Heatgrid - Grid heatmaps of where a subject spends its time
//!
//! Records a tracked entity's position (and whether it was shooting or
//! running) into a weighted tile grid, persists grids as JSON snapshots, and
//! turns them into overlay shapes and colors.

pub mod constants;
pub mod heatmap;
pub mod scenario;
pub mod settings;

pub use constants::*;
pub use heatmap::{
    Channel, ChannelWeight, ColorPoint, HeatmapAnchor, HeatmapBounds, HeatmapData, HeatmapError,
    HeatmapPlugin, HeatmapRecorder, HeatmapScale, HeatmapSnapshot, HeatmapSubject, HeatmapTile,
    Normalization, RenderFrame, SampleTimer, SharedHeatmap, Visualization,
};
pub use scenario::{ScenarioDefinition, ScenarioResult, load_scenario, run_scenario};
pub use settings::{HeatmapSettings, RenderSettings, SETTINGS_FILE};
