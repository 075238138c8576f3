//! Heatmap grid, overlay math and recording
//!
//! The grid (`HeatmapData`) stores weights; `visual` turns them into overlay
//! values; `HeatmapRecorder` drives sampling and produces render frames; the
//! plugin wires the recorder into a Bevy app.

pub mod color;
pub mod data;
pub mod error;
pub mod plugin;
pub mod recorder;
pub mod sampler;
pub mod shared;
pub mod snapshot;
pub mod tile;
pub mod visual;

pub use color::{ColorPoint, default_ramp, get_color, lerp_color};
pub use data::HeatmapData;
pub use error::HeatmapError;
pub use plugin::{HeatmapAnchor, HeatmapPlugin, HeatmapSubject, autosave_on_exit, follow_heatmap_anchor, sample_heatmap_subjects};
pub use recorder::{ChannelRender, HeatmapRecorder, RenderFrame, ShapeKind, TileRender};
pub use sampler::{HeatmapBounds, SampleTimer};
pub use shared::SharedHeatmap;
pub use snapshot::{HeatmapSnapshot, TileSnapshot, default_heatmap_path, heatmap_path, session_name};
pub use tile::{Channel, ChannelWeight, HeatmapTile};
pub use visual::{
    ChannelVisual, HeatmapScale, Normalization, ShapeMultipliers, VisualParams, Visualization,
    channel_visual,
};
