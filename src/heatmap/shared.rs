//! Thread-shared grid for setups where sampling and rendering run on different threads

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use super::data::HeatmapData;
use super::error::HeatmapError;
use super::tile::Channel;

/// Single-writer, multi-reader handle to a grid.
///
/// Each accumulation runs under one write guard, so readers never see a tile
/// whose log value or channel maximum lags its linear weight.
#[derive(Debug, Clone, Default)]
pub struct SharedHeatmap {
    inner: Arc<RwLock<HeatmapData>>,
}

impl SharedHeatmap {
    pub fn new(data: HeatmapData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub fn add_weight(&self, channel: Channel, x: i32, y: i32, weight: f32) -> Result<(), HeatmapError> {
        let mut data = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        data.add_weight(channel, x, y, weight)
    }

    /// Read access for traversal; holds off writers until dropped
    pub fn read(&self) -> RwLockReadGuard<'_, HeatmapData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current grid
    pub fn snapshot(&self) -> HeatmapData {
        self.read().clone()
    }
}
