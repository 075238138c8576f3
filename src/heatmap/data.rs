//! Dense tile grid with per-channel running maxima

use super::error::HeatmapError;
use super::tile::{Channel, ChannelWeight, HeatmapTile};

/// Row-major grid of tiles plus the largest weight seen on each channel.
///
/// Maxima only ever grow: a tile that was once the maximum keeps the channel
/// maximum even if weights are later subtracted from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapData {
    width: usize,
    height: usize,
    maxima: [ChannelWeight; 3],
    tiles: Vec<HeatmapTile>,
}

impl HeatmapData {
    /// Allocate a zeroed `width * height` grid.
    /// Negative sizes and grids too large to allocate are `InvalidDimension`.
    pub fn new(width: i32, height: i32) -> Result<Self, HeatmapError> {
        let invalid = || HeatmapError::InvalidDimension {
            width: width as i64,
            height: height as i64,
        };
        if width < 0 || height < 0 {
            return Err(invalid());
        }
        let (w, h) = (width as usize, height as usize);
        let count = w.checked_mul(h).ok_or_else(invalid)?;

        let mut tiles = Vec::new();
        tiles.try_reserve_exact(count).map_err(|_| invalid())?;
        tiles.resize(count, HeatmapTile::default());

        Ok(Self {
            width: w,
            height: h,
            maxima: [ChannelWeight::ZERO; 3],
            tiles,
        })
    }

    /// Build a grid that covers `size` world units with tiles of `division` units.
    /// Dimensions are rounded to the nearest whole tile.
    pub fn for_area(size_x: f32, size_y: f32, division_x: f32, division_y: f32) -> Result<Self, HeatmapError> {
        let width = (size_x / division_x).round();
        let height = (size_y / division_y).round();
        if !width.is_finite() || !height.is_finite() || width > i32::MAX as f32 || height > i32::MAX as f32 {
            return Err(HeatmapError::InvalidDimension {
                width: width as i64,
                height: height as i64,
            });
        }
        Self::new(width as i32, height as i32)
    }

    /// Rebuild a grid from already-decoded parts.
    ///
    /// Tile log values are recomputed from the linear weights. Maxima are
    /// raised where a stored tile exceeds them so the grid invariant holds.
    pub fn from_parts(
        width: usize,
        height: usize,
        max_linear: [f32; 3],
        tiles: Vec<HeatmapTile>,
    ) -> Result<Self, HeatmapError> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            HeatmapError::MalformedSnapshot(format!("{}x{} overflows", width, height))
        })?;
        if tiles.len() != expected {
            return Err(HeatmapError::MalformedSnapshot(format!(
                "expected {} tiles for {}x{}, found {}",
                expected,
                width,
                height,
                tiles.len()
            )));
        }

        let mut maxima = max_linear.map(ChannelWeight::from_linear);
        for tile in &tiles {
            for channel in Channel::ALL {
                let weight = tile.channel(channel);
                if weight.linear() > maxima[channel.index()].linear() {
                    maxima[channel.index()] = weight;
                }
            }
        }

        Ok(Self {
            width,
            height,
            maxima,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Raw tile storage in row-major order
    pub fn tiles_raw(&self) -> &[HeatmapTile] {
        &self.tiles
    }

    /// Channel maximum (linear and log10)
    pub fn max(&self, channel: Channel) -> ChannelWeight {
        self.maxima[channel.index()]
    }

    pub fn max_position_weight(&self) -> f32 {
        self.max(Channel::Position).linear()
    }

    pub fn max_position_weight_log10(&self) -> f32 {
        self.max(Channel::Position).log10()
    }

    pub fn max_shooting_weight(&self) -> f32 {
        self.max(Channel::Shooting).linear()
    }

    pub fn max_shooting_weight_log10(&self) -> f32 {
        self.max(Channel::Shooting).log10()
    }

    pub fn max_running_weight(&self) -> f32 {
        self.max(Channel::Running).linear()
    }

    pub fn max_running_weight_log10(&self) -> f32 {
        self.max(Channel::Running).log10()
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, HeatmapError> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(HeatmapError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x as usize + y as usize * self.width)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Result<&HeatmapTile, HeatmapError> {
        let idx = self.index(x, y)?;
        Ok(&self.tiles[idx])
    }

    /// Add weight to one channel of a tile, updating the channel maximum
    pub fn add_weight(&mut self, channel: Channel, x: i32, y: i32, weight: f32) -> Result<(), HeatmapError> {
        let idx = self.index(x, y)?;
        let slot = self.tiles[idx].channel_mut(channel);
        slot.add(weight);
        let updated = *slot;

        let max = &mut self.maxima[channel.index()];
        if updated.linear() > max.linear() {
            *max = updated;
        }
        Ok(())
    }

    pub fn add_position_weight(&mut self, x: i32, y: i32, weight: f32) -> Result<(), HeatmapError> {
        self.add_weight(Channel::Position, x, y, weight)
    }

    pub fn add_shooting_weight(&mut self, x: i32, y: i32, weight: f32) -> Result<(), HeatmapError> {
        self.add_weight(Channel::Shooting, x, y, weight)
    }

    pub fn add_running_weight(&mut self, x: i32, y: i32, weight: f32) -> Result<(), HeatmapError> {
        self.add_weight(Channel::Running, x, y, weight)
    }

    /// Row-major traversal of `(x, y, tile)`, y outer and x inner.
    /// Call again to restart.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &HeatmapTile)> + Clone + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (idx % width, idx / width, tile))
    }

    pub fn for_each_tile<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, usize, &HeatmapTile),
    {
        for (x, y, tile) in self.tiles() {
            visitor(x, y, tile);
        }
    }

    /// Number of tiles holding non-zero weight on a channel
    pub fn visited_count(&self, channel: Channel) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.channel(channel).linear() != 0.0)
            .count()
    }
}
