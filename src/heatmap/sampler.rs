//! World-space placement of the grid and the periodic sample timer

use bevy::prelude::*;

/// World-space rectangle covered by the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapBounds {
    pub min: Vec2,
    pub size: Vec2,
    pub division: Vec2,
}

impl HeatmapBounds {
    /// Place a `width x height` grid so that `pivot` (0-1 on each axis) sits on `origin`
    pub fn new(origin: Vec2, pivot: Vec2, division: Vec2, width: usize, height: usize) -> Self {
        let size = Vec2::new(width as f32 * division.x, height as f32 * division.y);
        Self {
            min: origin - pivot * size,
            size,
            division,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive on both edges
    pub fn contains(&self, pos: Vec2) -> bool {
        let max = self.max();
        pos.x >= self.min.x && pos.y >= self.min.y && pos.x <= max.x && pos.y <= max.y
    }

    /// Tile under `pos`: `floor((pos - min) / division)`
    pub fn tile_of(&self, pos: Vec2) -> (i32, i32) {
        let cell = ((pos - self.min) / self.division).floor();
        (cell.x as i32, cell.y as i32)
    }

    /// Tile under `pos` for positions inside the bounds.
    /// The far edges belong to the last row/column.
    pub fn sample_tile(&self, pos: Vec2, width: usize, height: usize) -> Option<(i32, i32)> {
        if width == 0 || height == 0 || !self.contains(pos) {
            return None;
        }
        let (x, y) = self.tile_of(pos);
        Some((x.min(width as i32 - 1), y.min(height as i32 - 1)))
    }

    /// World-space center of a tile
    pub fn tile_center(&self, x: usize, y: usize) -> Vec2 {
        self.min + Vec2::new((x as f32 + 0.5) * self.division.x, (y as f32 + 0.5) * self.division.y)
    }

    /// Horizontal and vertical grid line segments, one more than the tile count per axis
    pub fn grid_lines(&self, width: usize, height: usize) -> Vec<(Vec2, Vec2)> {
        let mut lines = Vec::with_capacity(width + height + 2);
        for x in 0..=width {
            let at = self.min.x + x as f32 * self.division.x;
            lines.push((Vec2::new(at, self.min.y), Vec2::new(at, self.min.y + self.size.y)));
        }
        for y in 0..=height {
            let at = self.min.y + y as f32 * self.division.y;
            lines.push((Vec2::new(self.min.x, at), Vec2::new(self.min.x + self.size.x, at)));
        }
        lines
    }
}

/// Countdown that fires once per `interval` seconds.
///
/// The timer starts due, so the first tick samples immediately. After a tick
/// the timer is topped up by whole intervals until it is positive again; a
/// zero interval fires every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleTimer {
    interval: f32,
    remaining: f32,
}

impl SampleTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            remaining: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance by `dt`. Returns true when a sample is due this tick.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    /// Reset after [`advance`](Self::advance), whether or not a sample was taken
    pub fn rearm(&mut self) {
        if self.interval <= 0.0 {
            self.remaining = 0.0;
            return;
        }
        while self.remaining <= 0.0 {
            self.remaining += self.interval;
        }
    }
}
