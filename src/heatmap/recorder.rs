//! Heatmap recorder - owns a grid, samples a subject over time and
//! prepares per-tile overlay values for whatever draws them.

use bevy::prelude::*;
use std::path::PathBuf;

use super::data::HeatmapData;
use super::error::HeatmapError;
use super::sampler::{HeatmapBounds, SampleTimer};
use super::snapshot::heatmap_path;
use super::tile::Channel;
use super::visual::{VisualParams, channel_visual};
use crate::constants::AUTOSAVE_NAME;
use crate::settings::HeatmapSettings;

/// Shape a channel is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Box standing on the tile; size is its height
    Box,
    /// Sphere resting on the tile; size is its radius
    Sphere,
    /// Flat disc on the tile; size is its radius
    Disc,
}

impl ShapeKind {
    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Position => ShapeKind::Box,
            Channel::Shooting => ShapeKind::Sphere,
            Channel::Running => ShapeKind::Disc,
        }
    }
}

/// One visible channel of one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRender {
    pub channel: Channel,
    pub shape: ShapeKind,
    pub size: f32,
    pub fill: LinearRgba,
    /// Fill color at full opacity
    pub outline: LinearRgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileRender {
    pub x: usize,
    pub y: usize,
    pub center: Vec2,
    pub channels: Vec<ChannelRender>,
}

/// Everything a renderer needs for one redraw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub bounds: HeatmapBounds,
    pub grid_color: LinearRgba,
    /// Empty when the grid color is fully transparent
    pub grid_lines: Vec<(Vec2, Vec2)>,
    /// Tiles with at least one visible channel, row-major
    pub tiles: Vec<TileRender>,
}

/// Records a subject's position, shooting and running onto a grid
#[derive(Resource, Debug, Clone)]
pub struct HeatmapRecorder {
    pub settings: HeatmapSettings,
    data: HeatmapData,
    bounds: HeatmapBounds,
    timer: SampleTimer,
    /// Tile of the most recent sample
    subject_tile: Option<(i32, i32)>,
    /// Name of the file the grid was loaded from or last saved to
    file_name: Option<String>,
}

impl HeatmapRecorder {
    /// Build a recorder, loading `settings.file` when set
    pub fn new(settings: HeatmapSettings) -> Result<Self, HeatmapError> {
        let mut recorder = Self {
            timer: SampleTimer::new(settings.interval),
            data: HeatmapData::default(),
            bounds: HeatmapBounds::new(settings.origin, settings.pivot, settings.division, 0, 0),
            subject_tile: None,
            file_name: None,
            settings,
        };
        recorder.refresh_data()?;
        Ok(recorder)
    }

    /// Recorder around an existing grid
    pub fn with_data(settings: HeatmapSettings, data: HeatmapData) -> Self {
        let mut recorder = Self {
            timer: SampleTimer::new(settings.interval),
            bounds: HeatmapBounds::new(settings.origin, settings.pivot, settings.division, 0, 0),
            data,
            subject_tile: None,
            file_name: None,
            settings,
        };
        recorder.refresh_position();
        recorder
    }

    pub fn data(&self) -> &HeatmapData {
        &self.data
    }

    pub fn bounds(&self) -> HeatmapBounds {
        self.bounds
    }

    pub fn subject_tile(&self) -> Option<(i32, i32)> {
        self.subject_tile
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Reload the configured file, or start a new grid sized from `size / division`
    pub fn refresh_data(&mut self) -> Result<(), HeatmapError> {
        self.data = match &self.settings.file {
            Some(name) => {
                let path = heatmap_path(&self.settings.heatmap_dir(), name);
                let data = HeatmapData::load_from_file(&path)?;
                self.file_name = Some(name.clone());
                data
            }
            None => {
                let s = &self.settings;
                HeatmapData::for_area(s.size.x, s.size.y, s.division.x, s.division.y)?
            }
        };
        self.timer = SampleTimer::new(self.settings.interval);
        self.subject_tile = None;
        self.refresh_position();
        Ok(())
    }

    /// Recompute world bounds from the origin and pivot
    pub fn refresh_position(&mut self) {
        self.bounds = HeatmapBounds::new(
            self.settings.origin,
            self.settings.pivot,
            self.settings.division,
            self.data.width(),
            self.data.height(),
        );
    }

    /// Move the grid so its pivot sits on `origin`
    pub fn set_origin(&mut self, origin: Vec2) {
        if self.settings.origin != origin {
            self.settings.origin = origin;
            self.refresh_position();
        }
    }

    /// Advance the sample timer and, when due, record the subject.
    ///
    /// Returns the tile that received weight, if any. Positions outside the
    /// grid are ignored.
    pub fn tick(
        &mut self,
        dt: f32,
        subject_position: Option<Vec2>,
        is_shooting: bool,
        is_running: bool,
    ) -> Option<(i32, i32)> {
        let due = self.timer.advance(dt);
        let mut sampled = None;

        if due
            && let Some(pos) = subject_position
            && let Some((x, y)) = self
                .bounds
                .sample_tile(pos, self.data.width(), self.data.height())
        {
            self.record(x, y, is_shooting, is_running);
            sampled = Some((x, y));
        }

        self.timer.rearm();
        sampled
    }

    fn record(&mut self, x: i32, y: i32, is_shooting: bool, is_running: bool) {
        let weight = self.settings.weight;
        let channels = [
            (Channel::Position, true),
            (Channel::Shooting, is_shooting),
            (Channel::Running, is_running),
        ];
        for (channel, active) in channels {
            if !active {
                continue;
            }
            if let Err(e) = self.data.add_weight(channel, x, y, weight) {
                warn!("Heatmap: dropped {} sample: {}", channel.label(), e);
            }
        }
        self.subject_tile = Some((x, y));
    }

    /// Overlay values for every tile with a visible channel
    pub fn snapshot_for_render(&self) -> RenderFrame {
        let render = &self.settings.render;
        let params = VisualParams {
            scale: render.scale,
            normalization: render.normalization,
            cleanliness: render.cleanliness,
            ramp: &render.color_points,
            highlight: render.color_highlight,
        };
        let channels: Vec<(Channel, f32)> = Channel::ALL
            .into_iter()
            .filter(|c| render.visualization.shows(*c))
            .map(|c| (c, render.shapes.for_channel(c, self.bounds.division)))
            .collect();

        let mut tiles = Vec::new();
        for (x, y, tile) in self.data.tiles() {
            let highlighted = self.subject_tile == Some((x as i32, y as i32));
            let visible: Vec<ChannelRender> = channels
                .iter()
                .filter_map(|&(channel, size_multiplier)| {
                    let visual = channel_visual(
                        tile.channel(channel),
                        self.data.max(channel),
                        size_multiplier,
                        highlighted,
                        &params,
                    );
                    visual.visible.then(|| ChannelRender {
                        channel,
                        shape: ShapeKind::for_channel(channel),
                        size: visual.size,
                        fill: visual.color,
                        outline: LinearRgba {
                            alpha: 1.0,
                            ..visual.color
                        },
                    })
                })
                .collect();

            if !visible.is_empty() {
                tiles.push(TileRender {
                    x,
                    y,
                    center: self.bounds.tile_center(x, y),
                    channels: visible,
                });
            }
        }

        let grid_lines = if render.grid_color.alpha > 0.0 {
            self.bounds.grid_lines(self.data.width(), self.data.height())
        } else {
            Vec::new()
        };

        RenderFrame {
            bounds: self.bounds,
            grid_color: render.grid_color,
            grid_lines,
            tiles,
        }
    }

    /// Save under `name`, replacing an existing file
    pub fn save(&mut self, name: &str) -> Result<PathBuf, HeatmapError> {
        let path = heatmap_path(&self.settings.heatmap_dir(), name);
        self.data.save_to_file(&path)?;
        self.file_name = Some(name.to_string());
        Ok(path)
    }

    /// Save under a new name; fails if the file exists unless `overwrite` is set.
    /// On success the recorder follows the new file.
    pub fn save_as(&mut self, name: &str, overwrite: bool) -> Result<PathBuf, HeatmapError> {
        let path = heatmap_path(&self.settings.heatmap_dir(), name);
        if path.exists() && !overwrite {
            return Err(HeatmapError::AlreadyExists(path.display().to_string()));
        }
        let path = self.save(name)?;
        self.settings.file = Some(name.to_string());
        Ok(path)
    }

    /// Write the session back to the file it was loaded from
    pub fn append_session(&mut self) -> Result<PathBuf, HeatmapError> {
        let Some(name) = self.file_name.clone() else {
            return Err(HeatmapError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "heatmap has no file to append to",
            )));
        };
        self.save(&name)
    }

    /// Save to the AutoSave slot without changing the followed file
    pub fn autosave(&self) -> Result<PathBuf, HeatmapError> {
        let path = heatmap_path(&self.settings.heatmap_dir(), AUTOSAVE_NAME);
        self.data.save_to_file(&path)?;
        Ok(path)
    }
}
