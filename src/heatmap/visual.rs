//! Per-tile visual values: visibility, size and color for each channel

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::color::{ColorPoint, get_color};
use super::tile::{Channel, ChannelWeight};

/// Which weight fields drive the overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatmapScale {
    #[default]
    Linear,
    Log10,
}

impl HeatmapScale {
    pub fn pick(self, weight: ChannelWeight) -> f32 {
        match self {
            HeatmapScale::Linear => weight.linear(),
            HeatmapScale::Log10 => weight.log10(),
        }
    }
}

/// Whether color and size come from the cleanliness-scaled ratio or the raw weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    None,
    Color,
    Size,
    #[default]
    ColorAndSize,
}

impl Normalization {
    pub fn color(self) -> bool {
        matches!(self, Normalization::Color | Normalization::ColorAndSize)
    }

    pub fn size(self) -> bool {
        matches!(self, Normalization::Size | Normalization::ColorAndSize)
    }
}

/// Channels shown in the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub position: bool,
    pub shooting: bool,
    pub running: bool,
}

impl Default for Visualization {
    fn default() -> Self {
        Self {
            position: true,
            shooting: true,
            running: true,
        }
    }
}

impl Visualization {
    pub fn shows(&self, channel: Channel) -> bool {
        match channel {
            Channel::Position => self.position,
            Channel::Shooting => self.shooting,
            Channel::Running => self.running,
        }
    }
}

/// Comma-separated channel list, e.g. `"position,run"`; unlisted channels are hidden
impl std::str::FromStr for Visualization {
    type Err = String;

    fn from_str(list: &str) -> Result<Self, Self::Err> {
        let mut shown = Self {
            position: false,
            shooting: false,
            running: false,
        };
        for name in list.split(',').filter(|n| !n.trim().is_empty()) {
            match name.parse::<Channel>()? {
                Channel::Position => shown.position = true,
                Channel::Shooting => shown.shooting = true,
                Channel::Running => shown.running = true,
            }
        }
        Ok(shown)
    }
}

/// Inputs shared by every tile of one redraw
#[derive(Debug, Clone, Copy)]
pub struct VisualParams<'a> {
    pub scale: HeatmapScale,
    pub normalization: Normalization,
    pub cleanliness: f32,
    pub ramp: &'a [ColorPoint],
    /// Added to R, G and B on the subject's tile
    pub highlight: f32,
}

/// Renderable values for one channel of one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelVisual {
    pub weight: f32,
    pub ratio: f32,
    pub clean_ratio: f32,
    pub visible: bool,
    pub size: f32,
    pub color: LinearRgba,
}

/// Compute what a channel of a tile should look like.
///
/// A zero channel maximum makes `ratio` non-finite, which fails the
/// visibility gate, so freshly created grids draw nothing.
pub fn channel_visual(
    tile: ChannelWeight,
    max: ChannelWeight,
    size_multiplier: f32,
    highlighted: bool,
    params: &VisualParams<'_>,
) -> ChannelVisual {
    let weight = params.scale.pick(tile);
    let max = params.scale.pick(max);

    let ratio = weight / max;
    let min_weight = params.cleanliness * max;
    let clean_ratio = (weight - min_weight) / (max - min_weight);

    let visible = ratio > 0.0 && ratio >= params.cleanliness;

    let size = if params.normalization.size() {
        clean_ratio * size_multiplier
    } else {
        weight * size_multiplier
    };

    let progress = if params.normalization.color() {
        clean_ratio
    } else {
        weight
    };
    let mut color = get_color(Some(params.ramp), progress);
    if highlighted {
        color.red += params.highlight;
        color.green += params.highlight;
        color.blue += params.highlight;
    }

    ChannelVisual {
        weight,
        ratio,
        clean_ratio,
        visible,
        size,
        color,
    }
}

/// Shape multipliers configured for the overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeMultipliers {
    pub cube_height: f32,
    pub sphere_radius: f32,
    pub circle_radius: f32,
}

impl Default for ShapeMultipliers {
    fn default() -> Self {
        Self {
            cube_height: crate::constants::CUBE_HEIGHT_MULTIPLIER,
            sphere_radius: crate::constants::SPHERE_RADIUS_MULTIPLIER,
            circle_radius: crate::constants::CIRCLE_RADIUS_MULTIPLIER,
        }
    }
}

impl ShapeMultipliers {
    /// World-space size of a fully weighted shape for `channel`.
    /// Shooting and running shapes are capped by half the shorter tile side.
    pub fn for_channel(&self, channel: Channel, division: Vec2) -> f32 {
        let half_tile = 0.5 * division.x.min(division.y);
        match channel {
            Channel::Position => self.cube_height,
            Channel::Shooting => half_tile * self.sphere_radius,
            Channel::Running => half_tile * self.circle_radius,
        }
    }
}
