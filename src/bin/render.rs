//! Heatmap renderer
//!
//! Rasterizes a saved heatmap into a top-down PNG using the overlay settings:
//! position as filled tiles, shooting as filled discs, running as rings, with
//! grid lines on top.
//!
//! Usage:
//!   cargo run --bin render                      # the AutoSave snapshot
//!   cargo run --bin render -- Arena --settings config/arena.json --ppu 96
//!   cargo run --bin render -- Arena --out showcase/arena.png
//!   cargo run --bin render -- Arena --channels position,shooting

use bevy::prelude::{LinearRgba, Srgba, Vec2};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
    draw_line_segment_mut,
};
use imageproc::rect::Rect;
use std::path::PathBuf;

use heatgrid::heatmap::{ShapeKind, heatmap_path};
use heatgrid::Visualization;
use heatgrid::{AUTOSAVE_NAME, HeatmapData, HeatmapRecorder, HeatmapSettings, RenderFrame};

const BACKGROUND: Rgba<u8> = Rgba([24, 24, 28, 255]);
/// Empty border around the grid, in pixels
const MARGIN: u32 = 16;

struct RenderConfig {
    name: String,
    settings_path: Option<String>,
    pixels_per_unit: f32,
    output: Option<PathBuf>,
    /// Overrides the settings' visualization
    channels: Option<Visualization>,
}

fn parse_args() -> Result<RenderConfig, String> {
    let mut name = None;
    let mut channels = None;
    let mut settings_path = None;
    let mut pixels_per_unit = 64.0;
    let mut output = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => settings_path = args.next(),
            "--ppu" => {
                if let Some(value) = args.next().and_then(|v| v.parse::<f32>().ok()) {
                    pixels_per_unit = value.max(1.0);
                }
            }
            "--out" => output = args.next().map(PathBuf::from),
            "--channels" => {
                let list = args.next().unwrap_or_default();
                channels = Some(list.parse::<Visualization>()?);
            }
            other if !other.starts_with('-') => name = Some(other.to_string()),
            _ => {}
        }
    }

    Ok(RenderConfig {
        name: name.unwrap_or_else(|| AUTOSAVE_NAME.to_string()),
        settings_path,
        pixels_per_unit,
        output,
        channels,
    })
}

/// Convert an overlay color to 8-bit sRGB, keeping alpha
fn to_pixel(color: LinearRgba) -> Rgba<u8> {
    let srgb = Srgba::from(color);
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        channel(srgb.red),
        channel(srgb.green),
        channel(srgb.blue),
        channel(srgb.alpha),
    ])
}

/// Maps world coordinates (y up) to image pixels (y down)
struct Projection {
    min: Vec2,
    max: Vec2,
    pixels_per_unit: f32,
}

impl Projection {
    fn point(&self, world: Vec2) -> (f32, f32) {
        (
            (world.x - self.min.x) * self.pixels_per_unit + MARGIN as f32,
            (self.max.y - world.y) * self.pixels_per_unit + MARGIN as f32,
        )
    }

    fn length(&self, world: f32) -> f32 {
        world * self.pixels_per_unit
    }
}

fn render(frame: &RenderFrame, pixels_per_unit: f32) -> RgbaImage {
    let width = (frame.bounds.size.x * pixels_per_unit).ceil().max(1.0) as u32 + 2 * MARGIN;
    let height = (frame.bounds.size.y * pixels_per_unit).ceil().max(1.0) as u32 + 2 * MARGIN;
    let projection = Projection {
        min: frame.bounds.min,
        max: frame.bounds.max(),
        pixels_per_unit,
    };

    let mut canvas = Blend(RgbaImage::from_pixel(width, height, BACKGROUND));
    let tile_w = projection.length(frame.bounds.division.x).max(1.0) as u32;
    let tile_h = projection.length(frame.bounds.division.y).max(1.0) as u32;

    for tile in &frame.tiles {
        let (cx, cy) = projection.point(tile.center);
        for channel in &tile.channels {
            let radius = projection.length(channel.size);
            if !radius.is_finite() || radius < 0.0 {
                continue;
            }
            match channel.shape {
                // Height can't be shown top-down; the tile is filled instead
                ShapeKind::Box => {
                    let x = (cx - tile_w as f32 * 0.5).round() as i32;
                    let y = (cy - tile_h as f32 * 0.5).round() as i32;
                    draw_filled_rect_mut(
                        &mut canvas,
                        Rect::at(x, y).of_size(tile_w, tile_h),
                        to_pixel(channel.fill),
                    );
                }
                ShapeKind::Sphere => draw_filled_circle_mut(
                    &mut canvas,
                    (cx.round() as i32, cy.round() as i32),
                    radius.round() as i32,
                    to_pixel(channel.fill),
                ),
                ShapeKind::Disc => draw_hollow_circle_mut(
                    &mut canvas,
                    (cx.round() as i32, cy.round() as i32),
                    radius.round() as i32,
                    to_pixel(channel.outline),
                ),
            }
        }
    }

    let grid_color = to_pixel(frame.grid_color);
    for &(from, to) in &frame.grid_lines {
        draw_line_segment_mut(
            &mut canvas,
            projection.point(from),
            projection.point(to),
            grid_color,
        );
    }

    canvas.0
}

fn main() {
    let config = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut settings = match &config.settings_path {
        Some(path) => match HeatmapSettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => HeatmapSettings::load(),
    };

    if let Some(channels) = config.channels {
        settings.render.visualization = channels;
    }

    let input = heatmap_path(&settings.heatmap_dir(), &config.name);
    let data = match HeatmapData::load_from_file(&input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to load {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };

    let recorder = HeatmapRecorder::with_data(settings, data);
    let frame = recorder.snapshot_for_render();
    println!(
        "Rendering {} ({}x{} tiles, {} drawn)",
        config.name,
        recorder.data().width(),
        recorder.data().height(),
        frame.tiles.len()
    );

    let image = render(&frame, config.pixels_per_unit);
    let output = config
        .output
        .unwrap_or_else(|| input.with_extension("png"));
    if let Some(parent) = output.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        eprintln!("Failed to create {}: {}", parent.display(), e);
        std::process::exit(1);
    }
    if let Err(e) = image.save(&output) {
        eprintln!("Failed to save {}: {}", output.display(), e);
        std::process::exit(1);
    }
    println!("Saved {}", output.display());
}
