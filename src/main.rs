//! Headless heatmap recorder
//!
//! Runs a minimal Bevy app with a random-walking subject for a fixed amount of
//! simulated time and saves the resulting grid as a heatmap snapshot.
//!
//! Usage:
//!   cargo run                                   # 60s walk, default settings
//!   cargo run -- --seconds 300 --seed 7
//!   cargo run -- --settings config/arena.json --name Arena
//!   cargo run -- --append                       # add to the settings' file

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use heatgrid::heatmap::{HeatmapSubject, sample_heatmap_subjects, session_name};
use heatgrid::{HeatmapPlugin, HeatmapRecorder, HeatmapSettings};

/// Subject speed in world units per second
const WALK_SPEED: f32 = 1.5;
/// Speed multiplier while running
const RUN_MULTIPLIER: f32 = 2.5;
/// Chance per second of picking a new heading
const TURN_RATE: f64 = 0.8;
/// Chance per second of toggling shooting/running
const SHOOT_RATE: f64 = 0.3;
const RUN_RATE: f64 = 0.2;

struct RecordConfig {
    seconds: f32,
    fps: f32,
    seed: u64,
    settings_path: Option<String>,
    name: Option<String>,
    append: bool,
}

fn parse_args() -> RecordConfig {
    let mut config = RecordConfig {
        seconds: 60.0,
        fps: 60.0,
        seed: 0,
        settings_path: None,
        name: None,
        append: false,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" => {
                if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                    config.seconds = value;
                }
            }
            "--fps" => {
                if let Some(value) = args.next().and_then(|v| v.parse::<f32>().ok()) {
                    config.fps = value.max(1.0);
                }
            }
            "--seed" => {
                if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                    config.seed = value;
                }
            }
            "--settings" => config.settings_path = args.next(),
            "--name" => config.name = args.next(),
            "--append" => config.append = true,
            _ => {}
        }
    }

    config
}

/// Random walk state for the recorded subject
#[derive(Resource)]
struct Walk {
    rng: StdRng,
    heading: Vec2,
    /// Walk stays within origin +/- this
    extent: Vec2,
    origin: Vec2,
}

#[derive(Resource)]
struct RunControl {
    frames_left: u32,
    finished: bool,
}

fn spawn_subject(mut commands: Commands, walk: Res<Walk>) {
    commands.spawn((
        Transform::from_translation(walk.origin.extend(0.0)),
        HeatmapSubject::default(),
    ));
}

fn walk_subject(
    time: Res<Time>,
    mut walk: ResMut<Walk>,
    mut subjects: Query<(&mut Transform, &mut HeatmapSubject)>,
) {
    let dt = time.delta_secs();
    let Walk {
        rng,
        heading,
        extent,
        origin,
    } = &mut *walk;

    for (mut transform, mut subject) in &mut subjects {
        if rng.gen_bool((TURN_RATE * dt as f64).min(1.0)) {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            *heading = Vec2::from_angle(angle);
        }
        if rng.gen_bool((SHOOT_RATE * dt as f64).min(1.0)) {
            subject.is_shooting = !subject.is_shooting;
        }
        if rng.gen_bool((RUN_RATE * dt as f64).min(1.0)) {
            subject.is_running = !subject.is_running;
        }

        let speed = if subject.is_running {
            WALK_SPEED * RUN_MULTIPLIER
        } else {
            WALK_SPEED
        };
        let mut pos = transform.translation.truncate() + *heading * speed * dt;

        // Bounce off the walk area
        let min = *origin - *extent;
        let max = *origin + *extent;
        if pos.x < min.x || pos.x > max.x {
            heading.x = -heading.x;
            pos.x = pos.x.clamp(min.x, max.x);
        }
        if pos.y < min.y || pos.y > max.y {
            heading.y = -heading.y;
            pos.y = pos.y.clamp(min.y, max.y);
        }
        transform.translation = pos.extend(transform.translation.z);
    }
}

fn count_down_frames(mut control: ResMut<RunControl>, mut exit: MessageWriter<AppExit>) {
    if control.finished {
        return;
    }
    control.frames_left = control.frames_left.saturating_sub(1);
    if control.frames_left == 0 {
        control.finished = true;
        exit.write(AppExit::Success);
    }
}

fn main() {
    let config = parse_args();

    let settings = match &config.settings_path {
        Some(path) => match HeatmapSettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => HeatmapSettings::load(),
    };

    let step = Duration::from_secs_f32(1.0 / config.fps);
    let frames = (config.seconds * config.fps).ceil().max(1.0) as u32;

    println!("Heatgrid recorder");
    println!("=================");
    println!(
        "  {:.1}s at {} fps ({} frames), seed {}",
        config.seconds, config.fps, frames, config.seed
    );

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(step)),
        LogPlugin::default(),
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app.insert_resource(Walk {
        rng: StdRng::seed_from_u64(config.seed),
        heading: Vec2::X,
        extent: settings.size * 0.5,
        origin: settings.origin + (Vec2::splat(0.5) - settings.pivot) * settings.size,
    });
    app.insert_resource(RunControl {
        frames_left: frames,
        finished: false,
    });
    app.add_plugins(HeatmapPlugin::new(settings));
    app.add_systems(Startup, spawn_subject);
    app.add_systems(
        Update,
        (walk_subject.before(sample_heatmap_subjects), count_down_frames),
    );

    app.finish();
    app.cleanup();

    loop {
        app.update();
        if app.world().resource::<RunControl>().finished {
            break;
        }
    }

    let mut recorder = app.world_mut().resource_mut::<HeatmapRecorder>();
    let data = recorder.data();
    println!(
        "  {}x{} grid, max weights: position {}, shooting {}, running {}",
        data.width(),
        data.height(),
        data.max_position_weight(),
        data.max_shooting_weight(),
        data.max_running_weight()
    );

    let saved = if config.append {
        recorder.append_session()
    } else {
        let name = config.name.clone().unwrap_or_else(session_name);
        recorder.save_as(&name, false)
    };

    match saved {
        Ok(path) => println!("Saved heatmap to {}", path.display()),
        Err(e) => {
            eprintln!("Failed to save heatmap: {}", e);
            std::process::exit(1);
        }
    }
}
