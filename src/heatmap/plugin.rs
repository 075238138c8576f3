//! Bevy integration: samples a tagged entity into the recorder every frame
//! and autosaves the grid when the app exits.

use bevy::prelude::*;

use super::data::HeatmapData;
use super::recorder::HeatmapRecorder;
use crate::settings::HeatmapSettings;

/// Entity whose position is recorded
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HeatmapSubject {
    pub is_shooting: bool,
    pub is_running: bool,
}

/// Entity the grid's pivot follows
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HeatmapAnchor;

/// Adds a [`HeatmapRecorder`] resource and the systems that feed it
#[derive(Default)]
pub struct HeatmapPlugin {
    pub settings: HeatmapSettings,
}

impl HeatmapPlugin {
    pub fn new(settings: HeatmapSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for HeatmapPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(build_recorder(&self.settings))
            .add_systems(
                Update,
                (follow_heatmap_anchor, sample_heatmap_subjects).chain(),
            )
            .add_systems(Last, autosave_on_exit);
    }
}

/// Recorder for `settings`. Falls back to a fresh grid when the configured
/// file can't be loaded, and to an empty one when no grid can be built.
fn build_recorder(settings: &HeatmapSettings) -> HeatmapRecorder {
    match HeatmapRecorder::new(settings.clone()) {
        Ok(recorder) => recorder,
        Err(e) => {
            warn!("Heatmap: {}, starting an empty grid", e);
            let mut fresh = settings.clone();
            fresh.file = None;
            HeatmapRecorder::new(fresh.clone()).unwrap_or_else(|e| {
                warn!("Heatmap: {}, grid disabled", e);
                HeatmapRecorder::with_data(fresh, HeatmapData::default())
            })
        }
    }
}

/// Keep the grid's pivot on the anchor entity
pub fn follow_heatmap_anchor(
    anchors: Query<&Transform, With<HeatmapAnchor>>,
    mut recorder: ResMut<HeatmapRecorder>,
) {
    if let Ok(transform) = anchors.single() {
        let origin = transform.translation.truncate();
        if recorder.settings.origin != origin {
            recorder.set_origin(origin);
        }
    }
}

/// Feed the first subject (if any) to the recorder's timer
pub fn sample_heatmap_subjects(
    time: Res<Time>,
    subjects: Query<(&Transform, &HeatmapSubject)>,
    mut recorder: ResMut<HeatmapRecorder>,
) {
    let (position, is_shooting, is_running) = match subjects.iter().next() {
        Some((transform, subject)) => (
            Some(transform.translation.truncate()),
            subject.is_shooting,
            subject.is_running,
        ),
        None => (None, false, false),
    };

    if let Some((x, y)) = recorder.tick(time.delta_secs(), position, is_shooting, is_running) {
        debug!("Heatmap: sampled tile ({}, {})", x, y);
    }
}

/// Write the AutoSave snapshot once an exit has been requested
pub fn autosave_on_exit(mut exits: MessageReader<AppExit>, recorder: Res<HeatmapRecorder>) {
    if exits.read().next().is_none() || !recorder.settings.autosave {
        return;
    }
    match recorder.autosave() {
        Ok(path) => info!("Heatmap autosaved to {}", path.display()),
        Err(e) => warn!("Heatmap autosave failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::tile::Channel;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn settings_2x2() -> HeatmapSettings {
        HeatmapSettings {
            size: Vec2::new(2.0, 2.0),
            division: Vec2::ONE,
            pivot: Vec2::splat(0.5),
            autosave: false,
            ..Default::default()
        }
    }

    fn test_app(settings: HeatmapSettings) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HeatmapPlugin::new(settings));
        app
    }

    #[test]
    fn test_plugin_samples_subject() {
        let mut app = test_app(settings_2x2());
        app.world_mut().spawn((
            Transform::from_xyz(-0.5, -0.5, 0.0),
            HeatmapSubject {
                is_shooting: true,
                is_running: false,
            },
        ));
        app.update();

        let recorder = app.world().resource::<HeatmapRecorder>();
        let tile = recorder.data().tile_at(0, 0).unwrap();
        assert_eq!(tile.position_weight(), 1.0);
        assert_eq!(tile.shooting_weight(), 1.0);
        assert_eq!(tile.running_weight(), 0.0);
        assert_eq!(recorder.subject_tile(), Some((0, 0)));
    }

    #[test]
    fn test_plugin_without_subject_records_nothing() {
        let mut app = test_app(settings_2x2());
        app.update();
        app.update();
        let recorder = app.world().resource::<HeatmapRecorder>();
        assert_eq!(recorder.data().visited_count(Channel::Position), 0);
    }

    #[test]
    fn test_anchor_moves_grid() {
        let mut app = test_app(settings_2x2());
        app.world_mut()
            .spawn((Transform::from_xyz(10.0, 0.0, 0.0), HeatmapAnchor));
        app.world_mut().spawn((
            Transform::from_xyz(10.5, 0.5, 0.0),
            HeatmapSubject::default(),
        ));
        app.update();

        let recorder = app.world().resource::<HeatmapRecorder>();
        assert_eq!(recorder.bounds().min, Vec2::new(9.0, -1.0));
        assert_eq!(recorder.subject_tile(), Some((1, 1)));
    }

    #[test]
    fn test_missing_file_falls_back_to_empty_grid() {
        let mut settings = settings_2x2();
        settings.file = Some("does_not_exist".to_string());
        settings.heatmap_dir = std::env::temp_dir()
            .join("heatgrid_plugin_missing")
            .display()
            .to_string();
        let app = test_app(settings);
        let recorder = app.world().resource::<HeatmapRecorder>();
        assert_eq!(recorder.data().width(), 2);
        assert_eq!(recorder.file_name(), None);
    }

    #[test]
    fn test_unallocatable_grid_disables_recording() {
        let mut settings = settings_2x2();
        settings.size = Vec2::splat(1e9);
        assert!(settings.validate().is_ok());

        let mut app = test_app(settings);
        app.world_mut()
            .spawn((Transform::default(), HeatmapSubject::default()));
        app.update();

        let recorder = app.world().resource::<HeatmapRecorder>();
        assert_eq!(recorder.data().tile_count(), 0);
        assert_eq!(recorder.subject_tile(), None);
    }

    #[test]
    fn test_autosave_on_exit() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("heatgrid_plugin_autosave_{}", nanos));
        let mut settings = settings_2x2();
        settings.autosave = true;
        settings.heatmap_dir = dir.display().to_string();

        let mut app = test_app(settings);
        app.add_systems(Update, |mut exit: MessageWriter<AppExit>| {
            exit.write(AppExit::Success);
        });
        app.update();

        assert!(dir.join("AutoSave.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
