//! Scenario execution

use bevy::prelude::*;
use std::path::Path;

use super::assertions::{AssertionError, check_expectations};
use super::parser::{ScenarioDefinition, ScenarioSetup, load_scenario};
use crate::heatmap::{Channel, HeatmapData, HeatmapRecorder};
use crate::settings::HeatmapSettings;

/// What the grid held once every step had played
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub samples: u32,
    pub width: usize,
    pub height: usize,
    /// Linear maxima, indexed like `Channel::ALL`
    pub maxima: [f32; 3],
    /// Tiles with a non-zero weight, indexed like `Channel::ALL`
    pub visited: [usize; 3],
}

impl ScenarioSummary {
    fn of(data: &HeatmapData, samples: u32) -> Self {
        Self {
            samples,
            width: data.width(),
            height: data.height(),
            maxima: Channel::ALL.map(|c| data.max(c).linear()),
            visited: Channel::ALL.map(|c| data.visited_count(c)),
        }
    }

    pub fn max(&self, channel: Channel) -> f32 {
        self.maxima[channel as usize]
    }

    pub fn visited(&self, channel: Channel) -> usize {
        self.visited[channel as usize]
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub enum ScenarioResult {
    Pass { summary: ScenarioSummary },
    Fail {
        error: AssertionError,
        summary: ScenarioSummary,
    },
    Error { message: String },
}

impl ScenarioResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ScenarioResult::Pass { .. })
    }
}

fn settings_for(setup: &ScenarioSetup) -> HeatmapSettings {
    HeatmapSettings {
        origin: Vec2::from(setup.origin),
        pivot: Vec2::from(setup.pivot),
        size: Vec2::from(setup.size),
        division: Vec2::from(setup.division),
        interval: setup.interval,
        weight: setup.weight,
        file: None,
        autosave: false,
        ..Default::default()
    }
}

/// Build a fresh grid from the setup, play every step through the recorder,
/// then check the expectations
pub fn run_scenario(scenario: &ScenarioDefinition) -> ScenarioResult {
    let settings = settings_for(&scenario.setup);
    if let Err(e) = settings.validate() {
        return ScenarioResult::Error {
            message: format!("Invalid setup: {}", e),
        };
    }

    let mut recorder = match HeatmapRecorder::new(settings) {
        Ok(r) => r,
        Err(e) => {
            return ScenarioResult::Error {
                message: format!("Failed to build grid: {}", e),
            };
        }
    };

    let mut samples = 0;
    for step in &scenario.steps {
        let position = step.position.map(Vec2::from);
        for _ in 0..step.repeat {
            if recorder
                .tick(step.dt, position, step.shooting, step.running)
                .is_some()
            {
                samples += 1;
            }
        }
    }

    let summary = ScenarioSummary::of(recorder.data(), samples);
    match check_expectations(&scenario.expect, recorder.data(), samples) {
        Ok(()) => ScenarioResult::Pass { summary },
        Err(error) => ScenarioResult::Fail { error, summary },
    }
}

/// Load and run one scenario file; unreadable files are `Error`
pub fn run_scenario_file(path: &Path) -> ScenarioResult {
    match load_scenario(path) {
        Ok(scenario) => run_scenario(&scenario),
        Err(message) => ScenarioResult::Error { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(toml: &str) -> ScenarioResult {
        let def: ScenarioDefinition = toml::from_str(toml).unwrap();
        run_scenario(&def)
    }

    #[test]
    fn test_two_tile_walk() {
        let result = run(r#"
name = "Two tile walk"
[setup]
size = [2.0, 2.0]
division = [1.0, 1.0]
pivot = [0.5, 0.5]
interval = 1.0
weight = 1.0

[[steps]]
dt = 0.0
position = [-0.5, -0.5]

[[steps]]
dt = 1.0
position = [0.5, 0.5]

[expect]
samples = 2
max_position_weight = 1.0
visited_position_tiles = 2

[[expect.tiles]]
x = 0
y = 0
position = 1.0

[[expect.tiles]]
x = 1
y = 1
position = 1.0
"#);
        match result {
            ScenarioResult::Pass { summary } => {
                assert_eq!(summary.samples, 2);
                assert_eq!((summary.width, summary.height), (2, 2));
                assert_eq!(summary.max(Channel::Position), 1.0);
                assert_eq!(summary.visited(Channel::Position), 2);
                assert_eq!(summary.visited(Channel::Shooting), 0);
            }
            other => panic!("expected Pass, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_expectation_reports_fail() {
        let result = run(r#"
name = "Wrong max"
[setup]
size = [2.0, 2.0]
interval = 0.0

[[steps]]
dt = 0.1
position = [0.0, 0.0]
repeat = 4

[expect]
max_position_weight = 1.0
"#);
        match result {
            ScenarioResult::Fail { error, summary } => {
                assert_eq!(error.actual, "4");
                assert_eq!(summary.samples, 4);
                assert_eq!(summary.max(Channel::Position), 4.0);
            }
            other => panic!("expected Fail, got {:?}", other),
        }
    }

    #[test]
    fn test_bundled_scenarios_pass() {
        let base = Path::new(crate::scenario::SCENARIOS_DIR);
        let scenarios = crate::scenario::discover_scenarios(base, None);
        assert!(!scenarios.is_empty());
        for path in &scenarios {
            let result = run_scenario_file(path);
            assert!(result.is_pass(), "{}: {:?}", path.display(), result);
        }
    }

    #[test]
    fn test_invalid_setup_is_error() {
        let result = run(r#"
name = "Bad division"
[setup]
division = [0.0, 1.0]
"#);
        assert!(matches!(result, ScenarioResult::Error { .. }));
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let result = run_scenario_file(Path::new("tests/scenarios/missing.toml"));
        match result {
            ScenarioResult::Error { message } => assert!(message.contains("Failed to read")),
            other => panic!("expected Error, got {:?}", other),
        }
    }
}
