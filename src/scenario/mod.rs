//! Scenario testing for the heatmap recorder
//!
//! A scenario describes a grid, a scripted list of subject samples and the
//! weights the grid should hold afterwards. Scenarios live as TOML files and
//! run against a `HeatmapRecorder` without any window or renderer.

pub mod assertions;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, check_expectations};
pub use parser::{
    ScenarioDefinition, ScenarioExpectations, ScenarioSetup, ScenarioStep, TileExpectation,
    discover_scenarios, load_scenario,
};
pub use runner::{ScenarioResult, ScenarioSummary, run_scenario, run_scenario_file};

/// Default path for scenario files
pub const SCENARIOS_DIR: &str = "tests/scenarios";
