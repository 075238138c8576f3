//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;

/// Complete scenario from a TOML file
#[derive(Debug, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: ScenarioSetup,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
    #[serde(default)]
    pub expect: ScenarioExpectations,
}

/// Grid placement and sampling parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScenarioSetup {
    pub size: [f32; 2],
    pub division: [f32; 2],
    pub pivot: [f32; 2],
    pub origin: [f32; 2],
    pub interval: f32,
    pub weight: f32,
}

impl Default for ScenarioSetup {
    fn default() -> Self {
        Self {
            size: [DEFAULT_GRID_SIZE.x, DEFAULT_GRID_SIZE.y],
            division: [DEFAULT_DIVISION.x, DEFAULT_DIVISION.y],
            pivot: [DEFAULT_PIVOT.x, DEFAULT_PIVOT.y],
            origin: [0.0, 0.0],
            interval: DEFAULT_INTERVAL,
            weight: DEFAULT_WEIGHT,
        }
    }
}

/// One or more recorder ticks with the same subject state
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioStep {
    #[serde(default)]
    pub dt: f32,
    /// Subject world position, None = no subject this tick
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub shooting: bool,
    #[serde(default)]
    pub running: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

/// Expected grid contents after all steps
#[derive(Debug, Default, Deserialize)]
pub struct ScenarioExpectations {
    pub samples: Option<u32>,
    pub max_position_weight: Option<f32>,
    pub max_shooting_weight: Option<f32>,
    pub max_running_weight: Option<f32>,
    /// Tiles with a non-zero position weight
    pub visited_position_tiles: Option<usize>,
    pub visited_shooting_tiles: Option<usize>,
    pub visited_running_tiles: Option<usize>,
    /// Uses [[expect.tiles]] TOML syntax
    #[serde(default)]
    pub tiles: Vec<TileExpectation>,
}

/// Expected weights of one tile; unset channels are not checked
#[derive(Debug, Clone, Deserialize)]
pub struct TileExpectation {
    pub x: i32,
    pub y: i32,
    pub position: Option<f32>,
    pub shooting: Option<f32>,
    pub running: Option<f32>,
}

/// Parse a scenario file from path
pub fn load_scenario(path: &Path) -> Result<ScenarioDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Every `.toml` file under `base`, sorted so categories stay together.
/// `filter` keeps paths (relative to `base`) that contain it, e.g. `"grid/"`.
pub fn discover_scenarios(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut dirs = vec![base.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                dirs.push(path);
            } else if path.extension().is_some_and(|e| e == "toml") {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
                if filter.is_none_or(|f| rel.contains(f)) {
                    found.push(path);
                }
            }
        }
    }
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Corner"
[setup]
size = [4.0, 2.0]
interval = 0.0

[[steps]]
dt = 0.1
position = [0.5, 0.5]
shooting = true
repeat = 3

[[steps]]
dt = 0.1

[expect]
max_position_weight = 3.0

[[expect.tiles]]
x = 2
y = 1
shooting = 3.0
"#;
        let def: ScenarioDefinition = toml::from_str(toml).unwrap();
        assert_eq!(def.name, "Corner");
        assert_eq!(def.setup.size, [4.0, 2.0]);
        assert_eq!(def.setup.division, [1.0, 1.0]);
        assert_eq!(def.steps.len(), 2);
        assert_eq!(def.steps[0].repeat, 3);
        assert!(def.steps[1].position.is_none());
        assert_eq!(def.steps[1].repeat, 1);
        assert_eq!(def.expect.tiles[0].shooting, Some(3.0));
        assert_eq!(def.expect.tiles[0].position, None);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let def: ScenarioDefinition = toml::from_str("name = \"Empty\"").unwrap();
        assert!(def.steps.is_empty());
        assert_eq!(def.setup.weight, DEFAULT_WEIGHT);
        assert!(def.expect.max_position_weight.is_none());
    }

    #[test]
    fn test_discover_bundled_scenarios() {
        let base = Path::new(crate::scenario::SCENARIOS_DIR);
        let all = discover_scenarios(base, None);
        assert!(all.len() >= 5);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));

        let grid = discover_scenarios(base, Some("grid/"));
        assert!(!grid.is_empty());
        assert!(grid.iter().all(|p| p.starts_with(base.join("grid"))));
        assert!(discover_scenarios(base, Some("no_such_scenario")).is_empty());
        assert!(discover_scenarios(Path::new("tests/missing_dir"), None).is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_scenario(Path::new("tests/scenarios/nope.toml")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
