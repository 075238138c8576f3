//! Assertion checking for scenario expectations

use super::parser::{ScenarioExpectations, TileExpectation};
use crate::heatmap::{Channel, HeatmapData};

/// Weights are compared with this absolute tolerance
const WEIGHT_TOLERANCE: f32 = 1e-4;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
    /// Grid coordinates of the tile that failed, for per-tile expectations
    pub tile: Option<(i32, i32)>,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

impl std::error::Error for AssertionError {}

fn check_weight(message: String, expected: f32, actual: f32) -> Result<(), AssertionError> {
    if (expected - actual).abs() <= WEIGHT_TOLERANCE {
        return Ok(());
    }
    Err(AssertionError {
        message,
        expected: format!("{}", expected),
        actual: format!("{}", actual),
        tile: None,
    })
}

fn check_tile(data: &HeatmapData, exp: &TileExpectation) -> Result<(), AssertionError> {
    let tile = data.tile_at(exp.x, exp.y).map_err(|e| AssertionError {
        message: format!("Tile ({}, {}) not in grid", exp.x, exp.y),
        expected: format!("tile inside {}x{}", data.width(), data.height()),
        actual: e.to_string(),
        tile: Some((exp.x, exp.y)),
    })?;

    let checks = [
        (Channel::Position, exp.position),
        (Channel::Shooting, exp.shooting),
        (Channel::Running, exp.running),
    ];
    for (channel, expected) in checks {
        if let Some(expected) = expected {
            check_weight(
                format!("Tile ({}, {}) {} weight", exp.x, exp.y, channel.label()),
                expected,
                tile.channel(channel).linear(),
            )
            .map_err(|e| AssertionError {
                tile: Some((exp.x, exp.y)),
                ..e
            })?;
        }
    }
    Ok(())
}

/// Check the grid (and sample count) against every expectation that is set
pub fn check_expectations(
    expect: &ScenarioExpectations,
    data: &HeatmapData,
    samples: u32,
) -> Result<(), AssertionError> {
    if let Some(expected) = expect.samples
        && expected != samples
    {
        return Err(AssertionError {
            message: "Sample count".to_string(),
            expected: format!("{} samples", expected),
            actual: format!("{} samples", samples),
            tile: None,
        });
    }

    let maxima = [
        (Channel::Position, expect.max_position_weight),
        (Channel::Shooting, expect.max_shooting_weight),
        (Channel::Running, expect.max_running_weight),
    ];
    for (channel, expected) in maxima {
        if let Some(expected) = expected {
            check_weight(
                format!("Max {} weight", channel.label()),
                expected,
                data.max(channel).linear(),
            )?;
        }
    }

    let visited = [
        (Channel::Position, expect.visited_position_tiles),
        (Channel::Shooting, expect.visited_shooting_tiles),
        (Channel::Running, expect.visited_running_tiles),
    ];
    for (channel, expected) in visited {
        if let Some(expected) = expected {
            let actual = data.visited_count(channel);
            if actual != expected {
                return Err(AssertionError {
                    message: format!("Tiles with {} weight", channel.label()),
                    expected: format!("{} tiles", expected),
                    actual: format!("{} tiles", actual),
                    tile: None,
                });
            }
        }
    }

    for tile in &expect.tiles {
        check_tile(data, tile)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> HeatmapData {
        let mut data = HeatmapData::new(2, 2).unwrap();
        data.add_position_weight(0, 0, 2.0).unwrap();
        data.add_shooting_weight(0, 0, 1.0).unwrap();
        data
    }

    #[test]
    fn test_matching_expectations_pass() {
        let expect = ScenarioExpectations {
            samples: Some(2),
            max_position_weight: Some(2.0),
            visited_shooting_tiles: Some(1),
            tiles: vec![TileExpectation {
                x: 0,
                y: 0,
                position: Some(2.0),
                shooting: Some(1.0),
                running: Some(0.0),
            }],
            ..Default::default()
        };
        assert!(check_expectations(&expect, &grid(), 2).is_ok());
    }

    #[test]
    fn test_wrong_maximum_fails() {
        let expect = ScenarioExpectations {
            max_position_weight: Some(3.0),
            ..Default::default()
        };
        let err = check_expectations(&expect, &grid(), 0).unwrap_err();
        assert_eq!(err.message, "Max position weight");
        assert_eq!(err.actual, "2");
        assert_eq!(err.tile, None);
    }

    #[test]
    fn test_wrong_tile_weight_names_tile() {
        let expect = ScenarioExpectations {
            tiles: vec![TileExpectation {
                x: 0,
                y: 0,
                position: Some(2.0),
                shooting: Some(3.0),
                running: None,
            }],
            ..Default::default()
        };
        let err = check_expectations(&expect, &grid(), 0).unwrap_err();
        assert_eq!(err.tile, Some((0, 0)));
        assert_eq!(err.message, "Tile (0, 0) shooting weight");
    }

    #[test]
    fn test_tile_outside_grid_fails() {
        let expect = ScenarioExpectations {
            tiles: vec![TileExpectation {
                x: 5,
                y: 0,
                position: None,
                shooting: None,
                running: None,
            }],
            ..Default::default()
        };
        let err = check_expectations(&expect, &grid(), 0).unwrap_err();
        assert!(err.message.contains("not in grid"));
        assert_eq!(err.tile, Some((5, 0)));
    }
}
