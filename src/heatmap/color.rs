//! Color ramp control points and piecewise-linear lookup

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One control point of a color ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPoint {
    /// Position along the ramp, normally 0.0-1.0
    pub progress: f32,
    #[serde(with = "rgba_serde")]
    pub color: LinearRgba,
}

impl ColorPoint {
    pub fn new(progress: f32, color: LinearRgba) -> Self {
        Self { progress, color }
    }
}

/// Default five-stop ramp (blue, cyan, green, yellow, red)
pub fn default_ramp() -> Vec<ColorPoint> {
    crate::constants::DEFAULT_RAMP
        .iter()
        .map(|&(progress, r, g, b, a)| ColorPoint::new(progress, LinearRgba::new(r, g, b, a)))
        .collect()
}

/// Component-wise lerp with the factor clamped to 0.0-1.0
pub fn lerp_color(from: LinearRgba, to: LinearRgba, t: f32) -> LinearRgba {
    let t = t.clamp(0.0, 1.0);
    LinearRgba::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}

fn try_lerp(from: &ColorPoint, to: &ColorPoint, progress: f32) -> Option<LinearRgba> {
    if progress <= from.progress || progress.is_nan() {
        return None;
    }
    let difference = to.progress - from.progress;
    let t = if difference == 0.0 {
        1.0
    } else {
        (progress - from.progress) / difference
    };
    Some(lerp_color(from.color, to.color, t))
}

/// Look up a color on the ramp.
///
/// Segments are scanned from the end of the list toward the start and the
/// first segment whose start lies below `progress` wins. Progress at or below
/// the first point yields the first point's color; an empty ramp is white.
pub fn get_color(points: Option<&[ColorPoint]>, progress: f32) -> LinearRgba {
    let Some(points) = points else {
        return LinearRgba::WHITE;
    };
    let Some(first) = points.first() else {
        return LinearRgba::WHITE;
    };

    points
        .windows(2)
        .rev()
        .find_map(|pair| try_lerp(&pair[0], &pair[1], progress))
        .unwrap_or(first.color)
}

/// Serialize colors as `[r, g, b, a]`
pub(crate) mod rgba_serde {
    use bevy::prelude::LinearRgba;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &LinearRgba, serializer: S) -> Result<S::Ok, S::Error> {
        [color.red, color.green, color.blue, color.alpha].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LinearRgba, D::Error> {
        let [r, g, b, a] = <[f32; 4]>::deserialize(deserializer)?;
        Ok(LinearRgba::new(r, g, b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: LinearRgba = LinearRgba::new(0.0, 0.0, 1.0, 1.0);
    const GREEN: LinearRgba = LinearRgba::new(0.0, 1.0, 0.0, 1.0);
    const RED: LinearRgba = LinearRgba::new(1.0, 0.0, 0.0, 1.0);

    fn assert_color_eq(actual: LinearRgba, expected: LinearRgba) {
        let a = [actual.red, actual.green, actual.blue, actual.alpha];
        let e = [expected.red, expected.green, expected.blue, expected.alpha];
        for (x, y) in a.iter().zip(e.iter()) {
            assert!((x - y).abs() < 1e-6, "expected {:?}, got {:?}", expected, actual);
        }
    }

    #[test]
    fn test_empty_or_missing_ramp_is_white() {
        let empty: [ColorPoint; 0] = [];
        assert_color_eq(get_color(None, 0.3), LinearRgba::WHITE);
        assert_color_eq(get_color(Some(&empty[..]), 0.3), LinearRgba::WHITE);
        assert_color_eq(get_color(Some(&empty[..]), -12.0), LinearRgba::WHITE);
    }

    #[test]
    fn test_single_point_always_wins() {
        let ramp = [ColorPoint::new(0.5, GREEN)];
        for p in [-1.0, 0.0, 0.5, 0.9, 10.0] {
            assert_color_eq(get_color(Some(&ramp[..]), p), GREEN);
        }
    }

    #[test]
    fn test_two_point_midpoint() {
        let ramp = [ColorPoint::new(0.0, BLUE), ColorPoint::new(1.0, RED)];
        assert_color_eq(
            get_color(Some(&ramp[..]), 0.5),
            LinearRgba::new(0.5, 0.0, 0.5, 1.0),
        );
    }

    #[test]
    fn test_picks_lower_segment_scanning_backward() {
        let ramp = [
            ColorPoint::new(0.0, BLUE),
            ColorPoint::new(0.5, GREEN),
            ColorPoint::new(1.0, RED),
        ];
        assert_color_eq(
            get_color(Some(&ramp[..]), 0.25),
            LinearRgba::new(0.0, 0.5, 0.5, 1.0),
        );
        assert_color_eq(
            get_color(Some(&ramp[..]), 0.75),
            LinearRgba::new(0.5, 0.5, 0.0, 1.0),
        );
    }

    #[test]
    fn test_below_first_point_uses_first_color() {
        let ramp = [ColorPoint::new(0.2, BLUE), ColorPoint::new(1.0, RED)];
        assert_color_eq(get_color(Some(&ramp[..]), 0.2), BLUE);
        assert_color_eq(get_color(Some(&ramp[..]), -5.0), BLUE);
    }

    #[test]
    fn test_above_last_point_clamps_to_last_color() {
        let ramp = [ColorPoint::new(0.0, BLUE), ColorPoint::new(1.0, RED)];
        assert_color_eq(get_color(Some(&ramp[..]), 3.0), RED);
    }

    #[test]
    fn test_duplicate_progress_jumps_to_target() {
        let ramp = [
            ColorPoint::new(0.0, BLUE),
            ColorPoint::new(0.5, GREEN),
            ColorPoint::new(0.5, RED),
        ];
        // Segment (0.5 -> 0.5) has zero width, so anything past 0.5 is the target color
        assert_color_eq(get_color(Some(&ramp[..]), 0.6), RED);
    }

    #[test]
    fn test_nan_progress_falls_back_to_first() {
        let ramp = default_ramp();
        assert_color_eq(get_color(Some(&ramp[..]), f32::NAN), ramp[0].color);
    }

    #[test]
    fn test_color_point_json_shape() {
        let point = ColorPoint::new(0.25, LinearRgba::new(0.0, 1.0, 1.0, 0.24));
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"progress":0.25,"color":[0.0,1.0,1.0,0.24]}"#);
        let back: ColorPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
