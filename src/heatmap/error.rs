//! Error type shared by the grid, snapshot and persistence code

use std::fmt;

/// Everything that can go wrong while building, addressing or persisting a heatmap
#[derive(Debug)]
pub enum HeatmapError {
    /// Negative (or non-finite) grid dimensions at construction
    InvalidDimension { width: i64, height: i64 },
    /// Tile lookup outside the grid
    OutOfRange {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// Decoded snapshot does not match its declared layout
    MalformedSnapshot(String),
    /// Target file exists and overwriting was not requested
    AlreadyExists(String),
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for HeatmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatmapError::InvalidDimension { width, height } => {
                write!(f, "invalid grid dimensions {}x{}", width, height)
            }
            HeatmapError::OutOfRange {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "tile ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
            HeatmapError::MalformedSnapshot(reason) => write!(f, "malformed snapshot: {}", reason),
            HeatmapError::AlreadyExists(path) => write!(f, "{} already exists", path),
            HeatmapError::Io(e) => write!(f, "I/O error: {}", e),
            HeatmapError::Parse(e) => write!(f, "failed to parse snapshot: {}", e),
        }
    }
}

impl std::error::Error for HeatmapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeatmapError::Io(e) => Some(e),
            HeatmapError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(e: std::io::Error) -> Self {
        HeatmapError::Io(e)
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(e: serde_json::Error) -> Self {
        HeatmapError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = HeatmapError::OutOfRange {
            x: 4,
            y: -1,
            width: 3,
            height: 3,
        };
        assert_eq!(err.to_string(), "tile (4, -1) is outside the 3x3 grid");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: HeatmapError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
