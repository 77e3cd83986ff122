//! Error types for the simulation core.
//!
//! Running out of room for a move or an offspring is not an error; only
//! requests the grid can never satisfy are.

use ecogrid_data::Coord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Seed request asks for more entities than the grid has cells.
    #[error("Too many entities: requested {requested}, grid holds {capacity}")]
    TooManyEntities { requested: usize, capacity: usize },

    /// Grid sides outside `1..=max`.
    #[error("Invalid grid dimensions {rows}x{cols} (max {max}x{max})")]
    InvalidDimensions { rows: usize, cols: usize, max: usize },

    /// A direct placement outside the current grid.
    #[error("Coordinate {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds { coord: Coord, rows: usize, cols: usize },

    /// Configuration rejected by validation.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn too_many_entities(requested: usize, capacity: usize) -> Self {
        Self::TooManyEntities {
            requested,
            capacity,
        }
    }

    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

impl From<anyhow::Error> for SimError {
    fn from(e: anyhow::Error) -> Self {
        Self::Config(format!("{e:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::too_many_entities(226, 225);
        assert_eq!(
            err.to_string(),
            "Too many entities: requested 226, grid holds 225"
        );
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = SimError::OutOfBounds {
            coord: Coord::new(15, 0),
            rows: 15,
            cols: 15,
        };
        assert_eq!(err.to_string(), "Coordinate (15, 0) is outside the 15x15 grid");
    }

    #[test]
    fn test_from_anyhow() {
        let err: SimError = anyhow::anyhow!("rows too large").into();
        assert!(matches!(err, SimError::Config(ref m) if m.contains("rows too large")));
    }
}
