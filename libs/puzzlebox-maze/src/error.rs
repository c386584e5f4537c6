//! # Maze Errors
//!
//! Error types for maze construction and interchange parsing. All failures
//! are fatal for the current generation run: generation is deterministic
//! given fixed parameters and a fixed entropy stream, so any error indicates
//! a parameter or configuration defect rather than a transient condition.

use thiserror::Error;

/// Errors that can occur while building, loading or validating a maze.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Maze dimensions are infeasible for the requested physical parameters.
    #[error("maze too small: width {width}, height {height} (minimum width {minimum})")]
    Configuration {
        width: usize,
        height: usize,
        minimum: usize,
    },

    /// An externally supplied maze does not match the computed dimensions.
    #[error("maze {axis} mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        axis: &'static str,
        expected: usize,
        got: usize,
    },

    /// The entropy source could not supply random bytes.
    #[error("entropy source unreadable: {message}")]
    Entropy { message: String },

    /// Malformed maze interchange data.
    #[error("invalid maze data at line {line}: {message}")]
    Interchange { line: usize, message: String },
}

impl MazeError {
    /// Creates a configuration error for an infeasible grid.
    pub fn too_small(width: usize, height: usize) -> Self {
        Self::Configuration {
            width,
            height,
            minimum: config::constants::MIN_MAZE_WIDTH,
        }
    }

    /// Creates a dimension mismatch error for one axis.
    pub fn dimension_mismatch(axis: &'static str, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            axis,
            expected,
            got,
        }
    }

    /// Creates an entropy failure error.
    pub fn entropy(message: impl Into<String>) -> Self {
        Self::Entropy {
            message: message.into(),
        }
    }

    /// Creates an interchange parse error anchored to a 1-based line number.
    pub fn interchange(line: usize, message: impl Into<String>) -> Self {
        Self::Interchange {
            line,
            message: message.into(),
        }
    }
}
