//! # Mesh Errors
//!
//! Error types for mesh synthesis. Geometry failures are fatal: they
//! indicate a parameter defect, never a transient condition.

use puzzlebox_maze::MazeError;
use puzzlebox_scad::ScadError;
use thiserror::Error;

/// Errors that can occur during mesh synthesis.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A slice's point-handle history exceeded its preallocated capacity.
    /// Signals an unexpectedly tall maze for the allocated working
    /// storage.
    #[error("slice {slice} overflowed its point budget of {capacity}")]
    SliceOverflow { slice: usize, capacity: usize },

    /// A stitching step could not find a handle in the slice history.
    #[error("bad stitch on slice {slice}: {from} -> {to}")]
    Stitch { slice: usize, from: u32, to: u32 },

    /// Maze construction or validation failed.
    #[error(transparent)]
    Maze(#[from] MazeError),

    /// Script emission failed.
    #[error(transparent)]
    Scad(#[from] ScadError),
}
