//! # Puzzlebox Maze
//!
//! Cylindrical maze graph generation for the puzzle box pipeline.
//! Carves a connected passage network on a W×H grid wrapped around a
//! cylinder, optionally helical, under N-fold rotational-symmetry
//! constraints, then solves and renders it.
//!
//! ## Architecture
//!
//! ```text
//! parameters → builder (carve) → Maze → solve (analysis) → render
//!                                   ↘ interchange (load/store)
//! ```
//!
//! The mesh crate consumes the completed [`Maze`] through
//! [`Maze::probe`], the same topology fold the builder carves through.
//!
//! ## Usage
//!
//! ```rust
//! use puzzlebox_maze::{build_maze, analyze, ByteEntropy, MazeParams};
//!
//! let params = MazeParams::new(12, 6, 2, 2);
//! let mut entropy = ByteEntropy::repeating(vec![0x5A, 0x3C, 0x99, 0x01]);
//! let maze = build_maze(&params, |_, _| false, &mut entropy).unwrap();
//! let analysis = analyze(&maze);
//! let entrance = maze.entrance_x().unwrap();
//! assert!(analysis.reachable(entrance, 0));
//! assert_eq!(maze.exit_columns().count(), 2);
//! ```

pub mod builder;
pub mod cell;
pub mod entropy;
pub mod error;
pub mod interchange;
pub mod maze;
pub mod render;
pub mod solve;

pub use builder::{build_maze, DirectionBias, MazeParams};
pub use cell::{Cell, Direction, Passages};
pub use entropy::{ByteEntropy, EntropySource, OsEntropy};
pub use error::MazeError;
pub use interchange::InterchangeMaze;
pub use maze::{Face, Maze};
pub use render::render_report;
pub use solve::{analyze, Analysis, Mark};
