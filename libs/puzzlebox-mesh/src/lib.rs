//! # Puzzlebox Mesh
//!
//! Watertight mesh synthesis for the puzzle box pipeline. Converts carved
//! mazes from `puzzlebox-maze` into interlocking cylindrical parts and
//! emits them through `puzzlebox-scad` as a single solid-modeling script.
//!
//! ## Architecture
//!
//! ```text
//! BoxConfig → PartPlan → ShellPlan → build_shell (SliceTable)
//!                              ↘ build_park_ridge, build_nub
//! generate_script drives all parts and the layout.
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use puzzlebox_maze::ByteEntropy;
//! use puzzlebox_mesh::{generate_script, BoxConfig};
//!
//! let config = BoxConfig::default();
//! let mut entropy = ByteEntropy::repeating(vec![0x5A, 0x3C, 0x99, 0x01]);
//! let mut script = Vec::new();
//! generate_script(&config, &mut entropy, &mut script).unwrap();
//! assert!(!script.is_empty());
//! ```

pub mod error;
pub mod generate;
pub mod nub;
pub mod park;
pub mod params;
pub mod part;
pub mod shell;
mod slices;

pub use error::GeometryError;
pub use generate::{generate, generate_script};
pub use nub::{build_nub, NubPlan};
pub use park::build_park_ridge;
pub use params::{BoxConfig, NubOrigin};
pub use part::{emit_part, MazeSource, PartPlan, PartRoles};
pub use shell::{build_shell, ShellPlan};
