//! # Puzzlebox SCAD
//!
//! OpenSCAD script emission for the puzzle box pipeline: a statement
//! writer with comment interleaving, scaled integer coordinates and a
//! buffered point-list/face-list polyhedron.
//!
//! ## Architecture
//!
//! ```text
//! puzzlebox-mesh (geometry) → puzzlebox-scad (script text)
//! ```
//!
//! All coordinates are pre-scaled by a fixed integer factor before text
//! emission to avoid floating-point formatting artifacts; the generator
//! wraps the model in a `scale()` statement that scales it back down.

pub mod error;
pub mod polyhedron;
pub mod script;

pub use error::ScadError;
pub use polyhedron::Polyhedron;
pub use script::{angle, scaled, ScadWriter};
