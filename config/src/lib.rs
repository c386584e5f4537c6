//! # Config Crate
//!
//! Centralized configuration constants for the puzzle box generator.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{COORDINATE_SCALE, SUB_SLICES};
//!
//! // Coordinates are emitted as integers, pre-multiplied by the scale
//! let scaled = (1.2_f64 * COORDINATE_SCALE).round() as i64;
//! assert_eq!(scaled, 1200);
//!
//! // Every maze column is split into angular sub-slices for meshing
//! assert_eq!(SUB_SLICES, 4);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Tunable Heuristics As Data**: carve biases are defaults, not law
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
