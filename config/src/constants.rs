//! # Configuration Constants
//!
//! Centralized constants for the puzzle box generator. Maze carving biases,
//! coordinate scaling, mesh subdivision and the default physical dimensions
//! of a box are all defined here.
//!
//! ## Categories
//!
//! - **Scaling**: integer coordinate emission scale
//! - **Maze**: carve biases, complexity range, minimum grid size
//! - **Mesh**: angular subdivision, slice buffer headroom
//! - **Dimensions**: default physical parameters in millimetres

// =============================================================================
// SCALING CONSTANTS
// =============================================================================

/// Scale applied to all coordinates before integer emission.
///
/// Coordinates are multiplied by this factor and rounded to integers so the
/// emitted script carries no floating-point formatting artifacts. The whole
/// model is wrapped in a `scale()` statement that undoes this.
///
/// # Example
///
/// ```rust
/// use config::constants::COORDINATE_SCALE;
///
/// fn scaled(value: f64) -> i64 {
///     (value * COORDINATE_SCALE).round() as i64
/// }
///
/// assert_eq!(scaled(1.6), 1600);
/// ```
pub const COORDINATE_SCALE: f64 = 1000.0;

/// Inverse of [`COORDINATE_SCALE`] as emitted in the script's outer
/// `scale()` wrapper. Kept textual so the output is exact.
pub const COORDINATE_SCALE_INVERSE: &str = "0.001";

// =============================================================================
// MAZE CONSTANTS
// =============================================================================

/// Default carve bias for a leftward move.
///
/// The biases are deliberately asymmetric: favouring one horizontal
/// direction over the other, and down far over up, shapes the spiral growth
/// of the channel network. They are defaults for `DirectionBias`, not fixed
/// behavior.
pub const BIAS_LEFT: u32 = 2;

/// Default carve bias for a rightward move.
pub const BIAS_RIGHT: u32 = 1;

/// Default carve bias for an upward move.
pub const BIAS_UP: u32 = 1;

/// Default carve bias for a downward move.
pub const BIAS_DOWN: u32 = 4;

/// Modulus for the queue-insertion-side draw.
///
/// Each carve step draws a value reduced modulo this and compares it against
/// the complexity bias to decide front or back insertion into the frontier.
pub const COMPLEXITY_MODULUS: i32 = 10;

/// Lowest accepted maze complexity bias.
pub const COMPLEXITY_MIN: i32 = -10;

/// Highest accepted maze complexity bias.
pub const COMPLEXITY_MAX: i32 = 10;

/// Default maze complexity bias.
pub const DEFAULT_COMPLEXITY: i32 = 5;

/// Minimum usable maze width in cells.
///
/// Below this the cylinder cannot carry a channel network at all and maze
/// construction fails before any carving.
pub const MIN_MAZE_WIDTH: usize = 3;

// =============================================================================
// MESH CONSTANTS
// =============================================================================

/// Angular sub-slices per maze column.
///
/// Each maze column is subdivided into this many slices so wall thickness
/// and recess depth can vary within one column.
pub const SUB_SLICES: usize = 4;

/// Extra entries allowed in a slice's point-handle history beyond the
/// estimate derived from the part height. Exceeding the resulting capacity
/// is a hard error rather than a reallocation.
pub const SLICE_HEADROOM: usize = 10;

// =============================================================================
// DEFAULT DIMENSIONS (mm)
// =============================================================================

/// Default number of parts in a box.
pub const DEFAULT_PARTS: u32 = 2;

/// Default helix pitch (vertical cells shifted per horizontal wrap).
pub const DEFAULT_HELIX: i32 = 2;

/// Default content core diameter.
pub const DEFAULT_CORE_DIAMETER: f64 = 30.0;

/// Default content core height.
pub const DEFAULT_CORE_HEIGHT: f64 = 50.0;

/// Default extra gap above the core so content can be removed.
pub const DEFAULT_CORE_GAP: f64 = 0.0;

/// Default wall thickness.
pub const DEFAULT_WALL_THICKNESS: f64 = 1.2;

/// Default maze channel depth.
pub const DEFAULT_MAZE_THICKNESS: f64 = 2.0;

/// Default maze grid spacing.
pub const DEFAULT_MAZE_STEP: f64 = 3.0;

/// Default margin kept clear above the maze.
pub const DEFAULT_MAZE_MARGIN: f64 = 1.0;

/// Default general X/Y clearance between mating parts.
pub const DEFAULT_CLEARANCE: f64 = 0.4;

/// Default extra radial clearance for nubs. Should stay below the general
/// clearance; may be negative for a tighter fit.
pub const DEFAULT_NUB_R_CLEARANCE: f64 = 0.1;

/// Default extra vertical clearance for nubs, per quarter maze step.
pub const DEFAULT_NUB_Z_CLEARANCE: f64 = 0.2;

/// Default base height.
pub const DEFAULT_BASE_HEIGHT: f64 = 10.0;

/// Default base thickness.
pub const DEFAULT_BASE_THICKNESS: f64 = 1.6;

/// Default base vertical clearance.
pub const DEFAULT_BASE_GAP: f64 = 0.4;

/// Default thickness of the park ridge that clicks the box closed.
pub const DEFAULT_PARK_THICKNESS: f64 = 0.7;

/// Default number of flat outer sides (0 for round).
pub const DEFAULT_OUTER_SIDES: u32 = 7;

/// Default rounding radius on the outer ends.
pub const DEFAULT_OUTER_ROUND: f64 = 2.0;

/// Default grip ring depth.
pub const DEFAULT_GRIP_DEPTH: f64 = 1.5;
