//! # Box Parameters
//!
//! The full physical parameter set for one box, with the normalization
//! pass that resolves parameter interactions before any geometry is
//! derived. Tolerances are parameters here, never derived.

use serde::{Deserialize, Serialize};

use config::constants::*;

/// Where the nubs sit rotationally relative to the maze exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NubOrigin {
    /// Drawn from the random source; obscures the solution entry.
    #[default]
    Random,
    /// Fixed opposite the first maze's exit, for deterministic reassembly.
    OppositeExit,
    /// Equal to the maze's own exit angle; self-aligning.
    ExitAligned,
}

/// Physical and behavioral parameters for one generated box.
///
/// Defaults match a printable two-part box. Dimensions are millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoxConfig {
    /// Total number of nested parts.
    pub parts: u32,
    /// Core diameter for content.
    pub core_diameter: f64,
    /// Core height for content.
    pub core_height: f64,
    /// Extra gap above the core so content can be removed.
    pub core_gap: f64,
    /// Core is solid; content goes in part 2.
    pub core_solid: bool,
    /// Wall thickness.
    pub wall_thickness: f64,
    /// Maze channel depth.
    pub maze_thickness: f64,
    /// Maze grid spacing.
    pub maze_step: f64,
    /// Margin kept clear above the maze.
    pub maze_margin: f64,
    /// Queue-insertion bias, -10 to 10.
    pub maze_complexity: i32,
    /// General X/Y clearance between mating parts.
    pub clearance: f64,
    /// Extra radial clearance for nubs.
    pub nub_r_clearance: f64,
    /// Extra vertical clearance for nubs, per quarter maze step.
    pub nub_z_clearance: f64,
    /// Nub circumferential size multiplier.
    pub nub_horizontal: f64,
    /// Nub height size multiplier.
    pub nub_vertical: f64,
    /// Nub radial depth size multiplier.
    pub nub_normal: f64,
    /// Nub rotational origin.
    pub nub_origin: NubOrigin,
    /// Nubs per mating surface; also the rotational symmetry order.
    pub nubs: usize,
    /// Vertical cell shift per horizontal wrap (0 for non-helical).
    pub helix: i32,
    /// Base height.
    pub base_height: f64,
    /// Base thickness.
    pub base_thickness: f64,
    /// Base vertical clearance.
    pub base_gap: f64,
    /// Inside base full width.
    pub base_wide: bool,
    /// Thickness of the park ridge that clicks the box closed.
    pub park_thickness: f64,
    /// Park vertically instead of sideways.
    pub park_vertical: bool,
    /// Maze on the inside of each part (harder to solve).
    pub inside: bool,
    /// Alternate the maze between inside and outside per part.
    pub flip: bool,
    /// Clockwise lock on inside mazes.
    pub mirror_inside: bool,
    /// Number of flat outer sides, 0 for round.
    pub outer_sides: u32,
    /// Rounding on the outer ends.
    pub outer_round: f64,
    /// Grip ring depth.
    pub grip_depth: f64,
    /// Symmetric maze cut (no draft skew on the channel).
    pub symmetric_cut: bool,
    /// Emit the test pattern instead of a maze.
    pub test_maze: bool,
    /// Suppress the "A" signature at the park point.
    pub no_signature: bool,
    /// Halve all clearances for resin printing.
    pub resin: bool,
}

impl Default for BoxConfig {
    fn default() -> Self {
        BoxConfig {
            parts: DEFAULT_PARTS,
            core_diameter: DEFAULT_CORE_DIAMETER,
            core_height: DEFAULT_CORE_HEIGHT,
            core_gap: DEFAULT_CORE_GAP,
            core_solid: false,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            maze_thickness: DEFAULT_MAZE_THICKNESS,
            maze_step: DEFAULT_MAZE_STEP,
            maze_margin: DEFAULT_MAZE_MARGIN,
            maze_complexity: DEFAULT_COMPLEXITY,
            clearance: DEFAULT_CLEARANCE,
            nub_r_clearance: DEFAULT_NUB_R_CLEARANCE,
            nub_z_clearance: DEFAULT_NUB_Z_CLEARANCE,
            nub_horizontal: 1.0,
            nub_vertical: 1.0,
            nub_normal: 1.0,
            nub_origin: NubOrigin::Random,
            nubs: DEFAULT_HELIX as usize,
            helix: DEFAULT_HELIX,
            base_height: DEFAULT_BASE_HEIGHT,
            base_thickness: DEFAULT_BASE_THICKNESS,
            base_gap: DEFAULT_BASE_GAP,
            base_wide: false,
            park_thickness: DEFAULT_PARK_THICKNESS,
            park_vertical: false,
            inside: false,
            flip: false,
            mirror_inside: false,
            outer_sides: DEFAULT_OUTER_SIDES,
            outer_round: DEFAULT_OUTER_ROUND,
            grip_depth: DEFAULT_GRIP_DEPTH,
            symmetric_cut: false,
            test_maze: false,
            no_signature: false,
            resin: false,
        }
    }
}

impl BoxConfig {
    /// Resolves parameter interactions. Called once before geometry is
    /// derived; emitting from an unnormalized config is a caller bug.
    pub fn normalized(mut self) -> BoxConfig {
        if self.resin {
            self.base_gap /= 2.0;
            self.clearance /= 2.0;
            self.nub_r_clearance /= 2.0;
            self.nub_z_clearance /= 2.0;
        }
        self.parts = self.parts.max(1);
        self.nubs = self.nubs.max(1);
        // A helical maze needs the nub count to divide into the helix so
        // symmetric copies land on the same thread.
        if self.helix != 0 && self.nubs > 1 && self.nubs < self.helix as usize {
            if self.helix % 2 == 0 && self.nubs <= self.helix as usize / 2 {
                self.nubs = self.helix as usize / 2;
            } else {
                self.nubs = self.helix as usize;
            }
        }
        if self.helix != 0 && self.nubs > self.helix as usize {
            self.nubs = self.helix as usize;
        }
        if self.grip_depth > (self.base_height - self.outer_round) / 5.0 {
            self.grip_depth = (self.base_height - self.outer_round) / 5.0;
        }
        if self.grip_depth > self.maze_thickness {
            self.grip_depth = self.maze_thickness;
        }
        if self.core_solid && self.core_gap < self.maze_step * 2.0 {
            self.core_gap = self.maze_step * 2.0;
        }
        self.maze_complexity = self.maze_complexity.clamp(COMPLEXITY_MIN, COMPLEXITY_MAX);
        self
    }

    /// Draft skew applied to the channel recess so parts release.
    pub(crate) fn nub_skew(&self) -> f64 {
        if self.symmetric_cut {
            0.0
        } else {
            self.maze_step / 8.0
        }
    }

    /// An alignment mark is needed when the flat sides don't divide evenly
    /// among the nubs.
    pub(crate) fn mark_position_zero(&self) -> bool {
        self.outer_sides != 0 && self.outer_sides % self.nubs as u32 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_normalization() {
        let normalized = BoxConfig::default().normalized();
        assert_eq!(normalized.nubs, 2);
        assert_eq!(normalized.clearance, DEFAULT_CLEARANCE);
    }

    #[test]
    fn test_resin_halves_clearances() {
        let config = BoxConfig {
            resin: true,
            ..BoxConfig::default()
        }
        .normalized();
        assert_eq!(config.clearance, DEFAULT_CLEARANCE / 2.0);
        assert_eq!(config.base_gap, DEFAULT_BASE_GAP / 2.0);
        assert_eq!(config.nub_r_clearance, DEFAULT_NUB_R_CLEARANCE / 2.0);
        assert_eq!(config.nub_z_clearance, DEFAULT_NUB_Z_CLEARANCE / 2.0);
    }

    #[test]
    fn test_nubs_clamped_to_helix() {
        let config = BoxConfig {
            helix: 2,
            nubs: 5,
            ..BoxConfig::default()
        }
        .normalized();
        assert_eq!(config.nubs, 2);
    }

    #[test]
    fn test_small_nub_count_rounds_to_half_helix() {
        let config = BoxConfig {
            helix: 4,
            nubs: 2,
            ..BoxConfig::default()
        }
        .normalized();
        assert_eq!(config.nubs, 2);
        let config = BoxConfig {
            helix: 4,
            nubs: 3,
            ..BoxConfig::default()
        }
        .normalized();
        assert_eq!(config.nubs, 4);
    }

    #[test]
    fn test_grip_depth_clamped() {
        let config = BoxConfig {
            grip_depth: 10.0,
            ..BoxConfig::default()
        }
        .normalized();
        assert!(config.grip_depth <= (config.base_height - config.outer_round) / 5.0);
    }

    #[test]
    fn test_core_solid_forces_gap() {
        let config = BoxConfig {
            core_solid: true,
            core_gap: 0.0,
            ..BoxConfig::default()
        }
        .normalized();
        assert_eq!(config.core_gap, config.maze_step * 2.0);
    }

    #[test]
    fn test_symmetric_cut_removes_skew() {
        let config = BoxConfig {
            symmetric_cut: true,
            ..BoxConfig::default()
        };
        assert_eq!(config.nub_skew(), 0.0);
        assert_eq!(BoxConfig::default().nub_skew(), 3.0 / 8.0);
    }

    #[test]
    fn test_mark_needed_when_sides_not_divisible() {
        // 7 sides over 2 nubs needs the alignment mark
        assert!(BoxConfig::default().normalized().mark_position_zero());
        let round = BoxConfig {
            outer_sides: 0,
            ..BoxConfig::default()
        };
        assert!(!round.mark_position_zero());
    }
}
