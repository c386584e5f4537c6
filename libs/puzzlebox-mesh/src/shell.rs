//! # Shell Builder
//!
//! Emits a single watertight solid for one cylindrical maze shell: floor,
//! walls and open channel combined. Each maze column carries four angular
//! sub-slices; each usable cell contributes sixteen points (two surface
//! layers bounding the channel, two recessed layers forming its floor),
//! and faces are produced through [`SliceTable`] stitching so the solid
//! stays manifold despite cells of differing vertical profiles.
//!
//! Cell usability runs through [`Maze::probe`], the same symmetry fold the
//! carver used, so rotational copies render identically.

use glam::DVec2;
use tracing::info;

use puzzlebox_maze::builder::MazeParams;
use puzzlebox_maze::{Direction, Face, Maze};
use puzzlebox_scad::{scaled, Polyhedron};

use crate::error::GeometryError;
use crate::params::BoxConfig;
use crate::slices::{Handle, SliceTable, LAYER_BACK, LAYER_RECESS, LAYER_SURFACE};

/// Geometry plan for one maze shell: grid dimensions derived from the
/// physical parameters, vertical band, and the radii of the three slice
/// layers.
#[derive(Debug, Clone)]
pub struct ShellPlan {
    pub face: Face,
    /// Maze surface radius.
    pub radius: f64,
    /// Grid width, divisible by the nub count.
    pub width: usize,
    /// Grid height including margin rows.
    pub height: usize,
    pub helix: i32,
    pub nubs: usize,
    pub maze_step: f64,
    pub maze_margin: f64,
    pub wall_thickness: f64,
    pub maze_thickness: f64,
    pub clearance: f64,
    /// Vertical offset where the maze band starts.
    pub base: f64,
    /// Z of grid row 0 at column 0.
    pub y0: f64,
    /// Total part height.
    pub part_height: f64,
    pub base_thickness: f64,
    /// Draft skew on the recessed channel layers.
    pub nub_skew: f64,
    /// Run the top surface ring flush to the part top instead of leaving
    /// the margin (wide-base outside shells above the first part).
    pub top_flush: bool,
    /// This shell belongs to the outermost part.
    pub outermost: bool,
    /// Emit mirrored (clockwise inside lock).
    pub mirror: bool,
    pub park_vertical: bool,
    pub park_thickness: f64,
}

impl ShellPlan {
    /// Derives the shell plan for one part from the box parameters.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Maze`] with a configuration error when the radius
    /// and step produce a grid too small to carve, before any carving.
    pub fn new(
        config: &BoxConfig,
        part: u32,
        face: Face,
        radius: f64,
        part_height: f64,
    ) -> Result<ShellPlan, GeometryError> {
        let inside = face == Face::Inside;
        let step = config.maze_step;
        let surface = radius
            + if inside {
                config.maze_thickness
            } else {
                -config.maze_thickness
            };
        let width = ((surface * std::f64::consts::TAU / step) as i64
            / config.nubs as i64
            * config.nubs as i64)
            .max(0) as usize;

        let mut base = if inside {
            config.base_thickness
        } else {
            config.base_height
        };
        if inside && part > 2 {
            base += config.base_height;
        }
        if config.core_solid {
            base += config.core_height;
        }
        if inside {
            base += config.base_gap;
        }

        let usable = part_height
            - base
            - config.maze_margin
            - if config.park_vertical { step / 4.0 } else { 0.0 }
            - step / 8.0;
        let y0 = base + step / 2.0 - step * f64::from(config.helix + 1) + step / 8.0;
        let height = (usable / step) as i64 + 2 + i64::from(config.helix);

        if width < config::constants::MIN_MAZE_WIDTH || height < 1 {
            return Err(puzzlebox_maze::MazeError::too_small(
                width,
                height.max(0) as usize,
            )
            .into());
        }

        Ok(ShellPlan {
            face,
            radius,
            width,
            height: height as usize,
            helix: config.helix,
            nubs: config.nubs,
            maze_step: step,
            maze_margin: config.maze_margin,
            wall_thickness: config.wall_thickness,
            maze_thickness: config.maze_thickness,
            clearance: config.clearance,
            base,
            y0,
            part_height,
            base_thickness: config.base_thickness,
            nub_skew: config.nub_skew(),
            top_flush: config.base_wide && !inside && part > 1,
            outermost: part == config.parts,
            mirror: inside && config.mirror_inside,
            park_vertical: config.park_vertical,
            park_thickness: config.park_thickness,
        })
    }

    /// Maze builder parameters matching this shell.
    pub fn maze_params(&self, config: &BoxConfig) -> MazeParams {
        let mut params = MazeParams::new(self.width, self.height, self.helix, self.nubs);
        params.complexity = config.maze_complexity;
        params.park_vertical = config.park_vertical;
        params.signature = self.face == Face::Outside && !config.no_signature;
        params.test_pattern = config.test_maze;
        params
    }

    /// Whether a grid position falls outside the usable vertical band.
    ///
    /// The band check happens at the cell's helical z: the skew per column
    /// shifts each column of a helical maze slightly upward.
    pub fn out_of_band(&self, x: usize, y: usize) -> bool {
        let step = self.maze_step;
        let skew = step * f64::from(self.helix) / self.width as f64;
        let z = step * y as f64 + self.y0 + skew * x as f64;
        z < self.base + step / 2.0 + step / 8.0
            || z > self.part_height - step / 2.0 - self.maze_margin - step / 8.0
    }

    /// Vertical step per angular sub-slice from the helix pitch.
    pub(crate) fn slice_rise(&self) -> f64 {
        self.maze_step * f64::from(self.helix) / self.width as f64 / 4.0
    }

    /// Per-slice handle capacity for this shell's height.
    pub(crate) fn slice_capacity(&self) -> usize {
        (self.part_height / (self.maze_step / 4.0)) as usize + config::constants::SLICE_HEADROOM
    }
}

/// Precomputes the XY of every angular sub-slice at the three radial
/// layers. Outside shells mirror the angle so the channel winds the same
/// way seen from the mating surface.
pub(crate) fn slice_layers(plan: &ShellPlan) -> Vec<[DVec2; 3]> {
    let count = plan.width * config::constants::SUB_SLICES;
    let inside = plan.face == Face::Inside;
    let radii = if inside {
        [
            plan.radius
                + plan.maze_thickness
                + if plan.outermost {
                    plan.clearance + 0.01
                } else {
                    plan.wall_thickness
                },
            plan.radius + plan.maze_thickness,
            plan.radius,
        ]
    } else {
        [
            plan.radius - plan.maze_thickness - plan.wall_thickness,
            plan.radius - plan.maze_thickness,
            plan.radius,
        ]
    };
    (0..count)
        .map(|s| {
            let mut a = std::f64::consts::TAU * (s as f64 - 1.5) / count as f64;
            if !inside {
                a = std::f64::consts::TAU - a;
            }
            let (sa, ca) = a.sin_cos();
            [
                DVec2::new(radii[0] * sa, radii[0] * ca),
                DVec2::new(radii[1] * sa, radii[1] * ca),
                DVec2::new(radii[2] * sa, radii[2] * ca),
            ]
        })
        .collect()
}

/// Builds the watertight shell solid for a carved maze.
pub fn build_shell(maze: &Maze, plan: &ShellPlan) -> Result<Polyhedron, GeometryError> {
    debug_assert_eq!(maze.width(), plan.width);
    debug_assert_eq!(maze.height(), plan.height);

    let width = plan.width;
    let count = width * config::constants::SUB_SLICES;
    let mut table = SliceTable::new(slice_layers(plan), plan.slice_capacity(), 0);
    let mut poly = Polyhedron::with_capacity(count * 6, count * 8);

    // Bottom rings: wall-back, recess, surface, all at the base plane.
    let base_z = plan.base_thickness - plan.clearance;
    for (layer, recessed) in [(LAYER_BACK, false), (LAYER_RECESS, true), (LAYER_SURFACE, false)] {
        for s in 0..count {
            let xy = table.xy(s, layer);
            let index = poly.add_point([scaled(xy.x), scaled(xy.y), scaled(base_z)]);
            let handle = if recessed {
                Handle::recess(index)
            } else {
                Handle::outer(index)
            };
            table.push_handle(s, handle)?;
        }
    }

    // Sixteen points per usable cell: two surface layers bounding the
    // channel and two recessed layers forming its floor, each with the
    // helical rise across the four sub-slices.
    let rise = plan.slice_rise();
    let my = plan.maze_step / 8.0;
    let y_base = plan.y0 - rise * 1.5;
    let mut cell_points: Vec<Option<u32>> = vec![None; width * plan.height];
    for y in 0..plan.height {
        for x in 0..width {
            let probe = maze.probe(x as i64, y as i64);
            if probe.passages.is_empty() || probe.invalid {
                continue;
            }
            cell_points[y * width + x] = Some(poly.point_count() as u32);
            let center = |s: usize| y_base + y as f64 * plan.maze_step + rise * s as f64;
            let stack: [(usize, f64, bool); 4] = [
                (LAYER_SURFACE, -my * 3.0, false),
                (LAYER_RECESS, -my - plan.nub_skew, true),
                (LAYER_RECESS, my - plan.nub_skew, true),
                (LAYER_SURFACE, my * 3.0, false),
            ];
            for (layer, offset, recessed) in stack {
                for s in x * 4..x * 4 + 4 {
                    let xy = table.xy(s, layer);
                    let index =
                        poly.add_point([scaled(xy.x), scaled(xy.y), scaled(center(s) + offset)]);
                    let handle = if recessed {
                        Handle::recess(index)
                    } else {
                        Handle::outer(index)
                    };
                    table.push_handle(s, handle)?;
                }
            }
        }
    }

    // Top rings: the surface ring stops at the margin, the two outer rings
    // close the rim at full height.
    let top = poly.point_count() as u32;
    let top_lower_z = plan.part_height - if plan.top_flush { 0.0 } else { plan.maze_margin };
    for (layer, z) in [
        (LAYER_SURFACE, top_lower_z),
        (LAYER_RECESS, plan.part_height),
        (LAYER_BACK, plan.part_height),
    ] {
        for s in 0..count {
            let xy = table.xy(s, layer);
            let index = poly.add_point([scaled(xy.x), scaled(xy.y), scaled(z)]);
            table.push_handle(s, Handle::outer(index))?;
        }
    }
    // Wrap each slice back to its bottom ring point.
    for s in 0..count {
        table.push_handle(s, Handle::outer(s as u32))?;
    }

    // Stitch every usable cell.
    for y in 0..plan.height {
        for x in 0..width {
            let Some(p) = cell_points[y * width + x] else {
                continue;
            };
            let probe = maze.probe(x as i64, y as i64);
            let has = |d: Direction| probe.passages.contains(d);
            let s = x * 4;

            // Left sub-slice.
            if !has(Direction::Down) {
                table.advance(s, Handle::outer(p), Handle::outer(p + 1), &mut poly)?;
            }
            table.advance(s, Handle::outer(p), Handle::recess(p + 5), &mut poly)?;
            if has(Direction::Left) {
                table.advance(s, Handle::recess(p + 4), Handle::recess(p + 5), &mut poly)?;
                table.advance(s, Handle::recess(p + 8), Handle::recess(p + 9), &mut poly)?;
            }
            table.advance(s, Handle::outer(p + 12), Handle::recess(p + 9), &mut poly)?;
            if !has(Direction::Up) {
                table.advance(s, Handle::outer(p + 12), Handle::outer(p + 13), &mut poly)?;
            }

            // Middle sub-slice.
            if !has(Direction::Down) {
                table.advance(s + 1, Handle::outer(p + 1), Handle::outer(p + 2), &mut poly)?;
            }
            table.advance(s + 1, Handle::recess(p + 5), Handle::recess(p + 6), &mut poly)?;
            table.advance(s + 1, Handle::recess(p + 9), Handle::recess(p + 10), &mut poly)?;
            if !has(Direction::Up) {
                table.advance(s + 1, Handle::outer(p + 13), Handle::outer(p + 14), &mut poly)?;
            }

            // Right sub-slice.
            if !has(Direction::Down) {
                table.advance(s + 2, Handle::outer(p + 2), Handle::outer(p + 3), &mut poly)?;
            }
            table.advance(s + 2, Handle::recess(p + 6), Handle::outer(p + 3), &mut poly)?;
            if has(Direction::Right) {
                table.advance(s + 2, Handle::recess(p + 6), Handle::recess(p + 7), &mut poly)?;
                table.advance(s + 2, Handle::recess(p + 10), Handle::recess(p + 11), &mut poly)?;
            }
            table.advance(s + 2, Handle::recess(p + 10), Handle::outer(p + 15), &mut poly)?;
            if !has(Direction::Up) {
                table.advance(s + 2, Handle::outer(p + 14), Handle::outer(p + 15), &mut poly)?;
            }

            // Join onto the wrapped right neighbor's point block.
            let (nx, ny) = maze.wrap(x as i64 + 1, y as i64);
            if ny >= 0 && (ny as usize) < plan.height {
                if let Some(pr) = cell_points[ny as usize * width + nx as usize] {
                    table.advance(s + 3, Handle::outer(p + 3), Handle::outer(pr), &mut poly)?;
                    if has(Direction::Right) {
                        table.advance(
                            s + 3,
                            Handle::recess(p + 7),
                            Handle::recess(pr + 4),
                            &mut poly,
                        )?;
                        table.advance(
                            s + 3,
                            Handle::recess(p + 11),
                            Handle::recess(pr + 8),
                            &mut poly,
                        )?;
                    }
                    table.advance(s + 3, Handle::outer(p + 15), Handle::outer(pr + 12), &mut poly)?;
                }
            }
        }
    }

    // Close every sub-slice up through the top rings and back down to the
    // bottom ring, guaranteeing a closed loop per slice regardless of how
    // many cells touched it.
    let count32 = count as u32;
    for s in 0..count {
        let sr = (s + 1) % count;
        let (left_recessed, right_recessed) = table
            .last(s)
            .map(|(l, r)| (l.recessed, r.recessed))
            .unwrap_or((false, false));
        table.advance(
            s,
            Handle::outer(top + s as u32 + if left_recessed { count32 } else { 0 }),
            Handle::outer(top + sr as u32 + if right_recessed { count32 } else { 0 }),
            &mut poly,
        )?;
        table.advance(
            s,
            Handle::outer(top + s as u32 + count32),
            Handle::outer(top + sr as u32 + count32),
            &mut poly,
        )?;
        table.advance(
            s,
            Handle::outer(top + s as u32 + 2 * count32),
            Handle::outer(top + sr as u32 + 2 * count32),
            &mut poly,
        )?;
        table.advance(s, Handle::outer(s as u32), Handle::outer(sr as u32), &mut poly)?;
    }

    poly.validate()?;
    info!(
        points = poly.point_count(),
        faces = poly.face_count(),
        face = plan.face.label(),
        "shell emitted"
    );
    Ok(poly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use puzzlebox_maze::{build_maze, ByteEntropy};

    fn test_plan() -> ShellPlan {
        let config = BoxConfig {
            nubs: 1,
            helix: 0,
            ..BoxConfig::default()
        }
        .normalized();
        // Radius/height of a small two-part box outer shell.
        ShellPlan::new(&config, 1, Face::Outside, 18.2, 51.6).unwrap()
    }

    fn carved(plan: &ShellPlan) -> Maze {
        let config = BoxConfig {
            nubs: 1,
            helix: 0,
            ..BoxConfig::default()
        }
        .normalized();
        let params = plan.maze_params(&config);
        let mut entropy = ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00]);
        build_maze(&params, |x, y| plan.out_of_band(x, y), &mut entropy).unwrap()
    }

    #[test]
    fn test_plan_width_divisible_by_nubs() {
        let config = BoxConfig::default().normalized();
        let plan = ShellPlan::new(&config, 1, Face::Outside, 18.2, 51.6).unwrap();
        assert_eq!(plan.width % plan.nubs, 0);
        assert!(plan.width >= config::constants::MIN_MAZE_WIDTH);
    }

    #[test]
    fn test_plan_rejects_tiny_radius() {
        let config = BoxConfig::default().normalized();
        let err = ShellPlan::new(&config, 1, Face::Outside, 2.5, 51.6).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Maze(puzzlebox_maze::MazeError::Configuration { .. })
        ));
    }

    #[test]
    fn test_slice_layers_sit_on_their_radii() {
        let plan = test_plan();
        let layers = slice_layers(&plan);
        assert_eq!(layers.len(), plan.width * 4);
        assert_relative_eq!(layers[0][LAYER_SURFACE].length(), plan.radius, epsilon = 1e-9);
        assert_relative_eq!(
            layers[0][LAYER_RECESS].length(),
            plan.radius - plan.maze_thickness,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            layers[0][LAYER_BACK].length(),
            plan.radius - plan.maze_thickness - plan.wall_thickness,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_band_excludes_top_and_bottom() {
        let plan = test_plan();
        assert!(plan.out_of_band(0, 0));
        assert!(plan.out_of_band(0, plan.height - 1));
        assert!(!plan.out_of_band(0, plan.height / 2));
    }

    #[test]
    fn test_shell_is_watertight() {
        let plan = test_plan();
        let maze = carved(&plan);
        let shell = build_shell(&maze, &plan).unwrap();
        assert!(shell.point_count() > 0);
        assert_eq!(shell.boundary_edge_count(), 0, "open edges in shell");
    }

    #[test]
    fn test_shell_deterministic_for_fixed_entropy() {
        let plan = test_plan();
        let first = build_shell(&carved(&plan), &plan).unwrap();
        let second = build_shell(&carved(&plan), &plan).unwrap();
        assert_eq!(first.point_count(), second.point_count());
        assert_eq!(first.face_count(), second.face_count());
        assert_eq!(first.faces(), second.faces());
    }

    #[test]
    fn test_inside_shell_builds_too() {
        let config = BoxConfig {
            nubs: 1,
            helix: 0,
            inside: true,
            ..BoxConfig::default()
        }
        .normalized();
        let plan = ShellPlan::new(&config, 2, Face::Inside, 16.2, 63.2).unwrap();
        let params = plan.maze_params(&config);
        let mut entropy = ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00]);
        let maze = build_maze(&params, |x, y| plan.out_of_band(x, y), &mut entropy).unwrap();
        let shell = build_shell(&maze, &plan).unwrap();
        assert_eq!(shell.boundary_edge_count(), 0);
    }

    #[test]
    fn test_helical_shell_is_watertight() {
        let config = BoxConfig::default().normalized(); // helix 2, nubs 2
        let plan = ShellPlan::new(&config, 1, Face::Outside, 18.2, 51.6).unwrap();
        let params = plan.maze_params(&config);
        let mut entropy = ByteEntropy::repeating(vec![0x63, 0x0F, 0xD4, 0x00]);
        let maze = build_maze(&params, |x, y| plan.out_of_band(x, y), &mut entropy).unwrap();
        let shell = build_shell(&maze, &plan).unwrap();
        assert_eq!(shell.boundary_edge_count(), 0);
    }
}
