//! # Part Planning & Emission
//!
//! Radii and height derivation for each nested part, and emission of one
//! complete part: maze shells, base, center hole, grip rings, alignment
//! mark and nubs, positioned in the output layout grid.

use std::io::Write;

use tracing::info;

use puzzlebox_maze::{
    analyze, build_maze, render_report, EntropySource, Face, InterchangeMaze, Maze,
};
use puzzlebox_scad::{angle, scaled, ScadWriter};

use crate::error::GeometryError;
use crate::nub::{build_nub, nub_prefix, NubPlan};
use crate::park::build_park_ridge;
use crate::params::{BoxConfig, NubOrigin};
use crate::shell::{build_shell, ShellPlan};

/// Where a part's maze comes from.
#[derive(Debug, Clone, Copy)]
pub enum MazeSource<'a> {
    /// Carve a fresh maze from the entropy source.
    Generated,
    /// Use an externally supplied maze; its dimensions must match the ones
    /// computed from the current geometric parameters.
    Prebuilt(&'a InterchangeMaze),
}

/// Which faces of a part carry mazes, and what its neighbors carry.
#[derive(Debug, Clone, Copy)]
pub struct PartRoles {
    pub maze_inside: bool,
    pub maze_outside: bool,
    pub next_inside: bool,
    pub next_outside: bool,
}

impl PartRoles {
    /// Resolves the maze placement for a part under the inside/flip modes.
    pub fn resolve(config: &BoxConfig, part: u32) -> PartRoles {
        let mut roles = PartRoles {
            maze_inside: config.inside,
            maze_outside: !config.inside,
            next_inside: config.inside,
            next_outside: !config.inside,
        };
        if config.flip {
            if part & 1 == 1 {
                roles.maze_inside = !roles.maze_inside;
                roles.next_outside = !roles.next_outside;
            } else {
                roles.maze_outside = !roles.maze_outside;
                roles.next_inside = !roles.next_inside;
            }
        }
        // The innermost part has no inner mate and the outermost no outer
        // one.
        if part == 1 {
            roles.maze_inside = false;
        }
        if part == config.parts {
            roles.maze_outside = false;
            roles.next_inside = false;
        }
        if part + 1 >= config.parts {
            roles.next_outside = false;
        }
        roles
    }
}

/// Radii and height of one part.
///
/// r0 is the inner wall, r1 the outer wall including the maze, r2 the base
/// before the flat-sides adjustment, r3 after it.
#[derive(Debug, Clone)]
pub struct PartPlan {
    pub part: u32,
    pub roles: PartRoles,
    pub r0: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub height: f64,
    /// Grid width from the default radius, before any shell refines it.
    pub default_width: usize,
}

impl PartPlan {
    /// Derives the radii and height for a part.
    pub fn new(config: &BoxConfig, part: u32) -> PartPlan {
        let roles = PartRoles::resolve(config, part);
        let ring = config.wall_thickness + config.maze_thickness + config.clearance;
        let mut r1 =
            config.core_diameter / 2.0 + config.wall_thickness + f64::from(part - 1) * ring;
        if config.core_solid {
            // Part 2 carries the content instead of part 1.
            r1 -= ring
                - if config.inside {
                    config.maze_thickness
                } else {
                    0.0
                };
        }
        let default_width = ((r1 * std::f64::consts::TAU / config.maze_step) as i64
            / config.nubs as i64
            * config.nubs as i64)
            .max(0) as usize;
        let mut r0 = r1 - config.wall_thickness;
        if roles.maze_inside && part > 1 {
            r0 -= config.maze_thickness;
        }
        if roles.maze_outside && part < config.parts {
            r1 += config.maze_thickness;
        }
        let mut r2 = r1;
        if part < config.parts {
            r2 += config.clearance;
        }
        if roles.next_inside {
            r2 += config.maze_thickness;
        }
        if roles.next_outside || part + 1 == config.parts {
            r2 += config.wall_thickness;
        }
        if config.base_wide && part + 1 < config.parts {
            r2 += if roles.next_outside {
                config.maze_thickness
            } else {
                config.wall_thickness
            };
        }
        let mut r3 = r2;
        if config.outer_sides > 0 && part + 1 >= config.parts {
            r3 /= (std::f64::consts::PI / f64::from(config.outer_sides)).cos();
        }

        let mut height = config.core_height
            + config.base_thickness
            + (config.base_thickness + config.base_gap) * f64::from(part - 1);
        if config.core_solid {
            height += config.core_gap + config.base_height;
        }
        if part == 1 {
            height -= if config.core_solid {
                config.core_height
            } else {
                config.core_gap
            };
        }
        if part > 1 {
            // The previous part's base nests into this one.
            height -= config.base_height;
        }

        PartPlan {
            part,
            roles,
            r0,
            r1,
            r2,
            r3,
            height,
            default_width,
        }
    }
}

/// Emits one complete part at the given layout offset. Returns the plan so
/// the caller can advance the layout.
pub fn emit_part<W: Write>(
    writer: &mut ScadWriter<W>,
    config: &BoxConfig,
    part: u32,
    source: &MazeSource<'_>,
    entropy: &mut dyn EntropySource,
    global_exit: &mut Option<f64>,
    offset: (f64, f64),
) -> Result<PartPlan, GeometryError> {
    let plan = PartPlan::new(config, part);
    let roles = plan.roles;
    writer.comment(&format!(
        "Part {} ({:.2}mm to {:.2}mm and {:.2}mm/{:.2}mm base)",
        part, plan.r0, plan.r1, plan.r2, plan.r3
    ))?;

    let wide = if config.outer_sides % 2 == 1 {
        plan.r3
    } else {
        plan.r2
    };
    writer.statement(&format!(
        "translate([{},{},0])",
        scaled(offset.0 + wide),
        scaled(offset.1 + wide)
    ))?;
    if config.outer_sides > 0 {
        let a = 180.0 / f64::from(config.outer_sides)
            + if part + 1 == config.parts { 180.0 } else { 0.0 };
        writer.open(&format!("rotate([0,0,{}])", angle(a)))?;
    } else {
        writer.open("")?;
    }

    // The kept solid, with the grip rings, connector channels and the
    // alignment mark cut away from it.
    writer.open("difference()")?;
    writer.open("union()")?;

    let mut exit_angle = 0.0;
    let mut width_fn = plan.default_width;
    if roles.maze_inside {
        let shell = emit_shell(
            writer,
            config,
            part,
            Face::Inside,
            plan.r0,
            plan.height,
            source,
            entropy,
        )?;
        exit_angle = shell.0;
        width_fn = shell.1;
    }
    if roles.maze_outside {
        let shell = emit_shell(
            writer,
            config,
            part,
            Face::Outside,
            plan.r1,
            plan.height,
            source,
            entropy,
        )?;
        exit_angle = shell.0;
        width_fn = shell.1;
    }
    if global_exit.is_none() && (roles.maze_inside || roles.maze_outside) {
        *global_exit = Some(exit_angle);
    }
    if !roles.maze_inside && !roles.maze_outside && part < config.parts {
        // Plain cylindrical wall for a mazeless middle part.
        writer.open("difference()")?;
        writer.statement(&format!(
            "translate([0,0,{}])cylinder(r={},h={},$fn={});translate([0,0,{}])cylinder(r={},h={},$fn={});",
            scaled(config.base_thickness / 2.0 - config.clearance),
            scaled(plan.r1),
            scaled(plan.height - config.base_thickness / 2.0 + config.clearance),
            width_fn * 4,
            scaled(config.base_thickness),
            scaled(plan.r0),
            scaled(plan.height),
            width_fn * 4
        ))?;
        writer.close()?;
    }

    // The base with the content hole cut out.
    let sides_fn = if config.outer_sides > 0 {
        config.outer_sides
    } else {
        100
    };
    writer.open("difference()")?;
    let outer_r = scaled(
        (plan.r2 - config.outer_round) / (std::f64::consts::PI / f64::from(sides_fn)).cos(),
    );
    if part == config.parts {
        writer.statement(&format!("outer({},{});", scaled(plan.height), outer_r))?;
    } else if part + 1 >= config.parts {
        writer.statement(&format!(
            "mirror([1,0,0])outer({},{});",
            scaled(config.base_height),
            outer_r
        ))?;
    } else {
        writer.statement(&format!(
            "hull(){{cylinder(r={},h={},$fn={});translate([0,0,{}])cylinder(r={},h={},$fn={});}}",
            scaled(plan.r2 - config.maze_thickness),
            scaled(config.base_height),
            width_fn * 4,
            scaled(config.maze_margin),
            scaled(plan.r2),
            scaled(config.base_height - config.maze_margin),
            width_fn * 4
        ))?;
    }
    let hole_r = plan.r0
        + if part > 1 && roles.maze_inside {
            config.maze_thickness + config.clearance
        } else {
            0.0
        }
        + if !roles.maze_inside && part < config.parts {
            config.clearance
        } else {
            0.0
        };
    writer.statement(&format!(
        "translate([0,0,{}])cylinder(r={},h={},$fn={});",
        scaled(config.base_thickness),
        scaled(hole_r),
        scaled(plan.height),
        width_fn * 4
    ))?;
    writer.close()?;
    writer.close()?; // union

    if config.grip_depth > 0.0 {
        if part + 1 < config.parts {
            writer.statement(&format!(
                "rotate([0,0,{}])translate([0,0,{}])rotate_extrude(start=180,angle=360,convexity=10,$fn={})translate([{},0,0])circle(r={},$fn=9);",
                angle(360.0 / width_fn as f64 / 4.0 / 2.0),
                scaled(config.maze_margin + (config.base_height - config.maze_margin) / 2.0),
                width_fn * 4,
                scaled(plan.r2 + config.grip_depth),
                scaled(config.grip_depth * 2.0)
            ))?;
        } else if part + 1 == config.parts {
            writer.statement(&format!(
                "translate([0,0,{}])rotate_extrude(start=180,angle=360,convexity=10,$fn={})translate([{},0,0])circle(r={},$fn=9);",
                scaled(config.outer_round + (config.base_height - config.outer_round) / 2.0),
                sides_fn,
                scaled(plan.r3 + config.grip_depth),
                scaled(config.grip_depth * 2.0)
            ))?;
        }
    }

    if config.base_wide && roles.next_outside && part + 1 < config.parts {
        // Cut channels over the base so the mating nubs can pass.
        let step = config.maze_step;
        let wn = (((plan.r2 - config.maze_thickness) * std::f64::consts::TAU / step) as i64
            / config.nubs as i64
            * config.nubs as i64)
            .max(1);
        let wi = 2.0 * (plan.r2 - config.maze_thickness) * std::f64::consts::TAU / wn as f64 / 4.0;
        let wo = 2.0 * plan.r2 * std::f64::consts::TAU * 3.0 / wn as f64 / 4.0;
        writer.statement(&format!(
            "for(a=[0:{}:359])rotate([0,0,a])translate([0,{},0])hull(){{cube([{},{},{}],center=true);cube([{},0.01,{}],center=true);}}",
            angle(360.0 / config.nubs as f64),
            scaled(plan.r2),
            scaled(wi),
            scaled(config.maze_thickness * 2.0),
            scaled(config.base_height * 2.0 + config.clearance),
            scaled(wo),
            scaled(config.base_height * 2.0 + config.clearance)
        ))?;
    }

    if config.mark_position_zero() && part + 1 >= config.parts {
        emit_mark(writer, config, &plan, exit_angle)?;
    }
    writer.close()?; // difference

    if config.core_solid && part == 1 {
        writer.statement(&format!(
            "translate([0,0,{}])cylinder(r={},h={},$fn={});",
            scaled(config.base_thickness),
            scaled(
                plan.r0
                    + config.clearance
                    + if !roles.maze_inside && part < config.parts {
                        config.clearance
                    } else {
                        0.0
                    }
            ),
            scaled(plan.height - config.base_thickness),
            width_fn * 4
        ))?;
    }

    // Nub origin: lid-aligned parts pin to zero so the closed box lines
    // up; otherwise the configured origin mode decides.
    let nub_angle = if (roles.maze_outside && !config.flip && part == config.parts)
        || (!roles.maze_outside && part + 1 == config.parts)
    {
        0.0
    } else {
        match config.nub_origin {
            NubOrigin::OppositeExit => {
                let mut a = global_exit.unwrap_or(exit_angle) + 180.0;
                if a >= 360.0 {
                    a -= 360.0;
                }
                a
            }
            NubOrigin::ExitAligned => exit_angle,
            NubOrigin::Random => {
                if part < config.parts && !config.base_wide {
                    f64::from(entropy.next_i32()? % 360)
                } else {
                    exit_angle
                }
            }
        }
    };

    if !roles.maze_inside && part > 1 {
        let nub = NubPlan {
            face: Face::Inside,
            radius: plan.r0,
            part_height: plan.height,
            origin: nub_angle,
        };
        build_nub(&nub, config).write(writer, &nub_prefix(&nub, config))?;
    }
    if !roles.maze_outside && part < config.parts {
        let nub = NubPlan {
            face: Face::Outside,
            radius: plan.r1,
            part_height: plan.height,
            origin: nub_angle,
        };
        build_nub(&nub, config).write(writer, &nub_prefix(&nub, config))?;
    }

    writer.close()?; // translate/rotate wrapper
    info!(part, height = plan.height, "part emitted");
    Ok(plan)
}

/// Emits one maze shell (mesh plus diagnostics) and returns the exit angle
/// and grid width.
#[allow(clippy::too_many_arguments)]
fn emit_shell<W: Write>(
    writer: &mut ScadWriter<W>,
    config: &BoxConfig,
    part: u32,
    face: Face,
    radius: f64,
    part_height: f64,
    source: &MazeSource<'_>,
    entropy: &mut dyn EntropySource,
) -> Result<(f64, usize), GeometryError> {
    let shell_plan = ShellPlan::new(config, part, face, radius, part_height)?;
    writer.comment(&format!(
        "Maze {} {}/{}",
        if face == Face::Inside {
            "inside"
        } else {
            "outside"
        },
        shell_plan.width,
        shell_plan.height
    ))?;

    let maze: Maze = match source {
        MazeSource::Generated => {
            let params = shell_plan.maze_params(config);
            build_maze(&params, |x, y| shell_plan.out_of_band(x, y), entropy)?
        }
        MazeSource::Prebuilt(interchange) => {
            interchange.check_dimensions(shell_plan.width, shell_plan.height)?;
            InterchangeMaze::clone(interchange).into_maze(config.helix, config.nubs)?
        }
    };
    if let Some(length) = maze.longest_path() {
        writer.comment(&format!("Path length {length}"))?;
    }

    let analysis = analyze(&maze);
    writer.comment_lines(render_report(&maze, &analysis, face))?;

    let shell = build_shell(&maze, &shell_plan)?;
    let prefix = if shell_plan.mirror {
        "mirror([1,0,0])"
    } else {
        ""
    };
    shell.write(writer, prefix)?;
    if let Some(ridge) = build_park_ridge(&shell_plan) {
        ridge.write(writer, prefix)?;
    }

    Ok((maze.exit_angle(), shell_plan.width))
}

/// The small alignment mark at position zero, cut when the flat sides
/// don't divide evenly among the nubs.
fn emit_mark<W: Write>(
    writer: &mut ScadWriter<W>,
    config: &BoxConfig,
    plan: &PartPlan,
    exit_angle: f64,
) -> Result<(), GeometryError> {
    let roles = plan.roles;
    let mut r = plan.r0 + config.wall_thickness / 2.0;
    let mut t = config.wall_thickness * 2.0;
    if roles.maze_inside {
        r = plan.r0 + config.maze_thickness + config.wall_thickness / 2.0;
    } else if roles.maze_outside {
        r = plan.r1 - config.maze_thickness - config.wall_thickness / 2.0;
    }
    if !roles.maze_outside {
        // Keep the cut off the outside of the box.
        r -= config.wall_thickness / 2.0;
        t = config.wall_thickness * 3.0 / 2.0;
    }
    let mut a = 0.0;
    if plan.part == config.parts && roles.maze_inside {
        a = if config.mirror_inside { 1.0 } else { -1.0 } * exit_angle;
    }
    if plan.part + 1 == config.parts && roles.maze_outside {
        a = exit_angle;
    }
    writer.statement(&format!(
        "rotate([0,0,{}])translate([0,{},{}])cylinder(d={},h={},center=true,$fn=4);",
        angle(a),
        scaled(r),
        scaled(plan.height),
        scaled(t),
        scaled(config.maze_step / 2.0)
    ))?;
    Ok(())
}
