//! # Script Generation
//!
//! Drives part emission across a whole box: header comments, the shared
//! `outer()` helper module, the scale wrapper, the layout grid and the
//! shared entropy stream. One box per call; parts are generated
//! sequentially and synchronously.

use std::io::Write;

use tracing::info;

use puzzlebox_maze::EntropySource;
use puzzlebox_scad::{scaled, ScadWriter};

use crate::error::GeometryError;
use crate::params::BoxConfig;
use crate::part::{emit_part, MazeSource};

/// Generates the full script for every part of the box.
pub fn generate_script<W: Write>(
    config: &BoxConfig,
    entropy: &mut dyn EntropySource,
    out: W,
) -> Result<(), GeometryError> {
    generate(config, None, &MazeSource::Generated, entropy, out)
}

/// Generates the script for one part, or all parts when `only_part` is
/// `None`. The maze source applies to every maze shell emitted; a
/// pre-built maze therefore only makes sense with a single part selected.
pub fn generate(
    config: &BoxConfig,
    only_part: Option<u32>,
    source: &MazeSource<'_>,
    entropy: &mut dyn EntropySource,
    out: impl Write,
) -> Result<(), GeometryError> {
    let config = config.clone().normalized();
    let mut writer = ScadWriter::new(out);

    writer.comment("Cylindrical maze puzzle box")?;
    write_parameter_comments(&mut writer, &config)?;

    let sides_fn = if config.outer_sides > 0 {
        config.outer_sides
    } else {
        100
    };
    writer.statement(&format!(
        "module outer(h,r){{e={};minkowski(){{cylinder(r1=0,r2=e,h=e,$fn=24);cylinder(h=h-e,r=r,$fn={});}}}}",
        scaled(config.outer_round),
        sides_fn
    ))?;

    writer.open(&format!(
        "scale({})",
        config::constants::COORDINATE_SCALE_INVERSE
    ))?;

    let mut global_exit: Option<f64> = None;
    let (mut x, mut y) = (0.0f64, 0.0f64);
    let columns = (f64::from(config.parts).sqrt() + 0.5) as i64;
    let mut column = columns * columns - i64::from(config.parts);

    let parts: Vec<u32> = match only_part {
        Some(part) => vec![part.clamp(1, config.parts)],
        None => (1..=config.parts).collect(),
    };
    for part in parts {
        let plan = emit_part(
            &mut writer,
            &config,
            part,
            source,
            entropy,
            &mut global_exit,
            (x, y),
        )?;
        let wide = if config.outer_sides % 2 == 1 {
            plan.r3
        } else {
            plan.r2
        };
        x += wide + plan.r2 + 5.0;
        column += 1;
        if column >= columns {
            column = 0;
            x = 0.0;
            y += wide * 2.0 + 5.0;
        }
    }

    writer.close()?;
    info!(parts = config.parts, "script generated");
    Ok(())
}

/// Documents the effective parameters at the top of the script.
fn write_parameter_comments<W: Write>(
    writer: &mut ScadWriter<W>,
    config: &BoxConfig,
) -> Result<(), GeometryError> {
    writer.comment(&format!(
        "Parts: {}  Core: {}x{}mm  Wall: {}mm  Maze: {}mm deep, {}mm step",
        config.parts,
        config.core_diameter,
        config.core_height,
        config.wall_thickness,
        config.maze_thickness,
        config.maze_step
    ))?;
    writer.comment(&format!(
        "Helix: {}  Nubs: {}  Complexity: {}  Clearance: {}mm",
        config.helix, config.nubs, config.maze_complexity, config.clearance
    ))?;
    let mut modes = Vec::new();
    if config.inside {
        modes.push("inside maze");
    }
    if config.flip {
        modes.push("alternating maze");
    }
    if config.core_solid {
        modes.push("solid core");
    }
    if config.base_wide {
        modes.push("wide base");
    }
    if config.park_vertical {
        modes.push("vertical park");
    }
    if config.test_maze {
        modes.push("test pattern");
    }
    if config.resin {
        modes.push("resin clearances");
    }
    if !modes.is_empty() {
        writer.comment(&format!("Modes: {}", modes.join(", ")))?;
    }
    Ok(())
}
