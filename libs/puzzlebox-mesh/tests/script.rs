//! End-to-end script generation tests: determinism, structure, the
//! configuration failure path and the external-maze round trip.

use puzzlebox_maze::{build_maze, interchange, ByteEntropy, Face, MazeError};
use puzzlebox_mesh::{
    generate, generate_script, BoxConfig, GeometryError, MazeSource, NubOrigin, PartPlan,
    ShellPlan,
};

fn fixed_entropy() -> ByteEntropy {
    ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00, 0x7C, 0x05])
}

fn small_config() -> BoxConfig {
    BoxConfig {
        core_diameter: 20.0,
        core_height: 24.0,
        helix: 0,
        nubs: 1,
        ..BoxConfig::default()
    }
}

#[test]
fn test_script_structure() {
    let mut script = Vec::new();
    generate_script(&small_config(), &mut fixed_entropy(), &mut script).unwrap();
    let text = String::from_utf8(script).unwrap();

    assert!(text.starts_with("// Cylindrical maze puzzle box\n"));
    assert!(text.contains("module outer(h,r)"));
    assert!(text.contains("scale(0.001){"));
    assert!(text.contains("polyhedron(points=["));
    assert!(text.contains("// MAZE_START OUTSIDE"));
    assert!(text.contains("// MAZE_END"));
    assert_eq!(
        text.matches('{').count(),
        text.matches('}').count(),
        "unbalanced braces"
    );
    // Integer-only geometry: every polyhedron point is whole units.
    let points_line = text
        .lines()
        .find(|l| l.contains("polyhedron(points=["))
        .unwrap();
    assert!(!points_line.contains("e-"), "scientific notation leaked");
}

#[test]
fn test_identical_entropy_gives_identical_scripts() {
    let config = small_config();
    let mut first = Vec::new();
    generate_script(&config, &mut fixed_entropy(), &mut first).unwrap();
    let mut second = Vec::new();
    generate_script(&config, &mut fixed_entropy(), &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_single_part_generation() {
    let config = small_config();
    let mut script = Vec::new();
    generate(
        &config,
        Some(1),
        &MazeSource::Generated,
        &mut fixed_entropy(),
        &mut script,
    )
    .unwrap();
    let text = String::from_utf8(script).unwrap();
    assert!(text.contains("// Part 1"));
    assert!(!text.contains("// Part 2"));
}

#[test]
fn test_too_small_box_fails_before_emitting_geometry() {
    let config = BoxConfig {
        core_diameter: 1.0,
        ..BoxConfig::default()
    };
    let mut script = Vec::new();
    let err = generate_script(&config, &mut fixed_entropy(), &mut script).unwrap_err();
    assert!(matches!(
        err,
        GeometryError::Maze(MazeError::Configuration { .. })
    ));
    let text = String::from_utf8(script).unwrap();
    assert!(!text.contains("polyhedron"));
}

#[test]
fn test_external_maze_round_trip_reproduces_geometry() {
    // Nub placement must not draw entropy for this comparison to hold.
    let config = BoxConfig {
        nub_origin: NubOrigin::OppositeExit,
        ..small_config()
    }
    .normalized();
    let part = PartPlan::new(&config, 1);
    let plan = ShellPlan::new(&config, 1, Face::Outside, part.r1, part.height).unwrap();
    let params = plan.maze_params(&config);
    let mut entropy = fixed_entropy();
    let maze = build_maze(&params, |x, y| plan.out_of_band(x, y), &mut entropy).unwrap();

    let parsed = interchange::parse(&interchange::serialize(&maze)).unwrap();
    let reparsed = interchange::parse(&interchange::serialize(
        &parsed
            .clone()
            .into_maze(config.helix, config.nubs)
            .unwrap(),
    ))
    .unwrap();

    let mut first = Vec::new();
    generate(
        &config,
        Some(1),
        &MazeSource::Prebuilt(&parsed),
        &mut fixed_entropy(),
        &mut first,
    )
    .unwrap();
    let mut second = Vec::new();
    generate(
        &config,
        Some(1),
        &MazeSource::Prebuilt(&reparsed),
        &mut fixed_entropy(),
        &mut second,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_flip_alternates_maze_faces() {
    let config = BoxConfig {
        parts: 3,
        flip: true,
        ..small_config()
    };
    let mut script = Vec::new();
    generate_script(&config, &mut fixed_entropy(), &mut script).unwrap();
    let text = String::from_utf8(script).unwrap();
    assert!(text.contains("// MAZE_START OUTSIDE"));
    assert!(text.contains("// MAZE_START INSIDE"));
}
