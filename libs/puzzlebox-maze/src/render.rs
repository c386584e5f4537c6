//! # Maze Rendering
//!
//! Human-readable ASCII box-drawing renderings of a maze (walls, entrance,
//! exit markers, solution arrows, unreachable-cell markers) and the
//! machine-parseable hex block. Both are interleaved into the emitted
//! script as comments; the caller applies the comment prefix.

use crate::maze::{Face, Maze};
use crate::solve::{Analysis, Mark};

impl Mark {
    /// Three-column cell rendering of this mark.
    fn glyph(self) -> Option<&'static str> {
        match self {
            Mark::None => None,
            Mark::Start => Some(" S "),
            Mark::Up => Some(" \u{2191} "),
            Mark::Down => Some(" \u{2193} "),
            Mark::Left => Some(" \u{2190} "),
            Mark::Right => Some(" \u{2192} "),
            Mark::Unknown => Some(" ? "),
        }
    }
}

/// Renders the full diagnostic report: the plain wall rendering, the
/// solution rendering and the machine-readable block, as bare lines
/// without a comment prefix.
pub fn render_report(maze: &Maze, analysis: &Analysis, face: Face) -> Vec<String> {
    let mut lines = Vec::new();
    let Some((bottom, top)) = maze.valid_row_bounds() else {
        lines.push("maze has no valid rows".to_string());
        return lines;
    };

    lines.push(String::new());
    lines.push(format!(
        "============ MAZE VISUALIZATION ({}, {}x{}) ============",
        face.label(),
        maze.width(),
        maze.height()
    ));
    lines.push(String::new());
    lines.push("Human-readable maze (viewed from outside, unwrapped):".to_string());
    lines.push(
        "Legend: + = corner, - = horizontal wall, | = vertical wall, # = invalid, \
         E = exit, space = passage"
            .to_string(),
    );
    lines.push(
        "Note: Maze wraps horizontally (cylinder) - leftmost and rightmost edges connect"
            .to_string(),
    );
    lines.push(format!(
        "Note: With {} nubs, the maze pattern repeats every {} cells around the circumference",
        maze.nubs(),
        maze.sector_width()
    ));
    lines.push(String::new());
    lines.push(format!("Showing rows {bottom} to {top} (valid maze area)"));
    lines.extend(wall_lines(maze, analysis, bottom, top, false));
    lines.push(String::new());

    lines.push("============ MAZE WITH SOLUTION ============".to_string());
    lines.push(String::new());
    lines.push(
        "Legend: S = start, arrows show path to exit, # = unreachable".to_string(),
    );
    lines.push(String::new());
    lines.extend(wall_lines(maze, analysis, bottom, top, true));
    lines.push(String::new());

    lines.extend(machine_block(maze, analysis, face, bottom, top));
    lines
}

/// The box-drawing wall rendering, top row first.
fn wall_lines(
    maze: &Maze,
    analysis: &Analysis,
    bottom: usize,
    top: usize,
    with_solution: bool,
) -> Vec<String> {
    let width = maze.width();
    let exits: Vec<usize> = maze.exit_columns().collect();
    let mut lines = Vec::new();

    for boundary in (bottom..=top + 1).rev() {
        // Horizontal walls and corners between row `boundary` and the row
        // below it.
        let mut line = String::new();
        for x in 0..width {
            line.push('+');
            if boundary == top + 1 {
                if exits.contains(&x) {
                    line.push_str(" E ");
                } else {
                    line.push_str("---");
                }
            } else if boundary == bottom {
                line.push_str("---");
            } else if analysis
                .display_cell(x, boundary - 1)
                .passages
                .contains(crate::cell::Direction::Up)
            {
                line.push_str("   ");
            } else {
                line.push_str("---");
            }
        }
        line.push('+');
        lines.push(line);

        // Cell interiors and vertical walls for the row below the boundary.
        if boundary > bottom {
            let row = boundary - 1;
            let mut line = String::new();
            let wrapping = analysis
                .display_cell(width - 1, row)
                .passages
                .contains(crate::cell::Direction::Right);
            line.push(if wrapping { ' ' } else { '|' });
            for x in 0..width {
                let cell = analysis.display_cell(x, row);
                if cell.invalid {
                    line.push_str("###");
                } else if with_solution {
                    if let Some(glyph) = analysis.mark(x, row).glyph() {
                        line.push_str(glyph);
                    } else if !analysis.reachable(x, row) {
                        line.push_str("###");
                    } else {
                        line.push_str("   ");
                    }
                } else {
                    line.push_str("   ");
                }
                if cell.passages.contains(crate::cell::Direction::Right) {
                    line.push(' ');
                } else {
                    line.push('|');
                }
            }
            lines.push(line);
        }
    }
    lines
}

/// The machine-parseable maze block: header, one hex row per y, end
/// marker.
fn machine_block(
    maze: &Maze,
    analysis: &Analysis,
    face: Face,
    bottom: usize,
    top: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Machine-readable maze data:".to_string());
    lines.push(format!(
        "MAZE_START {} {} {} {} {} {} {}",
        face.label(),
        maze.width(),
        top - bottom + 1,
        maze.exit_x(),
        maze.helix(),
        bottom,
        top
    ));
    for y in bottom..=top {
        let row: Vec<String> = (0..maze.width())
            .map(|x| format!("{}", analysis.display_cell(x, y)))
            .collect();
        lines.push(format!("MAZE_ROW {y} {}", row.join(" ")));
    }
    lines.push("MAZE_END".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_maze, MazeParams};
    use crate::entropy::ByteEntropy;
    use crate::solve::analyze;

    fn rendered(width: usize, nubs: usize) -> (Maze, Vec<String>) {
        let params = MazeParams::new(width, 6, 0, nubs);
        let mut entropy = ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00]);
        let maze = build_maze(&params, |_, _| false, &mut entropy).unwrap();
        let analysis = analyze(&maze);
        let lines = render_report(&maze, &analysis, Face::Outside);
        (maze, lines)
    }

    #[test]
    fn test_exit_markers_appear_for_all_copies() {
        let (maze, lines) = rendered(12, 2);
        let top_border = lines
            .iter()
            .find(|l| l.starts_with('+') && l.contains(" E "))
            .expect("top border with exit marker");
        let marker_count = top_border.matches(" E ").count();
        assert_eq!(marker_count, maze.nubs());
    }

    #[test]
    fn test_machine_block_structure() {
        let (maze, lines) = rendered(8, 1);
        let start = lines
            .iter()
            .position(|l| l.starts_with("MAZE_START"))
            .unwrap();
        let end = lines.iter().position(|l| *l == "MAZE_END").unwrap();
        let header: Vec<&str> = lines[start].split_whitespace().collect();
        assert_eq!(header[1], "OUTSIDE");
        assert_eq!(header[2], "8");
        assert_eq!(header[4], maze.exit_x().to_string());
        // One MAZE_ROW per visible row, all bytes two hex digits.
        for line in &lines[start + 1..end] {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields[0], "MAZE_ROW");
            assert_eq!(fields.len(), 2 + maze.width());
            for byte in &fields[2..] {
                assert_eq!(byte.len(), 2);
                u8::from_str_radix(byte, 16).unwrap();
            }
        }
    }

    #[test]
    fn test_wall_lines_have_uniform_width() {
        let (maze, lines) = rendered(8, 1);
        let expected = 1 + 4 * maze.width();
        for line in lines.iter().filter(|l| l.starts_with('+')) {
            assert_eq!(line.chars().count(), expected, "line: {line}");
        }
    }

    #[test]
    fn test_solution_rendering_contains_start() {
        let (_, lines) = rendered(12, 1);
        assert!(lines.iter().any(|l| l.contains(" S ")));
    }
}
