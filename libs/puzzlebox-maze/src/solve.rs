//! # Maze Solver
//!
//! Breadth-first analysis of a completed maze: the entrance→exit solution
//! path with per-cell direction arrows, the reachability map separating
//! accessible dead ends from truly isolated cells, and the display grid
//! with carved cells mirrored onto their rotational copies for rendering.
//!
//! The solver traverses carved passages only and never enters invalid
//! cells; edges are uniform weight, so breadth-first order yields a
//! shortest solution.

use std::collections::VecDeque;

use tracing::debug;

use crate::cell::{Cell, Direction};
use crate::maze::Maze;

/// Solution overlay for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    /// Not on the solution path.
    #[default]
    None,
    /// The entrance cell.
    Start,
    /// Move up toward the exit.
    Up,
    /// Move down toward the exit.
    Down,
    /// Move left toward the exit.
    Left,
    /// Move right toward the exit.
    Right,
    /// Movement that could not be classified.
    Unknown,
}

/// Breadth-first analysis results over a completed maze.
#[derive(Debug, Clone)]
pub struct Analysis {
    width: usize,
    marks: Vec<Mark>,
    reachable: Vec<bool>,
    path: Vec<(usize, usize)>,
    display: Vec<Cell>,
}

impl Analysis {
    /// Solution mark for a cell.
    #[inline]
    pub fn mark(&self, x: usize, y: usize) -> Mark {
        self.marks[y * self.width + x]
    }

    /// Whether the cell can be reached from the entrance through carved
    /// passages.
    #[inline]
    pub fn reachable(&self, x: usize, y: usize) -> bool {
        self.reachable[y * self.width + x]
    }

    /// The ordered entrance→exit solution path. Empty when the maze has no
    /// entrance or the exit is unreachable.
    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }

    /// Cell state for rendering, with carved cells mirrored onto their
    /// rotational copies.
    #[inline]
    pub fn display_cell(&self, x: usize, y: usize) -> Cell {
        self.display[y * self.width + x]
    }
}

/// Neighbor order used by the solver's breadth-first sweeps.
const SOLVE_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
];

/// Runs the full breadth-first analysis.
pub fn analyze(maze: &Maze) -> Analysis {
    let (width, height) = (maze.width(), maze.height());
    let mut analysis = Analysis {
        width,
        marks: vec![Mark::None; width * height],
        reachable: vec![false; width * height],
        path: Vec::new(),
        display: (0..height)
            .flat_map(|y| (0..width).map(move |x| maze.cell(x, y)))
            .collect(),
    };

    replicate_display(maze, &mut analysis);

    let Some(entrance_x) = maze.entrance_x() else {
        return analysis;
    };
    let Some((bottom, top)) = maze.valid_row_bounds() else {
        return analysis;
    };
    let entrance = (entrance_x, bottom);
    let exit = (maze.exit_x(), top);

    if let Some(path) = solve_path(maze, entrance, exit) {
        mark_solution(maze, &path, &mut analysis);
        analysis.path = path;
    }
    mark_reachable(maze, entrance, &mut analysis);

    debug!(
        path_len = analysis.path.len(),
        entrance_x, "maze analyzed"
    );
    analysis
}

/// Mirrors every cell reachable from the exit onto its rotational copies.
///
/// Pure visual mirroring: same row, no helix shift. Only one copy was
/// physically carved, but renderings should show the full symmetric
/// pattern.
fn replicate_display(maze: &Maze, analysis: &mut Analysis) {
    if maze.nubs() <= 1 {
        return;
    }
    let Some((_, top)) = maze.valid_row_bounds() else {
        return;
    };
    let (width, height) = (maze.width(), maze.height());
    let sector = maze.sector_width();

    let copy_out = |display: &mut Vec<Cell>, x: usize, y: usize| {
        let value = display[y * width + x];
        for n in 1..maze.nubs() {
            let opposite = (x + n * sector) % width;
            display[y * width + opposite] = value;
        }
    };

    let mut visited = vec![false; width * height];
    let mut queue = VecDeque::new();
    let start = (maze.exit_x(), top);
    visited[start.1 * width + start.0] = true;
    copy_out(&mut analysis.display, start.0, start.1);
    queue.push_back(start);

    while let Some((cx, cy)) = queue.pop_front() {
        for direction in SOLVE_ORDER {
            if !maze.cell(cx, cy).passages.contains(direction) {
                continue;
            }
            let Some((nx, ny)) = maze.neighbor(cx, cy, direction) else {
                continue;
            };
            if visited[ny * width + nx] {
                continue;
            }
            visited[ny * width + nx] = true;
            copy_out(&mut analysis.display, nx, ny);
            queue.push_back((nx, ny));
        }
    }
}

/// Breadth-first search from entrance to exit, reconstructing the path
/// through parent links.
fn solve_path(
    maze: &Maze,
    entrance: (usize, usize),
    exit: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let width = maze.width();
    let mut parent: Vec<Option<(usize, usize)>> = vec![None; width * maze.height()];
    let mut queue = VecDeque::new();
    parent[entrance.1 * width + entrance.0] = Some(entrance);
    queue.push_back(entrance);

    let mut found = false;
    while let Some((cx, cy)) = queue.pop_front() {
        if (cx, cy) == exit {
            found = true;
            break;
        }
        for direction in SOLVE_ORDER {
            if !maze.cell(cx, cy).passages.contains(direction) {
                continue;
            }
            let Some((nx, ny)) = maze.neighbor(cx, cy, direction) else {
                continue;
            };
            if parent[ny * width + nx].is_some() || maze.cell(nx, ny).invalid {
                continue;
            }
            parent[ny * width + nx] = Some((cx, cy));
            queue.push_back((nx, ny));
        }
    }
    if !found {
        return None;
    }

    let mut path = vec![exit];
    let mut current = exit;
    while current != entrance {
        current = parent[current.1 * width + current.0]?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Marks the entrance, the per-cell arrows toward the exit and the exit
/// cell itself.
fn mark_solution(maze: &Maze, path: &[(usize, usize)], analysis: &mut Analysis) {
    let width = maze.width();
    let Some((&entrance, &exit)) = path.first().zip(path.last()) else {
        return;
    };
    analysis.marks[entrance.1 * width + entrance.0] = Mark::Start;
    for pair in path.windows(2).skip(1) {
        let (current, next) = (pair[0], pair[1]);
        analysis.marks[current.1 * width + current.0] = arrow(maze, current, next);
    }
    // The exit leads up and out.
    analysis.marks[exit.1 * width + exit.0] = Mark::Up;
}

/// Direction arrow from one path cell toward the next, wraparound-aware.
///
/// A helical wrap makes the step diagonal; the horizontal component wins
/// because that is the move the solver makes on the physical cylinder.
fn arrow(maze: &Maze, current: (usize, usize), next: (usize, usize)) -> Mark {
    let width = maze.width();
    let dx = (next.0 + width - current.0) % width;
    let dy = next.1 as i64 - current.1 as i64;
    if dx == 0 && dy != 0 {
        return if dy > 0 { Mark::Up } else { Mark::Down };
    }
    if dx == 1 {
        return Mark::Right;
    }
    if dx == width - 1 {
        return Mark::Left;
    }
    if dy != 0 {
        return if dy > 0 { Mark::Up } else { Mark::Down };
    }
    Mark::Unknown
}

/// Flood fill of everything reachable from the entrance.
fn mark_reachable(maze: &Maze, entrance: (usize, usize), analysis: &mut Analysis) {
    let width = maze.width();
    let mut queue = VecDeque::new();
    analysis.reachable[entrance.1 * width + entrance.0] = true;
    queue.push_back(entrance);
    while let Some((cx, cy)) = queue.pop_front() {
        for direction in SOLVE_ORDER {
            if !maze.cell(cx, cy).passages.contains(direction) {
                continue;
            }
            let Some((nx, ny)) = maze.neighbor(cx, cy, direction) else {
                continue;
            };
            if analysis.reachable[ny * width + nx] || maze.cell(nx, ny).invalid {
                continue;
            }
            analysis.reachable[ny * width + nx] = true;
            queue.push_back((nx, ny));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_maze, MazeParams};
    use crate::entropy::ByteEntropy;

    fn carved_maze(width: usize, height: usize, nubs: usize) -> Maze {
        let params = MazeParams::new(width, height, 0, nubs);
        let mut entropy = ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00]);
        build_maze(&params, |_, _| false, &mut entropy).unwrap()
    }

    #[test]
    fn test_solution_connects_entrance_to_exit() {
        let maze = carved_maze(12, 6, 1);
        let analysis = analyze(&maze);
        let path = analysis.path();
        assert!(!path.is_empty());
        assert_eq!(path[0], (maze.entrance_x().unwrap(), 0));
        assert_eq!(*path.last().unwrap(), (maze.exit_x(), 5));
        // Consecutive path cells are joined by carved passages.
        for pair in path.windows(2) {
            let (cx, cy) = pair[0];
            let joined = SOLVE_ORDER.iter().any(|&d| {
                maze.cell(cx, cy).passages.contains(d)
                    && maze.neighbor(cx, cy, d) == Some(pair[1])
            });
            assert!(joined, "path step {:?} -> {:?} not carved", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_every_reachable_cell_connects_to_exit() {
        // Single connected component: anything reachable from the entrance
        // must also reach the exit, which BFS from the entrance proves by
        // reaching it at all.
        let maze = carved_maze(12, 6, 1);
        let analysis = analyze(&maze);
        assert!(analysis.reachable(maze.exit_x(), 5));
        // The path runs entirely through reachable cells.
        for &(x, y) in analysis.path() {
            assert!(analysis.reachable(x, y));
        }
    }

    #[test]
    fn test_solution_never_enters_invalid_cells() {
        let params = MazeParams::new(12, 7, 0, 1);
        let mut entropy = ByteEntropy::repeating(vec![0x3D, 0x91, 0x22, 0x00]);
        let maze = build_maze(&params, |_, y| y == 6, &mut entropy).unwrap();
        let analysis = analyze(&maze);
        for &(x, y) in analysis.path() {
            assert!(!maze.cell(x, y).invalid);
        }
    }

    #[test]
    fn test_marks_start_and_exit() {
        let maze = carved_maze(12, 6, 1);
        let analysis = analyze(&maze);
        let entrance = maze.entrance_x().unwrap();
        assert_eq!(analysis.mark(entrance, 0), Mark::Start);
        assert_eq!(analysis.mark(maze.exit_x(), 5), Mark::Up);
    }

    #[test]
    fn test_display_replication_mirrors_carved_cells() {
        let maze = carved_maze(12, 6, 2);
        let analysis = analyze(&maze);
        // Every cell reachable from the exit appears identically one
        // sector away in the display grid.
        let sector = maze.sector_width();
        let exit = maze.exit_x();
        let mirrored = analysis.display_cell((exit + sector) % 12, 5);
        assert_eq!(mirrored, analysis.display_cell(exit, 5));
    }

    #[test]
    fn test_arrow_wraparound() {
        let maze = carved_maze(12, 6, 1);
        assert_eq!(arrow(&maze, (11, 2), (0, 2)), Mark::Right);
        assert_eq!(arrow(&maze, (0, 2), (11, 2)), Mark::Left);
        assert_eq!(arrow(&maze, (4, 2), (4, 3)), Mark::Up);
        assert_eq!(arrow(&maze, (4, 3), (4, 2)), Mark::Down);
    }
}
