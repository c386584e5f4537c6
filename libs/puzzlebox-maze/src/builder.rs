//! # Maze Builder
//!
//! Randomized frontier-queue carving. A work queue is seeded at the park
//! point; each step dequeues a cell, picks one of the still-legal neighbor
//! directions by biased random draw, carves the reciprocal passage pair and
//! re-queues both cells at a randomly chosen end of the queue. Front
//! insertion favours long single corridors, back insertion favours many
//! short branches; the complexity bias sets the mix.
//!
//! Legality runs through [`Maze::probe`], so carving respects the
//! cylindrical wraparound, the helix shift and the rotational symmetry
//! folding: carving one copy of a cell occupies all of its partners.

use std::collections::VecDeque;

use tracing::debug;

use crate::cell::Direction;
use crate::entropy::EntropySource;
use crate::error::MazeError;
use crate::maze::Maze;

/// Carve weights per direction.
///
/// The weights are a tunable heuristic, not a correctness requirement; the
/// defaults deliberately favour sideways-and-down growth so the channel
/// spirals toward the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBias {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
}

impl Default for DirectionBias {
    fn default() -> Self {
        use config::constants::{BIAS_DOWN, BIAS_LEFT, BIAS_RIGHT, BIAS_UP};
        DirectionBias {
            left: BIAS_LEFT,
            right: BIAS_RIGHT,
            up: BIAS_UP,
            down: BIAS_DOWN,
        }
    }
}

impl DirectionBias {
    fn weight(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

/// Parameters for one maze build.
#[derive(Debug, Clone)]
pub struct MazeParams {
    /// Grid width; must be divisible by `nubs`.
    pub width: usize,
    /// Grid height, including the margin rows above and below the usable
    /// band.
    pub height: usize,
    /// Vertical cell shift per horizontal wrap.
    pub helix: i32,
    /// Rotational symmetry order.
    pub nubs: usize,
    /// Queue-insertion bias in `[-10, 10]`; larger magnitude favours long
    /// corridors.
    pub complexity: i32,
    /// Direction carve weights.
    pub bias: DirectionBias,
    /// Park the lid vertically instead of sideways.
    pub park_vertical: bool,
    /// Carve the distinctive "A" signature next to the park point.
    pub signature: bool,
    /// Emit the all-rightward test pattern instead of a maze.
    pub test_pattern: bool,
}

impl MazeParams {
    /// Parameters with default bias and complexity for a grid.
    pub fn new(width: usize, height: usize, helix: i32, nubs: usize) -> Self {
        MazeParams {
            width,
            height,
            helix,
            nubs,
            complexity: config::constants::DEFAULT_COMPLEXITY,
            bias: DirectionBias::default(),
            park_vertical: false,
            signature: true,
            test_pattern: false,
        }
    }
}

/// Transient frontier record: a cell position and its path length from the
/// start.
#[derive(Debug, Clone, Copy)]
struct WorkItem {
    x: usize,
    y: usize,
    length: u32,
}

/// Builds a maze on the cylindrical grid.
///
/// `invalid` marks cells excluded from use (the vertical band the physical
/// part cannot carry). `entropy` drives every carve decision; identical
/// parameters and an identical byte stream produce an identical maze.
///
/// # Errors
///
/// [`MazeError::Configuration`] when the grid is too small to carve, before
/// any carving occurs. [`MazeError::Entropy`] if the entropy source fails.
pub fn build_maze(
    params: &MazeParams,
    invalid: impl Fn(usize, usize) -> bool,
    entropy: &mut dyn EntropySource,
) -> Result<Maze, MazeError> {
    if params.width < config::constants::MIN_MAZE_WIDTH || params.height < 1 {
        return Err(MazeError::too_small(params.width, params.height));
    }
    debug_assert!(params.nubs >= 1 && params.width % params.nubs == 0);

    let mut maze = Maze::empty(params.width, params.height, params.helix, params.nubs);
    for y in 0..params.height {
        for x in 0..params.width {
            if invalid(x, y) {
                maze.cell_mut(x, y).invalid = true;
            }
        }
    }

    let start = seed_park(&mut maze, params);

    let (exit_x, longest) = if params.test_pattern {
        carve_test_pattern(&mut maze)
    } else {
        carve(&mut maze, params, start, entropy)?
    };
    maze.set_exit(exit_x, longest);

    open_exit_channel(&mut maze);
    maze.set_entrance();

    debug!(
        width = params.width,
        height = params.height,
        exit_x,
        longest,
        "maze carved"
    );
    Ok(maze)
}

/// Carves the park seed and returns the carve start position.
///
/// The park is where the closed lid rests: a short pre-carved passage next
/// to the maze start. On outside mazes with room to spare a distinctive
/// "A"-shaped loop is carved beside it.
fn seed_park(maze: &mut Maze, params: &MazeParams) -> (usize, usize) {
    let helix = params.helix.max(0) as usize;
    let sector = params.width / params.nubs;
    let set = |maze: &mut Maze, x: usize, y: usize, dirs: &[Direction]| {
        if x < params.width && y < params.height {
            for &d in dirs {
                maze.cell_mut(x, y).passages.insert(d);
            }
        }
    };
    use Direction::{Down, Left, Right, Up};

    if params.park_vertical {
        // Straight run down to the final position.
        for n in 0..helix + 2 {
            set(maze, 0, n, &[Up, Down]);
            set(maze, 0, n + 1, &[Down]);
        }
        let (mut x, mut y) = (0, helix + 2);
        if params.signature && sector > 2 && params.height > helix + 4 {
            set(maze, x, y, &[Down, Up, Right]);
            set(maze, x, y + 1, &[Down, Right]);
            set(maze, x + 1, y, &[Down, Up, Left]);
            set(maze, x + 1, y + 1, &[Down, Left]);
            if y > 0 {
                set(maze, x + 1, y - 1, &[Up]);
            }
            x += 1;
            y -= 1;
        }
        (x, y)
    } else {
        // Sideways step to the final position.
        set(maze, 0, helix + 1, &[Right]);
        set(maze, 1, helix + 1, &[Left]);
        let (mut x, mut y) = (1, helix + 1);
        if params.signature && sector > 3 && params.height > helix + 3 {
            set(maze, x, y, &[Left, Right, Up]);
            set(maze, x + 1, y, &[Left, Up]);
            set(maze, x + 1, y + 1, &[Left, Down]);
            set(maze, x, y + 1, &[Left, Right, Down]);
            set(maze, x - 1, y + 1, &[Right]);
            x -= 1;
            y += 1;
        }
        (x, y)
    }
}

/// The randomized carve proper. Returns the exit column and the longest
/// path length that reached the top boundary.
fn carve(
    maze: &mut Maze,
    params: &MazeParams,
    start: (usize, usize),
    entropy: &mut dyn EntropySource,
) -> Result<(usize, u32), MazeError> {
    let sector = params.width / params.nubs;
    let complexity = params
        .complexity
        .clamp(config::constants::COMPLEXITY_MIN, config::constants::COMPLEXITY_MAX);

    let mut queue: VecDeque<WorkItem> = VecDeque::new();
    queue.push_back(WorkItem {
        x: start.0,
        y: start.1,
        length: 0,
    });

    let mut best_length = 0u32;
    let mut exit_x = 0usize;

    while let Some(item) = queue.pop_front() {
        let x = item.x as i64;
        let y = item.y as i64;

        // Which ways are still open, and their combined weight.
        let mut legal = [false; 4];
        let mut total: i64 = 0;
        for (i, direction) in Direction::ALL.iter().enumerate() {
            let (dx, dy) = direction.delta();
            if !maze.probe(x + dx, y + dy).blocks_carving() {
                legal[i] = true;
                total += i64::from(params.bias.weight(*direction));
            }
        }
        if total == 0 {
            // Dead end; the cell is dropped, not re-queued.
            continue;
        }

        // One draw picks the direction. The draw keeps its sign under the
        // truncating remainder, so negative draws fall through to the
        // first legal direction.
        let mut draw = i64::from(entropy.next_i32()?) % total;
        let mut chosen = None;
        for (i, direction) in Direction::ALL.iter().enumerate() {
            if legal[i] {
                draw -= i64::from(params.bias.weight(*direction));
                if draw < 0 {
                    chosen = Some(*direction);
                    break;
                }
            }
        }
        let direction = match chosen {
            Some(d) => d,
            // Weights sum to the draw modulus, so a direction always hits.
            None => unreachable!("carve draw exceeded total weight"),
        };

        // Carve the reciprocal passage pair.
        maze.cell_mut(item.x, item.y).passages.insert(direction);
        let (dx, dy) = direction.delta();
        let (nx, ny) = maze.wrap(x + dx, y + dy);
        let (nx, ny) = (nx as usize, ny as usize);
        maze.cell_mut(nx, ny).passages.insert(direction.opposite());

        // Exit candidate: the longest path that reaches the top margin and
        // lies in the primary angular sector when symmetric.
        if item.length > best_length
            && maze.probe(nx as i64, ny as i64 + 1).invalid
            && (params.nubs == 1 || nx < sector)
        {
            best_length = item.length;
            exit_x = nx;
        }

        // One more draw decides which end of the queue each cell goes to.
        let side = entropy.next_i32()? % config::constants::COMPLEXITY_MODULUS;
        let neighbor = WorkItem {
            x: nx,
            y: ny,
            length: item.length + 1,
        };
        if side < complexity.abs() {
            queue.push_front(neighbor);
        } else {
            queue.push_back(neighbor);
        }
        if complexity <= 0 && side < -complexity {
            queue.push_front(item);
        } else {
            queue.push_back(item);
        }
    }

    Ok((exit_x, best_length))
}

/// Deterministic all-rightward pattern for fit-testing prints.
fn carve_test_pattern(maze: &mut Maze) -> (usize, u32) {
    let (width, height) = (maze.width(), maze.height());
    for y in 0..height {
        for x in 0..width {
            if !maze.probe(x as i64, y as i64).invalid
                && !maze.probe(x as i64 + 1, y as i64).invalid
            {
                maze.cell_mut(x, y).passages.insert(Direction::Right);
                let (nx, ny) = maze.wrap(x as i64 + 1, y as i64);
                if ny >= 0 && (ny as usize) < height {
                    maze.cell_mut(nx as usize, ny as usize)
                        .passages
                        .insert(Direction::Left);
                }
            }
        }
    }
    // Push the exit to the widest still-valid column near the top.
    let mut exit_x = 0;
    if height >= 2 {
        while exit_x + 1 < width
            && !maze.probe(exit_x as i64 + 1, height as i64 - 2).invalid
        {
            exit_x += 1;
        }
    }
    (exit_x, 0)
}

/// Opens the exit: every rotational copy of the exit column is threaded
/// up through the invalid top margin, and the topmost valid cell's ceiling
/// is opened.
fn open_exit_channel(maze: &mut Maze) {
    let height = maze.height();
    let columns: Vec<usize> = maze.exit_columns().collect();
    for x in columns {
        let mut y = height - 1;
        while y > 0 && maze.cell(x, y).invalid {
            let passages = &mut maze.cell_mut(x, y).passages;
            passages.insert(Direction::Up);
            passages.insert(Direction::Down);
            y -= 1;
        }
        maze.cell_mut(x, y).passages.insert(Direction::Up);
    }
}
