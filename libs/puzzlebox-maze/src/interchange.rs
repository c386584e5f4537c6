//! # Maze Interchange Format
//!
//! A small text format that lets a maze be produced by an external load
//! path instead of the builder:
//!
//! ```text
//! PUZZLEBOX_MAZE
//! WIDTH 8
//! HEIGHT 4
//! ENTRY_X 3
//! DATA
//! 80 80 80 80 80 80 80 80
//! ...
//! END
//! ```
//!
//! One hex byte per cell (see [`Cell::to_byte`]), one row per y starting at
//! the bottom. Serializing and reparsing reproduces an identical flag
//! grid.

use crate::cell::Cell;
use crate::error::MazeError;
use crate::maze::Maze;

/// Magic first line of the format.
pub const MAGIC: &str = "PUZZLEBOX_MAZE";

/// A parsed interchange file: raw grid plus declared metadata. Helix pitch
/// and nub count are not part of the format; they come from the current
/// geometric parameters when the grid is turned into a [`Maze`].
#[derive(Debug, Clone)]
pub struct InterchangeMaze {
    pub width: usize,
    pub height: usize,
    pub entry_x: usize,
    pub cells: Vec<Cell>,
}

impl InterchangeMaze {
    /// Builds a maze from the parsed grid using the given topology
    /// parameters.
    pub fn into_maze(self, helix: i32, nubs: usize) -> Result<Maze, MazeError> {
        Maze::from_parts(
            self.width,
            self.height,
            helix,
            nubs,
            self.cells,
            self.entry_x,
        )
    }

    /// Checks the declared dimensions against externally computed ones.
    ///
    /// # Errors
    ///
    /// [`MazeError::DimensionMismatch`] naming the first axis that
    /// disagrees, with expected and given values.
    pub fn check_dimensions(&self, width: usize, height: usize) -> Result<(), MazeError> {
        if self.width != width {
            return Err(MazeError::dimension_mismatch("width", width, self.width));
        }
        if self.height != height {
            return Err(MazeError::dimension_mismatch("height", height, self.height));
        }
        Ok(())
    }
}

/// Serializes a maze to the interchange text.
pub fn serialize(maze: &Maze) -> String {
    let mut out = String::new();
    out.push_str(MAGIC);
    out.push('\n');
    out.push_str(&format!("WIDTH {}\n", maze.width()));
    out.push_str(&format!("HEIGHT {}\n", maze.height()));
    out.push_str(&format!("ENTRY_X {}\n", maze.exit_x()));
    out.push_str("DATA\n");
    for y in 0..maze.height() {
        let row: Vec<String> = (0..maze.width())
            .map(|x| format!("{}", maze.cell(x, y)))
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out.push_str("END\n");
    out
}

/// Parses interchange text.
///
/// `EXIT_X` is accepted as an alias of `ENTRY_X`.
///
/// # Errors
///
/// [`MazeError::Interchange`] naming the offending 1-based line for any
/// structural problem: missing magic, missing headers, short or long rows,
/// bad hex, or a missing end marker.
pub fn parse(text: &str) -> Result<InterchangeMaze, MazeError> {
    let mut lines = text.lines().enumerate();

    let (_, first) = lines
        .next()
        .ok_or_else(|| MazeError::interchange(1, "empty input"))?;
    if first.trim() != MAGIC {
        return Err(MazeError::interchange(1, format!("expected {MAGIC} magic")));
    }

    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut entry_x: Option<usize> = None;
    let mut data_line = 0usize;

    for (index, line) in lines.by_ref() {
        let line = line.trim();
        let number = index + 1;
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or_default();
        match keyword {
            "WIDTH" => width = Some(parse_field(number, fields.next())?),
            "HEIGHT" => height = Some(parse_field(number, fields.next())?),
            "ENTRY_X" | "EXIT_X" => entry_x = Some(parse_field(number, fields.next())?),
            "DATA" => {
                data_line = number;
                break;
            }
            other => {
                return Err(MazeError::interchange(
                    number,
                    format!("unknown header {other}"),
                ));
            }
        }
    }

    let width = width.ok_or_else(|| MazeError::interchange(data_line, "missing WIDTH"))?;
    let height = height.ok_or_else(|| MazeError::interchange(data_line, "missing HEIGHT"))?;
    if data_line == 0 {
        return Err(MazeError::interchange(data_line + 1, "missing DATA"));
    }
    let entry_x = entry_x.unwrap_or(0);

    let mut cells = Vec::with_capacity(width * height);
    for row in 0..height {
        let (index, line) = lines.next().ok_or_else(|| {
            MazeError::interchange(data_line + row + 1, "unexpected end of data")
        })?;
        let number = index + 1;
        let line = line.trim();
        if line == "END" {
            return Err(MazeError::interchange(number, "premature END marker"));
        }
        let bytes: Vec<&str> = line.split_whitespace().collect();
        if bytes.len() != width {
            return Err(MazeError::interchange(
                number,
                format!("row has {} values, expected {width}", bytes.len()),
            ));
        }
        for byte in bytes {
            let value = u8::from_str_radix(byte, 16).map_err(|_| {
                MazeError::interchange(number, format!("bad hex value {byte}"))
            })?;
            cells.push(Cell::from_byte(value));
        }
    }

    match lines.next() {
        Some((_, line)) if line.trim() == "END" => {}
        Some((index, line)) => {
            return Err(MazeError::interchange(
                index + 1,
                format!("expected END, found {}", line.trim()),
            ));
        }
        None => {
            return Err(MazeError::interchange(
                data_line + height + 1,
                "missing END marker",
            ));
        }
    }

    Ok(InterchangeMaze {
        width,
        height,
        entry_x,
        cells,
    })
}

fn parse_field(line: usize, field: Option<&str>) -> Result<usize, MazeError> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| MazeError::interchange(line, "missing or invalid numeric value"))
}
