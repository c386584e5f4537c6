//! # Script Writer
//!
//! A thin writer over any [`std::io::Write`] sink emitting OpenSCAD
//! statements. Coordinates go through [`scaled`] so the script carries
//! integers only; the generator wraps the whole model in a `scale()`
//! statement that undoes the factor.

use std::io::Write;

use crate::error::ScadError;

/// Scales a millimetre value to the integer emission unit.
///
/// # Example
///
/// ```rust
/// use puzzlebox_scad::scaled;
///
/// assert_eq!(scaled(1.6), 1600);
/// assert_eq!(scaled(-0.4), -400);
/// ```
#[inline]
pub fn scaled(value: f64) -> i64 {
    (value * config::constants::COORDINATE_SCALE).round() as i64
}

/// Formats an angle for emission. Angles are not scaled; they keep a short
/// decimal form.
#[inline]
pub fn angle(value: f64) -> String {
    format!("{value:.6}")
}

/// Writes OpenSCAD statements to a sink.
pub struct ScadWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> ScadWriter<W> {
    /// Wraps a sink.
    pub fn new(out: W) -> Self {
        ScadWriter { out, depth: 0 }
    }

    /// Consumes the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one comment line.
    pub fn comment(&mut self, text: &str) -> Result<(), ScadError> {
        writeln!(self.out, "// {text}")?;
        Ok(())
    }

    /// Writes a block of comment lines.
    pub fn comment_lines<I, S>(&mut self, lines: I) -> Result<(), ScadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                writeln!(self.out, "//")?;
            } else {
                writeln!(self.out, "// {line}")?;
            }
        }
        Ok(())
    }

    /// Writes one complete statement line.
    pub fn statement(&mut self, text: &str) -> Result<(), ScadError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Writes a fragment without a trailing newline, for statements built
    /// in pieces (transform prefixes ahead of a polyhedron).
    pub fn fragment(&mut self, text: &str) -> Result<(), ScadError> {
        write!(self.out, "{text}")?;
        Ok(())
    }

    /// Opens a braced block (`head{`).
    pub fn open(&mut self, head: &str) -> Result<(), ScadError> {
        writeln!(self.out, "{head}{{")?;
        self.depth += 1;
        Ok(())
    }

    /// Closes the innermost open block.
    pub fn close(&mut self) -> Result<(), ScadError> {
        debug_assert!(self.depth > 0, "close without open");
        self.depth = self.depth.saturating_sub(1);
        writeln!(self.out, "}}")?;
        Ok(())
    }

    /// Number of currently open blocks.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn sink(&mut self) -> &mut W {
        &mut self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture<F>(f: F) -> String
    where
        F: FnOnce(&mut ScadWriter<&mut Vec<u8>>),
    {
        let mut buffer = Vec::new();
        let mut writer = ScadWriter::new(&mut buffer);
        f(&mut writer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_scaled_rounds() {
        assert_eq!(scaled(0.4), 400);
        assert_eq!(scaled(0.0004), 0);
        assert_eq!(scaled(1.0005), 1001);
    }

    #[test]
    fn test_comment_prefix() {
        let text = capture(|w| {
            w.comment("Part 1").unwrap();
            w.comment_lines(["a", "", "b"]).unwrap();
        });
        assert_eq!(text, "// Part 1\n// a\n//\n// b\n");
    }

    #[test]
    fn test_blocks_balance() {
        let text = capture(|w| {
            w.open("difference()").unwrap();
            w.open("union()").unwrap();
            w.statement("cylinder(r=1000,h=2000);").unwrap();
            w.close().unwrap();
            w.close().unwrap();
            assert_eq!(w.depth(), 0);
        });
        assert_eq!(
            text,
            "difference(){\nunion(){\ncylinder(r=1000,h=2000);\n}\n}\n"
        );
    }
}
