//! # Polyhedron Buffer
//!
//! Write-once point and face lists buffered in memory before emission as a
//! single `polyhedron()` statement. Buffering (rather than streaming as
//! the faces are discovered) is what lets tests check the closure property
//! of the emitted solid: a watertight mesh has every edge shared by
//! exactly two faces with opposite orientations.

use std::collections::HashMap;
use std::io::Write;

use crate::error::ScadError;
use crate::script::ScadWriter;

/// A buffered point-list/face-list solid.
#[derive(Debug, Clone, Default)]
pub struct Polyhedron {
    points: Vec<[i64; 3]>,
    faces: Vec<Vec<u32>>,
}

impl Polyhedron {
    /// Creates an empty polyhedron.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a polyhedron with pre-allocated capacity.
    pub fn with_capacity(points: usize, faces: usize) -> Self {
        Polyhedron {
            points: Vec::with_capacity(points),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Adds a point (already in scaled integer units) and returns its
    /// index.
    pub fn add_point(&mut self, point: [i64; 3]) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(point);
        index
    }

    /// Adds a face by point indices, outward-facing winding.
    pub fn add_face(&mut self, face: Vec<u32>) {
        debug_assert!(face.len() >= 3, "degenerate face");
        self.faces.push(face);
    }

    /// Number of points emitted so far.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of faces emitted so far.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The buffered faces.
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Counts edges that break the closure property.
    ///
    /// In a closed orientable solid every undirected edge is used by
    /// exactly two faces, once in each direction. Returns the number of
    /// undirected edges violating that.
    pub fn boundary_edge_count(&self) -> usize {
        let mut edges: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
        for face in &self.faces {
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                let entry = edges.entry((a.min(b), a.max(b))).or_insert((0, 0));
                if a < b {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }
        edges.values().filter(|&&(f, b)| f != 1 || b != 1).count()
    }

    /// Checks that every face index refers to an emitted point.
    pub fn validate(&self) -> Result<(), ScadError> {
        let count = self.points.len();
        for face in &self.faces {
            for &index in face {
                if index as usize >= count {
                    return Err(ScadError::BadPointIndex { index, count });
                }
            }
        }
        Ok(())
    }

    /// Emits the `polyhedron()` statement, preceded by an optional
    /// transform prefix on the same line.
    pub fn write<W: Write>(
        &self,
        writer: &mut ScadWriter<W>,
        prefix: &str,
    ) -> Result<(), ScadError> {
        self.validate()?;
        let out = writer.sink();
        write!(out, "{prefix}polyhedron(points=[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(out, ",")?;
            }
            write!(out, "[{},{},{}]", p[0], p[1], p[2])?;
        }
        write!(out, "],\nfaces=[")?;
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                write!(out, ",")?;
            }
            write!(out, "[")?;
            for (j, index) in face.iter().enumerate() {
                if j > 0 {
                    write!(out, ",")?;
                }
                write!(out, "{index}")?;
            }
            write!(out, "]")?;
        }
        writeln!(out, "],convexity=10);")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A unit tetrahedron, the smallest closed solid.
    fn tetrahedron() -> Polyhedron {
        let mut poly = Polyhedron::new();
        let a = poly.add_point([0, 0, 0]);
        let b = poly.add_point([1000, 0, 0]);
        let c = poly.add_point([0, 1000, 0]);
        let d = poly.add_point([0, 0, 1000]);
        poly.add_face(vec![a, c, b]);
        poly.add_face(vec![a, b, d]);
        poly.add_face(vec![b, c, d]);
        poly.add_face(vec![c, a, d]);
        poly
    }

    #[test]
    fn test_closed_solid_has_no_boundary_edges() {
        assert_eq!(tetrahedron().boundary_edge_count(), 0);
    }

    #[test]
    fn test_missing_face_leaves_boundary_edges() {
        let mut poly = tetrahedron();
        let mut faces = poly.faces.clone();
        faces.pop();
        poly.faces = faces;
        assert_eq!(poly.boundary_edge_count(), 3);
    }

    #[test]
    fn test_validate_catches_bad_index() {
        let mut poly = Polyhedron::new();
        poly.add_point([0, 0, 0]);
        poly.add_face(vec![0, 1, 2]);
        assert!(matches!(
            poly.validate(),
            Err(ScadError::BadPointIndex { index: 1, .. })
        ));
    }

    #[test]
    fn test_write_emits_integer_polyhedron() {
        let mut buffer = Vec::new();
        let mut writer = ScadWriter::new(&mut buffer);
        tetrahedron().write(&mut writer, "").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("polyhedron(points=[[0,0,0],[1000,0,0]"));
        assert!(text.contains("faces=[[0,2,1]"));
        assert!(text.trim_end().ends_with("],convexity=10);"));
        assert!(!text.contains('.'));
    }

    #[test]
    fn test_write_with_transform_prefix() {
        let mut buffer = Vec::new();
        let mut writer = ScadWriter::new(&mut buffer);
        tetrahedron()
            .write(&mut writer, "mirror([1,0,0])")
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("mirror([1,0,0])polyhedron("));
    }
}
