//! # Slice Tracking
//!
//! Per-angular-position stitching state for the shell builder. Every maze
//! column is split into four angular sub-slices; each slice remembers the
//! last (left, right) point-handle pair it was stitched up to and the
//! ordered history of every handle emitted on it. Advancing a slice closes
//! the boundary between the previous pair and the new one: a triangle when
//! no intermediate points lie between the handles, a quad or fan
//! otherwise. That rule is what keeps the shell manifold across cells of
//! differing vertical profiles.

use glam::DVec2;

use puzzlebox_scad::Polyhedron;

use crate::error::GeometryError;

/// A point handle with its surface role.
///
/// Outer handles live on the shell surface; recessed handles form the
/// channel floor. Fans skip history points whose role differs from the
/// side being stitched, which is how the channel walls stay separate from
/// the surface walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Handle {
    pub index: u32,
    pub recessed: bool,
}

impl Handle {
    /// A handle on the shell surface.
    pub fn outer(index: u32) -> Handle {
        Handle {
            index,
            recessed: false,
        }
    }

    /// A handle on the recessed channel floor.
    pub fn recess(index: u32) -> Handle {
        Handle {
            index,
            recessed: true,
        }
    }
}

/// Radial layers of a slice, innermost meaning differs per face.
pub(crate) const LAYER_BACK: usize = 0;
pub(crate) const LAYER_RECESS: usize = 1;
pub(crate) const LAYER_SURFACE: usize = 2;

/// Per-slice stitching state.
#[derive(Debug, Clone)]
struct SliceState {
    last: Option<(Handle, Handle)>,
    history: Vec<Handle>,
}

/// The mutable stitching table backing the shell builder: one entry per
/// angular sub-slice, plus the precomputed per-layer XY coordinates.
#[derive(Debug)]
pub(crate) struct SliceTable {
    states: Vec<SliceState>,
    /// XY per slice per radial layer (wall-back, recess, surface).
    layers: Vec<[DVec2; 3]>,
    capacity: usize,
    /// Index of the first bottom-ring point in the polyhedron.
    bottom: usize,
}

impl SliceTable {
    /// Creates a table for `count` slices with the given per-slice handle
    /// capacity and precomputed layer coordinates.
    pub fn new(layers: Vec<[DVec2; 3]>, capacity: usize, bottom: usize) -> SliceTable {
        let count = layers.len();
        SliceTable {
            states: vec![
                SliceState {
                    last: None,
                    history: Vec::with_capacity(capacity),
                };
                count
            ],
            layers,
            capacity,
            bottom,
        }
    }

    /// Number of slices.
    #[inline]
    pub fn count(&self) -> usize {
        self.states.len()
    }

    /// XY of a slice at a radial layer.
    #[inline]
    pub fn xy(&self, slice: usize, layer: usize) -> DVec2 {
        self.layers[slice][layer]
    }

    /// The last stitched pair of a slice, if any.
    #[inline]
    pub fn last(&self, slice: usize) -> Option<(Handle, Handle)> {
        self.states[slice].last
    }

    /// Appends a handle to a slice's history.
    ///
    /// # Errors
    ///
    /// [`GeometryError::SliceOverflow`] when the preallocated capacity is
    /// exceeded; the maze is taller than the working storage allows.
    pub fn push_handle(&mut self, slice: usize, handle: Handle) -> Result<(), GeometryError> {
        let state = &mut self.states[slice];
        if state.history.len() >= self.capacity {
            return Err(GeometryError::SliceOverflow {
                slice,
                capacity: self.capacity,
            });
        }
        state.history.push(handle);
        Ok(())
    }

    /// Advances a slice to a new (left, right) handle pair, emitting the
    /// faces that close the boundary in between.
    ///
    /// On the first advance the slice is anchored to the bottom rings with
    /// a floor quad. Later advances emit, per side, either nothing (handle
    /// unchanged), a fan over the skipped same-role history points, or a
    /// triangle when nothing was skipped.
    pub fn advance(
        &mut self,
        slice: usize,
        left: Handle,
        right: Handle,
        poly: &mut Polyhedron,
    ) -> Result<(), GeometryError> {
        let count = self.count();
        let next_slice = (slice + 1) % count;

        let (old_left, old_right) = if let Some(pair) = self.states[slice].last {
            pair
        } else {
            // Anchor to the bottom rings: the recess ring when the side
            // starts recessed, the surface ring otherwise, with a floor
            // quad down to the wall-back ring.
            let anchor = |s: usize, recessed: bool| {
                let ring = if recessed { count } else { 2 * count };
                Handle {
                    index: (self.bottom + s + ring) as u32,
                    recessed,
                }
            };
            let left0 = anchor(slice, left.recessed);
            let right0 = anchor(next_slice, right.recessed);
            poly.add_face(vec![
                left0.index,
                right0.index,
                (self.bottom + next_slice) as u32,
                (self.bottom + slice) as u32,
            ]);
            self.states[slice].last = Some((left0, right0));
            (left0, right0)
        };
        if old_left == left && old_right == right {
            return Ok(());
        }

        let stitch_err = |from: Handle, to: Handle| GeometryError::Stitch {
            slice,
            from: from.index,
            to: to.index,
        };

        // Left side: fan over same-role points skipped between the old and
        // new left handles.
        let history = &self.states[slice].history;
        let n1 = history
            .iter()
            .position(|h| h.index == old_left.index)
            .ok_or_else(|| stitch_err(old_left, left))?;
        let n2 = history[n1..]
            .iter()
            .position(|h| h.index == left.index)
            .map(|offset| n1 + offset)
            .ok_or_else(|| stitch_err(old_left, left))?;
        let mut face: Vec<u32> = history[n1..n2]
            .iter()
            .filter(|h| h.recessed == old_left.recessed)
            .map(|h| h.index)
            .collect();
        let left_points = face.len();
        face.push(left.index);
        if left_points > 0 {
            face.push(right.index);
            poly.add_face(face.clone());
        }

        // Right side: the same walk on the next slice's history, downward.
        let history_right = &self.states[next_slice].history;
        let m1 = history_right
            .iter()
            .position(|h| h.index == old_right.index)
            .ok_or_else(|| stitch_err(old_right, right))?;
        let m2 = history_right[m1..]
            .iter()
            .position(|h| h.index == right.index)
            .map(|offset| m1 + offset)
            .ok_or_else(|| stitch_err(old_right, right))?;
        if left_points == 0 || m1 < m2 {
            let mut face = if left_points == 0 { face } else { Vec::new() };
            face.push(right.index);
            for h in history_right[m1..m2].iter().rev() {
                if h.recessed == old_right.recessed {
                    face.push(h.index);
                }
            }
            if left_points > 0 {
                face.push(old_left.index);
            }
            poly.add_face(face);
        }

        self.states[slice].last = Some((left, right));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A two-slice table with synthetic ring geometry: bottom rings are
    /// points 0..6 (three rings of two), then per-slice stacks.
    fn test_table(capacity: usize) -> (SliceTable, Polyhedron) {
        let layers = vec![[DVec2::ZERO; 3]; 2];
        let mut table = SliceTable::new(layers, capacity, 0);
        let mut poly = Polyhedron::new();
        for index in 0..6u32 {
            poly.add_point([i64::from(index), 0, 0]);
            let slice = (index % 2) as usize;
            let handle = if (2..4).contains(&index) {
                Handle::recess(index)
            } else {
                Handle::outer(index)
            };
            table.push_handle(slice, handle).unwrap();
        }
        (table, poly)
    }

    #[test]
    fn test_first_advance_emits_floor_quad() {
        let (mut table, mut poly) = test_table(16);
        let a = poly.add_point([10, 0, 0]);
        let b = poly.add_point([11, 0, 0]);
        table.push_handle(0, Handle::outer(a)).unwrap();
        table.push_handle(1, Handle::outer(b)).unwrap();
        table
            .advance(0, Handle::outer(a), Handle::outer(b), &mut poly)
            .unwrap();
        // Floor quad from the surface bottom ring down to the wall-back
        // ring, then the fan up to the new handles.
        assert_eq!(poly.faces()[0], vec![4, 5, 1, 0]);
        assert!(poly.face_count() >= 2);
    }

    #[test]
    fn test_unchanged_pair_is_a_no_op() {
        let (mut table, mut poly) = test_table(16);
        let a = poly.add_point([10, 0, 0]);
        let b = poly.add_point([11, 0, 0]);
        table.push_handle(0, Handle::outer(a)).unwrap();
        table.push_handle(1, Handle::outer(b)).unwrap();
        table
            .advance(0, Handle::outer(a), Handle::outer(b), &mut poly)
            .unwrap();
        let count = poly.face_count();
        table
            .advance(0, Handle::outer(a), Handle::outer(b), &mut poly)
            .unwrap();
        assert_eq!(poly.face_count(), count);
    }

    #[test]
    fn test_capacity_overflow_is_reported() {
        // Each slice holds three ring handles already; a capacity of three
        // leaves no room for more.
        let (mut table, _) = test_table(3);
        let err = table.push_handle(0, Handle::outer(99)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::SliceOverflow {
                slice: 0,
                capacity: 3
            }
        ));
    }

    #[test]
    fn test_unknown_handle_is_a_stitch_error() {
        let (mut table, mut poly) = test_table(16);
        let a = poly.add_point([10, 0, 0]);
        let b = poly.add_point([11, 0, 0]);
        table.push_handle(0, Handle::outer(a)).unwrap();
        table.push_handle(1, Handle::outer(b)).unwrap();
        table
            .advance(0, Handle::outer(a), Handle::outer(b), &mut poly)
            .unwrap();
        let err = table
            .advance(0, Handle::outer(1234), Handle::outer(b), &mut poly)
            .unwrap_err();
        assert!(matches!(err, GeometryError::Stitch { slice: 0, .. }));
    }
}
