//! # Park Ridge
//!
//! A low ridge at the park point, rotationally repeated per nub, that the
//! nub clicks over so the closed box holds itself shut. The ridge height
//! is a fraction of the channel depth; the lid can still be twisted open
//! with gentle force.

use puzzlebox_scad::{scaled, Polyhedron};

use crate::shell::{slice_layers, ShellPlan};
use crate::slices::{LAYER_BACK, LAYER_RECESS, LAYER_SURFACE};

/// Builds the park ridge solid, or `None` when the ridge thickness is
/// zero.
pub fn build_park_ridge(plan: &ShellPlan) -> Option<Polyhedron> {
    if plan.park_thickness <= 0.0 {
        return None;
    }
    let layers = slice_layers(plan);
    let count = layers.len();
    let step = plan.maze_step;
    let rise_cell = step * f64::from(plan.helix) / plan.width as f64;
    let mut poly = Polyhedron::with_capacity(plan.nubs * 32, plan.nubs * 40);

    // Two points per ridge grid position: one on the wall back, one on the
    // ridge crest (or channel floor on the edge rows).
    let sector = plan.width / plan.nubs;
    for n in (0..plan.width).step_by(sector) {
        for row in 0..4 {
            for col in 0..4 {
                let s = (n * 4 + col + if plan.park_vertical { 0 } else { 2 }) % count;
                let mut z = plan.y0 - rise_cell * 1.5 / 4.0
                    + f64::from(plan.helix + 1) * step
                    + row as f64 * step / 4.0
                    + rise_cell * col as f64 / 4.0
                    + if plan.park_vertical {
                        step / 8.0
                    } else {
                        rise_cell / 2.0 - step * 3.0 / 8.0
                    };
                let recess = layers[s][LAYER_RECESS];
                let surface = layers[s][LAYER_SURFACE];
                let crest_row = if plan.park_vertical {
                    row == 1 || row == 2
                } else {
                    col == 1 || col == 2
                };
                let crest = if crest_row {
                    // Interpolate the crest between the channel floor and
                    // the shell surface by the ridge thickness.
                    (recess * (plan.maze_thickness - plan.park_thickness)
                        + surface * plan.park_thickness)
                        / plan.maze_thickness
                } else {
                    if plan.park_vertical {
                        z -= plan.nub_skew;
                    }
                    recess
                };
                let back = layers[s][LAYER_BACK];
                poly.add_point([scaled(back.x), scaled(back.y), scaled(z)]);
                poly.add_point([scaled(crest.x), scaled(crest.y), scaled(z)]);
            }
        }
    }

    for n in 0..plan.nubs {
        let base = (n * 32) as u32;
        let mut quad = |a: u32, b: u32, c: u32, d: u32| {
            poly.add_face(vec![base + a, base + b, base + c]);
            poly.add_face(vec![base + a, base + c, base + d]);
        };
        for col in (0..6).step_by(2) {
            quad(col, col + 1, col + 3, col + 2);
            for row in (0..24).step_by(8) {
                quad(col + row, col + row + 2, col + row + 10, col + row + 8);
                quad(col + row + 1, col + row + 9, col + row + 11, col + row + 3);
            }
            quad(col + 25, col + 24, col + 26, col + 27);
        }
        for row in (0..24).step_by(8) {
            quad(row, row + 8, row + 9, row + 1);
            quad(row + 6, row + 7, row + 15, row + 14);
        }
    }

    Some(poly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BoxConfig;
    use puzzlebox_maze::Face;

    fn plan(park_thickness: f64) -> ShellPlan {
        let config = BoxConfig {
            nubs: 1,
            helix: 0,
            park_thickness,
            ..BoxConfig::default()
        }
        .normalized();
        ShellPlan::new(&config, 1, Face::Outside, 18.2, 51.6).unwrap()
    }

    #[test]
    fn test_zero_thickness_emits_nothing() {
        assert!(build_park_ridge(&plan(0.0)).is_none());
    }

    #[test]
    fn test_ridge_has_thirty_two_points_per_nub() {
        let ridge = build_park_ridge(&plan(0.7)).unwrap();
        assert_eq!(ridge.point_count(), 32);
        // 14 quads split into triangles
        assert_eq!(ridge.face_count(), 28);
        ridge.validate().unwrap();
    }

    #[test]
    fn test_ridge_repeats_per_nub() {
        let config = BoxConfig::default().normalized(); // nubs 2
        let plan = ShellPlan::new(&config, 1, Face::Outside, 18.2, 51.6).unwrap();
        let ridge = build_park_ridge(&plan).unwrap();
        assert_eq!(ridge.point_count(), 64);
        assert_eq!(ridge.face_count(), 56);
        ridge.validate().unwrap();
    }
}
