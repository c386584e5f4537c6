//! # Nub Generator
//!
//! The interlocking prisms that ride the mating part's maze channel. Each
//! mating surface carries `nubs` rotationally repeated copies of one
//! 16-point faceted prism plus its 16-point wall anchor; angular width,
//! vertical pitch and radial depth scale independently, and the helical
//! skew matches the maze pitch so the nub tracks the channel on assembly.

use std::f64::consts::TAU;

use puzzlebox_scad::{angle, scaled, Polyhedron};

use puzzlebox_maze::Face;

use crate::params::BoxConfig;

/// Geometry inputs for one nub ring.
#[derive(Debug, Clone)]
pub struct NubPlan {
    /// Which face of the wall the nubs protrude from.
    pub face: Face,
    /// Wall surface radius the nubs sit on.
    pub radius: f64,
    /// Part height, locating the nub ring vertically.
    pub part_height: f64,
    /// Rotational origin in degrees.
    pub origin: f64,
}

/// The transform prefix rotating the ring to its origin and repeating it.
pub fn nub_prefix(plan: &NubPlan, config: &BoxConfig) -> String {
    format!(
        "rotate([0,0,{}])for(a=[0:{}:359])rotate([0,0,a])",
        angle(plan.origin),
        angle(360.0 / config.nubs as f64)
    )
}

/// Builds one nub prism; the prefix from [`nub_prefix`] repeats it per
/// nub.
pub fn build_nub(plan: &NubPlan, config: &BoxConfig) -> Polyhedron {
    let inside = plan.face == Face::Inside;
    let step = config.maze_step;
    let mut r = plan.radius;
    let depth = config.maze_thickness * config.nub_normal;
    let mut ri = if inside { r - depth } else { r + depth };

    // The channel width derives from the mating wall's own grid.
    let fit = if inside {
        ri - config.clearance
    } else {
        ri + config.clearance
    };
    let width = ((fit * TAU / step) as i64 / config.nubs as i64 * config.nubs as i64).max(1);

    let mut da = TAU / width as f64 / 4.0 * config.nub_horizontal;
    let dz = (step / 4.0 - config.nub_z_clearance) * config.nub_vertical;
    let mut my = step * da * 4.0 * f64::from(config.helix) / (r * TAU);
    if inside {
        da = -da;
    } else if config.mirror_inside {
        // This nub rides an inside maze; mirror the skew with it.
        my = -my;
    }
    let a0 = -da * 1.5;
    let z0 = plan.part_height
        - step / 2.0
        - if config.park_vertical { 0.0 } else { step / 8.0 }
        - dz * 1.5
        - my * 1.5;
    let skew = config.nub_skew();

    let mut poly = Polyhedron::with_capacity(32, 60);
    // Radial clearance pulls the whole prism off the wall.
    r += if inside {
        config.nub_r_clearance
    } else {
        -config.nub_r_clearance
    };
    ri += if inside {
        config.nub_r_clearance
    } else {
        -config.nub_r_clearance
    };
    for z in 0..4 {
        for x in 0..4 {
            let crest = (x == 1 || x == 2) && (z == 1 || z == 2);
            let radius = if crest { ri } else { r };
            let theta = a0 + da * x as f64;
            let height = z0
                + z as f64 * dz
                + x as f64 * my
                + if z == 1 || z == 2 { skew } else { 0.0 };
            poly.add_point([
                scaled(radius * theta.sin()),
                scaled(radius * theta.cos()),
                scaled(height),
            ]);
        }
    }
    // Anchor layer sunk back into the wall.
    r += if inside {
        config.clearance - config.nub_r_clearance
    } else {
        -config.clearance + config.nub_r_clearance
    };
    for z in 0..4 {
        for x in 0..4 {
            let theta = a0 + da * x as f64;
            let height = z0
                + z as f64 * dz
                + x as f64 * my
                + if z == 1 || z == 2 { skew } else { 0.0 };
            poly.add_point([
                scaled(r * theta.sin()),
                scaled(r * theta.cos()),
                scaled(height),
            ]);
        }
    }

    nub_faces(&mut poly);
    poly
}

/// Fixed face topology of the 32-point nub prism.
fn nub_faces(poly: &mut Polyhedron) {
    for z in 0..3u32 {
        for x in 0..3u32 {
            let c = z * 4 + x;
            poly.add_face(vec![c + 20, c + 21, c + 17]);
            poly.add_face(vec![c + 20, c + 17, c + 16]);
        }
    }
    for z in 0..3u32 {
        let c = z * 4;
        poly.add_face(vec![c + 4, c + 20, c + 16]);
        poly.add_face(vec![c + 4, c + 16, c]);
        poly.add_face(vec![c + 23, c + 7, c + 3]);
        poly.add_face(vec![c + 23, c + 3, c + 19]);
    }
    for x in 0..3u32 {
        poly.add_face(vec![x + 28, x + 12, x + 13]);
        poly.add_face(vec![x + 28, x + 13, x + 29]);
        poly.add_face(vec![x, x + 16, x + 17]);
        poly.add_face(vec![x, x + 17, x + 1]);
    }
    let strips: [[u32; 3]; 18] = [
        [0, 1, 5],
        [0, 5, 4],
        [4, 5, 9],
        [4, 9, 8],
        [8, 9, 12],
        [9, 13, 12],
        [1, 2, 6],
        [1, 6, 5],
        [5, 6, 10],
        [5, 10, 9],
        [9, 10, 14],
        [9, 14, 13],
        [2, 3, 6],
        [3, 7, 6],
        [6, 7, 11],
        [6, 11, 10],
        [10, 11, 15],
        [10, 15, 14],
    ];
    for face in strips {
        poly.add_face(face.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BoxConfig {
        BoxConfig::default().normalized()
    }

    #[test]
    fn test_nub_point_and_face_counts() {
        let plan = NubPlan {
            face: Face::Outside,
            radius: 18.2,
            part_height: 51.6,
            origin: 0.0,
        };
        let nub = build_nub(&plan, &test_config());
        assert_eq!(nub.point_count(), 32);
        assert_eq!(nub.face_count(), 9 * 2 + 3 * 4 + 3 * 4 + 18);
        nub.validate().unwrap();
    }

    #[test]
    fn test_prefix_repeats_per_nub() {
        let plan = NubPlan {
            face: Face::Outside,
            radius: 18.2,
            part_height: 51.6,
            origin: 45.0,
        };
        let prefix = nub_prefix(&plan, &test_config());
        assert!(prefix.starts_with("rotate([0,0,45.000000])"));
        assert!(prefix.contains("for(a=[0:180.000000:359])"));
    }

    #[test]
    fn test_inside_nub_mirrors_angle() {
        let config = test_config();
        let outside = build_nub(
            &NubPlan {
                face: Face::Outside,
                radius: 18.2,
                part_height: 51.6,
                origin: 0.0,
            },
            &config,
        );
        let inside = build_nub(
            &NubPlan {
                face: Face::Inside,
                radius: 18.2,
                part_height: 51.6,
                origin: 0.0,
            },
            &config,
        );
        // Same topology, different chirality.
        assert_eq!(outside.point_count(), inside.point_count());
        assert_eq!(outside.face_count(), inside.face_count());
    }

    #[test]
    fn test_vertical_clearance_shrinks_pitch() {
        let mut tight = test_config();
        tight.nub_z_clearance = 0.0;
        let mut loose = test_config();
        loose.nub_z_clearance = 0.4;
        let plan = NubPlan {
            face: Face::Outside,
            radius: 18.2,
            part_height: 51.6,
            origin: 0.0,
        };
        let a = build_nub(&plan, &tight);
        let b = build_nub(&plan, &loose);
        assert_ne!(a.faces().len(), 0);
        assert_eq!(a.point_count(), b.point_count());
    }
}
