//! Manual-edit operations (§4.8): post-commit translate, rotate-in-place,
//! and snap. None of these change `step_number`; they preserve the
//! committed loading order while re-validating every invariant.

use crate::feasibility;
use crate::model::{Container, Placement};

/// Neighborhood half-width (cm) swept, in `NEIGHBORHOOD_STEP` increments,
/// to find a collision-free position after a rejected in-place rotation.
const NEIGHBORHOOD_RADIUS: f64 = 50.0;
const NEIGHBORHOOD_STEP: f64 = 10.0;

/// Distance (cm) within which a tentative coordinate snaps to a container
/// face or another placement's face.
const SNAP_DISTANCE: f64 = 5.0;

fn others_except<'a>(placements: &'a [Placement], index: usize) -> Vec<&'a Placement> {
    placements.iter().enumerate().filter(|&(i, _)| i != index).map(|(_, p)| p).collect()
}

fn to_owned_placements(refs: &[&Placement]) -> Vec<Placement> {
    refs.iter().map(|p| (*p).clone()).collect()
}

/// Translates the placement at `index` by `(dx, dy, dz)`. The new anchor
/// is clamped to `[0, dim - effective_dim]` on each axis, then checked
/// for feasibility against every *other* placement. Returns `true` and
/// commits the move on success; `false` and leaves the set untouched on
/// rejection.
pub fn translate(placements: &mut [Placement], index: usize, container: &Container, dx: f64, dy: f64, dz: f64) -> bool {
    let (eff_l, eff_w) = placements[index].footprint();
    let eff_h = placements[index].cargo.height;

    let new_x = (placements[index].x + dx).clamp(0.0, (container.length - eff_l).max(0.0));
    let new_y = (placements[index].y + dy).clamp(0.0, (container.width - eff_w).max(0.0));
    let new_z = (placements[index].z + dz).clamp(0.0, (container.height - eff_h).max(0.0));

    let others = to_owned_placements(&others_except(placements, index));
    let cargo = placements[index].cargo.clone();
    let rotated = placements[index].rotated;

    if !feasibility::can_place(&cargo, new_x, new_y, new_z, rotated, container, &others) {
        return false;
    }

    placements[index].x = new_x;
    placements[index].y = new_y;
    placements[index].z = new_z;
    true
}

/// Rotates the placement at `index` in place, only if its item allows
/// rotation. Recomputes the anchor so the geometric center stays fixed,
/// clamps to container bounds, and re-validates feasibility; on collision,
/// scans a +/-50cm neighborhood in 10cm steps on the X-Y plane for the
/// first collision-free position before reverting.
pub fn rotate_in_place(placements: &mut [Placement], index: usize, container: &Container) -> bool {
    if !placements[index].cargo.allow_rotate {
        return false;
    }

    let (center_x, center_y, _) = placements[index].center();
    let new_rotated = !placements[index].rotated;
    let (new_l, new_w) = placements[index].cargo.footprint(new_rotated);

    let base_x = (center_x - new_l / 2.0).clamp(0.0, (container.length - new_l).max(0.0));
    let base_y = (center_y - new_w / 2.0).clamp(0.0, (container.width - new_w).max(0.0));
    let z = placements[index].z;

    let others = to_owned_placements(&others_except(placements, index));
    let cargo = placements[index].cargo.clone();

    if feasibility::can_place(&cargo, base_x, base_y, z, new_rotated, container, &others) {
        placements[index].x = base_x;
        placements[index].y = base_y;
        placements[index].rotated = new_rotated;
        return true;
    }

    let mut offset = -NEIGHBORHOOD_RADIUS;
    while offset <= NEIGHBORHOOD_RADIUS {
        let mut inner = -NEIGHBORHOOD_RADIUS;
        while inner <= NEIGHBORHOOD_RADIUS {
            let x = (base_x + offset).clamp(0.0, (container.length - new_l).max(0.0));
            let y = (base_y + inner).clamp(0.0, (container.width - new_w).max(0.0));
            if feasibility::can_place(&cargo, x, y, z, new_rotated, container, &others) {
                placements[index].x = x;
                placements[index].y = y;
                placements[index].rotated = new_rotated;
                return true;
            }
            inner += NEIGHBORHOOD_STEP;
        }
        offset += NEIGHBORHOOD_STEP;
    }

    false
}

/// Snaps a tentative `(x, y, z)` anchor to a nearby container face or
/// another placement's face on each axis independently, within
/// `SNAP_DISTANCE`. Applied before the feasibility check in the caller's
/// pipeline, per §4.8.
pub fn snap(x: f64, y: f64, z: f64, eff_l: f64, eff_w: f64, eff_h: f64, container: &Container, others: &[Placement]) -> (f64, f64, f64) {
    let x = snap_axis(x, x + eff_l, container.length, others.iter().map(|p| (p.x, p.x + p.footprint().0)));
    let y = snap_axis(y, y + eff_w, container.width, others.iter().map(|p| (p.y, p.y + p.footprint().1)));
    let z = snap_axis(z, z + eff_h, container.height, others.iter().map(|p| (p.z, p.top_z())));
    (x, y, z)
}

fn snap_axis(lo: f64, hi: f64, container_dim: f64, faces: impl Iterator<Item = (f64, f64)>) -> f64 {
    let mut best_lo = lo;
    let mut best_delta = f64::INFINITY;

    let mut consider = |candidate_lo: f64| {
        let delta = (candidate_lo - lo).abs();
        if delta <= SNAP_DISTANCE && delta < best_delta {
            best_delta = delta;
            best_lo = candidate_lo;
        }
    };

    consider(0.0);
    consider(container_dim - (hi - lo));
    for (face_lo, face_hi) in faces {
        consider(face_lo - (hi - lo));
        consider(face_hi);
    }

    best_lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cargo, ContainerType};

    fn container() -> Container {
        Container::new("C", 100.0, 100.0, 100.0, 1000.0, ContainerType::Container).unwrap()
    }

    fn placement(x: f64, y: f64, z: f64) -> Placement {
        Placement {
            cargo: Cargo::new("a", "A", 20.0, 20.0, 20.0, 5.0).unwrap(),
            x,
            y,
            z,
            rotated: false,
            step_number: 1,
            container_index: 0,
        }
    }

    #[test]
    fn translate_commits_within_bounds() {
        let mut placements = vec![placement(0.0, 0.0, 0.0)];
        let ok = translate(&mut placements, 0, &container(), 10.0, 0.0, 0.0);
        assert!(ok);
        assert_eq!(placements[0].x, 10.0);
    }

    #[test]
    fn translate_clamps_to_container_bounds() {
        let mut placements = vec![placement(0.0, 0.0, 0.0)];
        let ok = translate(&mut placements, 0, &container(), 1000.0, 0.0, 0.0);
        assert!(ok);
        assert_eq!(placements[0].x, 80.0); // 100 - 20
    }

    #[test]
    fn translate_rejects_collision_with_another_placement() {
        let mut placements = vec![placement(0.0, 0.0, 0.0), placement(40.0, 0.0, 0.0)];
        let ok = translate(&mut placements, 0, &container(), 40.0, 0.0, 0.0);
        assert!(!ok);
        assert_eq!(placements[0].x, 0.0);
    }

    #[test]
    fn rotate_in_place_rejected_when_not_allowed() {
        let cargo_fixed = Cargo::new("a", "A", 20.0, 30.0, 20.0, 5.0).unwrap().with_allow_rotate(false);
        let mut placements = vec![Placement {
            cargo: cargo_fixed,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        }];
        assert!(!rotate_in_place(&mut placements, 0, &container()));
    }

    #[test]
    fn rotate_in_place_keeps_center_fixed_when_feasible() {
        let cargo = Cargo::new("a", "A", 20.0, 30.0, 20.0, 5.0).unwrap();
        let mut placements = vec![Placement {
            cargo,
            x: 10.0,
            y: 10.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        }];
        let before_center = placements[0].center();
        let ok = rotate_in_place(&mut placements, 0, &container());
        assert!(ok);
        assert!(placements[0].rotated);
        let after_center = placements[0].center();
        assert!((before_center.0 - after_center.0).abs() < 1e-6);
        assert!((before_center.1 - after_center.1).abs() < 1e-6);
    }

    #[test]
    fn snap_pulls_coordinate_to_nearby_wall() {
        let (x, _, _) = snap(3.0, 0.0, 0.0, 20.0, 20.0, 20.0, &container(), &[]);
        assert_eq!(x, 0.0);
    }

    #[test]
    fn snap_leaves_far_coordinate_untouched() {
        let (x, _, _) = snap(50.0, 0.0, 0.0, 20.0, 20.0, 20.0, &container(), &[]);
        assert_eq!(x, 50.0);
    }
}
