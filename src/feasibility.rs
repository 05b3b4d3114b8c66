//! The feasibility oracle: answers whether a cargo item can be placed at a
//! given anchor and rotation, given the placements already committed.
//!
//! Implements the ordered checks of §4.1: rotation admissibility,
//! bottom-only, non-negative anchor, container bounds, pairwise collision,
//! and the 70% support-area rule for any placement above the floor.

use crate::geometry::{self, EPSILON_BOUNDARY, EPSILON_SUPPORT_HEIGHT};
use crate::model::{Cargo, Container, Placement};

/// Minimum fraction of a stacked item's footprint that must rest on the
/// layer below it. Fixed by contract; not caller-configurable.
pub const SUPPORT_RATIO: f64 = 0.7;

/// Builds the transient `Placement` a feasibility check or candidate score
/// is evaluated against. `step_number`/`container_index` are placeholders;
/// callers that commit a winning candidate re-stamp them.
pub(crate) fn candidate_placement(cargo: &Cargo, x: f64, y: f64, z: f64, rotated: bool) -> Placement {
    Placement {
        cargo: cargo.clone(),
        x,
        y,
        z,
        rotated,
        step_number: 0,
        container_index: 0,
    }
}

/// `can_place` from §4.1: true iff `cargo`, placed at `(x, y, z)` with the
/// given rotation, satisfies every invariant of §3 against `placed`.
pub fn can_place(
    cargo: &Cargo,
    x: f64,
    y: f64,
    z: f64,
    rotated: bool,
    container: &Container,
    placed: &[Placement],
) -> bool {
    if rotated && !cargo.allow_rotate {
        return false;
    }
    if cargo.bottom_only && z > EPSILON_BOUNDARY {
        return false;
    }
    if x < -EPSILON_BOUNDARY || y < -EPSILON_BOUNDARY || z < -EPSILON_BOUNDARY {
        return false;
    }

    let (eff_l, eff_w) = cargo.footprint(rotated);
    let eff_h = cargo.height;

    if x + eff_l > container.length + EPSILON_BOUNDARY
        || y + eff_w > container.width + EPSILON_BOUNDARY
        || z + eff_h > container.height + EPSILON_BOUNDARY
    {
        return false;
    }

    let candidate = candidate_placement(cargo, x, y, z, rotated);

    if placed.iter().any(|p| geometry::intersects(p, &candidate)) {
        return false;
    }

    if z > EPSILON_BOUNDARY {
        let support_area: f64 = placed
            .iter()
            .filter(|p| (p.top_z() - z).abs() <= EPSILON_SUPPORT_HEIGHT)
            .map(|p| geometry::overlap_area_xy(&candidate, p))
            .sum();

        if support_area < SUPPORT_RATIO * eff_l * eff_w {
            return false;
        }

        if let Some(max_stack) = cargo.max_stack {
            if stack_depth(&candidate, placed) > max_stack {
                return false;
            }
        }
    }

    true
}

/// Depth (1-based, floor = 1) of the stack a placement sits at: one more
/// than the deepest placement directly supporting it. A "layer" is a
/// maximal chain connected by top-to-bottom support at this XY location,
/// per the `max_stack` supplement (SPEC_FULL §4).
fn stack_depth(placement: &Placement, placed: &[Placement]) -> u32 {
    if placement.z <= EPSILON_BOUNDARY {
        return 1;
    }
    placed
        .iter()
        .filter(|p| geometry::rests_on(placement, p))
        .map(|p| stack_depth(p, placed))
        .max()
        .map(|d| d + 1)
        .unwrap_or(1)
}
