//! Geometric helpers for 3D collision detection and support-area
//! calculation.
//!
//! All tolerances here are the fixed absolute tolerances from the loading
//! engine's contract (§4.1): boundary and collision checks use 0.01,
//! support-layer height matching uses 0.1. Neither is caller-configurable —
//! the feasibility oracle's invariants must reproduce exactly.

use crate::model::Placement;

/// General numeric/boundary tolerance (cm).
pub const EPSILON_BOUNDARY: f64 = 0.01;

/// Tolerance for matching a placement's top-z against another's bottom-z
/// when accumulating support area.
pub const EPSILON_SUPPORT_HEIGHT: f64 = 0.1;

/// Checks whether two placements' axis-aligned boxes overlap in their
/// interiors, within `EPSILON_BOUNDARY`.
///
/// Two boxes do NOT intersect if they are separated on at least one axis
/// (the separating axis theorem for AABBs).
#[inline]
pub fn intersects(a: &Placement, b: &Placement) -> bool {
    let (al, aw) = a.footprint();
    let (bl, bw) = b.footprint();
    let ah = a.cargo.height;
    let bh = b.cargo.height;

    !(a.x + al <= b.x + EPSILON_BOUNDARY
        || b.x + bl <= a.x + EPSILON_BOUNDARY
        || a.y + aw <= b.y + EPSILON_BOUNDARY
        || b.y + bw <= a.y + EPSILON_BOUNDARY
        || a.z + ah <= b.z + EPSILON_BOUNDARY
        || b.z + bh <= a.z + EPSILON_BOUNDARY)
}

/// Overlap length of two 1D intervals, at least 0.
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// Overlap area of two placements' footprints in the XY plane, ignoring Z.
pub fn overlap_area_xy(a: &Placement, b: &Placement) -> f64 {
    let (al, aw) = a.footprint();
    let (bl, bw) = b.footprint();
    let overlap_x = overlap_1d(a.x, a.x + al, b.x, b.x + bl);
    let overlap_y = overlap_1d(a.y, a.y + aw, b.y, b.y + bw);
    overlap_x * overlap_y
}

/// Checks if a point lies inside a placement's box (inclusive).
#[inline]
pub fn point_inside(point: (f64, f64, f64), placement: &Placement) -> bool {
    let (px, py, pz) = point;
    let (l, w) = placement.footprint();
    px >= placement.x
        && px <= placement.x + l
        && py >= placement.y
        && py <= placement.y + w
        && pz >= placement.z
        && pz <= placement.z + placement.cargo.height
}

/// Whether `upper` rests directly on `lower`: its bottom touches `lower`'s
/// top (within `EPSILON_SUPPORT_HEIGHT`) and their footprints overlap.
#[inline]
pub fn rests_on(upper: &Placement, lower: &Placement) -> bool {
    if (upper.z - lower.top_z()).abs() > EPSILON_SUPPORT_HEIGHT {
        return false;
    }
    overlap_area_xy(upper, lower) > 0.0
}

/// Support area `upper` receives from `lower` (0 if not in contact).
pub fn support_area(upper: &Placement, lower: &Placement) -> f64 {
    if (upper.z - lower.top_z()).abs() > EPSILON_SUPPORT_HEIGHT {
        0.0
    } else {
        overlap_area_xy(upper, lower)
    }
}

/// Euclidean 2D distance between two points.
#[inline]
pub fn distance_2d(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}
