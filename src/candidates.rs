//! Candidate anchor generation for the placement search (§4.2).
//!
//! The primary search proposes a small, structurally deduplicated set of
//! anchors derived from the already-placed boxes. When nothing in that set
//! is feasible, the driver falls back to a bounded grid sweep.

use crate::model::{Cargo, Container, Placement};

/// Grid step (cm) used by the fallback sweep.
pub const GRID_STEP: f64 = 10.0;

/// Generates the primary candidate set for `item` against `placed`, per
/// §4.2. Candidates are deduplicated structurally (exact coordinate match)
/// and carry no score; ordering is not meaningful at this stage.
pub fn primary_candidates(placed: &[Placement], item: &Cargo, rotated: bool) -> Vec<(f64, f64, f64)> {
    let (eff_l, eff_w) = item.footprint(rotated);
    let mut candidates = Vec::new();
    push_unique(&mut candidates, (0.0, 0.0, 0.0));

    for p in placed {
        let (pl, pw) = p.footprint();

        push_unique(&mut candidates, (p.x + pl, p.y, p.z));
        push_unique(&mut candidates, (p.x, p.y + pw, p.z));
        if p.cargo.stackable && !item.bottom_only {
            push_unique(&mut candidates, (p.x, p.y, p.top_z()));
        }

        push_unique(&mut candidates, (p.x + pl, 0.0, p.z));
        push_unique(&mut candidates, (0.0, p.y + pw, p.z));
        push_unique(&mut candidates, (p.x + pl, 0.0, 0.0));
        push_unique(&mut candidates, (0.0, p.y + pw, 0.0));
        push_unique(&mut candidates, (0.0, p.y, p.z));
        push_unique(&mut candidates, (p.x, 0.0, p.z));
    }

    let _ = (eff_l, eff_w);
    candidates
}

fn push_unique(candidates: &mut Vec<(f64, f64, f64)>, point: (f64, f64, f64)) {
    let exists = candidates.iter().any(|&(x, y, z)| {
        (x - point.0).abs() < 1e-9 && (y - point.1).abs() < 1e-9 && (z - point.2).abs() < 1e-9
    });
    if !exists {
        candidates.push(point);
    }
}

/// Grid fallback of §4.2: a bounded sweep over z-levels derived from the
/// floor and every placement's top, crossed with an `x`/`y` grid at
/// `GRID_STEP`. Invoked only when the primary search finds nothing feasible.
pub fn grid_fallback_candidates(placed: &[Placement], container: &Container) -> Vec<(f64, f64, f64)> {
    let mut z_levels: Vec<f64> = vec![0.0];
    for p in placed {
        let top = p.top_z();
        if !z_levels.iter().any(|&z| (z - top).abs() < 1e-9) {
            z_levels.push(top);
        }
    }

    let mut candidates = Vec::new();
    for &z in &z_levels {
        let mut x = 0.0;
        while x < container.length {
            let mut y = 0.0;
            while y < container.width {
                candidates.push((x, y, z));
                y += GRID_STEP;
            }
            x += GRID_STEP;
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerType;

    fn container() -> Container {
        Container::new("C", 100.0, 80.0, 50.0, 1000.0, ContainerType::Container).unwrap()
    }

    fn cargo() -> Cargo {
        Cargo::new("a", "A", 30.0, 20.0, 20.0, 5.0).unwrap()
    }

    #[test]
    fn primary_candidates_includes_origin_on_empty_container() {
        let candidates = primary_candidates(&[], &cargo(), false);
        assert_eq!(candidates, vec![(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn primary_candidates_includes_right_and_back_neighbors() {
        let base = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let candidates = primary_candidates(&[base], &cargo(), false);
        assert!(candidates.contains(&(30.0, 0.0, 0.0)));
        assert!(candidates.contains(&(0.0, 20.0, 0.0)));
    }

    #[test]
    fn primary_candidates_includes_stacked_top_when_stackable() {
        let base = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let candidates = primary_candidates(&[base], &cargo(), false);
        assert!(candidates.contains(&(0.0, 0.0, 20.0)));
    }

    #[test]
    fn primary_candidates_omits_stacked_top_for_bottom_only_item() {
        let base = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let bottom_only = cargo().with_bottom_only(true);
        let candidates = primary_candidates(&[base], &bottom_only, false);
        assert!(!candidates.contains(&(0.0, 0.0, 20.0)));
    }

    #[test]
    fn primary_candidates_deduplicates_structurally() {
        let a = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let b = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 2,
            container_index: 0,
        };
        let candidates = primary_candidates(&[a, b], &cargo(), false);
        let origin_count = candidates.iter().filter(|&&p| p == (0.0, 0.0, 0.0)).count();
        assert_eq!(origin_count, 1);
    }

    #[test]
    fn grid_fallback_covers_floor_and_stack_levels() {
        let base = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let candidates = grid_fallback_candidates(&[base], &container());
        assert!(candidates.iter().any(|&(_, _, z)| z == 0.0));
        assert!(candidates.iter().any(|&(_, _, z)| (z - 20.0).abs() < 1e-9));
    }
}
