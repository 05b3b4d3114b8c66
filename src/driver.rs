//! Placement driver (§4.7): the outer loop tying together group/quantity
//! expansion, the rule pipeline, candidate generation, the feasibility
//! oracle, orientation preselection, and the scorer.

use crate::candidates;
use crate::feasibility;
use crate::groups;
use crate::model::{Cargo, CargoGroup, Container, Placement};
use crate::preselect;
use crate::rules::Rule;
use crate::scorer;

/// A singleton that could not be placed, paired with the reason the
/// caller-facing layer maps to its own error taxonomy.
#[derive(Clone, Debug)]
pub struct Unplaced {
    pub cargo: Cargo,
    pub reason: UnplacedReason,
}

/// Why a singleton failed to find a feasible placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnplacedReason {
    /// Neither the primary search nor the grid fallback found a feasible
    /// anchor for any admissible orientation.
    NoFeasiblePosition,
    /// The item does not fit in the empty container under any admissible
    /// orientation regardless of other placements.
    TooLargeForContainer,
}

struct BestCandidate {
    x: f64,
    y: f64,
    z: f64,
    rotated: bool,
    score: f64,
}

fn fits_empty_container(item: &Cargo, container: &Container) -> bool {
    let orientations: &[bool] = if item.allow_rotate { &[false, true] } else { &[false] };
    orientations.iter().any(|&rotated| {
        let (l, w) = item.footprint(rotated);
        l <= container.length + crate::geometry::EPSILON_BOUNDARY
            && w <= container.width + crate::geometry::EPSILON_BOUNDARY
            && item.height <= container.height + crate::geometry::EPSILON_BOUNDARY
    })
}

fn orientations_to_try(item: &Cargo, container: &Container) -> Vec<bool> {
    if !item.allow_rotate {
        return vec![false];
    }
    let optimal_rotated = preselect::is_optimal_orientation(item, container, true);
    if optimal_rotated { vec![true, false] } else { vec![false, true] }
}

fn search_candidates(
    points: &[(f64, f64, f64)],
    item: &Cargo,
    rotated: bool,
    container: &Container,
    placed: &[Placement],
) -> Option<BestCandidate> {
    let mut best: Option<BestCandidate> = None;
    for &(x, y, z) in points {
        if !feasibility::can_place(item, x, y, z, rotated, container, placed) {
            continue;
        }
        let mut score = scorer::score_candidate(x, y, z, rotated, item, container, placed);
        score += preselect::orientation_bonus(item, container, rotated);

        if best.as_ref().map(|b| score < b.score).unwrap_or(true) {
            best = Some(BestCandidate { x, y, z, rotated, score });
        }
    }
    best
}

fn best_for_item(item: &Cargo, container: &Container, placed: &[Placement]) -> Option<BestCandidate> {
    let mut best: Option<BestCandidate> = None;

    for rotated in orientations_to_try(item, container) {
        let primary = candidates::primary_candidates(placed, item, rotated);
        if let Some(candidate) = search_candidates(&primary, item, rotated, container, placed) {
            if best.as_ref().map(|b| candidate.score < b.score).unwrap_or(true) {
                best = Some(candidate);
            }
        }
    }

    if best.is_none() {
        let grid = candidates::grid_fallback_candidates(placed, container);
        for rotated in orientations_to_try(item, container) {
            if let Some(candidate) = search_candidates(&grid, item, rotated, container, placed) {
                if best.as_ref().map(|b| candidate.score < b.score).unwrap_or(true) {
                    best = Some(candidate);
                }
            }
        }
    }

    best
}

/// Runs the full driver per §4.7: expands groups and quantities, orders
/// singletons via `rule_set`, then places them one at a time, committing
/// the best feasible candidate or recording the item as unplaced.
///
/// An empty `items` list returns two empty lists. Behavior on a
/// zero-dimension container is undefined (caller error, per contract).
pub fn run(
    container: &Container,
    rule_set: &[Rule],
    groups: &[CargoGroup],
    items: &[Cargo],
) -> (Vec<Placement>, Vec<Unplaced>) {
    let singletons = groups::expand(items, groups);
    place_singletons(container, rule_set, &singletons)
}

/// Runs steps 2-3 of §4.7 directly against an already-expanded singleton
/// list (`quantity == 1`, no group folding needed). Used by orchestration
/// layers that expand once up front and must not re-synthesize ids on
/// every subsequent container.
pub fn place_singletons(
    container: &Container,
    rule_set: &[Rule],
    singletons: &[Cargo],
) -> (Vec<Placement>, Vec<Unplaced>) {
    place_singletons_with_progress(container, rule_set, singletons, |_| {})
}

/// One step of the driver's progress, emitted as each singleton is
/// resolved. Used by callers (e.g. the demo service's SSE endpoint) that
/// want to narrate the loading sequence as it happens rather than wait
/// for the full result.
#[derive(Clone, Debug)]
pub enum DriverEvent {
    Placed(Placement),
    Unplaced(Unplaced),
}

/// Same as [`place_singletons`], but invokes `on_event` after each item is
/// resolved (placed or unplaced), in rule-pipeline order.
pub fn place_singletons_with_progress(
    container: &Container,
    rule_set: &[Rule],
    singletons: &[Cargo],
    mut on_event: impl FnMut(&DriverEvent),
) -> (Vec<Placement>, Vec<Unplaced>) {
    let ordered = crate::rules::apply_rules(rule_set, singletons);

    let mut placed: Vec<Placement> = Vec::new();
    let mut unplaced: Vec<Unplaced> = Vec::new();
    let mut next_step = 1u32;

    for item in &ordered {
        match best_for_item(item, container, &placed) {
            Some(best) => {
                let placement = Placement {
                    cargo: item.clone(),
                    x: best.x,
                    y: best.y,
                    z: best.z,
                    rotated: best.rotated,
                    step_number: next_step,
                    container_index: 0,
                };
                next_step += 1;
                placed.push(placement.clone());
                on_event(&DriverEvent::Placed(placement));
            }
            None => {
                let reason = if fits_empty_container(item, container) {
                    UnplacedReason::NoFeasiblePosition
                } else {
                    UnplacedReason::TooLargeForContainer
                };
                let entry = Unplaced { cargo: item.clone(), reason };
                unplaced.push(entry.clone());
                on_event(&DriverEvent::Unplaced(entry));
            }
        }
    }

    (placed, unplaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerType;

    fn container() -> Container {
        Container::new("C", 100.0, 100.0, 100.0, 10_000.0, ContainerType::Container).unwrap()
    }

    #[test]
    fn empty_item_list_returns_empty_results() {
        let (placed, unplaced) = run(&container(), &crate::rules::default_rules(), &[], &[]);
        assert!(placed.is_empty());
        assert!(unplaced.is_empty());
    }

    #[test]
    fn single_item_placed_at_origin() {
        let item = Cargo::new("a", "A", 30.0, 20.0, 20.0, 5.0).unwrap();
        let (placed, unplaced) = run(&container(), &crate::rules::default_rules(), &[], &[item]);
        assert_eq!(placed.len(), 1);
        assert!(unplaced.is_empty());
        assert_eq!((placed[0].x, placed[0].y, placed[0].z), (0.0, 0.0, 0.0));
    }

    #[test]
    fn oversized_item_is_unplaced_with_too_large_reason() {
        let item = Cargo::new("a", "A", 500.0, 500.0, 500.0, 5.0).unwrap();
        let (placed, unplaced) = run(&container(), &crate::rules::default_rules(), &[], &[item]);
        assert!(placed.is_empty());
        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].reason, UnplacedReason::TooLargeForContainer);
    }

    #[test]
    fn quantity_expands_into_multiple_placements() {
        let item = Cargo::new("a", "A", 10.0, 10.0, 10.0, 5.0).unwrap().with_quantity(3).unwrap();
        let (placed, unplaced) = run(&container(), &crate::rules::default_rules(), &[], &[item]);
        assert_eq!(placed.len(), 3);
        assert!(unplaced.is_empty());
        // Step numbers are monotonically increasing.
        let mut steps: Vec<u32> = placed.iter().map(|p| p.step_number).collect();
        steps.sort();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn placements_respect_container_bounds() {
        let item = Cargo::new("a", "A", 30.0, 30.0, 30.0, 5.0).unwrap().with_quantity(10).unwrap();
        let (placed, _) = run(&container(), &crate::rules::default_rules(), &[], &[item]);
        for p in &placed {
            let (l, w) = p.footprint();
            assert!(p.x + l <= container().length + 0.01);
            assert!(p.y + w <= container().width + 0.01);
            assert!(p.z + p.cargo.height <= container().height + 0.01);
        }
    }

    #[test]
    fn progress_callback_fires_once_per_item() {
        let item = Cargo::new("a", "A", 20.0, 20.0, 20.0, 5.0).unwrap().with_quantity(3).unwrap();
        let singletons = crate::groups::expand(&[item], &[]);
        let mut events = Vec::new();
        place_singletons_with_progress(&container(), &crate::rules::default_rules(), &singletons, |e| {
            events.push(e.clone());
        });
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn no_two_placements_overlap() {
        let item = Cargo::new("a", "A", 20.0, 20.0, 20.0, 5.0).unwrap().with_quantity(8).unwrap();
        let (placed, _) = run(&container(), &crate::rules::default_rules(), &[], &[item]);
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                assert!(!crate::geometry::intersects(&placed[i], &placed[j]));
            }
        }
    }
}
