//! Multi-container orchestrator (§4.10): repeats the placement driver on
//! fresh container instances until the cargo is exhausted or the target
//! container count is reached.

use crate::driver::{self, Unplaced};
use crate::groups;
use crate::model::{Cargo, CargoGroup, Container, ContainerLoadingResult};
use crate::rules::Rule;

/// Result of orchestrating across up to `target_count` containers.
pub struct OrchestrationResult {
    pub results: Vec<ContainerLoadingResult>,
    /// Singletons that did not fit in any of the `target_count` containers.
    pub remainder: Vec<Unplaced>,
}

/// Runs the driver repeatedly against fresh instances of `container`,
/// re-applying the rule pipeline to the remainder before each container
/// per §4.10 (deliberately not a single global sort).
pub fn orchestrate(
    container: &Container,
    target_count: u32,
    rule_set: &[Rule],
    groups: &[CargoGroup],
    items: &[Cargo],
) -> OrchestrationResult {
    let mut remaining = groups::expand(items, groups);
    let mut results = Vec::new();

    for k in 1..=target_count {
        if remaining.is_empty() {
            break;
        }

        let (placed, unplaced) = driver::place_singletons(container, rule_set, &remaining);
        let placements: Vec<crate::model::Placement> = placed
            .into_iter()
            .map(|mut p| {
                p.container_index = k;
                p
            })
            .collect();

        results.push(ContainerLoadingResult {
            container: container.clone(),
            container_index: k,
            placements,
        });

        remaining = unplaced.into_iter().map(|u| u.cargo).collect();
    }

    let remainder = remaining
        .into_iter()
        .map(|cargo| Unplaced {
            cargo,
            reason: driver::UnplacedReason::NoFeasiblePosition,
        })
        .collect();

    OrchestrationResult { results, remainder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerType;

    fn container() -> Container {
        Container::new("C", 50.0, 50.0, 50.0, 1000.0, ContainerType::Container).unwrap()
    }

    #[test]
    fn single_container_absorbs_items_that_fit() {
        let item = Cargo::new("a", "A", 20.0, 20.0, 20.0, 5.0).unwrap().with_quantity(3).unwrap();
        let result = orchestrate(&container(), 1, &crate::rules::default_rules(), &[], &[item]);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].placements.len(), 3);
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn overflow_spills_into_second_container() {
        let item = Cargo::new("a", "A", 25.0, 25.0, 25.0, 5.0).unwrap().with_quantity(16).unwrap();
        let result = orchestrate(&container(), 2, &crate::rules::default_rules(), &[], &[item]);
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.results[0].container_index, 1);
        assert_eq!(result.results[1].container_index, 2);
        let total_placed: usize = result.results.iter().map(|r| r.placements.len()).sum();
        assert_eq!(total_placed + result.remainder.len(), 16);
    }

    #[test]
    fn remainder_beyond_target_count_is_reported() {
        let item = Cargo::new("a", "A", 500.0, 500.0, 500.0, 5.0).unwrap();
        let result = orchestrate(&container(), 1, &crate::rules::default_rules(), &[], &[item]);
        assert!(result.results.is_empty() || result.results[0].placements.is_empty());
        assert_eq!(result.remainder.len(), 1);
    }

    #[test]
    fn placements_are_tagged_with_container_index() {
        let item = Cargo::new("a", "A", 20.0, 20.0, 20.0, 5.0).unwrap();
        let result = orchestrate(&container(), 1, &crate::rules::default_rules(), &[], &[item]);
        assert_eq!(result.results[0].placements[0].container_index, 1);
    }
}
