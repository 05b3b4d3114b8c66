//! Palletization engine (§4.9): recursively applies the placement search
//! onto a synthetic pallet container, then folds the result into a single
//! pallet cargo item the outer driver treats as ordinary cargo.

use crate::candidates;
use crate::feasibility;
use crate::groups;
use crate::model::{Cargo, CargoId, Container, ContainerType, PalletContent};
use crate::preselect;
use crate::scorer;

/// Physical spec of a pallet to pack onto.
#[derive(Clone, Copy, Debug)]
pub struct PalletSpec {
    pub length: f64,
    pub width: f64,
    pub deck_thickness: f64,
    pub content_height_cap: f64,
    pub mass_cap: f64,
}

/// Outcome of a palletization attempt.
pub enum PalletizationOutcome {
    /// A pallet item was built; `remainder` holds singletons that did not
    /// fit on this pallet instance but could fit a further one.
    Packed { pallet: Cargo, remainder: Vec<Cargo> },
    /// The pallet spec cannot accommodate any of the supplied items.
    TooSmallForAnyItem,
    /// A pallet item was built from part of the input, but `oversized`
    /// holds items whose own footprint, height, or mass exceeds the pallet
    /// spec in every orientation — no number of further pallet instances
    /// of this spec would ever fit them. `remainder` holds items that do
    /// fit the spec but didn't make it onto this particular pallet.
    PalletTooSmall { pallet: Cargo, remainder: Vec<Cargo>, oversized: Vec<Cargo> },
}

/// Whether `item` could conceivably sit on an otherwise-empty pallet of
/// `spec`'s dimensions, ignoring other cargo already committed. An item
/// that fails this can never be palletized onto this spec no matter how
/// many pallet instances are tried.
fn fits_pallet_footprint(spec: &PalletSpec, item: &Cargo) -> bool {
    if item.weight > spec.mass_cap || item.height > spec.content_height_cap {
        return false;
    }
    let straight = item.length <= spec.length && item.width <= spec.width;
    let rotated = item.allow_rotate && item.width <= spec.length && item.length <= spec.width;
    straight || rotated
}

fn pallet_local_container(spec: &PalletSpec) -> Container {
    Container::new(
        "pallet",
        spec.length,
        spec.width,
        spec.content_height_cap,
        spec.mass_cap,
        ContainerType::Pallet,
    )
    .expect("pallet spec already validated by the caller")
}

/// Attempts one placement pass of `items` onto a single pallet instance,
/// per §4.9 steps 1-3. `items` should already be singleton cargo (no
/// `quantity > 1`); callers expand beforehand via [`groups::expand_quantities`].
pub fn palletize(spec: &PalletSpec, items: &[Cargo], pallet_id: impl Into<CargoId>) -> PalletizationOutcome {
    let container = pallet_local_container(spec);

    let mut remaining: Vec<Cargo> = items.to_vec();
    remaining.sort_by(|a, b| b.volume().total_cmp(&a.volume()));

    let mut committed: Vec<PalletContent> = Vec::new();
    let mut committed_mass = 0.0_f64;

    loop {
        let mut placed_this_pass = false;
        let mut still_remaining = Vec::with_capacity(remaining.len());

        for item in remaining {
            let as_placements: Vec<crate::model::Placement> = committed
                .iter()
                .map(|c| crate::model::Placement {
                    cargo: c.cargo.clone(),
                    x: c.x,
                    y: c.y,
                    z: c.z,
                    rotated: c.rotated,
                    step_number: 0,
                    container_index: 0,
                })
                .collect();

            let orientations: &[bool] = if item.allow_rotate { &[false, true] } else { &[false] };
            let mut best: Option<(f64, f64, f64, bool, f64)> = None;

            for &rotated in orientations {
                let points = candidates::primary_candidates(&as_placements, &item, rotated);
                for &(x, y, z) in &points {
                    if !feasibility::can_place(&item, x, y, z, rotated, &container, &as_placements) {
                        continue;
                    }
                    if committed_mass + item.weight > spec.mass_cap {
                        continue;
                    }
                    let mut score = scorer::score_candidate(x, y, z, rotated, &item, &container, &as_placements);
                    score += preselect::orientation_bonus(&item, &container, rotated);
                    if best.map(|(_, _, _, _, s)| score < s).unwrap_or(true) {
                        best = Some((x, y, z, rotated, score));
                    }
                }
            }

            match best {
                Some((x, y, z, rotated, _)) => {
                    committed_mass += item.weight;
                    committed.push(PalletContent { cargo: item, x, y, z, rotated });
                    placed_this_pass = true;
                }
                None => still_remaining.push(item),
            }
        }

        remaining = still_remaining;
        if !placed_this_pass || remaining.is_empty() {
            break;
        }
    }

    let (oversized, remainder): (Vec<Cargo>, Vec<Cargo>) =
        remaining.into_iter().partition(|item| !fits_pallet_footprint(spec, item));

    if committed.is_empty() {
        return PalletizationOutcome::TooSmallForAnyItem;
    }

    let max_top = committed.iter().map(|c| c.top_z()).fold(0.0_f64, f64::max);
    let pallet_height = spec.deck_thickness + max_top;
    let pallet_weight = committed.iter().map(|c| c.cargo.weight).sum::<f64>().max(1e-9);

    let mut pallet = Cargo::new(pallet_id, "Pallet", spec.length, spec.width, pallet_height, pallet_weight)
        .expect("pallet dimensions/mass derived from validated spec and contents");
    pallet.is_pallet = true;
    pallet.pallet_base_height = spec.deck_thickness;
    pallet.source_ids = committed.iter().map(|c| c.cargo.id.clone()).collect();
    pallet.pallet_contents = committed;

    if oversized.is_empty() {
        PalletizationOutcome::Packed { pallet, remainder }
    } else {
        PalletizationOutcome::PalletTooSmall { pallet, remainder, oversized }
    }
}

/// Fully expands `items`' quantities, then palletizes in one pass per
/// §4.9 step 1.
pub fn palletize_expanding(spec: &PalletSpec, items: &[Cargo], pallet_id: impl Into<CargoId>) -> PalletizationOutcome {
    let singletons = groups::expand_quantities(items);
    palletize(spec, &singletons, pallet_id)
}

/// Result of building as many pallets as `max_pallets` allows, mirroring
/// [`crate::multi_container::OrchestrationResult`]'s repeat-until-exhausted
/// shape for the pallet-as-mini-container case.
pub struct PalletBatch {
    pub pallets: Vec<Cargo>,
    /// Items that fit the pallet spec but ran out of pallet instances.
    pub remainder: Vec<Cargo>,
    /// Items that can never fit this pallet spec in any orientation.
    pub oversized: Vec<Cargo>,
}

/// Builds pallets from `items` one at a time (fresh pallet instance per
/// iteration) until either the input is exhausted, `max_pallets` is
/// reached, or a pass places nothing further — the orchestration loop
/// `pallet-too-small` implies: a single [`palletize`] call only reports on
/// one pallet instance, so a caller asking for the partial result across
/// every pallet they're willing to build needs this batch wrapper.
pub fn palletize_many(spec: &PalletSpec, items: &[Cargo], id_prefix: &str, max_pallets: u32) -> PalletBatch {
    let mut remaining = groups::expand_quantities(items);
    let mut pallets = Vec::new();
    let mut oversized = Vec::new();

    for k in 1..=max_pallets {
        if remaining.is_empty() {
            break;
        }
        match palletize(spec, &remaining, format!("{id_prefix}_{k}")) {
            PalletizationOutcome::Packed { pallet, remainder } => {
                pallets.push(pallet);
                remaining = remainder;
            }
            PalletizationOutcome::PalletTooSmall { pallet, remainder, oversized: found } => {
                pallets.push(pallet);
                oversized.extend(found);
                remaining = remainder;
            }
            PalletizationOutcome::TooSmallForAnyItem => {
                oversized.extend(remaining);
                remaining = Vec::new();
                break;
            }
        }
    }

    PalletBatch { pallets, remainder: remaining, oversized }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PalletSpec {
        PalletSpec {
            length: 120.0,
            width: 100.0,
            deck_thickness: 15.0,
            content_height_cap: 150.0,
            mass_cap: 500.0,
        }
    }

    #[test]
    fn packs_items_that_fit_onto_one_pallet() {
        let item = Cargo::new("a", "A", 40.0, 40.0, 40.0, 10.0).unwrap().with_quantity(4).unwrap();
        match palletize_expanding(&spec(), &[item], "p1") {
            PalletizationOutcome::Packed { pallet, remainder } => {
                assert!(pallet.is_pallet);
                assert_eq!(pallet.pallet_contents.len(), 4);
                assert!(remainder.is_empty());
            }
            other => panic!("expected a packed pallet, got {}", outcome_label(&other)),
        }
    }

    #[test]
    fn pallet_height_includes_deck_thickness() {
        let item = Cargo::new("a", "A", 40.0, 40.0, 30.0, 10.0).unwrap();
        match palletize_expanding(&spec(), &[item], "p1") {
            PalletizationOutcome::Packed { pallet, .. } => {
                assert!((pallet.height - (15.0 + 30.0)).abs() < 1e-9);
            }
            other => panic!("expected a packed pallet, got {}", outcome_label(&other)),
        }
    }

    #[test]
    fn oversized_item_is_reported_too_small() {
        let item = Cargo::new("a", "A", 500.0, 500.0, 500.0, 10.0).unwrap();
        match palletize_expanding(&spec(), &[item], "p1") {
            PalletizationOutcome::TooSmallForAnyItem => {}
            other => panic!("expected too-small outcome, got {}", outcome_label(&other)),
        }
    }

    #[test]
    fn excess_mass_spills_into_remainder() {
        let item = Cargo::new("a", "A", 10.0, 10.0, 10.0, 200.0).unwrap().with_quantity(5).unwrap();
        match palletize_expanding(&spec(), &[item], "p1") {
            PalletizationOutcome::Packed { pallet, remainder } => {
                assert!(pallet.weight <= spec().mass_cap + 1e-9);
                assert!(!remainder.is_empty());
            }
            other => panic!("expected a packed pallet, got {}", outcome_label(&other)),
        }
    }

    #[test]
    fn oversized_item_alongside_fitting_ones_reports_pallet_too_small() {
        let fits = Cargo::new("a", "A", 40.0, 40.0, 40.0, 10.0).unwrap();
        let too_big = Cargo::new("b", "B", 500.0, 500.0, 500.0, 10.0).unwrap();
        match palletize_expanding(&spec(), &[fits, too_big], "p1") {
            PalletizationOutcome::PalletTooSmall { pallet, oversized, .. } => {
                assert!(pallet.is_pallet);
                assert_eq!(oversized.len(), 1);
                assert_eq!(oversized[0].id, CargoId::new("b"));
            }
            other => panic!("expected pallet-too-small outcome, got {}", outcome_label(&other)),
        }
    }

    #[test]
    fn palletize_many_builds_pallets_until_remainder_is_absorbed() {
        let item = Cargo::new("a", "A", 40.0, 40.0, 40.0, 10.0).unwrap().with_quantity(12).unwrap();
        let batch = palletize_many(&spec(), &[item], "p", 4);
        assert!(batch.pallets.len() > 1);
        assert!(batch.remainder.is_empty());
        assert!(batch.oversized.is_empty());
    }

    #[test]
    fn palletize_many_reports_oversized_items_separately_from_remainder() {
        let fits = Cargo::new("a", "A", 40.0, 40.0, 40.0, 10.0).unwrap().with_quantity(20).unwrap();
        let too_big = Cargo::new("b", "B", 500.0, 500.0, 500.0, 10.0).unwrap();
        let batch = palletize_many(&spec(), &[fits, too_big], "p", 2);
        assert_eq!(batch.oversized.len(), 1);
        assert_eq!(batch.oversized[0].id, CargoId::new("b"));
        assert!(!batch.remainder.is_empty() || batch.pallets.len() == 2);
    }

    fn outcome_label(outcome: &PalletizationOutcome) -> &'static str {
        match outcome {
            PalletizationOutcome::Packed { .. } => "Packed",
            PalletizationOutcome::TooSmallForAnyItem => "TooSmallForAnyItem",
            PalletizationOutcome::PalletTooSmall { .. } => "PalletTooSmall",
        }
    }
}
