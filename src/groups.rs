//! Group expander (§4.6): folds locked groups into single synthetic
//! items, then unfolds every item's `quantity` into singletons.

use crate::model::{Cargo, CargoGroup, CargoId};

/// Folds `groups` into synthetic combined items and returns the full list
/// (group members removed, synthetics and ungrouped items kept), still
/// carrying `quantity` — callers that need singletons call
/// [`expand_quantities`] next.
pub fn expand_groups(items: &[Cargo], groups: &[CargoGroup]) -> Vec<Cargo> {
    let mut grouped_ids: Vec<&CargoId> = Vec::new();
    for group in groups {
        grouped_ids.extend(group.cargo_ids.iter());
    }

    let mut result: Vec<Cargo> = items
        .iter()
        .filter(|item| !grouped_ids.contains(&&item.id))
        .cloned()
        .collect();

    for group in groups {
        let members: Vec<&Cargo> = group
            .cargo_ids
            .iter()
            .filter_map(|id| items.iter().find(|item| &item.id == id))
            .collect();

        if members.is_empty() {
            continue;
        }

        let (length, width, height, weight) = match group.combined {
            Some(dims) => (dims.length, dims.width, dims.height, dims.weight),
            None => (
                members.iter().map(|m| m.length).fold(0.0_f64, f64::max),
                members.iter().map(|m| m.width).fold(0.0_f64, f64::max),
                members.iter().map(|m| m.height).sum(),
                members.iter().map(|m| m.weight).sum(),
            ),
        };

        let stackable = members.iter().all(|m| m.stackable);
        let color = members[0].color.clone();
        let source_ids: Vec<CargoId> = members.iter().map(|m| m.id.clone()).collect();

        let mut synthetic = Cargo::new(
            CargoId::new(group.id.clone()),
            group.name.clone(),
            length,
            width,
            height,
            weight,
        )
        .expect("group dimensions/mass derived from already-validated members");
        synthetic.stackable = stackable;
        synthetic.color = color;
        synthetic.group_id = Some(group.id.clone());
        synthetic.source_ids = source_ids;

        result.push(synthetic);
    }

    result
}

/// Unfolds each item's `quantity` into singletons with synthesized ids
/// `${id}_${index}`, `index` from 0. An item with `quantity == 1` is
/// still renamed to `${id}_0` for uniformity with multi-quantity siblings.
pub fn expand_quantities(items: &[Cargo]) -> Vec<Cargo> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        for index in 0..item.quantity {
            let mut singleton = item.clone();
            singleton.id = CargoId::synthesize(&item.id, index);
            singleton.quantity = 1;
            if singleton.source_ids.is_empty() {
                singleton.source_ids = vec![item.id.clone()];
            }
            result.push(singleton);
        }
    }
    result
}

/// Runs the full expansion pipeline: groups first, then quantities.
pub fn expand(items: &[Cargo], groups: &[CargoGroup]) -> Vec<Cargo> {
    expand_quantities(&expand_groups(items, groups))
}
