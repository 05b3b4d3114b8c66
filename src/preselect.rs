//! Orientation preselector (§4.4): decides, ahead of the candidate search,
//! which of an item's two admissible orientations tiles a layer more
//! densely, and hands back the tie-breaking bonus the scorer applies.

use crate::model::{Cargo, Container};

/// Score bonus (subtracted, since lower is better) a candidate receives
/// when it uses the orientation this preselector designates as optimal.
pub const OPTIMAL_ORIENTATION_BONUS: f64 = -100.0;

/// Per-layer tiling count for an `l x w` footprint over an `L x W` floor.
fn tiling_count(container_l: f64, container_w: f64, item_l: f64, item_w: f64) -> u64 {
    let fit_l = (container_l / item_l).floor().max(0.0) as u64;
    let fit_w = (container_w / item_w).floor().max(0.0) as u64;
    fit_l * fit_w
}

/// Whether `rotated` is the orientation with the higher per-layer tiling
/// count for `item` in the (empty) `container`. Ties favor the
/// non-rotated orientation.
pub fn is_optimal_orientation(item: &Cargo, container: &Container, rotated: bool) -> bool {
    if !item.allow_rotate {
        return !rotated;
    }

    let upright = tiling_count(container.length, container.width, item.length, item.width);
    let rotated_count = tiling_count(container.length, container.width, item.width, item.length);

    if rotated {
        rotated_count > upright
    } else {
        upright >= rotated_count
    }
}

/// The bonus to add to a candidate's score for this orientation, per §4.4.
pub fn orientation_bonus(item: &Cargo, container: &Container, rotated: bool) -> f64 {
    if is_optimal_orientation(item, container, rotated) {
        OPTIMAL_ORIENTATION_BONUS
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerType;

    fn container() -> Container {
        Container::new("C", 100.0, 45.0, 50.0, 1000.0, ContainerType::Container).unwrap()
    }

    #[test]
    fn prefers_orientation_with_more_copies_per_layer() {
        // Upright: floor(100/30)*floor(45/40) = 3*1 = 3
        // Rotated: floor(100/40)*floor(45/30) = 2*1 = 2
        let item = Cargo::new("a", "A", 30.0, 40.0, 10.0, 5.0).unwrap();
        assert!(is_optimal_orientation(&item, &container(), false));
        assert!(!is_optimal_orientation(&item, &container(), true));
    }

    #[test]
    fn non_rotatable_item_is_always_optimal_upright() {
        let item = Cargo::new("a", "A", 30.0, 40.0, 10.0, 5.0).unwrap().with_allow_rotate(false);
        assert!(is_optimal_orientation(&item, &container(), false));
        assert!(!is_optimal_orientation(&item, &container(), true));
    }

    #[test]
    fn bonus_applies_only_to_optimal_orientation() {
        let item = Cargo::new("a", "A", 30.0, 40.0, 10.0, 5.0).unwrap();
        assert_eq!(orientation_bonus(&item, &container(), false), OPTIMAL_ORIENTATION_BONUS);
        assert_eq!(orientation_bonus(&item, &container(), true), 0.0);
    }
}
