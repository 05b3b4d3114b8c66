//! Placement scorer (§4.3): ranks feasible candidate anchors so the driver
//! can pick the best one. Lower score wins.

use crate::model::{Cargo, Container, Placement};

const CONTACT_EPSILON: f64 = 0.1;
const WALL_EPSILON: f64 = 0.01;
const SLIVER_WIDTH: f64 = 30.0;

/// Scores a feasible candidate `(x, y, z, rotated)` against the placements
/// already committed in `container`. Lower is better.
pub fn score_candidate(
    x: f64,
    y: f64,
    z: f64,
    rotated: bool,
    item: &Cargo,
    container: &Container,
    placed: &[Placement],
) -> f64 {
    let (eff_l, eff_w) = item.footprint(rotated);
    let eff_h = item.height;

    let mut score = x * 1.0 + y * 1.5 + z * 2.0;

    for p in placed {
        score += contact_bonus(x, y, z, eff_l, eff_w, eff_h, p);
    }

    if x.abs() < WALL_EPSILON {
        score += -0.005 * eff_w * eff_h;
    }
    if y.abs() < WALL_EPSILON {
        score += -0.005 * eff_l * eff_h;
    }
    if z.abs() < WALL_EPSILON {
        score += -0.01 * eff_l * eff_w;
    }

    let remaining_x = container.length - (x + eff_l);
    if remaining_x > 0.0 && remaining_x < SLIVER_WIDTH {
        score += 0.5 * remaining_x;
    }
    let remaining_y = container.width - (y + eff_w);
    if remaining_y > 0.0 && remaining_y < SLIVER_WIDTH {
        score += 0.5 * remaining_y;
    }

    score
}

fn contact_bonus(x: f64, y: f64, z: f64, eff_l: f64, eff_w: f64, eff_h: f64, p: &Placement) -> f64 {
    let (pl, pw) = p.footprint();
    let ph = p.cargo.height;

    let y_overlap = overlap_1d(y, y + eff_w, p.y, p.y + pw);
    let z_overlap = overlap_1d(z, z + eff_h, p.z, p.z + ph);
    let x_overlap = overlap_1d(x, x + eff_l, p.x, p.x + pl);

    let mut bonus = 0.0;

    let touches_minus_x = (x - (p.x + pl)).abs() < CONTACT_EPSILON;
    let touches_plus_x = (p.x - (x + eff_l)).abs() < CONTACT_EPSILON;
    if (touches_minus_x || touches_plus_x) && y_overlap > 0.0 && z_overlap > 0.0 {
        bonus += -0.01 * y_overlap * z_overlap;
    }

    let touches_minus_y = (y - (p.y + pw)).abs() < CONTACT_EPSILON;
    let touches_plus_y = (p.y - (y + eff_w)).abs() < CONTACT_EPSILON;
    if (touches_minus_y || touches_plus_y) && x_overlap > 0.0 && z_overlap > 0.0 {
        bonus += -0.01 * x_overlap * z_overlap;
    }

    let rests_on_p = (z - (p.z + ph)).abs() < CONTACT_EPSILON;
    let p_rests_on_candidate = (p.z - (z + eff_h)).abs() < CONTACT_EPSILON;
    if (rests_on_p || p_rests_on_candidate) && x_overlap > 0.0 && y_overlap > 0.0 {
        bonus += -0.02 * x_overlap * y_overlap;
    }

    bonus
}

fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
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
    fn origin_scores_lower_than_far_corner() {
        let origin = score_candidate(0.0, 0.0, 0.0, false, &cargo(), &container(), &[]);
        let far = score_candidate(50.0, 50.0, 0.0, false, &cargo(), &container(), &[]);
        assert!(origin < far);
    }

    #[test]
    fn height_penalty_exceeds_lateral_penalty() {
        let lateral = score_candidate(0.0, 10.0, 0.0, false, &cargo(), &container(), &[]);
        let vertical = score_candidate(0.0, 0.0, 10.0, false, &cargo(), &container(), &[]);
        assert!(vertical > lateral);
    }

    #[test]
    fn touching_neighbor_improves_score() {
        let neighbor = Placement {
            cargo: cargo(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotated: false,
            step_number: 1,
            container_index: 0,
        };
        let touching = score_candidate(30.0, 0.0, 0.0, false, &cargo(), &container(), &[neighbor.clone()]);
        let isolated = score_candidate(60.0, 40.0, 0.0, false, &cargo(), &container(), &[neighbor]);
        assert!(touching < isolated);
    }

    #[test]
    fn sliver_gap_adds_penalty() {
        let wide_container = Container::new("C", 61.0, 80.0, 50.0, 1000.0, ContainerType::Container).unwrap();
        let score = score_candidate(0.0, 0.0, 0.0, false, &cargo(), &wide_container, &[]);
        let no_sliver = Container::new("C", 100.0, 80.0, 50.0, 1000.0, ContainerType::Container).unwrap();
        let baseline = score_candidate(0.0, 0.0, 0.0, false, &cargo(), &no_sliver, &[]);
        assert!(score > baseline);
    }
}
