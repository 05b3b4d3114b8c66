//! Post-placement analytics (§4.11): center of gravity, utilizations,
//! loading step derivation, tail-space analysis, and the securing
//! heuristic.

use crate::model::{Container, ContainerType, Placement};
use crate::types::Vec3;

/// Mass threshold (kg) above which securing advice recommends strap
/// restraint.
const STRAP_RESTRAINT_THRESHOLD_KG: f64 = 500.0;

/// How many placements, counted from the end of the loading order,
/// receive "tail bracing" advice.
const TAIL_BRACING_WINDOW: usize = 3;

/// Lateral gap (cm) below which a last-row placement is considered close
/// enough to the container's rear face to matter for tail-space analysis.
const LAST_ROW_GAP_CM: f64 = 50.0;

/// Mass-weighted mean of placement centers; `(0,0,0)` if `placements` is
/// empty.
pub fn center_of_gravity(placements: &[Placement]) -> Vec3 {
    let total_mass: f64 = placements.iter().map(|p| p.cargo.weight).sum();
    if total_mass <= 0.0 {
        return Vec3::new(0.0, 0.0, 0.0);
    }

    let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
    for p in placements {
        let (cx, cy, cz) = p.center();
        sx += cx * p.cargo.weight;
        sy += cy * p.cargo.weight;
        sz += cz * p.cargo.weight;
    }
    Vec3::new(sx / total_mass, sy / total_mass, sz / total_mass)
}

/// CoG minus the container's geometric center.
pub fn cog_offset(placements: &[Placement], container: &Container) -> Vec3 {
    let cog = center_of_gravity(placements);
    Vec3::new(
        cog.x - container.length / 2.0,
        cog.y - container.width / 2.0,
        cog.z - container.height / 2.0,
    )
}

/// Lateral balance status: "good" when the offset is within 10% of the
/// container's length/width, else "biased".
pub fn lateral_balance_status(placements: &[Placement], container: &Container) -> &'static str {
    let offset = cog_offset(placements, container);
    if offset.x.abs() < 0.1 * container.length && offset.y.abs() < 0.1 * container.width {
        "good"
    } else {
        "biased"
    }
}

/// Summary utilization and CoG statistics for a committed placement set.
#[derive(Clone, Debug)]
pub struct Statistics {
    pub loaded_count: usize,
    pub total_volume: f64,
    pub volume_utilization: f64,
    pub total_weight: f64,
    pub weight_utilization: f64,
    /// Whether `total_weight` exceeds `container.max_weight`. This is
    /// reported, never enforced — the driver does not refuse placements
    /// on mass grounds beyond the per-candidate checks already applied.
    pub mass_overrun: bool,
    /// `total_weight - container.max_weight`, clamped to 0 when not over.
    pub mass_overrun_kg: f64,
    pub cog: Vec3,
    pub cog_offset: Vec3,
}

pub fn compute_statistics(placements: &[Placement], container: &Container) -> Statistics {
    let total_volume: f64 = placements.iter().map(|p| p.cargo.volume()).sum();
    let total_weight: f64 = placements.iter().map(|p| p.cargo.weight).sum();
    let mass_overrun_kg = (total_weight - container.max_weight).max(0.0);

    Statistics {
        loaded_count: placements.len(),
        total_volume,
        volume_utilization: if container.volume() > 0.0 { total_volume / container.volume() } else { 0.0 },
        total_weight,
        weight_utilization: if container.max_weight > 0.0 { total_weight / container.max_weight } else { 0.0 },
        mass_overrun: mass_overrun_kg > 0.0,
        mass_overrun_kg,
        cog: center_of_gravity(placements),
        cog_offset: cog_offset(placements, container),
    }
}

/// Coarse positional bucket along one of the container's three axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongitudinalZone {
    Head,
    Middle,
    Tail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LateralZone {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalZone {
    Bottom,
    Middle,
    Top,
}

/// Human-readable "head/middle/tail, left/right, bottom/middle/top"
/// descriptor for a placement's center, per §4.11.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionDescriptor {
    pub longitudinal: LongitudinalZone,
    pub lateral: LateralZone,
    pub vertical: VerticalZone,
}

impl std::fmt::Display for PositionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let longitudinal = match self.longitudinal {
            LongitudinalZone::Head => "head",
            LongitudinalZone::Middle => "middle",
            LongitudinalZone::Tail => "tail",
        };
        let lateral = match self.lateral {
            LateralZone::Left => "left",
            LateralZone::Right => "right",
        };
        let vertical = match self.vertical {
            VerticalZone::Bottom => "bottom",
            VerticalZone::Middle => "middle",
            VerticalZone::Top => "top",
        };
        write!(f, "{longitudinal}-{lateral}-{vertical}")
    }
}

pub fn position_descriptor(placement: &Placement, container: &Container) -> PositionDescriptor {
    let (cx, cy, cz) = placement.center();

    let longitudinal = if cx < container.length / 3.0 {
        LongitudinalZone::Head
    } else if cx < 2.0 * container.length / 3.0 {
        LongitudinalZone::Middle
    } else {
        LongitudinalZone::Tail
    };

    let lateral = if cy < container.width / 2.0 { LateralZone::Left } else { LateralZone::Right };

    let vertical = if cz < container.height / 2.0 {
        VerticalZone::Bottom
    } else {
        VerticalZone::Top
    };
    // Height-third split collapses to bottom/top above; middle is reserved
    // for future symmetric thirds but unused under the current split.
    let _ = VerticalZone::Middle;

    PositionDescriptor { longitudinal, lateral, vertical }
}

/// One placement's derived loading-sequence record.
#[derive(Clone, Debug)]
pub struct LoadingStep {
    pub step: u32,
    pub cargo_name: String,
    pub dimensions: (f64, f64, f64),
    pub position: (f64, f64, f64),
    pub position_descriptor: PositionDescriptor,
    pub rotated: bool,
    pub securing_note: String,
}

/// Derives the ordered loading-step records for a committed placement
/// set, per §4.11. `placements` need not be pre-sorted; steps are emitted
/// in ascending `step_number` order.
pub fn loading_steps(placements: &[Placement], container: &Container) -> Vec<LoadingStep> {
    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| p.step_number);

    let total = ordered.len();
    ordered
        .iter()
        .enumerate()
        .map(|(index, p)| LoadingStep {
            step: p.step_number,
            cargo_name: p.cargo.name.clone(),
            dimensions: p.cargo.dims_as_vec3().into(),
            position: (p.x, p.y, p.z),
            position_descriptor: position_descriptor(p, container),
            rotated: p.rotated,
            securing_note: securing_note(p, index, total),
        })
        .collect()
}

/// Per-item securing advice, per §4.11: floor anchoring, strap restraint,
/// tail bracing, and "do not stack" conditions, concatenated with "; ".
fn securing_note(placement: &Placement, order_index: usize, total_in_order: usize) -> String {
    let mut notes = Vec::new();

    if placement.z <= crate::geometry::EPSILON_BOUNDARY {
        notes.push("floor anchoring");
    }
    if placement.cargo.weight > STRAP_RESTRAINT_THRESHOLD_KG {
        notes.push("strap restraint");
    }
    if total_in_order.saturating_sub(order_index) <= TAIL_BRACING_WINDOW {
        notes.push("tail bracing");
    }
    if !placement.cargo.stackable {
        notes.push("do not stack");
    }

    notes.join("; ")
}

/// Tail-space analysis inputs for the securing advisor (§4.11).
#[derive(Clone, Debug)]
pub struct TailSpaceAnalysis {
    /// Residual gap between the deepest placement and the container's rear
    /// face.
    pub nose_to_tail_gap: f64,
    /// Last-row placements (right-face within `LAST_ROW_GAP_CM` of the
    /// overall maximum), each with its vertical headroom above.
    pub last_row: Vec<LastRowEntry>,
}

#[derive(Clone, Debug)]
pub struct LastRowEntry {
    pub cargo_name: String,
    pub headroom: f64,
    pub stacked: bool,
}

pub fn tail_space_analysis(placements: &[Placement], container: &Container) -> TailSpaceAnalysis {
    if placements.is_empty() {
        return TailSpaceAnalysis { nose_to_tail_gap: container.length, last_row: Vec::new() };
    }

    let max_right_face = placements
        .iter()
        .map(|p| p.x + p.footprint().0)
        .fold(0.0_f64, f64::max);

    let nose_to_tail_gap = container.length - max_right_face;

    let last_row = placements
        .iter()
        .filter(|p| max_right_face - (p.x + p.footprint().0) <= LAST_ROW_GAP_CM)
        .map(|p| LastRowEntry {
            cargo_name: p.cargo.name.clone(),
            headroom: container.height - p.top_z(),
            stacked: p.z > crate::geometry::EPSILON_BOUNDARY,
        })
        .collect();

    TailSpaceAnalysis { nose_to_tail_gap, last_row }
}

/// Rule-based tail-space advice, per §4.11: keyed on the nose-to-tail gap
/// and last-row headroom classified above, and the container's tag
/// (truck, shipping container, or other/pallet).
pub fn tail_advice(analysis: &TailSpaceAnalysis, container_type: ContainerType) -> Vec<String> {
    let mut advice = Vec::new();

    if analysis.nose_to_tail_gap > LAST_ROW_GAP_CM {
        let gap = analysis.nose_to_tail_gap;
        let note = match container_type {
            ContainerType::Truck => {
                format!("{gap:.0}cm open at the tail on a truck load; brace with a load bar before transit")
            }
            ContainerType::Container => {
                format!("{gap:.0}cm open at the tail in the shipping container; dunnage the gap to prevent shift")
            }
            ContainerType::Pallet => {
                format!("{gap:.0}cm of unused footprint past the last item; consider a smaller pallet")
            }
        };
        advice.push(note);
    }

    for entry in &analysis.last_row {
        if entry.stacked && entry.headroom < LAST_ROW_GAP_CM {
            advice.push(format!(
                "{} is stacked in the last row with only {:.0}cm headroom; re-check stack stability",
                entry.cargo_name, entry.headroom
            ));
        }
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cargo, ContainerType};

    fn container() -> Container {
        Container::new("C", 100.0, 60.0, 50.0, 1000.0, ContainerType::Container).unwrap()
    }

    fn placement(x: f64, y: f64, z: f64, weight: f64, step: u32) -> Placement {
        Placement {
            cargo: Cargo::new("a", "A", 20.0, 20.0, 20.0, weight).unwrap(),
            x,
            y,
            z,
            rotated: false,
            step_number: step,
            container_index: 0,
        }
    }

    #[test]
    fn cog_of_single_centered_item_matches_its_center() {
        let p = placement(0.0, 0.0, 0.0, 10.0, 1);
        let cog = center_of_gravity(&[p.clone()]);
        let (cx, cy, cz) = p.center();
        assert!((cog.x - cx).abs() < 1e-9);
        assert!((cog.y - cy).abs() < 1e-9);
        assert!((cog.z - cz).abs() < 1e-9);
    }

    #[test]
    fn empty_placements_yield_zero_cog() {
        let cog = center_of_gravity(&[]);
        assert_eq!((cog.x, cog.y, cog.z), (0.0, 0.0, 0.0));
    }

    #[test]
    fn lateral_balance_is_good_near_center_line() {
        let a = placement(40.0, 20.0, 0.0, 10.0, 1);
        let b = placement(40.0, 20.0, 0.0, 10.0, 2);
        assert_eq!(lateral_balance_status(&[a, b], &container()), "good");
    }

    #[test]
    fn lateral_balance_is_biased_far_from_center() {
        let a = placement(0.0, 0.0, 0.0, 10.0, 1);
        assert_eq!(lateral_balance_status(&[a], &container()), "biased");
    }

    #[test]
    fn securing_note_includes_floor_anchoring_for_floor_items() {
        let p = placement(0.0, 0.0, 0.0, 10.0, 1);
        let note = securing_note(&p, 0, 1);
        assert!(note.contains("floor anchoring"));
    }

    #[test]
    fn securing_note_flags_heavy_items_for_strap_restraint() {
        let p = placement(0.0, 0.0, 0.0, 600.0, 1);
        let note = securing_note(&p, 0, 10);
        assert!(note.contains("strap restraint"));
    }

    #[test]
    fn securing_note_flags_final_items_for_tail_bracing() {
        let p = placement(0.0, 0.0, 0.0, 10.0, 5);
        let note = securing_note(&p, 4, 5);
        assert!(note.contains("tail bracing"));
    }

    #[test]
    fn loading_steps_are_ordered_by_step_number() {
        let a = placement(0.0, 0.0, 0.0, 10.0, 2);
        let b = placement(20.0, 0.0, 0.0, 10.0, 1);
        let steps = loading_steps(&[a, b], &container());
        assert_eq!(steps[0].step, 1);
        assert_eq!(steps[1].step, 2);
    }

    #[test]
    fn tail_space_gap_is_container_length_when_empty() {
        let analysis = tail_space_analysis(&[], &container());
        assert!((analysis.nose_to_tail_gap - container().length).abs() < 1e-9);
    }

    #[test]
    fn statistics_report_no_mass_overrun_under_cap() {
        let p = placement(0.0, 0.0, 0.0, 10.0, 1);
        let stats = compute_statistics(&[p], &container());
        assert!(!stats.mass_overrun);
        assert_eq!(stats.mass_overrun_kg, 0.0);
    }

    #[test]
    fn statistics_report_mass_overrun_past_container_cap() {
        let light = Container::new("C", 100.0, 60.0, 50.0, 15.0, ContainerType::Container).unwrap();
        let p = placement(0.0, 0.0, 0.0, 20.0, 1);
        let stats = compute_statistics(&[p], &light);
        assert!(stats.mass_overrun);
        assert!((stats.mass_overrun_kg - 5.0).abs() < 1e-9);
    }

    #[test]
    fn tail_advice_is_silent_on_a_snug_load() {
        let analysis = TailSpaceAnalysis { nose_to_tail_gap: 1.0, last_row: Vec::new() };
        assert!(tail_advice(&analysis, ContainerType::Container).is_empty());
    }

    #[test]
    fn tail_advice_differs_by_container_tag() {
        let analysis = TailSpaceAnalysis { nose_to_tail_gap: 80.0, last_row: Vec::new() };
        let truck = tail_advice(&analysis, ContainerType::Truck);
        let shipping = tail_advice(&analysis, ContainerType::Container);
        let pallet = tail_advice(&analysis, ContainerType::Pallet);
        assert!(truck[0].contains("truck"));
        assert!(shipping[0].contains("shipping"));
        assert!(pallet[0].contains("pallet"));
    }

    #[test]
    fn tail_advice_flags_low_headroom_stacked_last_row_items() {
        let analysis = TailSpaceAnalysis {
            nose_to_tail_gap: 0.0,
            last_row: vec![LastRowEntry { cargo_name: "A".into(), headroom: 10.0, stacked: true }],
        };
        let advice = tail_advice(&analysis, ContainerType::Container);
        assert!(advice.iter().any(|n| n.contains("headroom")));
    }
}
