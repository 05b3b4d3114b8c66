//! Reference JSON shape (§6) for interop with external tooling. Not
//! required by the engine itself; this is the serialization the
//! surrounding application expects when it asks for a loading plan.

use serde::Serialize;

use crate::analytics::{self, Statistics};
use crate::model::{Container, ContainerLoadingResult, Placement};

#[derive(Serialize)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Serialize)]
pub struct StatisticsJson {
    pub loaded_count: usize,
    pub total_volume: f64,
    pub volume_utilization: f64,
    pub total_weight: f64,
    pub weight_utilization: f64,
    pub mass_overrun: bool,
    pub mass_overrun_kg: f64,
}

impl From<&Statistics> for StatisticsJson {
    fn from(stats: &Statistics) -> Self {
        Self {
            loaded_count: stats.loaded_count,
            total_volume: stats.total_volume,
            volume_utilization: stats.volume_utilization,
            total_weight: stats.total_weight,
            weight_utilization: stats.weight_utilization,
            mass_overrun: stats.mass_overrun,
            mass_overrun_kg: stats.mass_overrun_kg,
        }
    }
}

#[derive(Serialize)]
pub struct LoadingStepJson {
    pub step: u32,
    pub cargo_name: String,
    pub dimensions: String,
    pub weight: f64,
    pub position: PositionJson,
    pub rotated: bool,
}

fn loading_step_json(placement: &Placement) -> LoadingStepJson {
    LoadingStepJson {
        step: placement.step_number,
        cargo_name: placement.cargo.name.clone(),
        dimensions: format!("{}×{}×{}", placement.cargo.length, placement.cargo.width, placement.cargo.height),
        weight: placement.cargo.weight,
        position: PositionJson { x: placement.x, y: placement.y, z: placement.z },
        rotated: placement.rotated,
    }
}

/// Single-container reference shape.
#[derive(Serialize)]
pub struct SingleContainerPlan {
    pub container: Container,
    pub statistics: StatisticsJson,
    pub center_of_gravity: PositionJson,
    pub loading_steps: Vec<LoadingStepJson>,
}

pub fn single_container_plan(container: &Container, placements: &[Placement]) -> SingleContainerPlan {
    let stats = analytics::compute_statistics(placements, container);
    let cog = analytics::center_of_gravity(placements);

    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| p.step_number);

    SingleContainerPlan {
        container: container.clone(),
        statistics: StatisticsJson::from(&stats),
        center_of_gravity: PositionJson { x: cog.x, y: cog.y, z: cog.z },
        loading_steps: ordered.into_iter().map(loading_step_json).collect(),
    }
}

/// One container's entry within the multi-container reference shape.
#[derive(Serialize)]
pub struct ContainerEntry {
    pub container_index: u32,
    pub statistics: StatisticsJson,
    pub cargos: Vec<LoadingStepJson>,
}

/// Multi-container reference shape.
#[derive(Serialize)]
pub struct MultiContainerPlan {
    pub multi_container: bool,
    pub container_count: usize,
    pub containers: Vec<ContainerEntry>,
}

pub fn multi_container_plan(results: &[ContainerLoadingResult]) -> MultiContainerPlan {
    let containers = results
        .iter()
        .map(|r| {
            let stats = analytics::compute_statistics(&r.placements, &r.container);
            let mut ordered: Vec<&Placement> = r.placements.iter().collect();
            ordered.sort_by_key(|p| p.step_number);

            ContainerEntry {
                container_index: r.container_index,
                statistics: StatisticsJson::from(&stats),
                cargos: ordered.into_iter().map(loading_step_json).collect(),
            }
        })
        .collect();

    MultiContainerPlan { multi_container: true, container_count: results.len(), containers }
}
