//! Data models for the container loading engine.
//!
//! This module defines the fundamental data structures for 3D container
//! loading:
//! - `Cargo`: an item to be loaded, with dimensions, mass, and placement
//!   constraints
//! - `Container`: the loading space with interior dimensions and a payload
//!   cap
//! - `CargoGroup`: a set of cargo ids locked together during placement
//! - `Placement`: a committed position of a (singleton) cargo item
//! - `PalletContent`: a cargo item's local position within a pallet
//! - `ContainerLoadingResult`: one container paired with its placements
//!
//! All structures implement the traits from the `types` module for
//! dimension/position/weight access that the geometry and analytics modules
//! share.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, validate_dimension, validate_quantity, validate_weight};
use crate::types::{Dimensional, Positioned, Vec3, Weighted};

/// Default deck thickness for a pallet, in cm, when unspecified.
pub const DEFAULT_PALLET_BASE_HEIGHT: f64 = 15.0;

/// A stable, opaque cargo identifier, unique within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoId(pub String);

impl CargoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesizes a singleton id for the `index`-th copy of a quantity > 1
    /// cargo item, per the group-expander contract in §4.6.
    pub fn synthesize(base: &CargoId, index: u32) -> Self {
        Self(format!("{}_{}", base.0, index))
    }
}

impl std::fmt::Display for CargoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CargoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CargoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Tag distinguishing the kind of loading space a `Container` represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    Container,
    Truck,
    Pallet,
}

/// A rectangular, rigid loading volume with a payload cap. Immutable once
/// constructed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    pub container_type: ContainerType,
    #[serde(default)]
    pub description: String,
}

impl Container {
    pub fn new(
        name: impl Into<String>,
        length: f64,
        width: f64,
        height: f64,
        max_weight: f64,
        container_type: ContainerType,
    ) -> Result<Self, ValidationError> {
        validate_dimension(length, "Container length")?;
        validate_dimension(width, "Container width")?;
        validate_dimension(height, "Container height")?;
        validate_weight(max_weight, "Container max_weight")?;

        Ok(Self {
            name: name.into(),
            length,
            width,
            height,
            max_weight,
            container_type,
            description: String::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Interior volume (length * width * height).
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height)
    }
}

impl Dimensional for Container {
    fn dimensions(&self) -> Vec3 {
        self.dims_as_vec3()
    }
}

/// A cargo item: identified by a stable id, read-only from the engine's
/// perspective once constructed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cargo {
    pub id: CargoId,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
    pub stackable: bool,
    pub allow_rotate: bool,
    pub bottom_only: bool,
    pub priority: u32,
    pub color: String,
    pub group_id: Option<String>,
    /// Maximum stacking depth for this item (supplements the `stackable`
    /// boolean with a numeric cap); `None` means unlimited.
    pub max_stack: Option<u32>,
    pub is_pallet: bool,
    pub pallet_base_height: f64,
    pub pallet_contents: Vec<PalletContent>,
    /// Singleton ids folded into this item by the group expander or the
    /// palletization engine. Empty for ordinary, caller-supplied cargo.
    #[serde(default)]
    pub source_ids: Vec<CargoId>,
}

impl Cargo {
    /// Creates a new cargo item with engine defaults (stackable,
    /// rotatable, floor-or-stack, priority 0, quantity 1) after validating
    /// dimensions and weight.
    pub fn new(
        id: impl Into<CargoId>,
        name: impl Into<String>,
        length: f64,
        width: f64,
        height: f64,
        weight: f64,
    ) -> Result<Self, ValidationError> {
        validate_dimension(length, "length")?;
        validate_dimension(width, "width")?;
        validate_dimension(height, "height")?;
        validate_weight(weight, "weight")?;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            length,
            width,
            height,
            weight,
            quantity: 1,
            stackable: true,
            allow_rotate: true,
            bottom_only: false,
            priority: 0,
            color: String::new(),
            group_id: None,
            max_stack: None,
            is_pallet: false,
            pallet_base_height: DEFAULT_PALLET_BASE_HEIGHT,
            pallet_contents: Vec::new(),
            source_ids: Vec::new(),
        })
    }

    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, ValidationError> {
        validate_quantity(quantity, "quantity")?;
        self.quantity = quantity;
        Ok(self)
    }

    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    pub fn with_allow_rotate(mut self, allow_rotate: bool) -> Self {
        self.allow_rotate = allow_rotate;
        self
    }

    pub fn with_bottom_only(mut self, bottom_only: bool) -> Self {
        self.bottom_only = bottom_only;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = Some(max_stack);
        self
    }

    /// Volume of a single unit (excludes `quantity`).
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn total_volume(&self) -> f64 {
        self.volume() * self.quantity as f64
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }

    /// The item's actual height, excluding the pallet deck, for pallet
    /// items; identical to `height` for ordinary cargo.
    pub fn content_height(&self) -> f64 {
        if self.is_pallet {
            self.height - self.pallet_base_height
        } else {
            self.height
        }
    }

    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height)
    }

    /// Effective footprint (length, width) under the given rotation flag:
    /// the 90 degree yaw swaps length and width.
    pub fn footprint(&self, rotated: bool) -> (f64, f64) {
        if rotated {
            (self.width, self.length)
        } else {
            (self.length, self.width)
        }
    }
}

impl Dimensional for Cargo {
    fn dimensions(&self) -> Vec3 {
        self.dims_as_vec3()
    }
}

impl Weighted for Cargo {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// A cargo item's local position within a pallet's footprint. `z = 0` is
/// the pallet deck top, not the floor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PalletContent {
    pub cargo: Cargo,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotated: bool,
}

impl PalletContent {
    pub fn footprint(&self) -> (f64, f64) {
        self.cargo.footprint(self.rotated)
    }

    pub fn top_z(&self) -> f64 {
        self.z + self.cargo.height
    }
}

/// Optional explicit combined dimensions/mass for a `CargoGroup`; when
/// absent, the group expander derives them per §4.6.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CombinedDims {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// A set of cargo ids locked together and placed as a single synthetic
/// item by the group expander.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CargoGroup {
    pub id: String,
    pub name: String,
    pub cargo_ids: Vec<CargoId>,
    pub combined: Option<CombinedDims>,
}

impl CargoGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cargo_ids: Vec<CargoId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cargo_ids,
            combined: None,
        }
    }

    pub fn with_combined(mut self, combined: CombinedDims) -> Self {
        self.combined = Some(combined);
        self
    }
}

/// A committed placement of a singleton cargo item within a container.
///
/// `(x, y, z)` is the anchor (the corner closest to the container origin)
/// in container-local coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Placement {
    pub cargo: Cargo,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotated: bool,
    pub step_number: u32,
    pub container_index: u32,
}

impl Placement {
    /// Effective footprint (length, width) under this placement's
    /// rotation.
    pub fn footprint(&self) -> (f64, f64) {
        self.cargo.footprint(self.rotated)
    }

    pub fn top_z(&self) -> f64 {
        self.z + self.cargo.height
    }

    /// Geometric center: anchor + half the effective footprint/height.
    pub fn center(&self) -> (f64, f64, f64) {
        let (el, ew) = self.footprint();
        (
            self.x + el / 2.0,
            self.y + ew / 2.0,
            self.z + self.cargo.height / 2.0,
        )
    }

    #[inline]
    pub fn position_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Positioned for Placement {
    fn position(&self) -> Vec3 {
        self.position_vec3()
    }
}

impl Weighted for Placement {
    fn weight(&self) -> f64 {
        self.cargo.weight
    }
}

/// One container instance paired with its placements, as produced by the
/// placement driver or the multi-container orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerLoadingResult {
    pub container: Container,
    pub container_index: u32,
    pub placements: Vec<Placement>,
}

impl ContainerLoadingResult {
    pub fn total_volume(&self) -> f64 {
        self.placements.iter().map(|p| p.cargo.volume()).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.placements.iter().map(|p| p.cargo.weight).sum()
    }

    pub fn volume_utilization(&self) -> f64 {
        let volume = self.container.volume();
        if volume <= 0.0 {
            0.0
        } else {
            self.total_volume() / volume
        }
    }

    pub fn weight_utilization(&self) -> f64 {
        if self.container.max_weight <= 0.0 {
            0.0
        } else {
            self.total_weight() / self.container.max_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_rejects_non_positive_dimension() {
        let err = Cargo::new("a", "Box", 0.0, 10.0, 10.0, 5.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDimension(_)));
    }

    #[test]
    fn cargo_rejects_non_positive_weight() {
        let err = Cargo::new("a", "Box", 10.0, 10.0, 10.0, -1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWeight(_)));
    }

    #[test]
    fn cargo_rejects_zero_quantity() {
        let cargo = Cargo::new("a", "Box", 10.0, 10.0, 10.0, 5.0).unwrap();
        let err = cargo.with_quantity(0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuantity(_)));
    }

    #[test]
    fn cargo_footprint_swaps_under_rotation() {
        let cargo = Cargo::new("a", "Box", 30.0, 20.0, 10.0, 5.0).unwrap();
        assert_eq!(cargo.footprint(false), (30.0, 20.0));
        assert_eq!(cargo.footprint(true), (20.0, 30.0));
    }

    #[test]
    fn cargo_id_synthesize_is_deterministic() {
        let base = CargoId::new("item");
        assert_eq!(CargoId::synthesize(&base, 0).0, "item_0");
        assert_eq!(CargoId::synthesize(&base, 1).0, "item_1");
    }

    #[test]
    fn pallet_content_height_excludes_deck() {
        let mut pallet = Cargo::new("p", "Pallet", 120.0, 100.0, 95.0, 50.0).unwrap();
        pallet.is_pallet = true;
        pallet.pallet_base_height = 15.0;
        assert!((pallet.content_height() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn container_volume_is_product_of_dims() {
        let container =
            Container::new("Box", 100.0, 50.0, 50.0, 1000.0, ContainerType::Container).unwrap();
        assert!((container.volume() - 250_000.0).abs() < 1e-9);
    }

    #[test]
    fn container_loading_result_utilizations() {
        let container =
            Container::new("Box", 100.0, 50.0, 50.0, 1000.0, ContainerType::Container).unwrap();
        let cargo = Cargo::new("a", "Crate", 30.0, 20.0, 20.0, 5.0).unwrap();
        let result = ContainerLoadingResult {
            container,
            container_index: 1,
            placements: vec![Placement {
                cargo,
                x: 0.0,
                y: 0.0,
                z: 0.0,
                rotated: false,
                step_number: 1,
                container_index: 1,
            }],
        };

        assert!((result.total_volume() - 12_000.0).abs() < 1e-9);
        assert!((result.volume_utilization() - 12_000.0 / 250_000.0).abs() < 1e-9);
        assert!((result.weight_utilization() - 5.0 / 1000.0).abs() < 1e-9);
    }
}
