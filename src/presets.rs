//! Default pallet and container specifications (§6), exposed as constants
//! for callers that don't want to hand-roll common industry sizes.

use crate::model::ContainerType;
use crate::pallet::PalletSpec;

/// A named container specification (dimensions in cm, payload in kg).
#[derive(Clone, Copy, Debug)]
pub struct ContainerPreset {
    pub name: &'static str,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    pub container_type: ContainerType,
}

/// A named pallet specification.
#[derive(Clone, Copy, Debug)]
pub struct PalletPreset {
    pub name: &'static str,
    pub spec: PalletSpec,
}

/// Default deck thickness (cm) shared by all preset pallets.
const PALLET_DECK_THICKNESS: f64 = 15.0;
/// Headroom cap (cm) for content stacked onto a preset pallet.
const PALLET_CONTENT_HEIGHT_CAP: f64 = 200.0;

pub const PALLET_PRESETS: &[PalletPreset] = &[
    PalletPreset {
        name: "standard",
        spec: PalletSpec {
            length: 120.0,
            width: 100.0,
            deck_thickness: PALLET_DECK_THICKNESS,
            content_height_cap: PALLET_CONTENT_HEIGHT_CAP,
            mass_cap: 1000.0,
        },
    },
    PalletPreset {
        name: "euro",
        spec: PalletSpec {
            length: 120.0,
            width: 80.0,
            deck_thickness: PALLET_DECK_THICKNESS,
            content_height_cap: PALLET_CONTENT_HEIGHT_CAP,
            mass_cap: 800.0,
        },
    },
    PalletPreset {
        name: "us",
        spec: PalletSpec {
            length: 122.0,
            width: 102.0,
            deck_thickness: PALLET_DECK_THICKNESS,
            content_height_cap: PALLET_CONTENT_HEIGHT_CAP,
            mass_cap: 1000.0,
        },
    },
    PalletPreset {
        name: "jp",
        spec: PalletSpec {
            length: 110.0,
            width: 110.0,
            deck_thickness: PALLET_DECK_THICKNESS,
            content_height_cap: PALLET_CONTENT_HEIGHT_CAP,
            mass_cap: 1000.0,
        },
    },
];

pub const CONTAINER_PRESETS: &[ContainerPreset] = &[
    ContainerPreset {
        name: "20gp",
        length: 589.0,
        width: 234.0,
        height: 238.0,
        max_weight: 21770.0,
        container_type: ContainerType::Container,
    },
    ContainerPreset {
        name: "40gp",
        length: 1203.0,
        width: 234.0,
        height: 238.0,
        max_weight: 26680.0,
        container_type: ContainerType::Container,
    },
    ContainerPreset {
        name: "40hc",
        length: 1203.0,
        width: 234.0,
        height: 269.0,
        max_weight: 26460.0,
        container_type: ContainerType::Container,
    },
    ContainerPreset {
        name: "45hc",
        length: 1351.0,
        width: 234.0,
        height: 269.0,
        max_weight: 25600.0,
        container_type: ContainerType::Container,
    },
    ContainerPreset {
        name: "truck-4.2m-box",
        length: 420.0,
        width: 210.0,
        height: 210.0,
        max_weight: 1500.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-5.2m-box",
        length: 520.0,
        width: 210.0,
        height: 210.0,
        max_weight: 2000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-6.2m-box",
        length: 620.0,
        width: 240.0,
        height: 240.0,
        max_weight: 3500.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-7.2m-box",
        length: 720.0,
        width: 240.0,
        height: 240.0,
        max_weight: 5000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-7.7m-curtain",
        length: 770.0,
        width: 245.0,
        height: 260.0,
        max_weight: 9000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-9.2m-box",
        length: 920.0,
        width: 245.0,
        height: 260.0,
        max_weight: 10000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-13.6m-curtain",
        length: 1360.0,
        width: 248.0,
        height: 270.0,
        max_weight: 24000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-13.6m-megatrailer",
        length: 1360.0,
        width: 248.0,
        height: 300.0,
        max_weight: 24000.0,
        container_type: ContainerType::Truck,
    },
    ContainerPreset {
        name: "truck-17.5m-flatbed",
        length: 1750.0,
        width: 250.0,
        height: 270.0,
        max_weight: 32000.0,
        container_type: ContainerType::Truck,
    },
];

pub fn find_pallet_preset(name: &str) -> Option<&'static PalletPreset> {
    PALLET_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

pub fn find_container_preset(name: &str) -> Option<&'static ContainerPreset> {
    CONTAINER_PRESETS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
