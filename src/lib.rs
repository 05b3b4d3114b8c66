//! Container loading engine: candidate-based 3D bin packing over
//! rectangular cargo, with group/quantity expansion, a composable rule
//! pipeline, palletization, multi-container orchestration, and
//! post-placement analytics.
//!
//! The engine is pure: no I/O, no async, no panics on caller-supplied
//! data (malformed input goes through [`error::ValidationError`]). The
//! `api`/`config`/`main` layers wrap it in an HTTP demo service.

pub mod analytics;
pub mod candidates;
pub mod driver;
pub mod error;
pub mod feasibility;
pub mod geometry;
pub mod groups;
pub mod manual_edit;
pub mod model;
pub mod multi_container;
pub mod pallet;
pub mod preselect;
pub mod presets;
pub mod rules;
pub mod scorer;
pub mod serialization;
pub mod types;
