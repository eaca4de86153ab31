//! JSON sidecar caching mesh-rotation search results across runs.
//!
//! One document holds a record per gear set, keyed by its module (e.g.
//! `M0.6`). The search itself never reads the sidecar; it only seeds
//! `GearParams::mesh_rotation_deg` for later builds.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod record;
pub mod save;

pub use errors::LoadError;
pub use load::load_sidecar;
pub use metadata::SidecarMetadata;
pub use record::{module_key, MeshRotationRecord, MeshRotationSidecar};
pub use save::{save_sidecar, FORMAT_NAME, FORMAT_VERSION};
