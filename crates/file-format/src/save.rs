use std::collections::BTreeMap;

use serde::Serialize;

use crate::metadata::SidecarMetadata;
use crate::record::{MeshRotationRecord, MeshRotationSidecar};

/// Format identifier written into every sidecar.
pub const FORMAT_NAME: &str = "mesh-rotation";

/// Current sidecar format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SidecarFile<'a> {
    format: &'a str,
    version: u32,
    metadata: &'a SidecarMetadata,
    entries: &'a BTreeMap<String, MeshRotationRecord>,
}

/// Serialize a sidecar to a pretty-printed JSON string.
pub fn save_sidecar(sidecar: &MeshRotationSidecar) -> String {
    let file = SidecarFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        metadata: &sidecar.metadata,
        entries: &sidecar.entries,
    };
    serde_json::to_string_pretty(&file).expect("sidecar serialization should never fail")
}
