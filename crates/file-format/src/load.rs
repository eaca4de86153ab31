use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::errors::LoadError;
use crate::metadata::SidecarMetadata;
use crate::record::{MeshRotationRecord, MeshRotationSidecar};
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

#[derive(Debug, Clone, Deserialize)]
struct SidecarFileRaw {
    format: String,
    version: u32,
    metadata: SidecarMetadata,
    #[serde(default)]
    entries: BTreeMap<String, MeshRotationRecord>,
}

/// Deserialize a sidecar from a JSON string.
///
/// Validates the format identifier, the version and every record.
pub fn load_sidecar(json: &str) -> Result<MeshRotationSidecar, LoadError> {
    let raw: SidecarFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let entries = if raw.version < FORMAT_VERSION {
        crate::migrate::migrate(raw.entries, raw.version, FORMAT_VERSION)?
    } else {
        raw.entries
    };

    for (key, record) in &entries {
        if let Some(reason) = record.problem() {
            return Err(LoadError::InvalidRecord {
                key: key.clone(),
                reason,
            });
        }
    }
    debug!(entries = entries.len(), "sidecar loaded");

    Ok(MeshRotationSidecar {
        metadata: raw.metadata,
        entries,
    })
}
