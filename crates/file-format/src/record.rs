use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mesh_align::RotationSearchResult;
use mesh_types::GearParams;
use serde::{Deserialize, Serialize};

use crate::metadata::SidecarMetadata;

/// Sidecar key for a gear set of the given module, e.g. `M0.6`.
pub fn module_key(module_mm: f64) -> String {
    format!("M{module_mm}")
}

/// A cached search outcome for one gear set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRotationRecord {
    pub optimal_rotation_deg: f64,
    pub tooth_pitch_deg: f64,
    pub achieved_volume_mm3: f64,
    pub computed: DateTime<Utc>,
}

impl MeshRotationRecord {
    pub fn from_search(result: &RotationSearchResult, computed: DateTime<Utc>) -> Self {
        Self {
            optimal_rotation_deg: result.optimal_rotation_deg,
            tooth_pitch_deg: result.tooth_pitch_deg,
            achieved_volume_mm3: result.achieved_volume_mm3,
            computed,
        }
    }

    /// Reason the record is unusable, if any.
    pub(crate) fn problem(&self) -> Option<String> {
        if !(self.tooth_pitch_deg.is_finite() && self.tooth_pitch_deg > 0.0) {
            return Some(format!(
                "tooth pitch must be positive, got {}",
                self.tooth_pitch_deg
            ));
        }
        if !(0.0..self.tooth_pitch_deg).contains(&self.optimal_rotation_deg) {
            return Some(format!(
                "rotation {} outside [0, {})",
                self.optimal_rotation_deg, self.tooth_pitch_deg
            ));
        }
        if !(self.achieved_volume_mm3.is_finite() && self.achieved_volume_mm3 >= 0.0) {
            return Some(format!(
                "volume must be non-negative, got {}",
                self.achieved_volume_mm3
            ));
        }
        None
    }
}

/// In-memory form of the sidecar document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRotationSidecar {
    pub metadata: SidecarMetadata,
    pub entries: BTreeMap<String, MeshRotationRecord>,
}

impl MeshRotationSidecar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record for `key`, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        record: MeshRotationRecord,
    ) -> Option<MeshRotationRecord> {
        self.metadata.touch(record.computed);
        self.entries.insert(key.into(), record)
    }

    pub fn get(&self, key: &str) -> Option<&MeshRotationRecord> {
        self.entries.get(key)
    }

    /// Copy the cached rotation for this gear's module into
    /// `gear.mesh_rotation_deg`. Returns false when there is no record.
    pub fn apply_to(&self, gear: &mut GearParams) -> bool {
        match self.get(&module_key(gear.wheel.module)) {
            Some(record) => {
                gear.mesh_rotation_deg = record.optimal_rotation_deg;
                true
            }
            None => false,
        }
    }
}
