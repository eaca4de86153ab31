use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping stored alongside the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarMetadata {
    /// When the sidecar was first written.
    pub created: DateTime<Utc>,
    /// When a record was last added or replaced.
    pub modified: DateTime<Utc>,
}

impl SidecarMetadata {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            created: time,
            modified: time,
        }
    }

    pub fn touch(&mut self, time: DateTime<Utc>) {
        self.modified = time;
    }
}

impl Default for SidecarMetadata {
    fn default() -> Self {
        Self::new()
    }
}
