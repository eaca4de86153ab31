use serde::{Deserialize, Serialize};

/// Outcome of a rotation search around the wheel axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationSearchResult {
    /// Wheel rotation with the least interference, in `[0, tooth_pitch_deg)`.
    pub optimal_rotation_deg: f64,
    /// Volume measured at the optimum. A failed probe reads as 0.0.
    pub achieved_volume_mm3: f64,
    pub tooth_pitch_deg: f64,
    pub coarse_probes: usize,
    pub fine_probes: usize,
    /// Probes whose kernel query failed and were read as 0.0.
    pub failed_probes: usize,
}

impl RotationSearchResult {
    pub fn total_probes(&self) -> usize {
        self.coarse_probes + self.fine_probes
    }

    /// True when at least one probe had to be substituted. The optimum may
    /// then sit on an angle the kernel could not evaluate.
    pub fn has_substituted_probes(&self) -> bool {
        self.failed_probes > 0
    }
}

/// Errors from mesh alignment entry points.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("kernel error: {0}")]
    Kernel(#[from] solid_kernel::KernelError),

    #[error("invalid gear geometry: {0}")]
    Geometry(#[from] mesh_types::TypesError),

    #[error("wheel must have at least one tooth")]
    NoTeeth,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}
