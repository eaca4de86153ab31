use std::collections::BTreeMap;

use crate::aggregate::AssemblyCheckResult;

/// Raised when an assembly's summed interference reaches its threshold.
/// Carries the full per-check result.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "assembly interference {:.4}mm³ reaches threshold {:.4}mm³ across {} stations",
    .result.total_mm3,
    .result.threshold_mm3,
    .result.stations
)]
pub struct AssemblyInterferenceError {
    pub result: Box<AssemblyCheckResult>,
}

impl AssemblyInterferenceError {
    pub fn breakdown(&self) -> BTreeMap<String, f64> {
        self.result.breakdown()
    }

    pub fn total_mm3(&self) -> f64 {
        self.result.total_mm3
    }
}
