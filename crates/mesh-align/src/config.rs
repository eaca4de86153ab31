use serde::{Deserialize, Serialize};

use crate::types::SearchError;

/// Step sizes of the two-phase rotation search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Spacing of the coarse sweep over one tooth pitch (degrees).
    pub coarse_step_deg: f64,
    /// Spacing of the refinement around the coarse optimum (degrees).
    pub fine_step_deg: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            coarse_step_deg: 1.0,
            fine_step_deg: 0.1,
        }
    }
}

impl SearchConfig {
    /// A quicker, lower-resolution search.
    pub fn draft() -> Self {
        Self {
            coarse_step_deg: 2.0,
            fine_step_deg: 0.5,
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, step) in [
            ("coarse_step_deg", self.coarse_step_deg),
            ("fine_step_deg", self.fine_step_deg),
        ] {
            if !(step.is_finite() && step > 0.0) {
                return Err(SearchError::InvalidParameter {
                    reason: format!("{name} must be positive and finite, got {step}"),
                });
            }
        }
        if self.fine_step_deg > self.coarse_step_deg {
            return Err(SearchError::InvalidParameter {
                reason: format!(
                    "fine_step_deg ({}) must not exceed coarse_step_deg ({})",
                    self.fine_step_deg, self.coarse_step_deg
                ),
            });
        }
        Ok(())
    }

    /// Number of fine steps on each side of the coarse optimum.
    pub(crate) fn fine_half_width(&self) -> i64 {
        // Tolerate 1.0 / 0.1 landing a hair under 10.
        (self.coarse_step_deg / self.fine_step_deg + 1e-9).floor() as i64
    }
}
