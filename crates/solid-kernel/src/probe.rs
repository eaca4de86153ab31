//! Failure-normalizing adapter around intersection-volume queries.
//!
//! A kernel that fails on a degenerate pose is read as "no interference".
//! This biases searches toward angles the kernel could not evaluate, and may
//! hide a real collision at such an angle. Callers that care can inspect
//! [`ProbeReading::failed`].

use tracing::warn;

use crate::traits::SolidKernel;
use crate::types::{KernelError, SolidHandle};

/// One intersection-volume measurement after failure normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeReading {
    /// Measured volume in mm³; always finite and non-negative.
    pub volume_mm3: f64,
    /// True when the kernel failed and the volume was substituted with 0.0.
    pub failed: bool,
}

impl ProbeReading {
    pub fn measured(volume_mm3: f64) -> Self {
        Self {
            volume_mm3,
            failed: false,
        }
    }

    pub fn substituted() -> Self {
        Self {
            volume_mm3: 0.0,
            failed: true,
        }
    }

    /// Normalize a raw kernel result. Errors and non-finite volumes become a
    /// failed 0.0 reading; small negative round-off is clamped to 0.0.
    pub fn from_result(result: Result<f64, KernelError>) -> Self {
        match result {
            Ok(v) if v.is_finite() => Self::measured(v.max(0.0)),
            Ok(_) | Err(_) => Self::substituted(),
        }
    }
}

/// Query the intersection volume of two solids, never failing.
pub fn probe_intersection(
    kernel: &dyn SolidKernel,
    a: &SolidHandle,
    b: &SolidHandle,
) -> ProbeReading {
    let result = kernel.intersection_volume(a, b);
    match &result {
        Err(err) => warn!(%err, "intersection query failed, treating volume as 0"),
        Ok(v) if !v.is_finite() => {
            warn!(volume = *v, "kernel returned a non-finite volume, treating as 0")
        }
        Ok(_) => {}
    }
    ProbeReading::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_becomes_failed_zero() {
        let r = ProbeReading::from_result(Err(KernelError::IntersectionFailed {
            reason: "degenerate".into(),
        }));
        assert_eq!(r.volume_mm3, 0.0);
        assert!(r.failed);
    }

    #[test]
    fn nan_becomes_failed_zero() {
        let r = ProbeReading::from_result(Ok(f64::NAN));
        assert_eq!(r, ProbeReading::substituted());
    }

    #[test]
    fn negative_round_off_is_clamped() {
        let r = ProbeReading::from_result(Ok(-1e-13));
        assert_eq!(r.volume_mm3, 0.0);
        assert!(!r.failed);
    }

    #[test]
    fn positive_volume_passes_through() {
        assert_eq!(ProbeReading::from_result(Ok(0.25)), ProbeReading::measured(0.25));
    }
}
