//! Closed-form rotation correction for a worm whose axis sits above or below
//! the wheel's mid-plane.
//!
//! Moving the contact point along the wheel axis by `z` slides it along the
//! worm thread by `z · tan(λ)`. That is a fraction of the lead, i.e. a worm
//! rotation, which the gear ratio turns into a wheel rotation.

use mesh_types::{normalize_angle, GearMeshGeometry, Handedness};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::SearchError;

/// Rotation estimate for a vertically offset worm.
///
/// Whether the correction adds to or subtracts from the base estimate depends
/// on the winding convention, so both candidates are returned and the caller
/// picks one (typically after [`crate::refine_candidates`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZOffsetCorrection {
    /// Half a tooth pitch: the zero-offset estimate.
    pub base_rotation_deg: f64,
    /// Wheel rotation equivalent of the offset, before hand or wrap.
    pub correction_deg: f64,
    /// `base + correction`, oriented for the hand and reduced into one pitch.
    pub rotation_plus_deg: f64,
    /// `base - correction`, oriented for the hand and reduced into one pitch.
    pub rotation_minus_deg: f64,
    pub tooth_pitch_deg: f64,
    pub hand: Handedness,
}

impl ZOffsetCorrection {
    pub fn candidates(&self) -> [f64; 2] {
        [self.rotation_plus_deg, self.rotation_minus_deg]
    }
}

/// Compute the z-offset correction for `geometry` and a worm axis offset of
/// `z_offset_mm` (wheel axis height minus worm axis height).
pub fn correct_for_z_offset(
    geometry: &GearMeshGeometry,
    z_offset_mm: f64,
    hand: Handedness,
) -> Result<ZOffsetCorrection, SearchError> {
    geometry.validate()?;
    if !z_offset_mm.is_finite() {
        return Err(SearchError::InvalidParameter {
            reason: format!("z offset must be finite, got {z_offset_mm}"),
        });
    }

    let pitch = geometry.tooth_pitch_deg();
    let axial_shift = z_offset_mm * geometry.lead_angle_deg.to_radians().tan();
    let worm_rotation_deg = axial_shift / geometry.lead_mm * 360.0;
    let correction_deg = worm_rotation_deg / geometry.gear_ratio;
    let base_rotation_deg = 180.0 / geometry.num_teeth as f64;

    let correction = ZOffsetCorrection {
        base_rotation_deg,
        correction_deg,
        rotation_plus_deg: normalize_angle(hand.orient(base_rotation_deg + correction_deg), pitch),
        rotation_minus_deg: normalize_angle(hand.orient(base_rotation_deg - correction_deg), pitch),
        tooth_pitch_deg: pitch,
        hand,
    };
    debug!(
        z_offset_mm,
        correction = correction.correction_deg,
        plus = correction.rotation_plus_deg,
        minus = correction.rotation_minus_deg,
        "z-offset correction"
    );
    Ok(correction)
}
