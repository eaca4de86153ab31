use serde::{Deserialize, Serialize};

/// One full revolution, in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Angular period of a wheel's meshing pattern (360° / num_teeth).
///
/// Callers must pass `num_teeth > 0`; [`crate::GearMeshGeometry::validate`]
/// enforces that for geometry built from parameters.
pub fn tooth_pitch_deg(num_teeth: u32) -> f64 {
    FULL_TURN_DEG / num_teeth as f64
}

/// Reduce `angle_deg` into the half-open range `[0, period_deg)`.
pub fn normalize_angle(angle_deg: f64, period_deg: f64) -> f64 {
    let r = angle_deg.rem_euclid(period_deg);
    // rem_euclid rounds up to the period itself for tiny negative inputs.
    if r >= period_deg {
        0.0
    } else {
        // folds -0.0 into +0.0
        r + 0.0
    }
}

/// Hand of a tuner assembly (and of its worm thread).
///
/// The left-hand assembly is the mirror image of the right-hand one.
/// Mirroring maps a tooth angle θ to 180° − θ; the wheel is symmetric about
/// its contact line, so the net effect on the mesh rotation is a negation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// +1 for right hand, -1 for left hand.
    pub fn sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }

    /// Convert a right-hand mesh rotation into this hand's rotation.
    pub fn orient(self, rotation_deg: f64) -> f64 {
        rotation_deg * self.sign()
    }

    pub fn mirrored(self) -> Self {
        match self {
            Handedness::Right => Handedness::Left,
            Handedness::Left => Handedness::Right,
        }
    }
}
