use serde::{Deserialize, Serialize};

use crate::angle::{tooth_pitch_deg, Handedness};
use crate::error::TypesError;

/// Worm thread geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WormType {
    #[default]
    Cylindrical,
    Globoid,
}

/// Override for how the worm axis height is chosen inside the housing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WormZMode {
    /// Derive from the worm type and virtual hobbing flag.
    #[default]
    Auto,
    /// Worm centered in the frame cavity (default for cylindrical worms).
    Centered,
    /// Worm axis at the wheel's mid-plane (required for globoid worms).
    Aligned,
}

/// Parameters of the worm (integral to the peg head). Millimeters / degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WormParams {
    pub module: f64,
    pub num_starts: u32,
    pub pitch_diameter: f64,
    pub tip_diameter: f64,
    pub root_diameter: f64,
    /// Axial advance per revolution (π × module × num_starts).
    pub lead: f64,
    pub lead_angle_deg: f64,
    pub length: f64,
    pub hand: Handedness,
    pub worm_type: WormType,
    pub throat_reduction: f64,
    pub throat_curvature_radius: f64,
}

impl Default for WormParams {
    fn default() -> Self {
        Self {
            module: 0.6,
            num_starts: 1,
            pitch_diameter: 5.8,
            tip_diameter: 7.0,
            root_diameter: 4.3,
            lead: 1.885,
            lead_angle_deg: 5.91,
            length: 7.8,
            hand: Handedness::Right,
            worm_type: WormType::Cylindrical,
            throat_reduction: 0.1,
            throat_curvature_radius: 3.0,
        }
    }
}

impl WormParams {
    /// Lead implied by module and number of starts.
    pub fn nominal_lead(&self) -> f64 {
        std::f64::consts::PI * self.module * self.num_starts as f64
    }

    /// Lead angle implied by lead and pitch diameter, in degrees.
    pub fn nominal_lead_angle_deg(&self) -> f64 {
        (self.lead / (std::f64::consts::PI * self.pitch_diameter))
            .atan()
            .to_degrees()
    }
}

/// Parameters of the worm wheel. Millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelParams {
    pub module: f64,
    pub num_teeth: u32,
    pub pitch_diameter: f64,
    pub tip_diameter: f64,
    pub root_diameter: f64,
    pub face_width: f64,
}

impl Default for WheelParams {
    fn default() -> Self {
        Self {
            module: 0.6,
            num_teeth: 10,
            pitch_diameter: 6.0,
            tip_diameter: 7.2,
            root_diameter: 4.5,
            face_width: 7.6,
        }
    }
}

/// Combined gear set. Defaults match the balanced M0.6, 10:1 set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearParams {
    pub worm: WormParams,
    pub wheel: WheelParams,
    pub center_distance: f64,
    pub pressure_angle_deg: f64,
    pub backlash: f64,
    /// Additional backlash beyond the gear design.
    pub extra_backlash: f64,
    pub ratio: u32,
    /// Wheel rotation applied before export for optimal mesh alignment.
    pub mesh_rotation_deg: f64,
    /// If true, the worm is aligned with the wheel center.
    pub virtual_hobbing: bool,
    pub worm_z_mode: WormZMode,
}

impl Default for GearParams {
    fn default() -> Self {
        Self {
            worm: WormParams::default(),
            wheel: WheelParams::default(),
            center_distance: 5.9,
            pressure_angle_deg: 20.0,
            backlash: 0.0,
            extra_backlash: 0.0,
            ratio: 10,
            mesh_rotation_deg: 0.0,
            virtual_hobbing: false,
            worm_z_mode: WormZMode::Auto,
        }
    }
}

impl GearParams {
    /// Hand of the assembly, taken from the worm thread.
    pub fn hand(&self) -> Handedness {
        self.worm.hand
    }

    /// Total linear backlash allowed in the mesh.
    pub fn total_backlash(&self) -> f64 {
        self.backlash + self.extra_backlash
    }

    /// Whether the worm axis sits at the wheel's mid-plane.
    pub fn worm_is_aligned(&self) -> bool {
        match self.worm_z_mode {
            WormZMode::Aligned => true,
            WormZMode::Centered => false,
            WormZMode::Auto => self.worm.worm_type == WormType::Globoid || self.virtual_hobbing,
        }
    }

    /// Axis-height offset (wheel axis z minus worm axis z) fed to the
    /// z-offset corrector. Zero when the worm is aligned with the wheel.
    pub fn worm_z_offset(&self, wheel_axis_z: f64, worm_axis_z: f64) -> f64 {
        if self.worm_is_aligned() {
            0.0
        } else {
            wheel_axis_z - worm_axis_z
        }
    }

    /// Mesh geometry for the rotation search and corrector.
    pub fn mesh_geometry(&self) -> Result<GearMeshGeometry, TypesError> {
        let geometry = GearMeshGeometry {
            num_teeth: self.wheel.num_teeth,
            lead_mm: self.worm.lead,
            lead_angle_deg: self.worm.lead_angle_deg,
            gear_ratio: self.ratio as f64,
        };
        geometry.validate()?;
        Ok(geometry)
    }
}

/// The subset of gear geometry the mesh alignment core works with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearMeshGeometry {
    pub num_teeth: u32,
    /// Axial advance per worm revolution (mm).
    pub lead_mm: f64,
    pub lead_angle_deg: f64,
    /// Worm revolutions per wheel revolution.
    pub gear_ratio: f64,
}

impl GearMeshGeometry {
    pub fn new(
        num_teeth: u32,
        lead_mm: f64,
        lead_angle_deg: f64,
        gear_ratio: f64,
    ) -> Result<Self, TypesError> {
        let geometry = Self {
            num_teeth,
            lead_mm,
            lead_angle_deg,
            gear_ratio,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn tooth_pitch_deg(&self) -> f64 {
        tooth_pitch_deg(self.num_teeth)
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.num_teeth == 0 {
            return Err(invalid("num_teeth must be greater than zero"));
        }
        if !(self.lead_mm.is_finite() && self.lead_mm > 0.0) {
            return Err(invalid(format!("lead must be positive, got {}", self.lead_mm)));
        }
        if !(self.gear_ratio.is_finite() && self.gear_ratio > 0.0) {
            return Err(invalid(format!(
                "gear ratio must be positive, got {}",
                self.gear_ratio
            )));
        }
        if !(0.0..90.0).contains(&self.lead_angle_deg) {
            return Err(invalid(format!(
                "lead angle must be in [0, 90) degrees, got {}",
                self.lead_angle_deg
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> TypesError {
    TypesError::InvalidGeometry {
        reason: reason.into(),
    }
}
