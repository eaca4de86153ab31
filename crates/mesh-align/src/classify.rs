use std::fmt;

use mesh_types::GearParams;
use serde::{Deserialize, Serialize};

/// Severity of a measured interference, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterferenceVerdict {
    None,
    WithinBacklash,
    WithinManufacturing,
    Exceeds,
}

impl InterferenceVerdict {
    pub fn label(self) -> &'static str {
        match self {
            InterferenceVerdict::None => "NONE",
            InterferenceVerdict::WithinBacklash => "WITHIN_BACKLASH",
            InterferenceVerdict::WithinManufacturing => "WITHIN_MANUFACTURING",
            InterferenceVerdict::Exceeds => "EXCEEDS",
        }
    }

    /// Anything short of [`InterferenceVerdict::Exceeds`].
    pub fn is_acceptable(self) -> bool {
        self < InterferenceVerdict::Exceeds
    }
}

impl fmt::Display for InterferenceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Knobs for deriving a [`ToleranceBudget`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Manufacturing allowance at scale 1.0; grows with the cube of scale.
    pub nominal_volume_at_unit_scale_mm3: f64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            nominal_volume_at_unit_scale_mm3: 1.0,
        }
    }
}

/// Volume thresholds separating the verdict tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBudget {
    pub backlash_volume_mm3: f64,
    pub manufacturing_volume_mm3: f64,
}

impl ToleranceBudget {
    pub fn new(backlash_volume_mm3: f64, manufacturing_volume_mm3: f64) -> Self {
        Self {
            backlash_volume_mm3,
            manufacturing_volume_mm3,
        }
    }

    /// Backlash allowance is the linear backlash swept across the face
    /// width; manufacturing allowance scales with volume.
    pub fn derive(
        backlash_linear_mm: f64,
        wheel_face_width_mm: f64,
        scale_factor: f64,
        settings: &BudgetSettings,
    ) -> Self {
        Self {
            backlash_volume_mm3: backlash_linear_mm * wheel_face_width_mm,
            manufacturing_volume_mm3: settings.nominal_volume_at_unit_scale_mm3
                * scale_factor.powi(3),
        }
    }

    /// Budget for a gear set built at `scale_factor`. Backlash and face width
    /// are given at unit scale and scaled here.
    pub fn for_gear(gear: &GearParams, scale_factor: f64, settings: &BudgetSettings) -> Self {
        Self::derive(
            gear.total_backlash() * scale_factor,
            gear.wheel.face_width * scale_factor,
            scale_factor,
            settings,
        )
    }
}

/// The default gear set at unit scale.
impl Default for ToleranceBudget {
    fn default() -> Self {
        Self::for_gear(&GearParams::default(), 1.0, &BudgetSettings::default())
    }
}

/// A verdict with its human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceAssessment {
    pub verdict: InterferenceVerdict,
    pub volume_mm3: f64,
    /// Volume of the comparison pose, if one was measured.
    pub baseline_mm3: Option<f64>,
    pub message: String,
}

fn sanitize(volume_mm3: f64) -> f64 {
    if volume_mm3.is_nan() {
        0.0
    } else {
        volume_mm3.max(0.0)
    }
}

/// Map an interference volume onto the verdict tiers. First match wins:
/// zero, within backlash, within manufacturing, otherwise exceeds.
///
/// `baseline_mm3` is an optional second measurement (typically the same
/// pose without the optimal rotation) used to report the improvement.
pub fn classify_interference(
    volume_mm3: f64,
    budget: &ToleranceBudget,
    baseline_mm3: Option<f64>,
) -> InterferenceAssessment {
    let v = sanitize(volume_mm3);
    let verdict = if v == 0.0 {
        InterferenceVerdict::None
    } else if v <= budget.backlash_volume_mm3 {
        InterferenceVerdict::WithinBacklash
    } else if v <= budget.manufacturing_volume_mm3 {
        InterferenceVerdict::WithinManufacturing
    } else {
        InterferenceVerdict::Exceeds
    };

    let mut message = match verdict {
        InterferenceVerdict::None => "Perfect mesh - no interference detected".to_string(),
        InterferenceVerdict::WithinBacklash => {
            format!("Good mesh - interference {v:.4}mm³ within backlash tolerance")
        }
        InterferenceVerdict::WithinManufacturing => {
            format!("Acceptable mesh - interference {v:.4}mm³ within manufacturing tolerance")
        }
        InterferenceVerdict::Exceeds => {
            format!("Warning - interference {v:.4}mm³ exceeds tolerance")
        }
    };
    let baseline_mm3 = baseline_mm3.map(sanitize);
    if let Some(base) = baseline_mm3 {
        if base > 0.0 && base > v {
            message.push_str(&format!(" (reduced from {base:.4}mm³ without rotation)"));
        }
    }

    InterferenceAssessment {
        verdict,
        volume_mm3: v,
        baseline_mm3,
        message,
    }
}
