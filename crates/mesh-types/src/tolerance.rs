use serde::Serialize;

use crate::error::TypesError;

/// Named tolerance adjustments for a manufacturing method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToleranceProfile {
    pub name: &'static str,
    /// Added to nominal hole diameters (mm).
    pub hole_clearance_mm: f64,
    pub description: &'static str,
}

impl ToleranceProfile {
    /// Apply this profile's clearance to a nominal hole diameter.
    pub fn with_clearance(&self, hole_diameter: f64) -> f64 {
        hole_diameter + self.hole_clearance_mm
    }
}

/// Built-in profiles, in order of tightening clearance.
pub const TOLERANCE_PROFILES: [ToleranceProfile; 3] = [
    ToleranceProfile {
        name: "production",
        hole_clearance_mm: 0.05,
        description: "Machined brass (final production)",
    },
    ToleranceProfile {
        name: "prototype_resin",
        hole_clearance_mm: 0.10,
        description: "1:1 resin print validation",
    },
    ToleranceProfile {
        name: "prototype_fdm",
        hole_clearance_mm: 0.20,
        description: "2:1 FDM functional test",
    },
];

/// Look up a tolerance profile by name.
pub fn tolerance_profile(name: &str) -> Result<&'static ToleranceProfile, TypesError> {
    TOLERANCE_PROFILES
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| TypesError::UnknownProfile {
            name: name.to_string(),
            available: TOLERANCE_PROFILES
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
