//! Consistency checks on a gear set's parameters.
//!
//! These are arithmetic sanity checks only; they never touch geometry.

use std::fmt;

use crate::gear::GearParams;

/// Result of a single gear-set check.
#[derive(Debug, Clone, PartialEq)]
pub struct GearCheck {
    pub name: &'static str,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

/// All gear-set checks for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct GearSetReport {
    pub checks: Vec<GearCheck>,
}

impl GearSetReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> Vec<&GearCheck> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }
}

impl fmt::Display for GearSetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASSED" } else { "FAILED" };
        writeln!(f, "Gear set {status}")?;
        writeln!(f, "{}", "-".repeat(40))?;
        for check in &self.checks {
            let mark = if check.passed { "[x]" } else { "[ ]" };
            writeln!(f, "{mark} {}", check.name)?;
            if !check.passed {
                writeln!(f, "    Expected: {}", check.expected)?;
                writeln!(f, "    Actual: {}", check.actual)?;
            }
        }
        Ok(())
    }
}

const MODULE_TOL: f64 = 0.001;
const CENTER_DISTANCE_TOL: f64 = 0.01;
const LEAD_ANGLE_TOL_DEG: f64 = 0.5;

/// Run the gear-set consistency checks.
pub fn check_gear_set(gear: &GearParams) -> GearSetReport {
    let mut checks = Vec::new();

    let worm_module = gear.worm.module;
    let wheel_module = gear.wheel.module;
    checks.push(GearCheck {
        name: "Gear modules match",
        passed: (worm_module - wheel_module).abs() < MODULE_TOL,
        expected: "worm module = wheel module".to_string(),
        actual: format!("worm {worm_module}mm, wheel {wheel_module}mm"),
    });

    let calculated_cd = (gear.worm.pitch_diameter + gear.wheel.pitch_diameter) / 2.0;
    checks.push(GearCheck {
        name: "Center distance calculation",
        passed: (gear.center_distance - calculated_cd).abs() < CENTER_DISTANCE_TOL,
        expected: "CD = (worm PD + wheel PD) / 2".to_string(),
        actual: format!(
            "specified {}mm, calculated {calculated_cd}mm",
            gear.center_distance
        ),
    });

    let starts = gear.worm.num_starts.max(1);
    let ratio_ok = gear.worm.num_starts > 0
        && gear.ratio.checked_mul(starts) == Some(gear.wheel.num_teeth);
    checks.push(GearCheck {
        name: "Gear ratio matches tooth count",
        passed: ratio_ok,
        expected: "ratio = wheel teeth / worm starts".to_string(),
        actual: format!(
            "ratio {}, {} teeth / {} starts",
            gear.ratio, gear.wheel.num_teeth, gear.worm.num_starts
        ),
    });

    let nominal_angle = gear.worm.nominal_lead_angle_deg();
    checks.push(GearCheck {
        name: "Lead angle consistent with lead",
        passed: (gear.worm.lead_angle_deg - nominal_angle).abs() < LEAD_ANGLE_TOL_DEG,
        expected: "lead angle = atan(lead / (pi * worm PD))".to_string(),
        actual: format!(
            "specified {:.2}deg, calculated {nominal_angle:.2}deg",
            gear.worm.lead_angle_deg
        ),
    });

    GearSetReport { checks }
}
