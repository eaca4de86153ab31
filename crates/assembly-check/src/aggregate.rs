use std::collections::BTreeMap;

use mesh_align::{classify_interference, InterferenceVerdict, ToleranceBudget};
use serde::{Deserialize, Serialize};
use solid_kernel::{probe_intersection, SolidKernel};
use tracing::{debug, info, instrument, warn};

use crate::error::AssemblyInterferenceError;
use crate::station::{AssemblyHandles, CheckKind};

/// Acceptance threshold for the summed assembly interference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterferencePolicy {
    /// Allowed volume per station; the threshold grows with station count.
    pub per_station_allowance_mm3: f64,
    /// Budget each station's gear mesh volume is classified against.
    pub mesh_budget: ToleranceBudget,
}

impl Default for InterferencePolicy {
    fn default() -> Self {
        Self {
            per_station_allowance_mm3: 0.03,
            mesh_budget: ToleranceBudget::default(),
        }
    }
}

impl InterferencePolicy {
    pub fn threshold_mm3(&self, stations: usize) -> f64 {
        self.per_station_allowance_mm3 * stations as f64
    }
}

/// One measured check of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCheck {
    /// 1-based station number.
    pub station: usize,
    pub kind: CheckKind,
    pub volume_mm3: f64,
    /// The kernel query failed and the volume was read as 0.0.
    pub failed: bool,
    /// Set for [`CheckKind::GearMesh`] only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<InterferenceVerdict>,
}

impl StationCheck {
    pub fn key(&self) -> String {
        self.kind.key(self.station)
    }
}

/// Every per-station measurement plus the summed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyCheckResult {
    pub stations: usize,
    /// In station order, then in [`CheckKind::ALL`] order.
    pub checks: Vec<StationCheck>,
    pub total_mm3: f64,
    pub threshold_mm3: f64,
}

impl AssemblyCheckResult {
    /// Map of `tuner_{i}_{check}` to volume, plus `total`.
    pub fn breakdown(&self) -> BTreeMap<String, f64> {
        let mut map: BTreeMap<String, f64> =
            self.checks.iter().map(|c| (c.key(), c.volume_mm3)).collect();
        map.insert("total".to_string(), self.total_mm3);
        map
    }

    /// An empty assembly passes; otherwise the total must stay below the
    /// threshold.
    pub fn passed(&self) -> bool {
        self.stations == 0 || self.total_mm3 < self.threshold_mm3
    }

    /// Checks that measured any interference at all.
    pub fn nonzero_checks(&self) -> Vec<&StationCheck> {
        self.checks.iter().filter(|c| c.volume_mm3 > 0.0).collect()
    }

    pub fn failed_queries(&self) -> usize {
        self.checks.iter().filter(|c| c.failed).count()
    }

    /// Summed volume of each station, in station order.
    pub fn station_subtotals(&self) -> Vec<f64> {
        (1..=self.stations)
            .map(|station| {
                compensated_sum(
                    self.checks
                        .iter()
                        .filter(|c| c.station == station)
                        .map(|c| c.volume_mm3),
                )
            })
            .collect()
    }

    /// Gear mesh verdict of each station, in station order.
    pub fn mesh_verdicts(&self) -> Vec<Option<InterferenceVerdict>> {
        (1..=self.stations)
            .map(|station| {
                self.checks
                    .iter()
                    .find(|c| c.station == station && c.kind == CheckKind::GearMesh)
                    .and_then(|c| c.verdict)
            })
            .collect()
    }
}

/// Neumaier summation. K equal terms sum to the rounded K·v, matching
/// [`InterferencePolicy::threshold_mm3`].
pub(crate) fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut carry = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            carry += (sum - t) + v;
        } else {
            carry += (v - t) + sum;
        }
        sum = t;
    }
    sum + carry
}

/// Measure every per-station check without judging the result.
#[instrument(skip_all, fields(stations = assembly.stations.len()))]
pub fn run_interference_report(
    kernel: &dyn SolidKernel,
    assembly: &AssemblyHandles,
    policy: &InterferencePolicy,
) -> AssemblyCheckResult {
    let mut checks = Vec::with_capacity(assembly.stations.len() * CheckKind::ALL.len());
    for (i, station) in assembly.stations.iter().enumerate() {
        for kind in CheckKind::ALL {
            let (a, b) = kind.operands(&assembly.frame, station);
            let reading = probe_intersection(kernel, a, b);
            let verdict = (kind == CheckKind::GearMesh).then(|| {
                classify_interference(reading.volume_mm3, &policy.mesh_budget, None).verdict
            });
            let check = StationCheck {
                station: i + 1,
                kind,
                volume_mm3: reading.volume_mm3,
                failed: reading.failed,
                verdict,
            };
            debug!(key = %check.key(), volume = check.volume_mm3, ?verdict, "station check");
            checks.push(check);
        }
    }

    let stations = assembly.stations.len();
    let mut result = AssemblyCheckResult {
        stations,
        checks,
        total_mm3: 0.0,
        threshold_mm3: policy.threshold_mm3(stations),
    };
    result.total_mm3 = compensated_sum(result.station_subtotals());
    if result.failed_queries() > 0 {
        warn!(
            failed = result.failed_queries(),
            "some interference queries failed and were read as 0"
        );
    }
    info!(
        total = result.total_mm3,
        threshold = result.threshold_mm3,
        "interference report complete"
    );
    result
}

/// Measure the assembly and reject it when the total interference reaches
/// the policy threshold.
pub fn check_assembly_interference(
    kernel: &dyn SolidKernel,
    assembly: &AssemblyHandles,
    policy: &InterferencePolicy,
) -> Result<AssemblyCheckResult, AssemblyInterferenceError> {
    let result = run_interference_report(kernel, assembly, policy);
    if result.passed() {
        return Ok(result);
    }
    for check in result.nonzero_checks() {
        warn!(key = %check.key(), volume = check.volume_mm3, "interference");
    }
    warn!(
        total = result.total_mm3,
        threshold = result.threshold_mm3,
        "assembly interference rejected"
    );
    Err(AssemblyInterferenceError {
        result: Box::new(result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_terms_sum_to_their_product() {
        for (k, v) in [(10, 0.02), (7, 0.03), (5, 0.02)] {
            assert_eq!(compensated_sum(std::iter::repeat(v).take(k)), v * k as f64);
        }
    }

    #[test]
    fn empty_sum_is_zero() {
        assert_eq!(compensated_sum(std::iter::empty()), 0.0);
    }
}
