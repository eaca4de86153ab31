//! Every-pair intersection audit over named parts.
//!
//! Retention hardware overlaps its shaft on purpose and the DD shaft mates
//! inside the wheel bore, so those pairs are skipped. The worm/wheel pair
//! is allowed a small contact volume.

use serde::{Deserialize, Serialize};
use solid_kernel::{probe_intersection, SolidHandle, SolidKernel};
use tracing::{debug, info, instrument, warn};

/// A positioned solid with its part name, e.g. `wheel_3` or `frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPart {
    pub name: String,
    pub handle: SolidHandle,
}

impl NamedPart {
    pub fn new(name: impl Into<String>, handle: SolidHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

/// Per-pair interference limits. A pair fails when its volume reaches the
/// limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairwiseLimits {
    pub default_limit_mm3: f64,
    /// Limit for wheel against peg head.
    pub gear_mesh_limit_mm3: f64,
}

impl Default for PairwiseLimits {
    fn default() -> Self {
        Self {
            default_limit_mm3: 0.01,
            gear_mesh_limit_mm3: 0.1,
        }
    }
}

const GEAR_MESH_PAIRS: &[(&str, &str)] = &[("wheel", "peg_head")];

const SKIP_PAIRS: &[(&str, &str)] = &[
    ("peg_washer", "peg_head"),
    ("peg_screw", "peg_head"),
    ("peg_screw", "peg_washer"),
    ("wheel_washer", "string_post"),
    ("wheel_screw", "string_post"),
    ("wheel_screw", "wheel_washer"),
    ("wheel_washer", "wheel"),
    ("wheel_screw", "wheel"),
    ("string_post", "wheel"),
];

fn pair_in(list: &[(&str, &str)], a: &str, b: &str) -> bool {
    list.iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Strip a trailing station number: `wheel_1` becomes `wheel`,
/// `peg_head` stays `peg_head`.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((base, suffix))
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

/// A pair whose intersection reached its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFinding {
    pub first: String,
    pub second: String,
    pub volume_mm3: f64,
    pub limit_mm3: f64,
    pub gear_mesh: bool,
}

/// Outcome of [`audit_pairwise`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAudit {
    pub findings: Vec<PairFinding>,
    pub pairs_checked: usize,
    pub pairs_skipped: usize,
    /// Queries the kernel could not answer; read as 0.0.
    pub failed_queries: usize,
}

impl PairwiseAudit {
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Intersect every unordered pair of `parts` and collect the violations.
#[instrument(skip_all, fields(parts = parts.len()))]
pub fn audit_pairwise(
    kernel: &dyn SolidKernel,
    parts: &[NamedPart],
    limits: &PairwiseLimits,
) -> PairwiseAudit {
    let mut audit = PairwiseAudit::default();
    for (i, a) in parts.iter().enumerate() {
        for b in &parts[i + 1..] {
            let (base_a, base_b) = (base_name(&a.name), base_name(&b.name));
            if pair_in(SKIP_PAIRS, base_a, base_b) {
                audit.pairs_skipped += 1;
                continue;
            }

            let reading = probe_intersection(kernel, &a.handle, &b.handle);
            audit.pairs_checked += 1;
            if reading.failed {
                audit.failed_queries += 1;
            }

            let gear_mesh = pair_in(GEAR_MESH_PAIRS, base_a, base_b);
            let limit = if gear_mesh {
                limits.gear_mesh_limit_mm3
            } else {
                limits.default_limit_mm3
            };
            debug!(a = %a.name, b = %b.name, volume = reading.volume_mm3, limit, "pair");
            if reading.volume_mm3 >= limit {
                warn!(a = %a.name, b = %b.name, volume = reading.volume_mm3, limit, "intersection");
                audit.findings.push(PairFinding {
                    first: a.name.clone(),
                    second: b.name.clone(),
                    volume_mm3: reading.volume_mm3,
                    limit_mm3: limit,
                    gear_mesh,
                });
            }
        }
    }
    info!(
        checked = audit.pairs_checked,
        skipped = audit.pairs_skipped,
        findings = audit.findings.len(),
        "pairwise audit complete"
    );
    audit
}
