//! End-to-end mesh analysis: place the worm, search, measure, classify.

use mesh_types::GearMeshGeometry;
use serde::{Deserialize, Serialize};
use solid_kernel::{Axis, SolidHandle, SolidKernel};
use tracing::{info, instrument};

use crate::classify::{classify_interference, InterferenceAssessment, ToleranceBudget};
use crate::config::SearchConfig;
use crate::search::{probe_at, search_mesh_rotation};
use crate::types::{RotationSearchResult, SearchError};

/// Everything learned about one worm/wheel mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshAnalysis {
    pub optimal_rotation_deg: f64,
    pub interference_volume_mm3: f64,
    /// Volume with the wheel unrotated, for comparison.
    pub unrotated_volume_mm3: f64,
    pub tooth_pitch_deg: f64,
    pub assessment: InterferenceAssessment,
    pub search: RotationSearchResult,
}

impl MeshAnalysis {
    pub fn within_tolerance(&self) -> bool {
        self.assessment.verdict.is_acceptable()
    }

    /// Plain-text summary for terminals and build logs.
    pub fn report(&self, center_distance_mm: f64, num_teeth: u32) -> String {
        let rule = "=".repeat(60);
        let within = if self.within_tolerance() { "Yes" } else { "NO" };
        let mut out = format!(
            "{rule}\nMESH ALIGNMENT ANALYSIS\n{rule}\n\
             Center distance: {center_distance_mm:.3} mm\n\
             Wheel teeth: {num_teeth}\n\
             Tooth pitch: {:.2}°\n\n\
             Optimal rotation: {:.2}°\n\
             Interference at optimum: {:.4} mm³\n\
             Interference without rotation: {:.4} mm³\n\
             Verdict: {}\n\
             Within tolerance: {within}\n\n\
             {}\n",
            self.tooth_pitch_deg,
            self.optimal_rotation_deg,
            self.interference_volume_mm3,
            self.unrotated_volume_mm3,
            self.assessment.verdict,
            self.assessment.message,
        );
        if self.search.has_substituted_probes() {
            out.push_str(&format!(
                "Note: {} of {} probes failed and were read as zero\n",
                self.search.failed_probes,
                self.search.total_probes()
            ));
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}

/// Place a worm modelled along +Z into mesh position: turned so its axis
/// lies along X, then moved out to `center_distance_mm` along +Y.
pub fn position_worm(
    kernel: &mut dyn SolidKernel,
    worm: &SolidHandle,
    center_distance_mm: f64,
) -> Result<SolidHandle, SearchError> {
    if !(center_distance_mm.is_finite() && center_distance_mm > 0.0) {
        return Err(SearchError::InvalidParameter {
            reason: format!("center distance must be positive, got {center_distance_mm}"),
        });
    }
    let turned = kernel.rotate(worm, Axis::Y, -90.0)?;
    let placed = kernel.translate(&turned, [0.0, center_distance_mm, 0.0]);
    kernel.release(&turned);
    Ok(placed?)
}

/// Interference volume with the wheel rotated by `rotation_deg`.
/// Kernel failures read as 0.0.
pub fn check_interference(
    kernel: &mut dyn SolidKernel,
    wheel: &SolidHandle,
    worm: &SolidHandle,
    rotation_deg: f64,
) -> f64 {
    probe_at(kernel, wheel, worm, rotation_deg).volume_mm3
}

/// Position the worm, search for the best wheel rotation and grade it.
///
/// `worm` is the unplaced worm, axis along +Z through the origin. The placed
/// copy is released before returning.
#[instrument(skip(kernel, wheel, worm))]
pub fn analyze_mesh(
    kernel: &mut dyn SolidKernel,
    wheel: &SolidHandle,
    worm: &SolidHandle,
    geometry: &GearMeshGeometry,
    center_distance_mm: f64,
    budget: &ToleranceBudget,
    config: &SearchConfig,
) -> Result<MeshAnalysis, SearchError> {
    geometry.validate()?;
    let placed = position_worm(kernel, worm, center_distance_mm)?;

    let search = match search_mesh_rotation(kernel, wheel, &placed, geometry.num_teeth, config) {
        Ok(search) => search,
        Err(err) => {
            kernel.release(&placed);
            return Err(err);
        }
    };
    let interference = check_interference(kernel, wheel, &placed, search.optimal_rotation_deg);
    let unrotated = check_interference(kernel, wheel, &placed, 0.0);
    kernel.release(&placed);

    let assessment = classify_interference(interference, budget, Some(unrotated));
    info!(
        angle = search.optimal_rotation_deg,
        volume = interference,
        unrotated,
        verdict = %assessment.verdict,
        "mesh analysis complete"
    );

    Ok(MeshAnalysis {
        optimal_rotation_deg: search.optimal_rotation_deg,
        interference_volume_mm3: interference,
        unrotated_volume_mm3: unrotated,
        tooth_pitch_deg: search.tooth_pitch_deg,
        assessment,
        search,
    })
}
