//! Two-phase search for the wheel rotation that minimizes worm interference.
//!
//! The meshing pattern repeats every tooth pitch (360° / num_teeth), so only
//! one pitch is searched. A coarse sweep picks the best sample, then a fine
//! sweep of ±coarse_step around it refines the angle. Every candidate is
//! reduced modulo the pitch before it is probed.

use mesh_types::{normalize_angle, tooth_pitch_deg};
use solid_kernel::{probe_intersection, Axis, ProbeReading, SolidHandle, SolidKernel};
use tracing::{debug, info, instrument, warn};

use crate::config::SearchConfig;
use crate::types::{RotationSearchResult, SearchError};

/// Running minimum over probed angles. Ties keep the earliest angle.
struct Tracker {
    best_angle_deg: f64,
    best_volume_mm3: f64,
    probes: usize,
    failed: usize,
}

impl Tracker {
    fn new() -> Self {
        Self {
            best_angle_deg: 0.0,
            best_volume_mm3: f64::INFINITY,
            probes: 0,
            failed: 0,
        }
    }

    fn offer(&mut self, angle_deg: f64, reading: ProbeReading) {
        self.probes += 1;
        if reading.failed {
            self.failed += 1;
        }
        if reading.volume_mm3 < self.best_volume_mm3 {
            self.best_angle_deg = angle_deg;
            self.best_volume_mm3 = reading.volume_mm3;
        }
    }
}

/// Measure interference with the wheel spun by `angle_deg` about +Z.
///
/// The spun wheel is a disposable copy and is released afterwards. A failed
/// rotation counts as a failed probe.
pub(crate) fn probe_at(
    kernel: &mut dyn SolidKernel,
    wheel: &SolidHandle,
    worm: &SolidHandle,
    angle_deg: f64,
) -> ProbeReading {
    let spun = match kernel.rotate(wheel, Axis::Z, angle_deg) {
        Ok(handle) => handle,
        Err(err) => {
            warn!(%err, angle_deg, "wheel rotation failed, treating volume as 0");
            return ProbeReading::substituted();
        }
    };
    let reading = probe_intersection(&*kernel, &spun, worm);
    kernel.release(&spun);
    debug!(angle_deg, volume = reading.volume_mm3, failed = reading.failed, "probe");
    reading
}

/// Samples 0, step, 2·step, ... through the pitch. A sample landing exactly
/// on the pitch wraps to 0 and is dropped, since 0 was already probed.
fn coarse_angles(pitch_deg: f64, step_deg: f64) -> impl Iterator<Item = f64> {
    let count = (pitch_deg / step_deg).floor() as usize;
    (0..=count)
        .map(move |i| (i, normalize_angle(i as f64 * step_deg, pitch_deg)))
        .filter(|&(i, angle)| i == 0 || angle != 0.0)
        .map(|(_, angle)| angle)
}

fn fine_angles(center_deg: f64, pitch_deg: f64, config: &SearchConfig) -> Vec<f64> {
    let half = config.fine_half_width();
    (-half..=half)
        .map(|k| normalize_angle(center_deg + k as f64 * config.fine_step_deg, pitch_deg))
        .collect()
}

fn pitch_for(num_teeth: u32, config: &SearchConfig) -> Result<f64, SearchError> {
    if num_teeth == 0 {
        return Err(SearchError::NoTeeth);
    }
    config.validate()?;
    Ok(tooth_pitch_deg(num_teeth))
}

/// Find the wheel rotation (about +Z through the origin) that minimizes the
/// intersection volume with an already-positioned worm.
///
/// Neither input handle is modified. Kernel failures never abort the search;
/// such probes read as 0.0 and are counted in
/// [`RotationSearchResult::failed_probes`].
#[instrument(skip(kernel, wheel, worm))]
pub fn search_mesh_rotation(
    kernel: &mut dyn SolidKernel,
    wheel: &SolidHandle,
    worm: &SolidHandle,
    num_teeth: u32,
    config: &SearchConfig,
) -> Result<RotationSearchResult, SearchError> {
    let pitch = pitch_for(num_teeth, config)?;

    let mut tracker = Tracker::new();
    for angle in coarse_angles(pitch, config.coarse_step_deg) {
        let reading = probe_at(kernel, wheel, worm, angle);
        tracker.offer(angle, reading);
    }
    let coarse_probes = tracker.probes;
    debug!(
        angle = tracker.best_angle_deg,
        volume = tracker.best_volume_mm3,
        "coarse phase done"
    );

    for angle in fine_angles(tracker.best_angle_deg, pitch, config) {
        let reading = probe_at(kernel, wheel, worm, angle);
        tracker.offer(angle, reading);
    }

    let result = RotationSearchResult {
        optimal_rotation_deg: tracker.best_angle_deg,
        achieved_volume_mm3: tracker.best_volume_mm3,
        tooth_pitch_deg: pitch,
        coarse_probes,
        fine_probes: tracker.probes - coarse_probes,
        failed_probes: tracker.failed,
    };
    if result.has_substituted_probes() {
        warn!(
            failed = result.failed_probes,
            total = result.total_probes(),
            "some probes failed and were read as zero interference"
        );
    }
    info!(
        angle = result.optimal_rotation_deg,
        volume = result.achieved_volume_mm3,
        probes = result.total_probes(),
        "mesh rotation search complete"
    );
    Ok(result)
}

/// Run only the fine phase around each seed angle.
///
/// Returns one result per seed, in seed order, without choosing between
/// them. Used to polish the two z-offset correction candidates.
#[instrument(skip(kernel, wheel, worm))]
pub fn refine_candidates(
    kernel: &mut dyn SolidKernel,
    wheel: &SolidHandle,
    worm: &SolidHandle,
    num_teeth: u32,
    seeds_deg: &[f64],
    config: &SearchConfig,
) -> Result<Vec<RotationSearchResult>, SearchError> {
    let pitch = pitch_for(num_teeth, config)?;
    for &seed in seeds_deg {
        if !seed.is_finite() {
            return Err(SearchError::InvalidParameter {
                reason: format!("seed angle must be finite, got {seed}"),
            });
        }
    }

    let results = seeds_deg
        .iter()
        .map(|&seed| {
            let mut tracker = Tracker::new();
            for angle in fine_angles(normalize_angle(seed, pitch), pitch, config) {
                let reading = probe_at(kernel, wheel, worm, angle);
                tracker.offer(angle, reading);
            }
            debug!(
                seed,
                angle = tracker.best_angle_deg,
                volume = tracker.best_volume_mm3,
                "candidate refined"
            );
            RotationSearchResult {
                optimal_rotation_deg: tracker.best_angle_deg,
                achieved_volume_mm3: tracker.best_volume_mm3,
                tooth_pitch_deg: pitch,
                coarse_probes: 0,
                fine_probes: tracker.probes,
                failed_probes: tracker.failed,
            }
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_teeth_gives_twenty_eight_coarse_angles() {
        let angles: Vec<f64> = coarse_angles(360.0 / 13.0, 1.0).collect();
        assert_eq!(angles.len(), 28);
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[27], 27.0);
    }

    #[test]
    fn boundary_sample_on_the_pitch_is_not_repeated() {
        let angles: Vec<f64> = coarse_angles(30.0, 1.0).collect();
        assert_eq!(angles.len(), 30);
        assert_eq!(angles.iter().filter(|&&a| a == 0.0).count(), 1);
        assert_eq!(*angles.last().unwrap(), 29.0);
    }

    #[test]
    fn fine_angles_wrap_below_zero() {
        let angles = fine_angles(0.0, 30.0, &SearchConfig::default());
        assert_eq!(angles.len(), 21);
        assert!(angles.iter().all(|a| (0.0..30.0).contains(a)));
        assert!((angles[0] - 29.0).abs() < 1e-9);
        assert_eq!(angles[10], 0.0);
    }

    #[test]
    fn tracker_keeps_earliest_tie() {
        let mut t = Tracker::new();
        t.offer(3.0, ProbeReading::measured(0.5));
        t.offer(4.0, ProbeReading::measured(0.5));
        t.offer(5.0, ProbeReading::substituted());
        t.offer(6.0, ProbeReading::measured(0.0));
        assert_eq!(t.best_angle_deg, 5.0);
        assert_eq!(t.failed, 1);
        assert_eq!(t.probes, 4);
    }
}
