//! Deterministic test double implementing `SolidKernel`.
//!
//! Solids are simple analytic shapes with a rigid pose. Sphere/sphere and
//! block/block intersections are exact. A toothed wheel against a worm uses a
//! synthetic interference profile that is periodic in the wheel's spin with
//! the tooth pitch, so rotation searches have a known optimum.
//! Used by mesh-align and assembly-check for unit testing.

use std::cell::Cell;
use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::traits::SolidKernel;
use crate::types::*;

new_key_type! {
    struct SolidKey;
}

/// Synthetic interference profile of a toothed wheel meshing with a worm.
///
/// Volume as a function of wheel spin θ (degrees):
/// `floor + peak · (1 − cos(2π·(θ − phase)/pitch)) / 2`, i.e. minimal at
/// `phase` modulo the tooth pitch. The worm only engages when its center lies
/// within `reach_mm` of the wheel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToothedProfile {
    pub num_teeth: u32,
    pub peak_volume_mm3: f64,
    pub floor_volume_mm3: f64,
    pub phase_deg: f64,
    pub reach_mm: f64,
}

impl ToothedProfile {
    pub fn new(num_teeth: u32, phase_deg: f64) -> Self {
        Self {
            num_teeth,
            peak_volume_mm3: 2.0,
            floor_volume_mm3: 0.0,
            phase_deg,
            reach_mm: 10.0,
        }
    }

    fn pitch_deg(&self) -> f64 {
        360.0 / self.num_teeth as f64
    }

    /// Interference volume at the given spin.
    pub fn volume_at(&self, spin_deg: f64) -> f64 {
        let x = 2.0 * PI * (spin_deg - self.phase_deg) / self.pitch_deg();
        self.floor_volume_mm3 + self.peak_volume_mm3 * (1.0 - x.cos()) / 2.0
    }
}

#[derive(Debug, Clone)]
enum MockShape {
    Sphere { radius: f64 },
    Block { half_extents: Vector3<f64> },
    Wheel(ToothedProfile),
    Worm,
}

impl MockShape {
    fn name(&self) -> &'static str {
        match self {
            MockShape::Sphere { .. } => "sphere",
            MockShape::Block { .. } => "block",
            MockShape::Wheel(_) => "wheel",
            MockShape::Worm => "worm",
        }
    }
}

/// A synthetic solid: an analytic shape placed by a rigid pose.
#[derive(Debug, Clone)]
struct MockSolid {
    shape: MockShape,
    pose: Isometry3<f64>,
}

#[derive(Debug, Clone, Copy)]
enum PairOverride {
    Volume(f64),
    Fail,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    solids: SlotMap<SolidKey, MockSolid>,
    /// Fixed answers for specific handle pairs, keyed by (min, max) raw id.
    overrides: HashMap<(u64, u64), PairOverride>,
    /// Wheel spin ranges (degrees, within one pitch) where queries fail.
    failing_spins: Vec<(f64, f64)>,
    queries: Cell<usize>,
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            solids: SlotMap::with_key(),
            overrides: HashMap::new(),
            failing_spins: Vec::new(),
            queries: Cell::new(0),
        }
    }

    fn insert(&mut self, shape: MockShape, pose: Isometry3<f64>) -> SolidHandle {
        let key = self.solids.insert(MockSolid { shape, pose });
        SolidHandle(key.data().as_ffi())
    }

    fn get(&self, handle: &SolidHandle) -> Result<&MockSolid, KernelError> {
        let key = SolidKey::from(KeyData::from_ffi(handle.0));
        self.solids.get(key).ok_or_else(|| KernelError::SolidNotFound {
            handle: handle.clone(),
        })
    }

    fn pair_key(a: &SolidHandle, b: &SolidHandle) -> (u64, u64) {
        (a.0.min(b.0), a.0.max(b.0))
    }

    // ── Construction ───────────────────────────────────────────────────────

    /// Sphere of `radius` centered at `center`.
    pub fn add_sphere(&mut self, center: [f64; 3], radius: f64) -> SolidHandle {
        self.insert(
            MockShape::Sphere { radius },
            Isometry3::translation(center[0], center[1], center[2]),
        )
    }

    /// Axis-aligned block spanning `min` to `max`.
    pub fn add_block(&mut self, min: [f64; 3], max: [f64; 3]) -> SolidHandle {
        let min = Vector3::from(min);
        let max = Vector3::from(max);
        let center = (min + max) / 2.0;
        self.insert(
            MockShape::Block {
                half_extents: (max - min).abs() / 2.0,
            },
            Isometry3::translation(center.x, center.y, center.z),
        )
    }

    /// Toothed wheel centered at the origin, axis along +Z.
    pub fn add_wheel(&mut self, profile: ToothedProfile) -> SolidHandle {
        self.insert(MockShape::Wheel(profile), Isometry3::identity())
    }

    /// Worm centered at the origin, axis along +Z.
    pub fn add_worm(&mut self) -> SolidHandle {
        self.insert(MockShape::Worm, Isometry3::identity())
    }

    // ── Scripting ──────────────────────────────────────────────────────────

    /// Answer every query between exactly these two handles with `volume`.
    pub fn set_intersection(&mut self, a: &SolidHandle, b: &SolidHandle, volume: f64) {
        self.overrides
            .insert(Self::pair_key(a, b), PairOverride::Volume(volume));
    }

    /// Make every query between exactly these two handles fail.
    pub fn fail_intersection(&mut self, a: &SolidHandle, b: &SolidHandle) {
        self.overrides.insert(Self::pair_key(a, b), PairOverride::Fail);
    }

    /// Make wheel/worm queries fail while the wheel spin (reduced to one
    /// tooth pitch) lies in `[lo_deg, hi_deg]`.
    pub fn fail_wheel_spin_between(&mut self, lo_deg: f64, hi_deg: f64) {
        self.failing_spins.push((lo_deg, hi_deg));
    }

    // ── Introspection ──────────────────────────────────────────────────────

    /// Number of intersection queries answered so far (including failures).
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    /// Number of solids currently held.
    pub fn live_solids(&self) -> usize {
        self.solids.len()
    }

    /// World-space position of the solid's reference point.
    pub fn position(&self, handle: &SolidHandle) -> Option<[f64; 3]> {
        let t = self.get(handle).ok()?.pose.translation.vector;
        Some([t.x, t.y, t.z])
    }

    /// Spin of a solid about its own local Z axis, in degrees (-180, 180].
    pub fn spin_deg(&self, handle: &SolidHandle) -> Option<f64> {
        let (_, _, yaw) = self.get(handle).ok()?.pose.rotation.euler_angles();
        Some(yaw.to_degrees())
    }

    // ── Intersection models ────────────────────────────────────────────────

    fn wheel_worm_volume(
        &self,
        profile: &ToothedProfile,
        wheel: &Isometry3<f64>,
        worm: &Isometry3<f64>,
    ) -> Result<f64, KernelError> {
        let axis = wheel.rotation * Vector3::z();
        let to_worm = worm.translation.vector - wheel.translation.vector;
        let radial = to_worm - axis * to_worm.dot(&axis);
        if radial.norm() > profile.reach_mm {
            return Ok(0.0);
        }

        let (_, _, yaw) = wheel.rotation.euler_angles();
        let spin = yaw.to_degrees();
        let reduced = spin.rem_euclid(profile.pitch_deg());
        if self
            .failing_spins
            .iter()
            .any(|&(lo, hi)| reduced >= lo && reduced <= hi)
        {
            return Err(KernelError::IntersectionFailed {
                reason: format!("degenerate boolean at wheel spin {spin:.3}deg"),
            });
        }

        Ok(profile.volume_at(spin))
    }
}

/// Exact volume of the lens shared by two spheres.
fn sphere_sphere_volume(r1: f64, r2: f64, d: f64) -> f64 {
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return 4.0 / 3.0 * PI * r.powi(3);
    }
    let sum = r1 + r2;
    let diff = r1 - r2;
    PI * (sum - d).powi(2) * (d * d + 2.0 * d * sum - 3.0 * diff * diff) / (12.0 * d)
}

/// Overlap volume of two axis-aligned blocks.
fn block_block_volume(
    ca: &Vector3<f64>,
    ha: &Vector3<f64>,
    cb: &Vector3<f64>,
    hb: &Vector3<f64>,
) -> f64 {
    (0..3)
        .map(|i| {
            let lo = (ca[i] - ha[i]).max(cb[i] - hb[i]);
            let hi = (ca[i] + ha[i]).min(cb[i] + hb[i]);
            (hi - lo).max(0.0)
        })
        .product()
}

fn is_axis_aligned(pose: &Isometry3<f64>) -> bool {
    pose.rotation.angle() < 1e-9
}

impl SolidKernel for MockKernel {
    fn rotate(
        &mut self,
        solid: &SolidHandle,
        axis: Axis,
        angle_deg: f64,
    ) -> Result<SolidHandle, KernelError> {
        let source = self.get(solid)?.clone();
        let direction = Unit::try_new(Vector3::from(axis.direction), 1e-12).ok_or_else(|| {
            KernelError::TransformFailed {
                reason: "rotation axis has zero length".to_string(),
            }
        })?;
        let o = Vector3::from(axis.origin);
        let spin = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&direction, angle_deg.to_radians()),
        );
        let about_axis =
            Isometry3::translation(o.x, o.y, o.z) * spin * Isometry3::translation(-o.x, -o.y, -o.z);

        Ok(self.insert(source.shape, about_axis * source.pose))
    }

    fn translate(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let source = self.get(solid)?.clone();
        let shift = Isometry3::translation(offset[0], offset[1], offset[2]);
        Ok(self.insert(source.shape, shift * source.pose))
    }

    fn intersection_volume(&self, a: &SolidHandle, b: &SolidHandle) -> Result<f64, KernelError> {
        self.queries.set(self.queries.get() + 1);

        let sa = self.get(a)?;
        let sb = self.get(b)?;

        match self.overrides.get(&Self::pair_key(a, b)) {
            Some(PairOverride::Volume(v)) => return Ok(*v),
            Some(PairOverride::Fail) => {
                return Err(KernelError::IntersectionFailed {
                    reason: "scripted failure".to_string(),
                })
            }
            None => {}
        }

        match (&sa.shape, &sb.shape) {
            (MockShape::Sphere { radius: r1 }, MockShape::Sphere { radius: r2 }) => {
                let d = (sa.pose.translation.vector - sb.pose.translation.vector).norm();
                Ok(sphere_sphere_volume(*r1, *r2, d))
            }
            (MockShape::Block { half_extents: ha }, MockShape::Block { half_extents: hb }) => {
                if !is_axis_aligned(&sa.pose) || !is_axis_aligned(&sb.pose) {
                    return Err(KernelError::NotSupported {
                        operation: "intersection of rotated blocks".to_string(),
                    });
                }
                Ok(block_block_volume(
                    &sa.pose.translation.vector,
                    ha,
                    &sb.pose.translation.vector,
                    hb,
                ))
            }
            (MockShape::Wheel(profile), MockShape::Worm) => {
                self.wheel_worm_volume(profile, &sa.pose, &sb.pose)
            }
            (MockShape::Worm, MockShape::Wheel(profile)) => {
                self.wheel_worm_volume(profile, &sb.pose, &sa.pose)
            }
            (x, y) => Err(KernelError::NotSupported {
                operation: format!("intersection of {} and {}", x.name(), y.name()),
            }),
        }
    }

    fn release(&mut self, solid: &SolidHandle) {
        let key = SolidKey::from(KeyData::from_ffi(solid.0));
        self.solids.remove(key);
    }
}
