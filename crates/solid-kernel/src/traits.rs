use crate::types::*;

/// Solid geometry provider. The only capability the mesh alignment core
/// needs from a geometry kernel.
///
/// Transforms are copy-on-write: `rotate` and `translate` return a new
/// handle and leave the input solid untouched.
pub trait SolidKernel {
    /// Rotate a copy of `solid` about `axis` by `angle_deg` degrees
    /// (right-hand rule about the axis direction).
    fn rotate(
        &mut self,
        solid: &SolidHandle,
        axis: Axis,
        angle_deg: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Translate a copy of `solid` by `offset`.
    fn translate(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Volume (mm³) jointly occupied by two positioned solids.
    /// Should be 0.0 for disjoint solids.
    fn intersection_volume(&self, a: &SolidHandle, b: &SolidHandle) -> Result<f64, KernelError>;

    /// Dispose of a solid the caller no longer needs.
    /// Kernels that reclaim memory some other way can ignore this.
    fn release(&mut self, _solid: &SolidHandle) {}
}
