/// Opaque handle to a solid owned by a geometry kernel.
/// NEVER persisted. Valid only for the kernel session that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    /// Wrap a kernel-specific raw id. Only kernel implementations should call this.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A rotation axis: a line through `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub origin: [f64; 3],
    pub direction: [f64; 3],
}

impl Axis {
    pub const X: Axis = Axis {
        origin: [0.0, 0.0, 0.0],
        direction: [1.0, 0.0, 0.0],
    };
    pub const Y: Axis = Axis {
        origin: [0.0, 0.0, 0.0],
        direction: [0.0, 1.0, 0.0],
    };
    pub const Z: Axis = Axis {
        origin: [0.0, 0.0, 0.0],
        direction: [0.0, 0.0, 1.0],
    };

    pub fn new(origin: [f64; 3], direction: [f64; 3]) -> Self {
        Self { origin, direction }
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("intersection failed: {reason}")]
    IntersectionFailed { reason: String },

    #[error("transform failed: {reason}")]
    TransformFailed { reason: String },

    #[error("solid not found: {handle:?}")]
    SolidNotFound { handle: SolidHandle },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}
