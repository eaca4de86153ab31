pub mod mock_kernel;
pub mod probe;
pub mod traits;
pub mod types;

pub use mock_kernel::{MockKernel, ToothedProfile};
pub use probe::{probe_intersection, ProbeReading};
pub use traits::*;
pub use types::*;
