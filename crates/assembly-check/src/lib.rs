//! Interference gate for fully positioned tuner assemblies.
//!
//! A gang of tuner stations sits in one frame. Every station gets the same
//! fixed set of read-only intersection checks; the summed volume is compared
//! against a per-station allowance. A separate pairwise audit checks every
//! pair of named parts against per-pair limits.

pub mod aggregate;
pub mod error;
pub mod pairwise;
pub mod report;
pub mod station;

pub use aggregate::{
    check_assembly_interference, run_interference_report, AssemblyCheckResult,
    InterferencePolicy, StationCheck,
};
pub use error::AssemblyInterferenceError;
pub use pairwise::{
    audit_pairwise, base_name, NamedPart, PairFinding, PairwiseAudit, PairwiseLimits,
};
pub use station::{AssemblyHandles, CheckKind, StationHandles};
