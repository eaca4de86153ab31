//! Worm/wheel mesh alignment.
//!
//! Finds the wheel rotation that minimizes interference with the worm,
//! corrects that rotation analytically for a vertically offset worm, and
//! grades the remaining interference against a tolerance budget. All
//! geometry goes through a [`solid_kernel::SolidKernel`].

pub mod analysis;
pub mod classify;
pub mod config;
pub mod correction;
pub mod search;
pub mod types;

pub use analysis::{analyze_mesh, check_interference, position_worm, MeshAnalysis};
pub use classify::{
    classify_interference, BudgetSettings, InterferenceAssessment, InterferenceVerdict,
    ToleranceBudget,
};
pub use config::SearchConfig;
pub use correction::{correct_for_z_offset, ZOffsetCorrection};
pub use search::{refine_candidates, search_mesh_rotation};
pub use types::*;
