//! Shared value types for worm/wheel mesh alignment.
//!
//! Everything here is plain data: gear parameters, the derived mesh geometry
//! used by the rotation search, handedness, angle normalization and the
//! named manufacturing tolerance profiles.

pub mod angle;
pub mod checks;
pub mod error;
pub mod gear;
pub mod tolerance;

pub use angle::*;
pub use checks::*;
pub use error::TypesError;
pub use gear::*;
pub use tolerance::*;
