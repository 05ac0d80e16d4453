//! Vehicle Triage math utilities.

pub mod math;

pub use math::entropy::*;
pub use math::stable::*;
