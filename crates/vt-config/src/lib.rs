//! Vehicle Triage catalog configuration.
//!
//! This crate provides:
//! - Typed Rust structs for the failure-mode catalog document
//! - The diagnosis policy (confidence and information-gain thresholds)
//! - Schema and semantic validation
//! - Built-in preset catalogs for common vehicle subsystems

pub mod catalog;
pub mod policy;
pub mod preset;
pub mod validate;

pub use catalog::{Catalog, FailureModeDef, NormalDef, SensorRule, SensorSpec, TestDef, ThresholdOp};
pub use policy::DiagnosisPolicy;
pub use preset::PresetName;
pub use validate::{validate_catalog, validate_policy, ValidationError, ValidationResult};

/// Schema version for catalog documents.
pub const CATALOG_SCHEMA_VERSION: &str = "1.0.0";

/// Reserved id of the implicit "nothing wrong" mode.
///
/// Catalog entries may not use this id; the knowledge base injects it from
/// the catalog's `normal` section.
pub const NORMAL_MODE_ID: &str = "normal";
