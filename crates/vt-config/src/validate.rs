//! Catalog and policy semantic validation.

use crate::catalog::{Catalog, FailureModeDef, SensorSpec, TestDef};
use crate::policy::DiagnosisPolicy;
use crate::{CATALOG_SCHEMA_VERSION, NORMAL_MODE_ID};
use std::collections::HashSet;
use thiserror::Error;

/// Tolerance for the priors sum-to-one check.
const PRIOR_SUM_TOLERANCE: f64 = 1e-6;

/// Result type for validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Errors raised by catalog/policy validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("semantic error: {0}")]
    SemanticError(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::ParseError(_) => 61,
            ValidationError::VersionMismatch { .. } => 62,
            ValidationError::DuplicateId { .. } => 63,
            ValidationError::InvalidValue { .. } => 64,
            ValidationError::SemanticError(_) => 65,
        }
    }
}

impl From<ValidationError> for vt_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::ParseError(msg) => vt_common::Error::Catalog(msg),
            ValidationError::InvalidValue { field, message } => {
                vt_common::Error::CatalogValidation { field, message }
            }
            other => vt_common::Error::Catalog(other.to_string()),
        }
    }
}

/// Validate a catalog semantically.
///
/// Checks: supported schema version, at least one failure mode, unique ids
/// (with `normal` reserved), priors in (0, 1] summing to 1 together with the
/// normal prior, well-formed signature weights (explicit zeros allowed,
/// negatives and NaN rejected), well-formed sensors and tests.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult<()> {
    if catalog.schema_version != CATALOG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: CATALOG_SCHEMA_VERSION.to_string(),
            actual: catalog.schema_version.clone(),
        });
    }

    if catalog.failure_modes.is_empty() {
        return Err(ValidationError::SemanticError(
            "catalog must declare at least one failure mode".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut prior_sum = 0.0;
    for mode in &catalog.failure_modes {
        validate_failure_mode(mode)?;
        if !seen_ids.insert(mode.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                kind: "failure mode",
                id: mode.id.clone(),
            });
        }
        prior_sum += mode.prior;
    }

    validate_prior(&format!("{NORMAL_MODE_ID}.prior"), catalog.normal.prior)?;
    validate_signature(NORMAL_MODE_ID, &catalog.normal.signature)?;
    prior_sum += catalog.normal.prior;

    if (prior_sum - 1.0).abs() > PRIOR_SUM_TOLERANCE {
        return Err(ValidationError::SemanticError(format!(
            "priors (including '{NORMAL_MODE_ID}') must sum to 1.0, got {prior_sum}"
        )));
    }

    let mut seen_sensors = HashSet::new();
    for sensor in &catalog.sensors {
        validate_sensor(sensor)?;
        if !seen_sensors.insert(sensor.name.to_ascii_lowercase()) {
            return Err(ValidationError::DuplicateId {
                kind: "sensor",
                id: sensor.name.clone(),
            });
        }
    }

    let mut seen_tests = HashSet::new();
    for test in &catalog.tests {
        validate_test(test)?;
        if !seen_tests.insert(test.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                kind: "test",
                id: test.id.clone(),
            });
        }
    }

    Ok(())
}

/// Validate a diagnosis policy.
pub fn validate_policy(policy: &DiagnosisPolicy) -> ValidationResult<()> {
    if !(policy.conclusive_confidence > 0.0 && policy.conclusive_confidence <= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "conclusive_confidence".to_string(),
            message: format!("must be in (0, 1], got {}", policy.conclusive_confidence),
        });
    }
    if !(policy.min_info_gain_bits >= 0.0 && policy.min_info_gain_bits.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: "min_info_gain_bits".to_string(),
            message: format!("must be finite and >= 0, got {}", policy.min_info_gain_bits),
        });
    }
    if policy.top_alternatives == 0 {
        return Err(ValidationError::InvalidValue {
            field: "top_alternatives".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_failure_mode(mode: &FailureModeDef) -> ValidationResult<()> {
    if mode.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "failure_modes[].id".to_string(),
            message: "id must be non-empty".to_string(),
        });
    }
    if mode.id.eq_ignore_ascii_case(NORMAL_MODE_ID) {
        return Err(ValidationError::InvalidValue {
            field: format!("failure_modes.{}", mode.id),
            message: format!("'{NORMAL_MODE_ID}' is reserved for the implicit healthy mode"),
        });
    }
    validate_prior(&format!("failure_modes.{}.prior", mode.id), mode.prior)?;
    validate_signature(&mode.id, &mode.signature)
}

fn validate_prior(field: &str, prior: f64) -> ValidationResult<()> {
    if !(prior > 0.0 && prior <= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("prior must be in (0, 1], got {prior}"),
        });
    }
    Ok(())
}

fn validate_signature(
    mode_id: &str,
    signature: &std::collections::BTreeMap<String, f64>,
) -> ValidationResult<()> {
    for (token, weight) in signature {
        if token.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("failure_modes.{mode_id}.signature"),
                message: "signature token must be non-empty".to_string(),
            });
        }
        // 0.0 is a legal, explicit contradiction; negatives and NaN are not.
        if weight.is_nan() || !weight.is_finite() || *weight < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("failure_modes.{mode_id}.signature.{token}"),
                message: format!("likelihood weight must be finite and >= 0, got {weight}"),
            });
        }
    }
    Ok(())
}

fn validate_sensor(sensor: &SensorSpec) -> ValidationResult<()> {
    if sensor.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "sensors[].name".to_string(),
            message: "sensor name must be non-empty".to_string(),
        });
    }
    if sensor.rules.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("sensors.{}.rules", sensor.name),
            message: "sensor must declare at least one rule".to_string(),
        });
    }
    for (i, rule) in sensor.rules.iter().enumerate() {
        if !rule.threshold.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("sensors.{}.rules[{i}].threshold", sensor.name),
                message: format!("threshold must be finite, got {}", rule.threshold),
            });
        }
        if rule.token.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("sensors.{}.rules[{i}].token", sensor.name),
                message: "rule token must be non-empty".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_test(test: &TestDef) -> ValidationResult<()> {
    if test.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "tests[].id".to_string(),
            message: "test id must be non-empty".to_string(),
        });
    }
    if test.outcomes.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("tests.{}.outcomes", test.id),
            message: "test must declare at least one outcome".to_string(),
        });
    }
    if test.outcomes.iter().any(|o| o.trim().is_empty()) {
        return Err(ValidationError::InvalidValue {
            field: format!("tests.{}.outcomes", test.id),
            message: "outcome tokens must be non-empty".to_string(),
        });
    }
    if !(test.cost > 0.0 && test.cost.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: format!("tests.{}.cost", test.id),
            message: format!("cost must be finite and > 0, got {}", test.cost),
        });
    }
    Ok(())
}
