//! Catalog document types.
//!
//! A catalog is a static description of everything the engine can reason
//! about: the failure modes with their priors and evidence signatures, the
//! sensor threshold rules, and the diagnostic test definitions. Catalogs are
//! plain data — callers may deserialize them from JSON, build them in code,
//! or map them from database rows.
//!
//! Likelihood weight semantics: a token ABSENT from a signature is neutral
//! (likelihood 1.0 at update time — silence is not absence). An EXPLICIT
//! `0.0` weight records a contradiction: that evidence argues against the
//! mode. The two are deliberately distinct; omission never penalizes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    /// Catalog schema version, e.g. "1.0.0".
    pub schema_version: String,
    /// Human-readable description of the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Failure modes, in declaration order. Order is observable: it breaks
    /// probability ties deterministically.
    pub failure_modes: Vec<FailureModeDef>,
    /// The implicit "nothing wrong" mode: its prior and signature.
    pub normal: NormalDef,
    /// Sensor interpretation rules.
    #[serde(default)]
    pub sensors: Vec<SensorSpec>,
    /// Diagnostic test definitions.
    #[serde(default)]
    pub tests: Vec<TestDef>,
}

impl Catalog {
    /// Parse a catalog from a JSON document. Parsing only; run
    /// [`crate::validate_catalog`] before use.
    pub fn from_json(json: &str) -> Result<Catalog, crate::ValidationError> {
        serde_json::from_str(json).map_err(|e| crate::ValidationError::ParseError(e.to_string()))
    }
}

/// A single causal failure mode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FailureModeDef {
    /// Unique id, e.g. "thermostat_stuck_closed".
    pub id: String,
    /// Display name.
    pub name: String,
    /// Vehicle system category, e.g. "cooling".
    pub category: String,
    /// Prior probability P(mode) before any evidence.
    pub prior: f64,
    /// Evidence-token → likelihood weight. Weights above 1.0 support the
    /// mode, below 1.0 argue against it, exactly 0.0 contradicts it.
    pub signature: BTreeMap<String, f64>,
    /// Ordered repair actions for this mode.
    #[serde(default)]
    pub repair_actions: Vec<String>,
}

/// Prior and signature for the implicit healthy mode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NormalDef {
    /// Prior probability that nothing is wrong.
    pub prior: f64,
    /// Evidence signature of a healthy vehicle, so benign observations can
    /// be explained away rather than forced onto a real fault.
    #[serde(default)]
    pub signature: BTreeMap<String, f64>,
}

/// Threshold comparison direction for a sensor rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdOp {
    /// Fires when the reading is strictly above the threshold.
    Above,
    /// Fires when the reading is strictly below the threshold.
    Below,
}

/// One threshold rule for a sensor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SensorRule {
    /// Comparison direction.
    pub when: ThresholdOp,
    /// Threshold value in the sensor's unit.
    pub threshold: f64,
    /// Evidence token emitted when the rule fires.
    pub token: String,
}

/// Interpretation rules for one sensor.
///
/// Rules are evaluated in declaration order and the first match wins, which
/// fixes the priority (e.g. "high" before "low"). A reading matching no rule
/// yields no evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SensorSpec {
    /// Sensor name, matched case-insensitively against readings.
    pub name: String,
    /// Expected unit, for documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Ordered threshold rules.
    pub rules: Vec<SensorRule>,
}

fn default_cost() -> f64 {
    1.0
}

/// A diagnostic test a technician can perform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TestDef {
    /// Unique test id, e.g. "cooling_pressure_test".
    pub id: String,
    /// What the test involves.
    pub description: String,
    /// Possible outcome tokens. An implicit "inconclusive" outcome is always
    /// considered in addition to these.
    pub outcomes: Vec<String>,
    /// Relative cost of performing the test (time, money, effort).
    #[serde(default = "default_cost")]
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_json_roundtrip() {
        let json = r#"{
            "schema_version": "1.0.0",
            "failure_modes": [
                {
                    "id": "battery_degraded",
                    "name": "Degraded battery",
                    "category": "charging",
                    "prior": 0.35,
                    "signature": {"engine_cranks_slowly": 4.0},
                    "repair_actions": ["Replace battery"]
                }
            ],
            "normal": {"prior": 0.65, "signature": {"no_dtc": 1.5}}
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.failure_modes.len(), 1);
        assert_eq!(catalog.failure_modes[0].id, "battery_degraded");
        assert!(catalog.sensors.is_empty());
        assert!(catalog.tests.is_empty());

        let back = serde_json::to_string(&catalog).unwrap();
        let again = Catalog::from_json(&back).unwrap();
        assert_eq!(again.normal.prior, 0.65);
    }

    #[test]
    fn test_cost_defaults_to_one() {
        let json = r#"{"id": "t", "description": "d", "outcomes": ["a"]}"#;
        let test: TestDef = serde_json::from_str(json).unwrap();
        assert_eq!(test.cost, 1.0);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::ValidationError::ParseError(_)));
    }
}
