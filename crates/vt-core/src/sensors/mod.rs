//! Sensor reading interpretation.
//!
//! Continuous readings are mapped to discrete evidence tokens through
//! per-sensor ordered threshold rules. Readings are ephemeral: they are
//! interpreted once and never stored raw.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vt_common::EvidenceToken;
use vt_config::{SensorSpec, ThresholdOp};

/// A single continuous sensor reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    /// Sensor name, matched case-insensitively.
    pub name: String,
    /// Measured value.
    pub value: f64,
    /// Unit of the measurement, for documentation.
    pub unit: String,
}

impl SensorReading {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    when: ThresholdOp,
    threshold: f64,
    token: EvidenceToken,
}

/// Maps sensor readings to evidence tokens via configured thresholds.
///
/// Rules are evaluated in declaration order with first-match-wins priority.
/// Unknown sensor names and readings matching no rule yield `None` — never an
/// error.
#[derive(Debug)]
pub struct SensorInterpreter {
    rules: HashMap<String, Vec<CompiledRule>>,
    /// Sensor names in declaration order.
    names: Vec<String>,
}

impl SensorInterpreter {
    /// Compile interpretation rules from sensor specs.
    ///
    /// Rules whose token canonicalizes to nothing are dropped; catalog
    /// validation rejects those up front, so this only matters for specs
    /// built by hand.
    pub fn from_specs(specs: &[SensorSpec]) -> Self {
        let mut rules = HashMap::new();
        let mut names = Vec::new();
        for spec in specs {
            let key = spec.name.trim().to_ascii_lowercase();
            let compiled: Vec<CompiledRule> = spec
                .rules
                .iter()
                .filter_map(|rule| {
                    EvidenceToken::new(&rule.token).map(|token| CompiledRule {
                        when: rule.when,
                        threshold: rule.threshold,
                        token,
                    })
                })
                .collect();
            if rules.insert(key, compiled).is_none() {
                names.push(spec.name.trim().to_ascii_lowercase());
            }
        }
        Self { rules, names }
    }

    /// Interpret one reading into at most one evidence token.
    pub fn interpret(&self, reading: &SensorReading) -> Option<EvidenceToken> {
        if reading.value.is_nan() {
            return None;
        }
        let key = reading.name.trim().to_ascii_lowercase();
        let rules = self.rules.get(&key)?;
        for rule in rules {
            let fires = match rule.when {
                ThresholdOp::Above => reading.value > rule.threshold,
                ThresholdOp::Below => reading.value < rule.threshold,
            };
            if fires {
                return Some(rule.token.clone());
            }
        }
        None
    }

    /// Configured sensor names, in declaration order.
    pub fn supported_sensors(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_config::SensorRule;

    fn interpreter() -> SensorInterpreter {
        SensorInterpreter::from_specs(&[SensorSpec {
            name: "coolant_temp".to_string(),
            unit: Some("celsius".to_string()),
            rules: vec![
                SensorRule {
                    when: ThresholdOp::Above,
                    threshold: 110.0,
                    token: "coolant_temp_high".to_string(),
                },
                SensorRule {
                    when: ThresholdOp::Below,
                    threshold: 70.0,
                    token: "coolant_temp_low".to_string(),
                },
            ],
        }])
    }

    #[test]
    fn high_rule_fires_above_threshold() {
        let token = interpreter()
            .interpret(&SensorReading::new("coolant_temp", 118.0, "celsius"))
            .unwrap();
        assert_eq!(token.as_str(), "coolant_temp_high");
    }

    #[test]
    fn low_rule_fires_below_threshold() {
        let token = interpreter()
            .interpret(&SensorReading::new("coolant_temp", 55.0, "celsius"))
            .unwrap();
        assert_eq!(token.as_str(), "coolant_temp_low");
    }

    #[test]
    fn nominal_reading_yields_nothing() {
        assert!(interpreter()
            .interpret(&SensorReading::new("coolant_temp", 92.0, "celsius"))
            .is_none());
    }

    #[test]
    fn threshold_boundary_does_not_fire() {
        assert!(interpreter()
            .interpret(&SensorReading::new("coolant_temp", 110.0, "celsius"))
            .is_none());
    }

    #[test]
    fn unknown_sensor_yields_nothing() {
        assert!(interpreter()
            .interpret(&SensorReading::new("oil_pressure", 10.0, "psi"))
            .is_none());
    }

    #[test]
    fn sensor_name_is_case_insensitive() {
        let token = interpreter()
            .interpret(&SensorReading::new(" Coolant_Temp ", 120.0, "celsius"))
            .unwrap();
        assert_eq!(token.as_str(), "coolant_temp_high");
    }

    #[test]
    fn nan_reading_yields_nothing() {
        assert!(interpreter()
            .interpret(&SensorReading::new("coolant_temp", f64::NAN, "celsius"))
            .is_none());
    }

    #[test]
    fn supported_sensors_in_declaration_order() {
        let specs = vec![
            SensorSpec {
                name: "fan_rpm".to_string(),
                unit: None,
                rules: vec![SensorRule {
                    when: ThresholdOp::Above,
                    threshold: 500.0,
                    token: "fan_running".to_string(),
                }],
            },
            SensorSpec {
                name: "coolant_temp".to_string(),
                unit: None,
                rules: vec![SensorRule {
                    when: ThresholdOp::Above,
                    threshold: 110.0,
                    token: "coolant_temp_high".to_string(),
                }],
            },
        ];
        let interp = SensorInterpreter::from_specs(&specs);
        assert_eq!(interp.supported_sensors(), &["fan_rpm", "coolant_temp"]);
    }
}
