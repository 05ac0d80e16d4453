//! Built-in preset catalogs for common vehicle subsystems.
//!
//! Presets are complete, validated catalogs constructed in memory. They serve
//! as ready-to-use knowledge for the two subsystems where discrete evidence
//! diagnosis works best, and as worked examples of the catalog schema for
//! anyone authoring their own.

use crate::catalog::{
    Catalog, FailureModeDef, NormalDef, SensorRule, SensorSpec, TestDef, ThresholdOp,
};
use crate::CATALOG_SCHEMA_VERSION;
use std::collections::BTreeMap;
use std::fmt;

/// Available preset catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetName {
    /// Engine cooling system: thermostat, water pump, radiator, fan, leaks.
    CoolingSystem,
    /// Charging and starting system: battery, alternator, starter, drains.
    ChargingSystem,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[PresetName::CoolingSystem, PresetName::ChargingSystem];

    /// Preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::CoolingSystem => "cooling_system",
            PresetName::ChargingSystem => "charging_system",
        }
    }

    /// Parse a preset name from a string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "cooling_system" | "cooling" => Some(PresetName::CoolingSystem),
            "charging_system" | "charging" | "starting" => Some(PresetName::ChargingSystem),
            _ => None,
        }
    }

    /// Description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::CoolingSystem => {
                "Engine cooling failures: thermostat, water pump, radiator, fan, leaks, head gasket"
            }
            PresetName::ChargingSystem => {
                "Charging and starting failures: battery, alternator, starter, parasitic drain"
            }
        }
    }

    /// Build the preset catalog.
    pub fn build(&self) -> Catalog {
        match self {
            PresetName::CoolingSystem => cooling_system(),
            PresetName::ChargingSystem => charging_system(),
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| {
            format!(
                "unknown preset '{}'. Available: {}",
                s,
                PresetName::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

fn signature(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(token, weight)| (token.to_string(), *weight))
        .collect()
}

fn repairs(actions: &[&str]) -> Vec<String> {
    actions.iter().map(|a| a.to_string()).collect()
}

/// The engine cooling system catalog.
pub fn cooling_system() -> Catalog {
    Catalog {
        schema_version: CATALOG_SCHEMA_VERSION.to_string(),
        description: Some("Engine cooling system failure modes".to_string()),
        failure_modes: vec![
            FailureModeDef {
                id: "thermostat_stuck_closed".to_string(),
                name: "Thermostat stuck closed".to_string(),
                category: "cooling".to_string(),
                prior: 0.06,
                signature: signature(&[
                    ("overheating", 5.0),
                    ("upper_hose_hot_no_flow", 4.0),
                    ("fan_running", 2.0),
                    ("p0217", 3.0),
                    ("coolant_temp_high", 3.0),
                    ("no_flow_at_radiator", 4.0),
                ]),
                repair_actions: repairs(&[
                    "Replace thermostat",
                    "Bleed cooling system",
                    "Verify coolant flow at upper radiator hose",
                ]),
            },
            FailureModeDef {
                id: "thermostat_stuck_open".to_string(),
                name: "Thermostat stuck open".to_string(),
                category: "cooling".to_string(),
                prior: 0.06,
                signature: signature(&[
                    ("no_heat", 5.0),
                    ("p0128", 4.0),
                    ("upper_hose_cold", 4.0),
                    ("coolant_temp_low", 3.0),
                    ("slow_warmup", 3.0),
                ]),
                repair_actions: repairs(&[
                    "Replace thermostat",
                    "Verify operating temperature after replacement",
                ]),
            },
            FailureModeDef {
                id: "water_pump_failure".to_string(),
                name: "Water pump failure".to_string(),
                category: "cooling".to_string(),
                prior: 0.05,
                signature: signature(&[
                    ("overheating", 3.0),
                    ("whining_noise", 4.0),
                    ("coolant_leak_front", 4.0),
                    ("p0217", 2.0),
                    ("coolant_temp_high", 2.0),
                    ("coolant_level_low", 2.0),
                ]),
                repair_actions: repairs(&[
                    "Replace water pump",
                    "Inspect drive belt",
                    "Refill and bleed coolant",
                ]),
            },
            FailureModeDef {
                id: "radiator_clogged".to_string(),
                name: "Radiator clogged".to_string(),
                category: "cooling".to_string(),
                prior: 0.05,
                signature: signature(&[
                    ("overheating", 3.0),
                    ("radiator_cold_spots", 5.0),
                    ("coolant_temp_high", 2.0),
                    ("upper_hose_hot_no_flow", 2.0),
                ]),
                repair_actions: repairs(&[
                    "Flush radiator",
                    "Replace radiator if flow does not recover",
                ]),
            },
            FailureModeDef {
                id: "coolant_leak".to_string(),
                name: "External coolant leak".to_string(),
                category: "cooling".to_string(),
                prior: 0.05,
                signature: signature(&[
                    ("coolant_level_low", 5.0),
                    ("visible_puddle", 4.0),
                    ("sweet_smell", 3.0),
                    ("overheating", 2.0),
                    ("p0217", 1.5),
                    ("pressure_drop", 4.0),
                ]),
                repair_actions: repairs(&[
                    "Pressure-test cooling system",
                    "Repair or replace leaking component",
                    "Refill coolant",
                ]),
            },
            FailureModeDef {
                id: "cooling_fan_failure".to_string(),
                name: "Cooling fan failure".to_string(),
                category: "cooling".to_string(),
                prior: 0.04,
                signature: signature(&[
                    ("overheating_at_idle", 5.0),
                    ("fan_not_running", 5.0),
                    ("p0480", 4.0),
                    ("coolant_temp_high", 2.0),
                    ("overheating", 2.0),
                    // A running fan contradicts a dead fan; explicit zero, not omission.
                    ("fan_running", 0.0),
                ]),
                repair_actions: repairs(&[
                    "Check fan fuse and relay",
                    "Test fan motor",
                    "Replace cooling fan assembly",
                ]),
            },
            FailureModeDef {
                id: "head_gasket_failure".to_string(),
                name: "Head gasket failure".to_string(),
                category: "engine".to_string(),
                prior: 0.04,
                signature: signature(&[
                    ("white_exhaust_smoke", 5.0),
                    ("oil_milky", 5.0),
                    ("combustion_gas_in_coolant", 6.0),
                    ("overheating", 2.5),
                    ("coolant_level_low", 2.0),
                    ("p0217", 1.5),
                    ("pressure_drop", 2.0),
                ]),
                repair_actions: repairs(&[
                    "Perform combustion leak test",
                    "Replace head gasket",
                    "Check cylinder head for warpage",
                ]),
            },
        ],
        normal: NormalDef {
            prior: 0.65,
            signature: signature(&[
                ("fan_running", 1.2),
                ("coolant_temp_normal", 2.0),
                ("coolant_flow_normal", 2.0),
                ("no_dtc", 1.5),
                ("pressure_holds", 2.0),
                ("no_combustion_gas", 1.5),
                // A healthy cooling system rarely overheats: these argue
                // against "nothing wrong" without ruling it out.
                ("overheating", 0.1),
                ("coolant_temp_high", 0.1),
            ]),
        },
        sensors: vec![
            SensorSpec {
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
            },
            SensorSpec {
                name: "coolant_level".to_string(),
                unit: Some("percent".to_string()),
                rules: vec![SensorRule {
                    when: ThresholdOp::Below,
                    threshold: 30.0,
                    token: "coolant_level_low".to_string(),
                }],
            },
            SensorSpec {
                name: "fan_rpm".to_string(),
                unit: Some("rpm".to_string()),
                rules: vec![
                    SensorRule {
                        when: ThresholdOp::Above,
                        threshold: 500.0,
                        token: "fan_running".to_string(),
                    },
                    SensorRule {
                        when: ThresholdOp::Below,
                        threshold: 50.0,
                        token: "fan_not_running".to_string(),
                    },
                ],
            },
        ],
        tests: vec![
            TestDef {
                id: "thermostat_flow_check".to_string(),
                description: "Warm the engine and check coolant flow at the upper radiator hose"
                    .to_string(),
                outcomes: vec![
                    "upper_hose_hot_no_flow".to_string(),
                    "upper_hose_cold".to_string(),
                    "coolant_flow_normal".to_string(),
                ],
                cost: 1.0,
            },
            TestDef {
                id: "cooling_pressure_test".to_string(),
                description: "Pressurize the cooling system and watch for a pressure drop"
                    .to_string(),
                outcomes: vec!["pressure_drop".to_string(), "pressure_holds".to_string()],
                cost: 2.0,
            },
            TestDef {
                id: "fan_circuit_check".to_string(),
                description: "Command the cooling fan on and observe whether it spins".to_string(),
                outcomes: vec!["fan_running".to_string(), "fan_not_running".to_string()],
                cost: 1.0,
            },
            TestDef {
                id: "combustion_gas_test".to_string(),
                description: "Chemical block test for combustion gases in the coolant".to_string(),
                outcomes: vec![
                    "combustion_gas_in_coolant".to_string(),
                    "no_combustion_gas".to_string(),
                ],
                cost: 3.0,
            },
        ],
    }
}

/// The charging and starting system catalog.
pub fn charging_system() -> Catalog {
    Catalog {
        schema_version: CATALOG_SCHEMA_VERSION.to_string(),
        description: Some("Charging and starting system failure modes".to_string()),
        failure_modes: vec![
            FailureModeDef {
                id: "battery_degraded".to_string(),
                name: "Degraded battery".to_string(),
                category: "charging".to_string(),
                prior: 0.08,
                signature: signature(&[
                    ("engine_cranks_slowly", 4.0),
                    ("clicking_no_start", 3.0),
                    ("battery_voltage_low", 5.0),
                    ("dim_lights", 3.0),
                    ("p0562", 2.0),
                    ("battery_fails_load", 5.0),
                ]),
                repair_actions: repairs(&[
                    "Load-test battery",
                    "Replace battery",
                    "Clean battery terminals",
                ]),
            },
            FailureModeDef {
                id: "alternator_failure".to_string(),
                name: "Alternator failure".to_string(),
                category: "charging".to_string(),
                prior: 0.06,
                signature: signature(&[
                    ("battery_light_on", 5.0),
                    ("battery_voltage_low", 3.5),
                    ("dim_lights", 2.5),
                    ("p0562", 3.0),
                    ("whining_noise", 2.0),
                    ("voltage_drops_at_idle", 4.0),
                ]),
                repair_actions: repairs(&[
                    "Test alternator output",
                    "Inspect serpentine belt",
                    "Replace alternator",
                ]),
            },
            FailureModeDef {
                id: "starter_motor_failure".to_string(),
                name: "Starter motor failure".to_string(),
                category: "starting".to_string(),
                prior: 0.05,
                signature: signature(&[
                    ("no_crank", 5.0),
                    ("clicking_no_start", 4.0),
                    ("lights_normal", 2.0),
                ]),
                repair_actions: repairs(&[
                    "Check starter relay and wiring",
                    "Tap-test starter motor",
                    "Replace starter motor",
                ]),
            },
            FailureModeDef {
                id: "parasitic_drain".to_string(),
                name: "Parasitic current drain".to_string(),
                category: "charging".to_string(),
                prior: 0.04,
                signature: signature(&[
                    ("battery_dead_overnight", 5.0),
                    ("engine_cranks_slowly", 2.0),
                    ("battery_voltage_low", 2.0),
                    ("battery_passes_load", 2.0),
                ]),
                repair_actions: repairs(&[
                    "Measure key-off current draw",
                    "Pull fuses to isolate the drawing circuit",
                    "Repair or replace the offending module",
                ]),
            },
        ],
        normal: NormalDef {
            prior: 0.77,
            signature: signature(&[
                ("no_dtc", 1.5),
                ("lights_normal", 1.5),
                ("battery_passes_load", 2.0),
                ("voltage_stable", 1.5),
                ("battery_voltage_low", 0.2),
            ]),
        },
        sensors: vec![SensorSpec {
            name: "battery_voltage".to_string(),
            unit: Some("volts".to_string()),
            rules: vec![
                SensorRule {
                    when: ThresholdOp::Above,
                    threshold: 14.8,
                    token: "battery_voltage_high".to_string(),
                },
                SensorRule {
                    when: ThresholdOp::Below,
                    threshold: 12.2,
                    token: "battery_voltage_low".to_string(),
                },
            ],
        }],
        tests: vec![
            TestDef {
                id: "battery_load_test".to_string(),
                description: "Apply a calibrated load and watch the battery voltage".to_string(),
                outcomes: vec![
                    "battery_fails_load".to_string(),
                    "battery_passes_load".to_string(),
                ],
                cost: 2.0,
            },
            TestDef {
                id: "charging_voltage_check".to_string(),
                description: "Measure system voltage at idle with accessories on".to_string(),
                outcomes: vec![
                    "voltage_drops_at_idle".to_string(),
                    "voltage_stable".to_string(),
                ],
                cost: 1.0,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_parse_aliases() {
        assert_eq!(PresetName::parse("cooling"), Some(PresetName::CoolingSystem));
        assert_eq!(
            PresetName::parse("CHARGING_SYSTEM"),
            Some(PresetName::ChargingSystem)
        );
        assert_eq!(PresetName::parse("transmission"), None);
    }

    #[test]
    fn preset_from_str_error_lists_options() {
        let err = "nope".parse::<PresetName>().unwrap_err();
        assert!(err.contains("cooling_system"));
        assert!(err.contains("charging_system"));
    }

    #[test]
    fn cooling_priors_sum_to_one() {
        let catalog = cooling_system();
        let sum: f64 = catalog.failure_modes.iter().map(|m| m.prior).sum::<f64>()
            + catalog.normal.prior;
        assert!((sum - 1.0).abs() < 1e-9, "priors sum to {sum}");
    }

    #[test]
    fn charging_priors_sum_to_one() {
        let catalog = charging_system();
        let sum: f64 = catalog.failure_modes.iter().map(|m| m.prior).sum::<f64>()
            + catalog.normal.prior;
        assert!((sum - 1.0).abs() < 1e-9, "priors sum to {sum}");
    }

    #[test]
    fn cooling_fan_contradiction_is_explicit_zero() {
        let catalog = cooling_system();
        let fan = catalog
            .failure_modes
            .iter()
            .find(|m| m.id == "cooling_fan_failure")
            .unwrap();
        assert_eq!(fan.signature.get("fan_running"), Some(&0.0));
    }

    #[test]
    fn test_outcomes_appear_in_some_signature() {
        for preset in PresetName::ALL {
            let catalog = preset.build();
            for test in &catalog.tests {
                for outcome in &test.outcomes {
                    let known = catalog
                        .failure_modes
                        .iter()
                        .any(|m| m.signature.contains_key(outcome))
                        || catalog.normal.signature.contains_key(outcome);
                    assert!(
                        known,
                        "outcome '{outcome}' of test '{}' in preset {preset} is unknown",
                        test.id
                    );
                }
            }
        }
    }
}
