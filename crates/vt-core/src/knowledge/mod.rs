//! The failure-mode knowledge base.
//!
//! Loaded once from a catalog, validated, then read-only. Safe for
//! unsynchronized concurrent reads; share it across sessions behind an `Arc`.
//! Construct explicitly and inject it — independently configured knowledge
//! bases (test vs. production catalogs) must coexist in one process.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use vt_common::{Error, EvidenceToken, Result};
use vt_config::{validate_catalog, Catalog, NORMAL_MODE_ID};

/// A single causal failure mode at runtime.
///
/// One uniform record with a map-valued signature covers every kind of
/// fault; there is no mode-kind hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct FailureMode {
    pub id: String,
    pub name: String,
    pub category: String,
    pub prior: f64,
    /// Evidence-token → likelihood weight.
    pub signature: HashMap<EvidenceToken, f64>,
    /// Ordered repair actions.
    pub repair_actions: Vec<String>,
}

impl FailureMode {
    /// Likelihood of observing `token` under this mode.
    ///
    /// A token absent from the signature is uninformative (1.0) — silence is
    /// not absence. An explicit 0.0 weight is a recorded contradiction.
    pub fn likelihood(&self, token: &EvidenceToken) -> f64 {
        self.signature.get(token).copied().unwrap_or(1.0)
    }
}

/// A diagnostic test at runtime.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticTest {
    pub id: String,
    pub description: String,
    /// Possible outcome tokens, excluding the implicit inconclusive outcome.
    pub outcomes: Vec<EvidenceToken>,
    pub cost: f64,
}

/// Static catalog of failure modes, tests, and known evidence tokens.
#[derive(Debug)]
pub struct KnowledgeBase {
    /// Declaration order, with the implicit normal mode appended last.
    /// Order is observable: it breaks posterior ties deterministically.
    modes: Vec<FailureMode>,
    index: HashMap<String, usize>,
    tests: Vec<DiagnosticTest>,
    known_tokens: HashSet<EvidenceToken>,
}

impl KnowledgeBase {
    /// Validate a catalog and build the runtime knowledge base.
    pub fn from_catalog(catalog: Catalog) -> Result<Self> {
        validate_catalog(&catalog).map_err(Error::from)?;

        let mut modes = Vec::with_capacity(catalog.failure_modes.len() + 1);
        let mut known_tokens = HashSet::new();

        for def in catalog.failure_modes {
            let signature = canonical_signature(&def.signature, &mut known_tokens);
            modes.push(FailureMode {
                id: def.id,
                name: def.name,
                category: def.category,
                prior: def.prior,
                signature,
                repair_actions: def.repair_actions,
            });
        }

        let normal_signature = canonical_signature(&catalog.normal.signature, &mut known_tokens);
        modes.push(FailureMode {
            id: NORMAL_MODE_ID.to_string(),
            name: "No fault found".to_string(),
            category: "none".to_string(),
            prior: catalog.normal.prior,
            signature: normal_signature,
            repair_actions: Vec::new(),
        });

        for sensor in &catalog.sensors {
            for rule in &sensor.rules {
                if let Some(token) = EvidenceToken::new(&rule.token) {
                    known_tokens.insert(token);
                }
            }
        }

        let tests = catalog
            .tests
            .into_iter()
            .map(|def| DiagnosticTest {
                id: def.id,
                description: def.description,
                outcomes: def
                    .outcomes
                    .iter()
                    .filter_map(|o| EvidenceToken::new(o))
                    .collect(),
                cost: def.cost,
            })
            .collect();

        let index = modes
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();

        Ok(Self {
            modes,
            index,
            tests,
            known_tokens,
        })
    }

    /// All failure modes in declaration order, normal last.
    pub fn get_all(&self) -> &[FailureMode] {
        &self.modes
    }

    /// Look up a failure mode by id.
    pub fn get_by_id(&self, id: &str) -> Result<&FailureMode> {
        self.index
            .get(id)
            .map(|&i| &self.modes[i])
            .ok_or_else(|| Error::FailureModeNotFound { id: id.to_string() })
    }

    /// Declaration index of a mode id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of modes, including normal.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Prior probabilities in declaration order.
    pub fn priors(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.prior).collect()
    }

    /// Diagnostic tests in declaration order.
    pub fn tests(&self) -> &[DiagnosticTest] {
        &self.tests
    }

    /// Evidence tokens the catalog can say anything about: the union of all
    /// signature keys and sensor rule tokens. Tokens outside this set are
    /// uninformative everywhere and silently tolerated.
    pub fn known_tokens(&self) -> &HashSet<EvidenceToken> {
        &self.known_tokens
    }

    pub fn is_known_token(&self, token: &EvidenceToken) -> bool {
        self.known_tokens.contains(token)
    }
}

fn canonical_signature(
    raw: &std::collections::BTreeMap<String, f64>,
    known_tokens: &mut HashSet<EvidenceToken>,
) -> HashMap<EvidenceToken, f64> {
    raw.iter()
        .filter_map(|(token, weight)| {
            EvidenceToken::new(token).map(|t| {
                known_tokens.insert(t.clone());
                (t, *weight)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_config::preset;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_catalog(preset::cooling_system()).unwrap()
    }

    #[test]
    fn normal_mode_is_appended_last() {
        let kb = kb();
        let last = kb.get_all().last().unwrap();
        assert_eq!(last.id, NORMAL_MODE_ID);
        assert!(last.repair_actions.is_empty());
    }

    #[test]
    fn get_by_id_finds_declared_mode() {
        let kb = kb();
        let mode = kb.get_by_id("thermostat_stuck_closed").unwrap();
        assert_eq!(mode.category, "cooling");
        assert!(!mode.repair_actions.is_empty());
    }

    #[test]
    fn get_by_id_unknown_is_not_found_error() {
        let err = kb().get_by_id("flux_capacitor").unwrap_err();
        assert!(matches!(err, Error::FailureModeNotFound { .. }));
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn likelihood_absent_token_is_neutral() {
        let kb = kb();
        let mode = kb.get_by_id("thermostat_stuck_closed").unwrap();
        let token = EvidenceToken::new("battery_voltage_low").unwrap();
        assert_eq!(mode.likelihood(&token), 1.0);
    }

    #[test]
    fn likelihood_explicit_zero_is_zero() {
        let kb = kb();
        let mode = kb.get_by_id("cooling_fan_failure").unwrap();
        let token = EvidenceToken::new("fan_running").unwrap();
        assert_eq!(mode.likelihood(&token), 0.0);
    }

    #[test]
    fn signature_tokens_are_canonicalized() {
        let kb = kb();
        let mode = kb.get_by_id("thermostat_stuck_closed").unwrap();
        // Catalog writes "p0217"; a differently-cased query token must match.
        let token = EvidenceToken::new("P0217").unwrap();
        assert_eq!(mode.likelihood(&token), 3.0);
    }

    #[test]
    fn known_tokens_cover_signatures_and_sensors() {
        let kb = kb();
        assert!(kb.is_known_token(&EvidenceToken::new("overheating").unwrap()));
        // Produced by a sensor rule.
        assert!(kb.is_known_token(&EvidenceToken::new("coolant_temp_low").unwrap()));
        assert!(!kb.is_known_token(&EvidenceToken::new("blinker_fluid_low").unwrap()));
    }

    #[test]
    fn priors_align_with_declaration_order() {
        let kb = kb();
        let priors = kb.priors();
        assert_eq!(priors.len(), kb.len());
        assert_eq!(priors.last(), Some(&0.65));
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let mut catalog = preset::cooling_system();
        catalog.normal.prior = 0.9;
        let err = KnowledgeBase::from_catalog(catalog).unwrap_err();
        assert_eq!(err.category(), vt_common::ErrorCategory::Config);
    }

    #[test]
    fn tests_preserve_declaration_order() {
        let kb = kb();
        let ids: Vec<&str> = kb.tests().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "thermostat_flow_check",
                "cooling_pressure_test",
                "fan_circuit_check",
                "combustion_gas_test"
            ]
        );
    }
}
