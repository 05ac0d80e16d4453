//! The diagnostic engine facade.
//!
//! Owns the knowledge base and sensor interpreter and hands out sessions.
//! Engines are constructed explicitly from a catalog — never from a process
//! global — so independently configured engines (test vs. production
//! catalogs) coexist safely.

use crate::knowledge::KnowledgeBase;
use crate::sensors::{SensorInterpreter, SensorReading};
use crate::session::{DiagnosticResult, DiagnosticSession};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vt_common::{Error, Result};
use vt_config::{validate_policy, Catalog, DiagnosisPolicy, PresetName};

/// One-shot diagnosis input: plain evidence primitives with no transport
/// coupling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnoseRequest {
    /// Symptom strings, e.g. "overheating".
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Diagnostic trouble codes, e.g. "P0217".
    #[serde(default)]
    pub dtcs: Vec<String>,
    /// Sensor readings, interpreted through the engine's thresholds.
    #[serde(default)]
    pub sensors: Vec<SensorReading>,
    /// Arbitrary additional observation tokens.
    #[serde(default)]
    pub additional_evidence: Vec<String>,
}

/// Facade over the knowledge base, sensor interpreter, and session factory.
#[derive(Debug)]
pub struct DiagnosticEngine {
    kb: Arc<KnowledgeBase>,
    interpreter: Arc<SensorInterpreter>,
    policy: DiagnosisPolicy,
}

impl DiagnosticEngine {
    /// Build an engine from a catalog and policy. The catalog is validated
    /// up front; an invalid catalog never produces a working engine.
    pub fn new(catalog: Catalog, policy: DiagnosisPolicy) -> Result<Self> {
        validate_policy(&policy).map_err(|e| Error::Policy(e.to_string()))?;
        let interpreter = Arc::new(SensorInterpreter::from_specs(&catalog.sensors));
        let kb = Arc::new(KnowledgeBase::from_catalog(catalog)?);
        tracing::debug!(
            modes = kb.len(),
            tests = kb.tests().len(),
            sensors = interpreter.supported_sensors().len(),
            "diagnostic engine ready"
        );
        Ok(Self {
            kb,
            interpreter,
            policy,
        })
    }

    /// Build an engine from a built-in preset with the default policy.
    pub fn with_preset(preset: PresetName) -> Result<Self> {
        Self::new(preset.build(), DiagnosisPolicy::default())
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn policy(&self) -> &DiagnosisPolicy {
        &self.policy
    }

    /// Start a fresh interactive session sharing this engine's knowledge.
    pub fn start_session(&self) -> Result<DiagnosticSession> {
        DiagnosticSession::new(
            Arc::clone(&self.kb),
            Arc::clone(&self.interpreter),
            self.policy.clone(),
        )
    }

    /// One-shot diagnosis: apply all evidence and conclude immediately.
    ///
    /// Evidence is applied in a fixed order (DTCs, symptoms, sensor-derived
    /// tokens, additional evidence). The order only affects idempotence
    /// bookkeeping; the update rule itself is order-independent up to
    /// floating-point rounding.
    pub fn diagnose(&self, request: &DiagnoseRequest) -> Result<DiagnosticResult> {
        let mut session = self.start_session()?;
        for dtc in &request.dtcs {
            session.add_dtc(dtc)?;
        }
        for symptom in &request.symptoms {
            session.add_symptom(symptom)?;
        }
        for reading in &request.sensors {
            session.add_sensor_reading(reading)?;
        }
        for evidence in &request.additional_evidence {
            session.add_observation(evidence)?;
        }
        session.conclude()
    }

    /// Sensor names the interpreter understands.
    pub fn get_supported_sensors(&self) -> &[String] {
        self.interpreter.supported_sensors()
    }
}
