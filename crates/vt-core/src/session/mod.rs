//! Diagnostic session lifecycle.
//!
//! A session owns one belief state exclusively and walks it through a
//! sequence of evidence applications. Sessions are Active until `conclude()`
//! freezes them; every operation on a concluded session fails with a
//! `SessionClosed` error.
//!
//! This module is intentionally library-only: hosts (chat backends, page
//! drivers) compose these primitives and own any looping or scheduling.

use crate::decision::{recommend_test, TestRecommendation};
use crate::inference::BeliefEngine;
use crate::knowledge::{FailureMode, KnowledgeBase};
use crate::sensors::{SensorInterpreter, SensorReading};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use vt_common::{Error, EvidenceToken, Result, SessionId};
use vt_config::DiagnosisPolicy;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Concluded,
}

/// How settled the diagnosis is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisPhase {
    /// No evidence was applied; the result is the catalog prior.
    Initial,
    /// Evidence was applied but the diagnosis is not yet settled.
    Refining,
    /// Top posterior cleared the confidence threshold, or no informative
    /// test remains.
    Conclusive,
}

/// Final, immutable output of a session.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResult {
    pub session_id: String,
    /// Id of the most probable failure mode.
    pub primary_failure: String,
    /// Posterior probability of the primary failure.
    pub confidence: f64,
    pub phase: DiagnosisPhase,
    /// Runner-up modes as `[id, probability]` pairs, descending, primary
    /// excluded.
    pub alternatives: Vec<(String, f64)>,
    /// Ordered repair actions for the primary failure.
    pub repair_actions: Vec<String>,
    /// Next test worth running; absent when the diagnosis is conclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_reason: Option<String>,
    /// Evidence tokens applied, in application order.
    pub evidence_used: Vec<String>,
    /// Entropy of the final posterior, in bits.
    pub entropy_bits: f64,
    /// When the session concluded, RFC 3339.
    pub concluded_at: String,
}

/// An active diagnostic conversation against one belief state.
pub struct DiagnosticSession {
    id: SessionId,
    started_at: chrono::DateTime<Utc>,
    kb: Arc<KnowledgeBase>,
    interpreter: Arc<SensorInterpreter>,
    policy: DiagnosisPolicy,
    belief: BeliefEngine,
    applied: HashSet<EvidenceToken>,
    evidence_used: Vec<EvidenceToken>,
    state: SessionState,
}

impl DiagnosticSession {
    pub(crate) fn new(
        kb: Arc<KnowledgeBase>,
        interpreter: Arc<SensorInterpreter>,
        policy: DiagnosisPolicy,
    ) -> Result<Self> {
        let belief = BeliefEngine::new(Arc::clone(&kb))?;
        let session = Self {
            id: SessionId::new(),
            started_at: Utc::now(),
            kb,
            interpreter,
            policy,
            belief,
            applied: HashSet::new(),
            evidence_used: Vec::new(),
            state: SessionState::Active,
        };
        tracing::debug!(session_id = %session.id, "diagnostic session started");
        Ok(session)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started_at(&self) -> chrono::DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Report a symptom in free text, e.g. "overheating".
    pub fn add_symptom(&mut self, text: &str) -> Result<()> {
        self.apply_text(text)
    }

    /// Report a diagnostic trouble code, e.g. "P0217".
    pub fn add_dtc(&mut self, code: &str) -> Result<()> {
        self.apply_text(code)
    }

    /// Report an arbitrary observation token.
    pub fn add_observation(&mut self, text: &str) -> Result<()> {
        self.apply_text(text)
    }

    /// Interpret a sensor reading and apply the resulting token, if any.
    ///
    /// Readings from unknown sensors, or readings inside nominal range, are
    /// a silent no-op.
    pub fn add_sensor_reading(&mut self, reading: &SensorReading) -> Result<()> {
        self.ensure_active()?;
        if let Some(token) = self.interpreter.interpret(reading) {
            self.apply_token(token)?;
        }
        Ok(())
    }

    /// The `k` most probable modes under the current belief.
    pub fn get_top_suspects(&self, k: usize) -> Vec<(&FailureMode, f64)> {
        self.belief.top(k)
    }

    /// The next test worth running, if any.
    pub fn recommend_test(&self) -> Result<Option<TestRecommendation>> {
        recommend_test(&self.kb, self.belief.state(), &self.policy)
    }

    /// Entropy of the current belief, in bits.
    pub fn get_uncertainty(&self) -> f64 {
        self.belief.entropy_bits()
    }

    /// Evidence applied so far, in application order.
    pub fn evidence_used(&self) -> &[EvidenceToken] {
        &self.evidence_used
    }

    /// Freeze the session and produce the final result.
    ///
    /// The session becomes terminal: any further evidence call, or a second
    /// `conclude()`, fails with `SessionClosed`.
    pub fn conclude(&mut self) -> Result<DiagnosticResult> {
        self.ensure_active()?;
        self.state = SessionState::Concluded;

        let ranked = self.belief.top(self.kb.len());
        let (primary, confidence) = ranked
            .first()
            .map(|(mode, p)| (*mode, *p))
            .ok_or_else(|| Error::Inference("empty belief state".to_string()))?;

        let recommendation = recommend_test(&self.kb, self.belief.state(), &self.policy)?;

        let phase = if self.evidence_used.is_empty() {
            DiagnosisPhase::Initial
        } else if confidence >= self.policy.conclusive_confidence || recommendation.is_none() {
            DiagnosisPhase::Conclusive
        } else {
            DiagnosisPhase::Refining
        };

        let (recommended_test, test_reason) = match (phase, recommendation) {
            (DiagnosisPhase::Conclusive, _) => (None, None),
            (_, Some(rec)) => (Some(rec.test_id), Some(rec.reason)),
            (_, None) => (None, None),
        };

        let alternatives = ranked
            .iter()
            .skip(1)
            .take(self.policy.top_alternatives)
            .map(|(mode, p)| (mode.id.clone(), *p))
            .collect();

        let result = DiagnosticResult {
            session_id: self.id.to_string(),
            primary_failure: primary.id.clone(),
            confidence,
            phase,
            alternatives,
            repair_actions: primary.repair_actions.clone(),
            recommended_test,
            test_reason,
            evidence_used: self
                .evidence_used
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            entropy_bits: self.belief.entropy_bits(),
            concluded_at: Utc::now().to_rfc3339(),
        };

        tracing::info!(
            session_id = %self.id,
            primary_failure = %result.primary_failure,
            confidence = result.confidence,
            phase = ?result.phase,
            evidence_count = result.evidence_used.len(),
            "diagnostic session concluded"
        );

        Ok(result)
    }

    fn apply_text(&mut self, text: &str) -> Result<()> {
        self.ensure_active()?;
        if let Some(token) = EvidenceToken::new(text) {
            self.apply_token(token)?;
        }
        Ok(())
    }

    fn apply_token(&mut self, token: EvidenceToken) -> Result<()> {
        if !self.applied.insert(token.clone()) {
            tracing::debug!(session_id = %self.id, token = %token, "repeated evidence ignored");
            return Ok(());
        }
        self.belief.update(&token)?;
        tracing::debug!(
            session_id = %self.id,
            token = %token,
            entropy_bits = self.belief.entropy_bits(),
            "evidence applied"
        );
        self.evidence_used.push(token);
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Concluded => Err(Error::SessionClosed {
                session_id: self.id.to_string(),
            }),
        }
    }
}
