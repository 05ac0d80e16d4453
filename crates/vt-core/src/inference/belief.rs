//! Belief state and the evidence update rule.
//!
//! The update rule is a pure function from (state, token) to a new state, so
//! hypothetical "what would this evidence do" simulations are trivial and
//! safe; the engine's `update` merely stores the function's result.

use crate::knowledge::{FailureMode, KnowledgeBase};
use serde::Serialize;
use std::sync::Arc;
use vt_common::{Error, EvidenceToken, Result};
use vt_math::{entropy_bits, floor_and_normalize, normalize};

/// Floor applied to every unnormalized posterior component before
/// renormalization. Keeps contradicted modes reachable by later evidence.
pub const EPSILON_FLOOR: f64 = 1e-9;

/// Posterior distribution over failure modes, aligned with the knowledge
/// base's declaration order (normal last).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BeliefState {
    probs: Vec<f64>,
}

impl BeliefState {
    /// The prior distribution of a knowledge base.
    pub fn from_priors(kb: &KnowledgeBase) -> Result<Self> {
        let probs = normalize(&kb.priors())
            .ok_or_else(|| Error::Inference("catalog priors do not normalize".to_string()))?;
        Ok(Self { probs })
    }

    /// Probabilities in declaration order.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Probability of the mode at declaration index `idx`.
    pub fn prob(&self, idx: usize) -> f64 {
        self.probs[idx]
    }

    /// Shannon entropy of the distribution, in bits.
    pub fn entropy_bits(&self) -> f64 {
        entropy_bits(&self.probs)
    }

    /// The `k` most probable modes, descending. Ties break toward earlier
    /// catalog declaration, so the ranking is deterministic.
    pub fn top<'kb>(&self, kb: &'kb KnowledgeBase, k: usize) -> Vec<(&'kb FailureMode, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.probs.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked
            .into_iter()
            .take(k)
            .map(|(idx, p)| (&kb.get_all()[idx], p))
            .collect()
    }
}

/// Pure belief update: multiply each mode's posterior by its likelihood for
/// `token`, floor, and renormalize.
///
/// A token absent from every signature multiplies everything by 1.0 — unknown
/// evidence is a no-op by construction, not an error.
pub fn updated_state(
    kb: &KnowledgeBase,
    state: &BeliefState,
    token: &EvidenceToken,
) -> Result<BeliefState> {
    let weighted: Vec<f64> = kb
        .get_all()
        .iter()
        .zip(state.probs())
        .map(|(mode, p)| p * mode.likelihood(token))
        .collect();
    let probs = floor_and_normalize(&weighted, EPSILON_FLOOR).ok_or_else(|| {
        Error::Inference(format!(
            "belief update for token '{token}' produced a degenerate distribution"
        ))
    })?;
    Ok(BeliefState { probs })
}

/// Lifecycle of a belief engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefPhase {
    /// Priors only; no evidence applied yet.
    Uninitialized,
    /// At least one evidence application.
    Updated,
}

/// Maintains one posterior distribution over a shared knowledge base.
///
/// Owned exclusively by one diagnostic session; never shared.
pub struct BeliefEngine {
    kb: Arc<KnowledgeBase>,
    state: BeliefState,
    phase: BeliefPhase,
}

impl BeliefEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Result<Self> {
        let state = BeliefState::from_priors(&kb)?;
        Ok(Self {
            kb,
            state,
            phase: BeliefPhase::Uninitialized,
        })
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn state(&self) -> &BeliefState {
        &self.state
    }

    pub fn phase(&self) -> BeliefPhase {
        self.phase
    }

    /// Incorporate one evidence token.
    ///
    /// Idempotence is the caller's concern: the owning session tracks applied
    /// tokens and never re-submits a repeat.
    pub fn update(&mut self, token: &EvidenceToken) -> Result<()> {
        self.state = updated_state(&self.kb, &self.state, token)?;
        self.phase = BeliefPhase::Updated;
        Ok(())
    }

    /// The `k` most probable modes, descending.
    pub fn top(&self, k: usize) -> Vec<(&FailureMode, f64)> {
        self.state.top(&self.kb, k)
    }

    /// Entropy of the current posterior, in bits.
    pub fn entropy_bits(&self) -> f64 {
        self.state.entropy_bits()
    }
}
