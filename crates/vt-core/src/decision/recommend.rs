//! Expected-information-gain test recommendation.
//!
//! For each candidate test, the recommender computes the predictive
//! distribution over the test's outcomes under the current belief, simulates
//! each outcome with the pure belief update on a discarded copy, and scores
//! the test by the expected reduction in posterior entropy. This is a
//! one-step-lookahead greedy policy: tractable, not globally optimal.

use crate::inference::{updated_state, BeliefState};
use crate::knowledge::{DiagnosticTest, KnowledgeBase};
use serde::Serialize;
use vt_common::Result;
use vt_config::DiagnosisPolicy;

/// Gains closer than this are considered tied and fall through to the cost
/// tie-break.
const GAIN_TIE_TOLERANCE: f64 = 1e-9;

/// A recommended next diagnostic test.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecommendation {
    /// Id of the recommended test.
    pub test_id: String,
    /// Expected entropy reduction, in bits.
    pub info_gain_bits: f64,
    /// Human-readable rationale.
    pub reason: String,
}

/// Pick the test with the highest expected information gain.
///
/// Candidates are tests with at least one catalog-known outcome token. Ties
/// in gain break toward lower cost, then earlier catalog declaration.
/// Returns `None` when the best gain falls below the policy's
/// `min_info_gain_bits` — the signal to conclude instead of testing further.
pub fn recommend_test(
    kb: &KnowledgeBase,
    state: &BeliefState,
    policy: &DiagnosisPolicy,
) -> Result<Option<TestRecommendation>> {
    let h_before = state.entropy_bits();

    let mut best: Option<(&DiagnosticTest, f64)> = None;
    for test in kb.tests() {
        if !test.outcomes.iter().any(|o| kb.is_known_token(o)) {
            continue;
        }
        let gain = expected_information_gain(kb, state, test, h_before)?;
        let better = match best {
            None => true,
            Some((best_test, best_gain)) => {
                if gain > best_gain + GAIN_TIE_TOLERANCE {
                    true
                } else {
                    (gain - best_gain).abs() <= GAIN_TIE_TOLERANCE && test.cost < best_test.cost
                }
            }
        };
        if better {
            best = Some((test, gain));
        }
    }

    Ok(best
        .filter(|(_, gain)| *gain >= policy.min_info_gain_bits)
        .map(|(test, gain)| TestRecommendation {
            test_id: test.id.clone(),
            info_gain_bits: gain,
            reason: format!(
                "expected to reduce diagnostic uncertainty by {:.3} bits across {} possible outcomes",
                gain,
                test.outcomes.len() + 1
            ),
        }))
}

/// Expected entropy reduction from performing `test` in `state`.
///
/// The outcome set is the test's declared outcomes plus an implicit
/// inconclusive outcome with neutral likelihood for every mode, treated as
/// exhaustive and mutually exclusive.
fn expected_information_gain(
    kb: &KnowledgeBase,
    state: &BeliefState,
    test: &DiagnosticTest,
    h_before: f64,
) -> Result<f64> {
    // Unnormalized predictive mass per outcome: sum_m belief(m) * P(o|m).
    // The inconclusive outcome has likelihood 1.0 everywhere, hence mass 1.0.
    let mut masses = Vec::with_capacity(test.outcomes.len() + 1);
    for outcome in &test.outcomes {
        let mass: f64 = kb
            .get_all()
            .iter()
            .zip(state.probs())
            .map(|(mode, p)| p * mode.likelihood(outcome))
            .sum();
        masses.push(mass);
    }
    masses.push(1.0);

    let total: f64 = masses.iter().sum();

    let mut expected_h_after = 0.0;
    for (outcome, mass) in test.outcomes.iter().zip(&masses) {
        if *mass <= 0.0 {
            continue;
        }
        let hypothetical = updated_state(kb, state, outcome)?;
        expected_h_after += (mass / total) * hypothetical.entropy_bits();
    }
    // Inconclusive leaves the belief untouched.
    expected_h_after += (masses[test.outcomes.len()] / total) * h_before;

    // Rounding can leave a tiny negative residue; gain is never negative.
    Ok((h_before - expected_h_after).max(0.0))
}
