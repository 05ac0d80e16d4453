//! Diagnosis policy: the thresholds that govern when a session concludes
//! and when testing further stops paying for itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_conclusive_confidence() -> f64 {
    0.6
}

fn default_min_info_gain_bits() -> f64 {
    0.01
}

fn default_top_alternatives() -> usize {
    3
}

/// Thresholds governing session conclusion and test recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosisPolicy {
    /// Top posterior at or above this is a conclusive diagnosis.
    #[serde(default = "default_conclusive_confidence")]
    pub conclusive_confidence: f64,
    /// Tests whose expected information gain falls below this many bits are
    /// not worth recommending; the session should conclude instead.
    #[serde(default = "default_min_info_gain_bits")]
    pub min_info_gain_bits: f64,
    /// How many alternatives (beyond the primary) a result carries.
    #[serde(default = "default_top_alternatives")]
    pub top_alternatives: usize,
}

impl Default for DiagnosisPolicy {
    fn default() -> Self {
        Self {
            conclusive_confidence: default_conclusive_confidence(),
            min_info_gain_bits: default_min_info_gain_bits(),
            top_alternatives: default_top_alternatives(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = DiagnosisPolicy::default();
        assert_eq!(policy.conclusive_confidence, 0.6);
        assert_eq!(policy.min_info_gain_bits, 0.01);
        assert_eq!(policy.top_alternatives, 3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let policy: DiagnosisPolicy =
            serde_json::from_str(r#"{"conclusive_confidence": 0.8}"#).unwrap();
        assert_eq!(policy.conclusive_confidence, 0.8);
        assert_eq!(policy.min_info_gain_bits, 0.01);
    }
}
