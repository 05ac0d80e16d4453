//! Canonical evidence tokens.
//!
//! An evidence token is a discrete, case-insensitive string fact such as
//! `"overheating"`, `"p0217"`, or `"fan_running"`. Construction canonicalizes
//! the raw text (trim, ASCII lowercase, internal whitespace to underscores)
//! so that `"P0217"`, `" p0217 "`, and `"No Heat"` vs `"no_heat"` compare
//! equal everywhere downstream.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A canonicalized evidence token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EvidenceToken(String);

impl EvidenceToken {
    /// Canonicalize raw text into a token. Returns `None` for whitespace-only
    /// input, which carries no information.
    pub fn new(raw: &str) -> Option<Self> {
        let canonical = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_ascii_lowercase();
        if canonical.is_empty() {
            return None;
        }
        Some(EvidenceToken(canonical))
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvidenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EvidenceToken> for String {
    fn from(token: EvidenceToken) -> String {
        token.0
    }
}

// Canonicalize on the way in so tokens read back from JSON documents obey
// the same invariant as tokens built in code.
impl<'de> Deserialize<'de> for EvidenceToken {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        EvidenceToken::new(&raw)
            .ok_or_else(|| serde::de::Error::custom("evidence token must be non-empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_case_and_whitespace() {
        let token = EvidenceToken::new("  P0217 ").unwrap();
        assert_eq!(token.as_str(), "p0217");
        assert_eq!(token, EvidenceToken::new("p0217").unwrap());
    }

    #[test]
    fn internal_whitespace_becomes_underscores() {
        let token = EvidenceToken::new("No  Heat").unwrap();
        assert_eq!(token.as_str(), "no_heat");
        assert_eq!(token, EvidenceToken::new("no_heat").unwrap());
    }

    #[test]
    fn empty_input_is_none() {
        assert!(EvidenceToken::new("").is_none());
        assert!(EvidenceToken::new("   ").is_none());
    }

    #[test]
    fn serde_roundtrip_is_canonical() {
        let token: EvidenceToken = serde_json::from_str("\" Fan_Running \"").unwrap();
        assert_eq!(token.as_str(), "fan_running");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"fan_running\"");
    }

    #[test]
    fn deserialize_rejects_empty() {
        let parsed: std::result::Result<EvidenceToken, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());
    }
}
