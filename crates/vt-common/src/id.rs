//! Session identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session ID for tracking diagnostic sessions.
///
/// Format: `vt-YYYYMMDD-HHMMSS-XXXX`
/// Example: `vt-20260115-143022-a7xq`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new session ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let suffix = generate_base32_suffix();
        SessionId(format!(
            "vt-{}-{}-{}",
            now.format("%Y%m%d"),
            now.format("%H%M%S"),
            suffix
        ))
    }

    /// Parse an existing session ID string.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 23 {
            return None;
        }
        let bytes = s.as_bytes();
        if bytes.first() != Some(&b'v')
            || bytes.get(1) != Some(&b't')
            || bytes.get(2) != Some(&b'-')
            || bytes.get(11) != Some(&b'-')
            || bytes.get(18) != Some(&b'-')
        {
            return None;
        }
        let date = &s[3..11];
        let time = &s[12..18];
        let suffix = &s[19..23];
        if !date.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !time.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !suffix.chars().all(|c| matches!(c, 'a'..='z' | '2'..='7')) {
            return None;
        }
        Some(SessionId(s.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four base32 characters (RFC 4648 lowercase alphabet) drawn from a v4 UUID.
fn generate_base32_suffix() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    let mut value = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32);
    value &= 0x000F_FFFF;
    let alphabet = b"abcdefghijklmnopqrstuvwxyz234567";
    [15_u32, 10, 5, 0]
        .iter()
        .map(|shift| alphabet[((value >> shift) & 0x1F) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_parses() {
        let id = SessionId::new();
        assert!(SessionId::parse(&id.0).is_some(), "id {} should parse", id);
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        assert!(SessionId::parse("pt-20260115-143022-a7xq").is_none());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(SessionId::parse("vt-2026-1430-a7xq").is_none());
    }

    #[test]
    fn parse_rejects_bad_suffix_chars() {
        assert!(SessionId::parse("vt-20260115-143022-A7XQ").is_none());
        assert!(SessionId::parse("vt-20260115-143022-a71q").is_none());
    }

    #[test]
    fn parse_accepts_valid() {
        assert!(SessionId::parse("vt-20260115-143022-a7xq").is_some());
    }
}
