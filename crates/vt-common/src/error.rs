//! Error types for Vehicle Triage.
//!
//! Structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//!
//! Unknown evidence tokens, unrecognized symptom text, and unknown sensor
//! names are deliberately NOT errors anywhere in the engine. They carry zero
//! information and are silently tolerated so the engine stays usable under
//! partial or noisy input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Vehicle Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Catalog and policy errors (invalid definitions at load time).
    Config,
    /// Lookup of an unknown failure-mode id.
    Lookup,
    /// Belief-update and numerical errors.
    Inference,
    /// Session lifecycle errors.
    Session,
    /// Serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Session => write!(f, "session"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Vehicle Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("catalog validation failed for {field}: {message}")]
    CatalogValidation { field: String, message: String },

    #[error("invalid policy: {0}")]
    Policy(String),

    // Lookup errors (20-29)
    #[error("failure mode not found: {id}")]
    FailureModeNotFound { id: String },

    // Inference errors (30-39)
    #[error("inference failed: {0}")]
    Inference(String),

    // Session errors (40-49)
    #[error("session {session_id} is concluded and no longer accepts operations")]
    SessionClosed { session_id: String },

    // I/O errors (60-69)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Lookup errors
    /// - 30-39: Inference errors
    /// - 40-49: Session errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Catalog(_) => 10,
            Error::CatalogValidation { .. } => 11,
            Error::Policy(_) => 12,
            Error::FailureModeNotFound { .. } => 20,
            Error::Inference(_) => 30,
            Error::SessionClosed { .. } => 40,
            Error::Json(_) => 60,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Catalog(_) | Error::CatalogValidation { .. } | Error::Policy(_) => {
                ErrorCategory::Config
            }
            Error::FailureModeNotFound { .. } => ErrorCategory::Lookup,
            Error::Inference(_) => ErrorCategory::Inference,
            Error::SessionClosed { .. } => ErrorCategory::Session,
            Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Config errors: recoverable by fixing the catalog/policy data
            Error::Catalog(_) => true,
            Error::CatalogValidation { .. } => true,
            Error::Policy(_) => true,

            // Lookup: the id simply does not exist in this catalog
            Error::FailureModeNotFound { .. } => false,

            // Inference: may succeed with different inputs
            Error::Inference(_) => true,

            // Session: concluded sessions never reopen; start a new one
            Error::SessionClosed { .. } => false,

            Error::Json(_) => true,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Catalog(_) => "Invalid Catalog",
            Error::CatalogValidation { .. } => "Catalog Validation Failed",
            Error::Policy(_) => "Invalid Policy",
            Error::FailureModeNotFound { .. } => "Failure Mode Not Found",
            Error::Inference(_) => "Inference Error",
            Error::SessionClosed { .. } => "Session Concluded",
            Error::Json(_) => "JSON Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Catalog(_) | Error::CatalogValidation { .. } => {
                "Fix the failure-mode catalog: ids must be unique, likelihood weights non-negative, and priors (including 'normal') must sum to 1."
            }
            Error::Policy(_) => {
                "Fix the diagnosis policy: confidence threshold in (0, 1], non-negative gain threshold."
            }
            Error::FailureModeNotFound { .. } => {
                "The id is not in this catalog. List known modes with KnowledgeBase::get_all()."
            }
            Error::Inference(_) => {
                "The belief state became degenerate. Check catalog weights for NaN or infinity."
            }
            Error::SessionClosed { .. } => {
                "Concluded sessions are frozen. Start a new session to apply more evidence."
            }
            Error::Json(_) => "Check the JSON document syntax.",
        }
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Catalog("test".into()).code(), 10);
        assert_eq!(
            Error::FailureModeNotFound {
                id: "alternator".into()
            }
            .code(),
            20
        );
        assert_eq!(
            Error::SessionClosed {
                session_id: "vt-20260115-143022-a7xq".into()
            }
            .code(),
            40
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            Error::Catalog("test".into()).category(),
            ErrorCategory::Config
        );
        assert_eq!(
            Error::FailureModeNotFound { id: "x".into() }.category(),
            ErrorCategory::Lookup
        );
        assert_eq!(
            Error::SessionClosed {
                session_id: "s".into()
            }
            .category(),
            ErrorCategory::Session
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::Catalog("test".into()).is_recoverable());
        assert!(!Error::FailureModeNotFound { id: "x".into() }.is_recoverable());
        assert!(!Error::SessionClosed {
            session_id: "s".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::FailureModeNotFound {
            id: "flux_capacitor".into(),
        };
        let formatted = format_error_human(&err, false);
        assert!(formatted.contains("Failure Mode Not Found"));
        assert!(formatted.contains("flux_capacitor"));
        assert!(formatted.contains("KnowledgeBase::get_all"));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::Session.to_string(), "session");
    }
}
