//! Vehicle Triage common types, IDs, and errors.
//!
//! This crate provides foundational types shared across vt crates:
//! - Canonical evidence tokens (the unit of belief update)
//! - Session identity
//! - The unified error type with stable codes

pub mod error;
pub mod id;
pub mod token;

pub use error::{Error, ErrorCategory, Result};
pub use id::SessionId;
pub use token::EvidenceToken;
