//! Vehicle Triage Core Library
//!
//! This library provides the core functionality for probabilistic vehicle
//! diagnosis:
//! - Knowledge base of failure modes with evidence signatures
//! - Sensor reading interpretation into discrete evidence tokens
//! - Bayesian belief updates over the failure-mode catalog
//! - Information-gain-based diagnostic test recommendation
//! - Session orchestration and the one-shot engine facade
//!
//! The engine is synchronous, single-threaded, and free of I/O. The knowledge
//! base is read-only after load and safe to share across sessions; each
//! session exclusively owns its belief state.

pub mod decision;
pub mod engine;
pub mod inference;
pub mod knowledge;
pub mod logging;
pub mod sensors;
pub mod session;

pub use decision::{recommend_test, TestRecommendation};
pub use engine::{DiagnoseRequest, DiagnosticEngine};
pub use inference::{BeliefEngine, BeliefPhase, BeliefState};
pub use knowledge::{DiagnosticTest, FailureMode, KnowledgeBase};
pub use sensors::{SensorInterpreter, SensorReading};
pub use session::{DiagnosisPhase, DiagnosticResult, DiagnosticSession};
