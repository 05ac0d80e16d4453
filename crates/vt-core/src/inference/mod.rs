//! Bayesian belief maintenance over the failure-mode catalog.

pub mod belief;

pub use belief::{updated_state, BeliefEngine, BeliefPhase, BeliefState, EPSILON_FLOOR};
