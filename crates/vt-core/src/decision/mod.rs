//! Decision support: which diagnostic test to run next.

pub mod recommend;

pub use recommend::{recommend_test, TestRecommendation};
