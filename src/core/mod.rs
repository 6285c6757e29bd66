//! Compliance decision logic.
//!
//! This module contains:
//! - Evaluator: per-clause comparison of requirements and device profile
//! - Aggregate: overall verdict precedence
//! - Amendment: templated "zeyil" suggestions
//! - Engine: document and multi-device evaluation passes
//! - Limits: input preconditions

pub mod aggregate;
pub mod amendment;
pub mod engine;
pub mod evaluator;
pub mod limits;

// Re-export commonly used types
pub use aggregate::aggregate;
pub use amendment::amendment_text;
pub use engine::{compare_devices, evaluate_device, ComplianceEngine, PreparedDocument};
pub use evaluator::{evaluate, evaluate_clause, UNDETECTED_EXPLANATION};
pub use limits::{InputLimits, InputViolation};
