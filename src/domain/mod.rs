//! Domain types for tender compliance review.
//!
//! This module contains the core data structures:
//! - Requirement: what the tender document asks for
//! - Device: what an instrument model offers
//! - Verdict: clause-level and overall compliance outcomes
//! - Report: evaluation results for the presentation layer

pub mod device;
pub mod report;
pub mod requirement;
pub mod verdict;

// Re-export commonly used types
pub use device::{DetectionMethods, DeviceBarcode, DeviceCapabilityRecord, TestSupport};
pub use report::{DocumentId, Evaluation, EvaluationReport};
pub use requirement::{
    AutomationType, BarcodeFacet, BarcodeRequirement, Capability, FactorStatus, NumericKey,
    ReadingMethod, RequirementRecord, TestName,
};
pub use verdict::{
    ClauseKind, ClauseVerdict, Facet, OverallStatus, OverallVerdict, Status,
};
