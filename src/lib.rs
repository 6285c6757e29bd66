//! ihalebind - Tender specification compliance checker
//!
//! Reads the text of a technical specification (tender) document, extracts
//! the structured requirements it states and checks them against the
//! capability profiles of laboratory coagulation analyzers.
//!
//! # Architecture
//!
//! Data flows leaf-first through pure functions:
//! - raw text → normalized text → located sections
//! - sections → `RequirementRecord` (keyword/regex probe table)
//! - requirements + device profile → per-clause verdicts
//! - verdicts → overall verdict and amendment ("zeyil") suggestions
//!
//! A requirement the document never states is *absent*, not false, and is
//! reported as unknown for manual review.
//!
//! # Modules
//!
//! - `text`: normalization and section location
//! - `extract`: requirement probe table and extractor
//! - `domain`: data structures (requirements, devices, verdicts, reports)
//! - `core`: evaluation, aggregation, amendments, input limits
//! - `catalog`: device catalog loading
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show what the document asks for
//! ihalebind rules --input sartname.txt
//!
//! # Check one device
//! ihalebind evaluate --input sartname.txt --brand Succeeder --model SF-8300
//!
//! # Compare a brand's line-up
//! ihalebind compare --input sartname.txt --brand Succeeder
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod extract;
pub mod text;

// Re-export main types at crate root for convenience
pub use catalog::{CatalogError, DeviceCatalog};
pub use crate::core::{
    aggregate, amendment_text, compare_devices, evaluate, evaluate_device, ComplianceEngine,
    InputLimits, InputViolation,
};
pub use domain::{
    ClauseKind, ClauseVerdict, DeviceCapabilityRecord, Evaluation, EvaluationReport,
    OverallStatus, OverallVerdict, RequirementRecord, Status,
};
pub use extract::{Extractor, ExtractorSettings, Group};
pub use text::normalize;
