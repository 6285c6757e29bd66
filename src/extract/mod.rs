//! Requirement extraction from tender text.
//!
//! - `patterns`: the probe table and section headings
//! - `extractor`: runs the probes and builds a `RequirementRecord`

pub mod extractor;
pub mod patterns;

pub use extractor::{Extractor, ExtractorSettings};
pub use patterns::{Group, Probe, Scope, Target, PROBES};
