//! Evaluation results handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::requirement::RequirementRecord;
use super::verdict::{ClauseVerdict, OverallVerdict, Status};

/// Document identifier (SHA256(normalized text)[0:16])
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Fingerprint already-normalized document text
    pub fn from_normalized(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let result = hasher.finalize();

        // Take first 8 bytes (16 hex chars)
        Self(hex::encode(&result[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of evaluating one device against one requirement record
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// "<brand> <model>"
    pub device_label: String,

    /// One verdict per clause, in evaluation order
    pub verdicts: Vec<ClauseVerdict>,

    pub overall: OverallVerdict,

    /// Suggested amendment texts, one per partially compliant clause
    pub amendments: Vec<String>,
}

impl Evaluation {
    pub fn count(&self, status: Status) -> usize {
        self.verdicts.iter().filter(|v| v.status == status).count()
    }

    pub fn partial_count(&self) -> usize {
        self.count(Status::PartiallyCompliant)
    }

    pub fn non_compliant_count(&self) -> usize {
        self.count(Status::NonCompliant)
    }

    /// Verdict for a clause label, if evaluated
    pub fn verdict(&self, clause_label: &str) -> Option<&ClauseVerdict> {
        self.verdicts.iter().find(|v| v.clause_label == clause_label)
    }
}

/// Envelope for a full report run
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub id: Uuid,
    pub document_id: DocumentId,
    pub generated_at: DateTime<Utc>,
    pub requirements: RequirementRecord,
    pub evaluations: Vec<Evaluation>,
}

impl EvaluationReport {
    pub fn new(
        document_id: DocumentId,
        requirements: RequirementRecord,
        evaluations: Vec<Evaluation>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            generated_at: Utc::now(),
            requirements,
            evaluations,
        }
    }
}
