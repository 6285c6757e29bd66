//! Compliance verdicts.
//!
//! A [`ClauseVerdict`] is created once by the evaluator and never mutated.
//! The [`OverallVerdict`] is derived from a list of clause verdicts and
//! never stored on its own.

use serde::{Deserialize, Serialize};

use super::requirement::Capability;

/// Compliance status of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Compliant,
    /// Compliant through an equivalent method; needs amendment text
    PartiallyCompliant,
    NonCompliant,
    /// Requirement or device datum missing; manual review
    Unknown,
}

impl Status {
    /// Label used in tender reports
    pub fn label(&self) -> &'static str {
        match self {
            Status::Compliant => "Uygun",
            Status::PartiallyCompliant => "Zeyil",
            Status::NonCompliant => "Uygun Değil",
            Status::Unknown => "Bilgi Yok",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Requirement category a verdict belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "category", content = "capability")]
pub enum ClauseKind {
    Channels,
    Probes,
    Speed,
    Barcode,
    ReadingMethod,
    Tests,
    Automation,
    Capability(Capability),
}

impl ClauseKind {
    /// Every clause in evaluation order
    pub fn all() -> Vec<ClauseKind> {
        let mut kinds = vec![
            ClauseKind::Barcode,
            ClauseKind::Channels,
            ClauseKind::Probes,
            ClauseKind::Speed,
            ClauseKind::ReadingMethod,
            ClauseKind::Tests,
            ClauseKind::Automation,
        ];
        kinds.extend(Capability::ALL.into_iter().map(ClauseKind::Capability));
        kinds
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClauseKind::Channels => "Kanal Sayısı",
            ClauseKind::Probes => "Prob Sayısı",
            ClauseKind::Speed => "Test Hızı",
            ClauseKind::Barcode => "Barkod",
            ClauseKind::ReadingMethod => "Okuma Yöntemi",
            ClauseKind::Tests => "Testler",
            ClauseKind::Automation => "Otomasyon",
            ClauseKind::Capability(capability) => capability.label(),
        }
    }
}

/// Sub-check inside a clause that decided the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    SampleBarcode,
    ReagentBarcode,
    InternalBarcode,
    MagneticReading,
    ClotReading,
    ChromogenicReading,
    ImmunologicReading,
    FactorTest,
}

impl Facet {
    /// Clause label when this facet decided the verdict
    pub fn label(&self) -> &'static str {
        match self {
            Facet::SampleBarcode => "Barkod (Numune)",
            Facet::ReagentBarcode => "Barkod (Reaktif)",
            Facet::InternalBarcode => "Barkod (Dahili)",
            Facet::MagneticReading
            | Facet::ClotReading
            | Facet::ChromogenicReading
            | Facet::ImmunologicReading => "Okuma Yöntemi",
            Facet::FactorTest => "Faktör Testleri",
        }
    }
}

/// Outcome of evaluating one clause against one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseVerdict {
    pub clause: ClauseKind,

    /// Deciding sub-check, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<Facet>,

    pub clause_label: String,

    /// Short summary of what the document requires
    pub requirement_view: String,

    /// Short summary of what the device offers
    pub device_view: String,

    pub status: Status,

    pub explanation: String,
}

impl ClauseVerdict {
    pub fn needs_amendment(&self) -> bool {
        self.status == Status::PartiallyCompliant
    }
}

/// Aggregate status of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Compliant,
    /// "Compliant with amendment"
    PartiallyCompliant,
    NonCompliant,
    NeedsReview,
}

/// Overall verdict with display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallVerdict {
    pub status: OverallStatus,
    pub label: &'static str,
}

impl OverallVerdict {
    pub fn new(status: OverallStatus) -> Self {
        let label = match status {
            OverallStatus::Compliant => "🟢 Uygun",
            OverallStatus::PartiallyCompliant => "🟡 Zeyil ile Uygun",
            OverallStatus::NonCompliant => "🔴 Uygun Değil",
            OverallStatus::NeedsReview => "⚪ İnceleme Gerekli",
        };
        Self { status, label }
    }
}
