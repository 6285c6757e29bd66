//! Evaluation passes.
//!
//! Requirement extraction runs once per document; evaluation then fans out
//! over any number of devices. Every evaluation reads the shared requirement
//! record and nothing else, so devices can be evaluated in any order.

use tracing::{debug, info, instrument};

use crate::domain::{
    DeviceCapabilityRecord, DocumentId, Evaluation, EvaluationReport, RequirementRecord,
};
use crate::extract::{Extractor, ExtractorSettings, Group};
use crate::text;

use super::aggregate::aggregate;
use super::amendment::amendment_text;
use super::evaluator::evaluate;
use super::limits::{InputLimits, InputViolation};

/// Evaluate one device: clause verdicts, overall verdict and amendments
#[instrument(skip(requirements, device))]
pub fn evaluate_device(
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
    label: &str,
) -> Evaluation {
    let verdicts = evaluate(requirements, device);
    let overall = aggregate(&verdicts);
    let amendments: Vec<String> = verdicts.iter().filter_map(amendment_text).collect();

    let evaluation = Evaluation {
        device_label: label.to_string(),
        verdicts,
        overall,
        amendments,
    };

    info!(
        overall = ?evaluation.overall.status,
        partial = evaluation.partial_count(),
        non_compliant = evaluation.non_compliant_count(),
        "Device evaluated"
    );

    evaluation
}

/// Evaluate several devices against one requirement record
#[instrument(skip_all)]
pub fn compare_devices<'a, L, I>(requirements: &RequirementRecord, devices: I) -> Vec<Evaluation>
where
    L: AsRef<str>,
    I: IntoIterator<Item = (L, &'a DeviceCapabilityRecord)>,
{
    let evaluations: Vec<Evaluation> = devices
        .into_iter()
        .map(|(label, device)| evaluate_device(requirements, device, label.as_ref()))
        .collect();
    info!(devices = evaluations.len(), "Comparison finished");
    evaluations
}

/// A document after validation and extraction
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub document_id: DocumentId,
    pub requirements: RequirementRecord,
}

/// Document-level entry point: validate, normalize, extract, evaluate
pub struct ComplianceEngine {
    extractor: Extractor,
    limits: InputLimits,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(ExtractorSettings::default(), InputLimits::default())
    }
}

impl ComplianceEngine {
    pub fn new(settings: ExtractorSettings, limits: InputLimits) -> Self {
        Self {
            extractor: Extractor::with_settings(settings),
            limits,
        }
    }

    /// Validate raw document text and extract its requirements.
    ///
    /// With a group, only that group's block is scanned (whole text when the
    /// group heading is missing).
    #[instrument(skip(self, raw_text), fields(bytes = raw_text.len()))]
    pub fn prepare(
        &self,
        raw_text: &str,
        group: Option<Group>,
    ) -> Result<PreparedDocument, InputViolation> {
        self.limits.validate_input(raw_text)?;

        let normalized = text::normalize(raw_text);
        let document_id = DocumentId::from_normalized(&normalized);
        let requirements = match group {
            Some(group) => self.extractor.extract_group(raw_text, group),
            None => self.extractor.extract_normalized(&normalized),
        };

        debug!(%document_id, ?requirements, "Requirements extracted");
        Ok(PreparedDocument {
            document_id,
            requirements,
        })
    }

    /// Full report for a document and a set of devices
    pub fn report<'a, L, I>(
        &self,
        raw_text: &str,
        group: Option<Group>,
        devices: I,
    ) -> Result<EvaluationReport, InputViolation>
    where
        L: AsRef<str>,
        I: IntoIterator<Item = (L, &'a DeviceCapabilityRecord)>,
    {
        let prepared = self.prepare(raw_text, group)?;
        let evaluations = compare_devices(&prepared.requirements, devices);
        Ok(EvaluationReport::new(
            prepared.document_id,
            prepared.requirements,
            evaluations,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeviceBarcode, OverallStatus};

    #[test]
    fn test_amendments_follow_partial_verdicts() {
        let engine = ComplianceEngine::default();
        let prepared = engine
            .prepare("En az 4 kanal. Numune barkod ve reaktif barkod okuyucu.", None)
            .unwrap();
        let device = DeviceCapabilityRecord {
            channels_total: Some(4),
            barcode: Some(DeviceBarcode {
                sample: Some(true),
                reagent: Some(false),
                internal: None,
            }),
            ..Default::default()
        };

        let evaluation = evaluate_device(&prepared.requirements, &device, "Test Cihaz");
        assert_eq!(evaluation.overall.status, OverallStatus::PartiallyCompliant);
        assert_eq!(evaluation.partial_count(), 1);
        assert_eq!(evaluation.amendments.len(), 1);
    }

    #[test]
    fn test_prepare_rejects_empty_text() {
        let engine = ComplianceEngine::default();
        assert!(matches!(
            engine.prepare("   ", None),
            Err(InputViolation::EmptyText)
        ));
    }

    #[test]
    fn test_report_keeps_device_order() {
        let engine = ComplianceEngine::default();
        let small = DeviceCapabilityRecord {
            channels_total: Some(2),
            ..Default::default()
        };
        let large = DeviceCapabilityRecord {
            channels_total: Some(8),
            ..Default::default()
        };
        let report = engine
            .report("en az 4 kanal", None, [("A", &small), ("B", &large)])
            .unwrap();
        assert_eq!(report.evaluations.len(), 2);
        assert_eq!(report.evaluations[0].overall.status, OverallStatus::NonCompliant);
        assert_eq!(report.evaluations[1].overall.status, OverallStatus::Compliant);
    }
}
