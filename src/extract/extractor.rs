//! Requirement extraction engine.
//!
//! Compiles the probe table once and runs it over a text region in a
//! single loop. Extraction never fails: a category without evidence is
//! simply left out of the record.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{AutomationType, BarcodeFacet, FactorStatus, RequirementRecord, TestName};
use crate::text::{self, locate_groups};

use super::patterns::{
    test_block_spec, Group, Probe, Scope, Target, GROUP_A_HEADINGS, GROUP_B_HEADINGS,
    GROUP_TERMINATORS, PROBES,
};

/// Tunables for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// Maximum length of the requested-test block in bytes (default: 1600)
    #[serde(default = "default_test_block_window")]
    pub test_block_window: usize,
}

fn default_test_block_window() -> usize {
    1600
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            test_block_window: default_test_block_window(),
        }
    }
}

/// Pre-compiled requirement extractor. Build once, reuse across documents.
pub struct Extractor {
    compiled: Vec<(&'static Probe, Vec<Regex>)>,
    settings: ExtractorSettings,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Create an extractor with default settings
    pub fn new() -> Self {
        Self::with_settings(ExtractorSettings::default())
    }

    pub fn with_settings(settings: ExtractorSettings) -> Self {
        let compiled = PROBES
            .iter()
            .map(|probe| {
                let regexes = probe
                    .patterns
                    .iter()
                    .filter_map(|pattern| match Regex::new(pattern) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!(probe = probe.name, %pattern, "Skipping invalid pattern: {}", e);
                            None
                        }
                    })
                    .collect();
                (probe, regexes)
            })
            .collect();

        Self { compiled, settings }
    }

    /// Normalize raw document text and extract requirements from all of it
    pub fn extract(&self, raw_text: &str) -> RequirementRecord {
        self.extract_normalized(&text::normalize(raw_text))
    }

    /// Extract requirements from one device group of the document.
    ///
    /// Falls back to the whole document when the group heading is absent.
    pub fn extract_group(&self, raw_text: &str, group: Group) -> RequirementRecord {
        let normalized = text::normalize(raw_text);
        let regions = locate_groups(
            &normalized,
            GROUP_A_HEADINGS,
            GROUP_B_HEADINGS,
            GROUP_TERMINATORS,
        );
        let region = match group {
            Group::A => regions.a,
            Group::B => regions.b,
        };

        match region {
            Some(region) => self.extract_normalized(region),
            None => {
                debug!(?group, "Group heading not found, scanning whole document");
                self.extract_normalized(&normalized)
            }
        }
    }

    /// Requested-test block inside normalized `region`, if labelled
    pub fn test_block<'a>(&self, region: &'a str) -> Option<&'a str> {
        text::locate(region, &test_block_spec(self.settings.test_block_window))
    }

    /// Extract requirements from already-normalized text
    pub fn extract_normalized(&self, region: &str) -> RequirementRecord {
        let mut record = RequirementRecord::default();
        let mut external_lab = false;

        let test_region = match self.test_block(region) {
            Some(block) => {
                debug!(len = block.len(), "Scanning tests inside requested-test block");
                block
            }
            None => region,
        };

        for (probe, regexes) in &self.compiled {
            let scope = match probe.scope {
                Scope::Region => region,
                Scope::TestBlock => test_region,
            };

            if let Target::Minimum(key) = probe.target {
                for value in numeric_captures(probe, regexes, scope) {
                    record.raise_minimum(key, value);
                }
                continue;
            }

            if regexes.iter().any(|re| re.is_match(scope)) {
                debug!(probe = probe.name, "Probe matched");
                apply(&mut record, probe.target, &mut external_lab);
            }
        }

        let factor_requested = record
            .requested_tests
            .as_ref()
            .is_some_and(|tests| tests.contains_key(&TestName::Factor));
        if factor_requested {
            record.factor_status = Some(if external_lab {
                FactorStatus::OptionalExternalLab
            } else {
                FactorStatus::Mandatory
            });
        }

        record
    }
}

/// Every number captured by a numeric probe. Unparseable captures are dropped.
fn numeric_captures<'a>(
    probe: &'a Probe,
    regexes: &'a [Regex],
    text: &'a str,
) -> impl Iterator<Item = u32> + 'a {
    regexes
        .iter()
        .flat_map(move |re| re.captures_iter(text))
        .filter_map(move |caps| {
            let raw = caps.get(1)?.as_str();
            match raw.parse::<u32>() {
                Ok(value) => {
                    debug!(probe = probe.name, value, "Numeric requirement captured");
                    Some(value)
                }
                Err(e) => {
                    warn!(probe = probe.name, raw, "Dropping numeric capture: {}", e);
                    None
                }
            }
        })
}

fn apply(record: &mut RequirementRecord, target: Target, external_lab: &mut bool) {
    match target {
        Target::Minimum(_) => {}
        Target::Barcode(BarcodeFacet::General) => {
            if record.barcode.is_none() {
                record
                    .barcode
                    .get_or_insert_with(Default::default)
                    .set(BarcodeFacet::General, true);
            }
        }
        Target::Barcode(facet) => {
            record
                .barcode
                .get_or_insert_with(Default::default)
                .set(facet, true);
        }
        Target::Method(method) => {
            record
                .reading_method
                .get_or_insert_with(BTreeSet::new)
                .insert(method);
        }
        Target::Automation(AutomationType::Full) => {
            record.automation_type = Some(AutomationType::Full);
        }
        Target::Automation(automation) => {
            record.automation_type.get_or_insert(automation);
        }
        Target::Capability(capability) => record.set_capability(capability, true),
        Target::Test(test) => {
            record
                .requested_tests
                .get_or_insert_with(BTreeMap::new)
                .insert(test, true);
        }
        Target::ExternalLab => *external_lab = true,
    }
}
