//! Requirements extracted from a tender specification.
//!
//! Every field is optional: `None` means the document said nothing about
//! the category, which is not the same as a detected `false`. The extractor
//! only ever sets values it found textual evidence for.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Structured requirement set for one tender document (or one group block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Minimum number of measurement channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_min: Option<u32>,

    /// Minimum number of probes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_min: Option<u32>,

    /// Minimum throughput in tests per hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_min: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<BarcodeRequirement>,

    /// Required detection principles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_method: Option<BTreeSet<ReadingMethod>>,

    /// Requested assay tests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_tests: Option<BTreeMap<TestName, bool>>,

    /// Only present when the Factor test is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor_status: Option<FactorStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_type: Option<AutomationType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_system: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_piercing: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_sensor: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lis_bidirectional: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_program: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_memory: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_use_cuvette: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incubation_37c: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reagent_cooler: Option<bool>,
}

impl RequirementRecord {
    /// Required value for a boolean capability
    pub fn capability(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::OpenSystem => self.open_system,
            Capability::CapPiercing => self.cap_piercing,
            Capability::LevelSensor => self.level_sensor,
            Capability::LisBidirectional => self.lis_bidirectional,
            Capability::QcProgram => self.qc_program,
            Capability::ResultMemory => self.result_memory,
            Capability::SingleUseCuvette => self.single_use_cuvette,
            Capability::Incubation37C => self.incubation_37c,
            Capability::ReagentCooler => self.reagent_cooler,
        }
    }

    pub fn set_capability(&mut self, capability: Capability, value: bool) {
        let slot = match capability {
            Capability::OpenSystem => &mut self.open_system,
            Capability::CapPiercing => &mut self.cap_piercing,
            Capability::LevelSensor => &mut self.level_sensor,
            Capability::LisBidirectional => &mut self.lis_bidirectional,
            Capability::QcProgram => &mut self.qc_program,
            Capability::ResultMemory => &mut self.result_memory,
            Capability::SingleUseCuvette => &mut self.single_use_cuvette,
            Capability::Incubation37C => &mut self.incubation_37c,
            Capability::ReagentCooler => &mut self.reagent_cooler,
        };
        *slot = Some(value);
    }

    /// Raise a numeric minimum, keeping the strictest value seen
    pub fn raise_minimum(&mut self, key: NumericKey, value: u32) {
        let slot = match key {
            NumericKey::Channels => &mut self.channel_min,
            NumericKey::Probes => &mut self.probe_min,
            NumericKey::Speed => &mut self.speed_min,
        };
        *slot = Some(slot.map_or(value, |current| current.max(value)));
    }

    pub fn minimum(&self, key: NumericKey) -> Option<u32> {
        match key {
            NumericKey::Channels => self.channel_min,
            NumericKey::Probes => self.probe_min,
            NumericKey::Speed => self.speed_min,
        }
    }

    /// Requested tests that are flagged as needed, in vocabulary order
    pub fn needed_tests(&self) -> Vec<TestName> {
        self.requested_tests
            .iter()
            .flatten()
            .filter(|(_, needed)| **needed)
            .map(|(name, _)| *name)
            .collect()
    }

    /// True when nothing at all was detected
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Numeric minimum categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKey {
    Channels,
    Probes,
    Speed,
}

/// Barcode reader requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRequirement {
    /// Primary-tube / patient sample barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<bool>,

    /// Reagent / kit barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reagent: Option<bool>,

    /// Built-in reader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,

    /// "barkod" mentioned without saying what is scanned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<bool>,
}

impl BarcodeRequirement {
    pub fn facet(&self, facet: BarcodeFacet) -> Option<bool> {
        match facet {
            BarcodeFacet::Sample => self.sample,
            BarcodeFacet::Reagent => self.reagent,
            BarcodeFacet::Internal => self.internal,
            BarcodeFacet::General => self.general,
        }
    }

    pub fn set(&mut self, facet: BarcodeFacet, value: bool) {
        let slot = match facet {
            BarcodeFacet::Sample => &mut self.sample,
            BarcodeFacet::Reagent => &mut self.reagent,
            BarcodeFacet::Internal => &mut self.internal,
            BarcodeFacet::General => &mut self.general,
        };
        *slot = Some(value);
    }

    /// A general barcode mention is read as a sample barcode requirement
    pub fn requires_sample(&self) -> bool {
        self.sample == Some(true) || self.general == Some(true)
    }
}

/// Which barcode is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeFacet {
    Sample,
    Reagent,
    Internal,
    General,
}

/// Detection (reading) principle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMethod {
    Magnetic,
    MechanicalClot,
    Chromogenic,
    Immunologic,
}

impl ReadingMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ReadingMethod::Magnetic => "manyetik",
            ReadingMethod::MechanicalClot => "mekanik/clot",
            ReadingMethod::Chromogenic => "kromojenik",
            ReadingMethod::Immunologic => "immunolojik",
        }
    }
}

impl std::fmt::Display for ReadingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed assay vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestName {
    #[serde(rename = "PT")]
    Pt,
    #[serde(rename = "APTT")]
    Aptt,
    #[serde(rename = "Fibrinogen", alias = "Fibrinojen")]
    Fibrinogen,
    #[serde(rename = "D-Dimer", alias = "D Dimer")]
    DDimer,
    #[serde(rename = "Factor", alias = "Faktor", alias = "Faktör")]
    Factor,
}

impl TestName {
    pub const ALL: [TestName; 5] = [
        TestName::Pt,
        TestName::Aptt,
        TestName::Fibrinogen,
        TestName::DDimer,
        TestName::Factor,
    ];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            TestName::Pt => "PT",
            TestName::Aptt => "APTT",
            TestName::Fibrinogen => "Fibrinojen",
            TestName::DDimer => "D-Dimer",
            TestName::Factor => "Faktör",
        }
    }

    /// Spellings a device catalog may use for this test
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            TestName::Pt => &["PT", "pt", "Protrombin"],
            TestName::Aptt => &["APTT", "aPTT", "aptt"],
            TestName::Fibrinogen => &["Fibrinojen", "Fibrinogen", "fibrinojen", "fibrinogen"],
            TestName::DDimer => &["D-Dimer", "D-dimer", "D Dimer", "DDimer", "d-dimer"],
            TestName::Factor => &["Faktör", "Faktor", "Factor", "faktör", "faktor", "factor"],
        }
    }

    /// Match a catalog key against this test
    pub fn matches(&self, key: &str) -> bool {
        self.aliases().iter().any(|alias| *alias == key)
    }
}

impl std::fmt::Display for TestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly the Factor test is demanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    Mandatory,
    /// May be served by an external / reference laboratory
    OptionalExternalLab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationType {
    Full,
    Semi,
}

impl AutomationType {
    pub fn label(&self) -> &'static str {
        match self {
            AutomationType::Full => "tam otomatik",
            AutomationType::Semi => "yarı otomatik",
        }
    }
}

/// Boolean capability shared by requirements and devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    OpenSystem,
    CapPiercing,
    LevelSensor,
    LisBidirectional,
    QcProgram,
    ResultMemory,
    SingleUseCuvette,
    #[serde(rename = "incubation_37c")]
    Incubation37C,
    ReagentCooler,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::OpenSystem,
        Capability::CapPiercing,
        Capability::LevelSensor,
        Capability::LisBidirectional,
        Capability::QcProgram,
        Capability::ResultMemory,
        Capability::SingleUseCuvette,
        Capability::Incubation37C,
        Capability::ReagentCooler,
    ];

    /// Soft requirements degrade to an amendment instead of failing
    pub fn is_soft(&self) -> bool {
        matches!(self, Capability::QcProgram | Capability::ResultMemory)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Capability::OpenSystem => "Açık Sistem",
            Capability::CapPiercing => "Kapak Delme",
            Capability::LevelSensor => "Seviye Sensörü",
            Capability::LisBidirectional => "Çift Yönlü LIS",
            Capability::QcProgram => "Kalite Kontrol Programı",
            Capability::ResultMemory => "Sonuç Hafızası",
            Capability::SingleUseCuvette => "Tek Kullanımlık Küvet",
            Capability::Incubation37C => "37°C İnkübasyon",
            Capability::ReagentCooler => "Reaktif Soğutma",
        }
    }
}
