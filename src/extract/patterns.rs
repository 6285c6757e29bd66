//! Requirement probe table.
//!
//! One entry per probe: what it sets, where it looks and which patterns
//! trigger it. Patterns are regular expressions over normalized text
//! (lower-case, Turkish letters folded). Numeric probes capture the
//! number in group 1.
//!
//! Order matters where noted: specific barcode facets come before the
//! general barcode probe, and full automation before semi automation.

use crate::domain::{AutomationType, BarcodeFacet, Capability, NumericKey, ReadingMethod, TestName};
use crate::text::SectionSpec;

/// What a probe writes into the requirement record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Numeric minimum; the largest captured value wins
    Minimum(NumericKey),
    /// Barcode facet; `General` only applies when no other facet was found
    Barcode(BarcodeFacet),
    Method(ReadingMethod),
    /// `Full` overrides `Semi`
    Automation(AutomationType),
    Capability(Capability),
    Test(TestName),
    /// External / reference laboratory phrasing for the Factor test
    ExternalLab,
}

/// Text region a probe scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole region handed to the extractor
    Region,
    /// The requested-test block when one exists, otherwise the region
    TestBlock,
}

/// A requirement detection probe
#[derive(Debug, Clone)]
pub struct Probe {
    /// Probe name, used in logs
    pub name: &'static str,
    pub target: Target,
    pub scope: Scope,
    /// Regex pattern strings
    pub patterns: &'static [&'static str],
}

/// Spelled-out number in parentheses, e.g. "4 (dort) kanal"
macro_rules! spelled {
    () => {
        r"(?:\([a-z ]+\)\s*)?"
    };
}

pub static PROBES: &[Probe] = &[
    // Numeric minimums
    Probe {
        name: "channel_min",
        target: Target::Minimum(NumericKey::Channels),
        scope: Scope::Region,
        patterns: &[
            concat!(r"en az\s*(\d+)\s*", spelled!(), r"(?:adet\s*)?(?:olcum|test|reaksiyon)?\s*kanal"),
            r"(\d+)\s*(?:adet\s*)?(?:olcum|test|reaksiyon)\s*kanal",
            r"at least\s*(\d+)\s*(?:measurement|test|reaction)?\s*channel",
        ],
    },
    Probe {
        name: "probe_min",
        target: Target::Minimum(NumericKey::Probes),
        scope: Scope::Region,
        patterns: &[
            concat!(r"en az\s*(\d+)\s*", spelled!(), r"(?:adet\s*)?(?:ayri\s*)?prob"),
            r"(\d+)\s*problu",
            r"at least\s*(\d+)\s*(?:separate\s*)?probe",
        ],
    },
    Probe {
        name: "speed_min",
        target: Target::Minimum(NumericKey::Speed),
        scope: Scope::Region,
        patterns: &[
            r"saatte\s*en az\s*(\d+)\s*(?:adet\s*)?test",
            r"en az\s*(\d+)\s*(?:adet\s*)?test\s*/\s*saat",
            r"(\d+)\s*test\s*/\s*saat",
            r"at least\s*(\d+)\s*tests?\s*(?:per|/)\s*hour",
        ],
    },
    // Barcode
    Probe {
        name: "barcode_sample",
        target: Target::Barcode(BarcodeFacet::Sample),
        scope: Scope::Region,
        patterns: &[r"numune barkod", r"hasta barkod", r"tup barkod", r"sample barcode"],
    },
    Probe {
        name: "barcode_reagent",
        target: Target::Barcode(BarcodeFacet::Reagent),
        scope: Scope::Region,
        patterns: &[
            r"reaktif barkod",
            r"kit barkod",
            r"barkod okuyucu ile kit okutulur",
            r"reagent barcode",
        ],
    },
    Probe {
        name: "barcode_internal",
        target: Target::Barcode(BarcodeFacet::Internal),
        scope: Scope::Region,
        patterns: &[r"dahili barkod", r"entegre barkod", r"internal barcode", r"built-in barcode"],
    },
    Probe {
        name: "barcode_general",
        target: Target::Barcode(BarcodeFacet::General),
        scope: Scope::Region,
        patterns: &[r"barkod", r"barcode"],
    },
    // Reading method
    Probe {
        name: "method_magnetic",
        target: Target::Method(ReadingMethod::Magnetic),
        scope: Scope::Region,
        patterns: &[r"manyetik", r"magnetic"],
    },
    Probe {
        name: "method_mechanical_clot",
        target: Target::Method(ReadingMethod::MechanicalClot),
        scope: Scope::Region,
        patterns: &[r"mekanik", r"clot", r"pihti", r"koagulometri", r"coagulometr"],
    },
    Probe {
        name: "method_chromogenic",
        target: Target::Method(ReadingMethod::Chromogenic),
        scope: Scope::Region,
        patterns: &[r"kromojenik", r"chromogenic"],
    },
    Probe {
        name: "method_immunologic",
        target: Target::Method(ReadingMethod::Immunologic),
        scope: Scope::Region,
        patterns: &[r"immunolojik", r"immunologic", r"immunoturbidimetri"],
    },
    // Automation
    Probe {
        name: "automation_full",
        target: Target::Automation(AutomationType::Full),
        scope: Scope::Region,
        patterns: &[r"tam otomatik", r"tam otomasyon", r"fully? automat"],
    },
    Probe {
        name: "automation_semi",
        target: Target::Automation(AutomationType::Semi),
        scope: Scope::Region,
        patterns: &[r"yari otomatik", r"semi[- ]?automat"],
    },
    // Boolean capabilities
    Probe {
        name: "open_system",
        target: Target::Capability(Capability::OpenSystem),
        scope: Scope::Region,
        patterns: &[r"acik sistem", r"open system", r"open reagent"],
    },
    Probe {
        name: "cap_piercing",
        target: Target::Capability(Capability::CapPiercing),
        scope: Scope::Region,
        patterns: &[r"kapak del", r"kapali tup", r"kapagi acilmadan", r"cap[- ]?piercing"],
    },
    Probe {
        name: "level_sensor",
        target: Target::Capability(Capability::LevelSensor),
        scope: Scope::Region,
        patterns: &[r"seviye sensor", r"sivi seviye", r"seviye algila", r"level sens", r"level detect"],
    },
    Probe {
        name: "lis_bidirectional",
        target: Target::Capability(Capability::LisBidirectional),
        scope: Scope::Region,
        patterns: &[r"cift yonlu", r"iki yonlu", r"bi-?directional"],
    },
    Probe {
        name: "qc_program",
        target: Target::Capability(Capability::QcProgram),
        scope: Scope::Region,
        patterns: &[r"kalite kontrol program", r"qc program", r"levey[- ]?jennings", r"westgard"],
    },
    Probe {
        name: "result_memory",
        target: Target::Capability(Capability::ResultMemory),
        scope: Scope::Region,
        patterns: &[r"hafiza", r"bellek", r"result memory", r"sonuc depolama"],
    },
    Probe {
        name: "single_use_cuvette",
        target: Target::Capability(Capability::SingleUseCuvette),
        scope: Scope::Region,
        patterns: &[r"tek kullanimlik kuvet", r"disposable cuvette", r"single[- ]use cuvette"],
    },
    Probe {
        name: "incubation_37c",
        target: Target::Capability(Capability::Incubation37C),
        scope: Scope::Region,
        patterns: &[r"\b37\s*[°º]\s*c", r"\b37\s*derece", r"\b37\s*c\b"],
    },
    Probe {
        name: "reagent_cooler",
        target: Target::Capability(Capability::ReagentCooler),
        scope: Scope::Region,
        patterns: &[r"reaktif sogut", r"sogutmali", r"reagent cool"],
    },
    // Requested tests
    Probe {
        name: "test_pt",
        target: Target::Test(TestName::Pt),
        scope: Scope::TestBlock,
        patterns: &[r"(?:^|[^a-z0-9.])p\.?t\.?(?:[^a-z0-9.]|$)", r"protrombin", r"prothrombin"],
    },
    Probe {
        name: "test_aptt",
        target: Target::Test(TestName::Aptt),
        scope: Scope::TestBlock,
        patterns: &[
            r"a\.?\s?p\.?\s?t\.?\s?t",
            r"aktive parsiyel tromboplastin",
            r"activated partial thromboplastin",
        ],
    },
    Probe {
        name: "test_fibrinogen",
        target: Target::Test(TestName::Fibrinogen),
        scope: Scope::TestBlock,
        patterns: &[r"fibrinojen", r"fibrinogen"],
    },
    Probe {
        name: "test_d_dimer",
        target: Target::Test(TestName::DDimer),
        scope: Scope::TestBlock,
        patterns: &[r"d[\s-]?dimer"],
    },
    Probe {
        name: "test_factor",
        target: Target::Test(TestName::Factor),
        scope: Scope::TestBlock,
        patterns: &[r"faktor", r"factor"],
    },
    Probe {
        name: "factor_external_lab",
        target: Target::ExternalLab,
        scope: Scope::TestBlock,
        patterns: &[
            r"dis lab",
            r"referans lab",
            r"gonderilebilir",
            r"hizmet alimi",
            r"external lab",
            r"reference lab",
        ],
    },
];

/// Headings that open a requested-test list
pub const TEST_BLOCK_HEADINGS: &[&str] = &[
    "istenen test*",
    "istenilen test*",
    "calisilacak test*",
    "calisilacak tetkik*",
    "test listesi",
    "testler",
    "koagulasyon test*",
    "calisilacak parametre*",
];

/// Headings that close a requested-test list
pub const TEST_BLOCK_TERMINATORS: &[&str] = &[
    "teknik ozellikler",
    "cihazin teknik",
    "genel sartlar",
    "genel hususlar",
];

/// Requested-test block with the given window
pub const fn test_block_spec(window: usize) -> SectionSpec<'static> {
    SectionSpec::new(TEST_BLOCK_HEADINGS, TEST_BLOCK_TERMINATORS).with_window(window)
}

/// Device group within a tender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    A,
    B,
}

/// Group headings; the English forms need the colon, "as a group" is prose
pub const GROUP_A_HEADINGS: &[&str] = &["a grubu", "grup a", "a group:", "group a:"];
pub const GROUP_B_HEADINGS: &[&str] = &["b grubu", "grup b", "b group:", "group b:"];

/// Headings that close the last group block
pub const GROUP_TERMINATORS: &[&str] = &[
    "genel sartlar",
    "genel hususlar",
    "muayene ve kabul",
    "diger hususlar",
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_all_patterns_compile() {
        for probe in PROBES {
            for pattern in probe.patterns {
                assert!(Regex::new(pattern).is_ok(), "{}: {}", probe.name, pattern);
            }
        }
    }

    #[test]
    fn test_numeric_patterns_capture_number() {
        for probe in PROBES.iter().filter(|p| matches!(p.target, Target::Minimum(_))) {
            for pattern in probe.patterns {
                let re = Regex::new(pattern).unwrap();
                assert!(re.captures_len() >= 2, "{}: {}", probe.name, pattern);
            }
        }
    }

    #[test]
    fn test_specific_barcode_before_general() {
        let position = |facet| {
            PROBES
                .iter()
                .position(|p| p.target == Target::Barcode(facet))
                .unwrap()
        };
        assert!(position(BarcodeFacet::Sample) < position(BarcodeFacet::General));
        assert!(position(BarcodeFacet::Reagent) < position(BarcodeFacet::General));
        assert!(position(BarcodeFacet::Internal) < position(BarcodeFacet::General));
    }

    #[test]
    fn test_pt_pattern_ignores_aptt() {
        let re = Regex::new(PROBES.iter().find(|p| p.name == "test_pt").unwrap().patterns[0]).unwrap();
        assert!(re.is_match("pt, aptt"));
        assert!(re.is_match("testler: p.t. ve inr"));
        assert!(!re.is_match("aptt"));
        assert!(!re.is_match("a.p.t.t."));
        assert!(!re.is_match("ptt"));
    }
}
