//! Compliance evaluator.
//!
//! Compares one requirement record with one device profile and produces one
//! verdict per clause, in [`ClauseKind::all`] order. Each clause is checked
//! independently; nothing here can fail.
//!
//! A clause the document never mentioned gets the same `Unknown` verdict
//! whatever its category (see [`undetected`]). A clause whose device datum is
//! missing is `Unknown` as well, with an explanation naming the datum.

use tracing::debug;

use crate::domain::{
    Capability, ClauseKind, ClauseVerdict, DetectionMethods, DeviceCapabilityRecord, Facet,
    FactorStatus, NumericKey, ReadingMethod, RequirementRecord, Status, TestName,
};

/// Explanation used for every clause the document does not mention
pub const UNDETECTED_EXPLANATION: &str =
    "Şartnamede gereksinim yakalanamadı, manuel inceleme gerekli.";

/// Placeholder for an absent value in requirement and device views
const ABSENT: &str = "?";

/// Evaluate every clause
pub fn evaluate(
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> Vec<ClauseVerdict> {
    ClauseKind::all()
        .into_iter()
        .map(|kind| evaluate_clause(kind, requirements, device))
        .collect()
}

/// Evaluate a single clause
pub fn evaluate_clause(
    kind: ClauseKind,
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> ClauseVerdict {
    let verdict = match check(kind, requirements, device) {
        Some(outcome) => outcome.into_verdict(kind, device),
        None => undetected(kind, device),
    };
    debug!(clause = %verdict.clause_label, status = ?verdict.status, "Clause evaluated");
    verdict
}

/// Uniform verdict for a clause with no requirement in the document
fn undetected(kind: ClauseKind, device: &DeviceCapabilityRecord) -> ClauseVerdict {
    ClauseVerdict {
        clause: kind,
        facet: None,
        clause_label: kind.label().to_string(),
        requirement_view: ABSENT.to_string(),
        device_view: device_view(kind, device),
        status: Status::Unknown,
        explanation: UNDETECTED_EXPLANATION.to_string(),
    }
}

/// Result of a clause check before it becomes a verdict
#[derive(Debug)]
struct Outcome {
    status: Status,
    facet: Option<Facet>,
    requirement_view: String,
    explanation: String,
}

impl Outcome {
    fn into_verdict(self, kind: ClauseKind, device: &DeviceCapabilityRecord) -> ClauseVerdict {
        let clause_label = match self.facet {
            Some(facet) if self.status != Status::Compliant => facet.label(),
            _ => kind.label(),
        };
        ClauseVerdict {
            clause: kind,
            facet: self.facet,
            clause_label: clause_label.to_string(),
            requirement_view: self.requirement_view,
            device_view: device_view(kind, device),
            status: self.status,
            explanation: self.explanation,
        }
    }
}

/// One facet of a multi-part clause (barcode, reading method)
#[derive(Debug)]
struct SubCheck {
    facet: Facet,
    status: Status,
    required: &'static str,
    explanation: String,
}

/// `None` when the document has no requirement for this clause
fn check(
    kind: ClauseKind,
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> Option<Outcome> {
    match kind {
        ClauseKind::Channels => {
            let required = requirements.minimum(NumericKey::Channels)?;
            Some(check_minimum(required, device.channels_total, "kanal"))
        }
        ClauseKind::Probes => {
            let required = requirements.minimum(NumericKey::Probes)?;
            Some(check_minimum(required, device.probe_count, "prob"))
        }
        ClauseKind::Speed => {
            let required = requirements.minimum(NumericKey::Speed)?;
            // A published speed of zero means the catalog has no figure
            let offered = device.speed_tests_per_hour.filter(|speed| *speed > 0);
            Some(check_minimum(required, offered, "test/saat"))
        }
        ClauseKind::Barcode => check_barcode(requirements, device),
        ClauseKind::ReadingMethod => check_reading_method(requirements, device),
        ClauseKind::Tests => check_tests(requirements, device),
        ClauseKind::Automation => {
            let required = requirements.automation_type?;
            let (status, explanation) = match device.automation_type {
                None => (
                    Status::Unknown,
                    "Cihazın otomasyon tipi bilinmiyor, manuel inceleme gerekli.".to_string(),
                ),
                Some(offered) if offered == required => (
                    Status::Compliant,
                    format!("Şartname {} cihaz istiyor, cihaz {}.", required.label(), offered.label()),
                ),
                Some(offered) => (
                    Status::NonCompliant,
                    format!("Şartname {} cihaz istiyor, cihaz {}.", required.label(), offered.label()),
                ),
            };
            Some(Outcome {
                status,
                facet: None,
                requirement_view: required.label().to_string(),
                explanation,
            })
        }
        ClauseKind::Capability(capability) => {
            let required = requirements.capability(capability)?;
            Some(check_capability(capability, required, device))
        }
    }
}

fn check_minimum(required: u32, offered: Option<u32>, unit: &str) -> Outcome {
    let (status, explanation) = match offered {
        None => (
            Status::Unknown,
            format!("Cihazın {} değeri bilinmiyor, manuel inceleme gerekli.", unit),
        ),
        Some(offered) => {
            let status = if offered >= required {
                Status::Compliant
            } else {
                Status::NonCompliant
            };
            (
                status,
                format!("Şartname en az {} {}, cihaz {} {}.", required, unit, offered, unit),
            )
        }
    };

    Outcome {
        status,
        facet: None,
        requirement_view: format!("en az {} {}", required, unit),
        explanation,
    }
}

fn check_capability(
    capability: Capability,
    required: bool,
    device: &DeviceCapabilityRecord,
) -> Outcome {
    let label = capability.label();
    let (status, explanation) = if !required {
        (Status::Compliant, format!("Şartname {} istemiyor.", label))
    } else {
        match device.capability(capability) {
            None => (
                Status::Unknown,
                format!("Cihazda {} bilgisi yok, manuel inceleme gerekli.", label),
            ),
            Some(true) => (Status::Compliant, format!("Cihazda {} mevcut.", label)),
            Some(false) if capability.is_soft() => (
                Status::PartiallyCompliant,
                format!("Cihazda {} yok; eşdeğer çözüm ile karşılanabilir.", label),
            ),
            Some(false) => (Status::NonCompliant, format!("Cihazda {} yok.", label)),
        }
    };

    Outcome {
        status,
        facet: None,
        requirement_view: if required { "isteniyor" } else { "istenmiyor" }.to_string(),
        explanation,
    }
}

fn check_barcode(
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> Option<Outcome> {
    let required = requirements.barcode?;
    let offered = device.barcode;
    let mut subs = Vec::new();

    if required.requires_sample() {
        let status = match offered.and_then(|b| b.sample) {
            None => Status::Unknown,
            Some(true) => Status::Compliant,
            Some(false) => Status::NonCompliant,
        };
        subs.push(barcode_sub(Facet::SampleBarcode, status, "numune"));
    }
    if required.reagent == Some(true) {
        let status = soft_status(offered.and_then(|b| b.reagent));
        subs.push(barcode_sub(Facet::ReagentBarcode, status, "reaktif"));
    }
    if required.internal == Some(true) {
        let status = soft_status(offered.and_then(|b| b.internal));
        subs.push(barcode_sub(Facet::InternalBarcode, status, "dahili"));
    }

    Some(combine(subs, "Şartname barkod okuyucu istemiyor."))
}

/// Absent → Unknown, present → Compliant, missing → PartiallyCompliant
fn soft_status(offered: Option<bool>) -> Status {
    match offered {
        None => Status::Unknown,
        Some(true) => Status::Compliant,
        Some(false) => Status::PartiallyCompliant,
    }
}

fn barcode_sub(facet: Facet, status: Status, required: &'static str) -> SubCheck {
    let explanation = match status {
        Status::Compliant => format!("Cihazda {} barkod okuyucu mevcut.", required),
        Status::PartiallyCompliant => format!(
            "Cihazda {} barkod okuyucu yok; manuel veya alternatif tanımlama ile karşılanabilir.",
            required
        ),
        Status::NonCompliant => format!("Cihazda {} barkod okuyucu yok.", required),
        Status::Unknown => format!(
            "Cihazın {} barkod bilgisi yok, manuel inceleme gerekli.",
            required
        ),
    };
    SubCheck {
        facet,
        status,
        required,
        explanation,
    }
}

fn check_reading_method(
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> Option<Outcome> {
    let required = requirements.reading_method.as_ref()?;
    let detection = device.detection_methods();

    let subs = required
        .iter()
        .map(|method| method_sub(*method, detection))
        .collect();

    Some(combine(subs, "Şartname okuma yöntemi belirtmiyor."))
}

fn method_sub(method: ReadingMethod, detection: Option<DetectionMethods>) -> SubCheck {
    let facet = match method {
        ReadingMethod::Magnetic => Facet::MagneticReading,
        ReadingMethod::MechanicalClot => Facet::ClotReading,
        ReadingMethod::Chromogenic => Facet::ChromogenicReading,
        ReadingMethod::Immunologic => Facet::ImmunologicReading,
    };
    let required = method.label();

    let Some(detection) = detection else {
        return SubCheck {
            facet,
            status: Status::Unknown,
            required,
            explanation: "Cihazın okuma yöntemi bilinmiyor, manuel inceleme gerekli.".to_string(),
        };
    };

    let (status, explanation) = match method {
        ReadingMethod::Magnetic if detection.magnetic => {
            (Status::Compliant, "Cihaz manyetik okuma yapıyor.".to_string())
        }
        ReadingMethod::Magnetic => (
            Status::NonCompliant,
            "Şartname manyetik okuma istiyor, cihazda manyetik kanal yok.".to_string(),
        ),
        ReadingMethod::MechanicalClot if detection.mechanical => (
            Status::Compliant,
            "Cihaz mekanik pıhtı algılama yapıyor.".to_string(),
        ),
        ReadingMethod::MechanicalClot if detection.magnetic => (
            Status::PartiallyCompliant,
            "Şartname mekanik pıhtı algılama istiyor; cihaz manyetik prensiple pıhtı algılıyor (eşdeğer yöntem)."
                .to_string(),
        ),
        ReadingMethod::MechanicalClot => (
            Status::NonCompliant,
            "Şartname mekanik pıhtı algılama istiyor, cihazda pıhtı algılayan kanal yok.".to_string(),
        ),
        ReadingMethod::Chromogenic | ReadingMethod::Immunologic if detection.optical => (
            Status::Compliant,
            format!("Cihaz {} ölçümü optik kanalla yapıyor.", required),
        ),
        ReadingMethod::Chromogenic | ReadingMethod::Immunologic => (
            Status::NonCompliant,
            format!("Şartname {} ölçüm istiyor, cihazda optik kanal yok.", required),
        ),
    };

    SubCheck {
        facet,
        status,
        required,
        explanation,
    }
}

/// Reduce sub-checks to one outcome.
///
/// The first non-compliant facet decides immediately; otherwise the first
/// partially compliant one, then the first unknown one.
fn combine(subs: Vec<SubCheck>, nothing_required: &str) -> Outcome {
    let requirement_view = if subs.is_empty() {
        "istenmiyor".to_string()
    } else {
        subs.iter().map(|s| s.required).collect::<Vec<_>>().join(", ")
    };

    let decisive = [Status::NonCompliant, Status::PartiallyCompliant, Status::Unknown]
        .into_iter()
        .find_map(|status| subs.iter().find(|s| s.status == status));

    let (status, facet, explanation) = match decisive {
        Some(sub) => (sub.status, Some(sub.facet), sub.explanation.clone()),
        None if subs.is_empty() => (Status::Compliant, None, nothing_required.to_string()),
        None => (
            Status::Compliant,
            None,
            subs.iter()
                .map(|s| s.explanation.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
    };

    Outcome {
        status,
        facet,
        requirement_view,
        explanation,
    }
}

fn check_tests(
    requirements: &RequirementRecord,
    device: &DeviceCapabilityRecord,
) -> Option<Outcome> {
    let needed = requirements.needed_tests();
    if needed.is_empty() {
        return None;
    }
    let requirement_view = join_tests(&needed);

    if device.supported_tests.is_none() {
        return Some(Outcome {
            status: Status::Unknown,
            facet: None,
            requirement_view,
            explanation: "Cihazın test listesi bilinmiyor, manuel inceleme gerekli.".to_string(),
        });
    }

    let external_lab_allowed =
        requirements.factor_status == Some(FactorStatus::OptionalExternalLab);
    let mut missing = Vec::new();
    let mut factor_outsourced = false;

    for test in &needed {
        let supported = device
            .test_support(*test)
            .is_some_and(|support| support.is_supported());
        if supported {
            continue;
        }
        if *test == TestName::Factor && external_lab_allowed {
            factor_outsourced = true;
        } else {
            missing.push(*test);
        }
    }

    let (status, facet, explanation) = if !missing.is_empty() {
        let facet = (missing == [TestName::Factor]).then_some(Facet::FactorTest);
        (
            Status::NonCompliant,
            facet,
            format!("Cihaz şu testleri desteklemiyor: {}.", join_tests(&missing)),
        )
    } else if factor_outsourced {
        (
            Status::PartiallyCompliant,
            Some(Facet::FactorTest),
            "Cihaz Faktör testini desteklemiyor; şartname dış/referans laboratuvara gönderime izin veriyor."
                .to_string(),
        )
    } else {
        (
            Status::Compliant,
            None,
            "Cihaz istenen tüm testleri destekliyor.".to_string(),
        )
    };

    Some(Outcome {
        status,
        facet,
        requirement_view,
        explanation,
    })
}

fn join_tests(tests: &[TestName]) -> String {
    tests
        .iter()
        .map(TestName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short summary of what the device offers for a clause
pub fn device_view(kind: ClauseKind, device: &DeviceCapabilityRecord) -> String {
    fn number(value: Option<u32>, unit: &str) -> String {
        value.map_or_else(|| ABSENT.to_string(), |v| format!("{} {}", v, unit))
    }
    fn presence(value: Option<bool>) -> &'static str {
        match value {
            Some(true) => "var",
            Some(false) => "yok",
            None => ABSENT,
        }
    }
    fn list(items: Vec<&str>) -> String {
        if items.is_empty() {
            "yok".to_string()
        } else {
            items.join(", ")
        }
    }

    match kind {
        ClauseKind::Channels => number(device.channels_total, "kanal"),
        ClauseKind::Probes => number(device.probe_count, "prob"),
        ClauseKind::Speed => number(
            device.speed_tests_per_hour.filter(|speed| *speed > 0),
            "test/saat",
        ),
        ClauseKind::Barcode => match device.barcode {
            None => ABSENT.to_string(),
            Some(barcode) => format!(
                "numune: {}, reaktif: {}, dahili: {}",
                presence(barcode.sample),
                presence(barcode.reagent),
                presence(barcode.internal)
            ),
        },
        ClauseKind::ReadingMethod => device
            .detection_methods()
            .map_or_else(|| ABSENT.to_string(), |methods| list(methods.labels())),
        ClauseKind::Tests => match device.supported_tests {
            None => ABSENT.to_string(),
            Some(_) => list(device.supported_test_names()),
        },
        ClauseKind::Automation => device
            .automation_type
            .map_or_else(|| ABSENT.to_string(), |automation| automation.label().to_string()),
        ClauseKind::Capability(capability) => presence(device.capability(capability)).to_string(),
    }
}
