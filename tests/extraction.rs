//! Requirement Extraction Integration Tests
//!
//! Tests for normalization, section location and the probe table, using
//! realistic tender wording.

use ihalebind::domain::{AutomationType, Capability, FactorStatus, ReadingMethod, TestName};
use ihalebind::extract::{Extractor, Group};
use ihalebind::text::normalize;

const TENDER: &str = "\
KOAGÜLASYON CİHAZI TEKNİK ŞARTNAMESİ

1. Cihaz tam otomatik olmalıdır.
2. Cihaz en az 4 (dört) ölçüm kanalına sahip olmalıdır.
3. Cihaz saatte en az 120 test çalışabilmelidir.
4. Cihazda numune barkod okuyucu ve reaktif barkod okuyucu bulunmalıdır.
5. Cihaz mekanik pıhtı algılama prensibi ile çalışmalıdır.
6. Cihazın kapak delme özelliği olmalıdır.
7. Cihaz çift yönlü LIS bağlantısına uygun olmalıdır.

İstenen Testler:
PT, aPTT, Fibrinojen, D-Dimer, Faktör VIII
Faktör testleri referans laboratuvara gönderilebilir.

Genel Şartlar:
Teslim süresi 30 gündür.
";

#[test]
fn test_normalize_idempotent() {
    let once = normalize(TENDER);
    assert_eq!(normalize(&once), once);
    assert!(!once.contains('\n'));
    assert!(once.contains("koagulasyon cihazi teknik sartnamesi"));
}

#[test]
fn test_full_tender_extraction() {
    let record = Extractor::new().extract(TENDER);

    assert_eq!(record.channel_min, Some(4));
    assert_eq!(record.speed_min, Some(120));
    assert_eq!(record.probe_min, None);
    assert_eq!(record.automation_type, Some(AutomationType::Full));

    let barcode = record.barcode.unwrap();
    assert_eq!(barcode.sample, Some(true));
    assert_eq!(barcode.reagent, Some(true));
    assert_eq!(barcode.general, None);

    let methods = record.reading_method.clone().unwrap();
    assert!(methods.contains(&ReadingMethod::MechanicalClot));
    assert!(!methods.contains(&ReadingMethod::Magnetic));

    assert_eq!(record.capability(Capability::CapPiercing), Some(true));
    assert_eq!(record.capability(Capability::LisBidirectional), Some(true));
    assert_eq!(record.capability(Capability::ReagentCooler), None);

    let tests = record.needed_tests();
    assert_eq!(tests, TestName::ALL.to_vec());
    assert_eq!(record.factor_status, Some(FactorStatus::OptionalExternalLab));
}

#[test]
fn test_no_channel_phrase_leaves_key_absent() {
    let record = Extractor::new().extract("Cihaz tam otomatik olmalıdır. Kapak delme özelliği");
    assert_eq!(record.channel_min, None);
}

#[test]
fn test_absent_barcode_stays_absent() {
    let record = Extractor::new().extract("Cihaz en az 4 kanallı olmalıdır.");
    assert!(record.barcode.is_none());
    assert!(record.requested_tests.is_none());
    assert!(record.factor_status.is_none());
}

#[test]
fn test_strictest_minimum_wins() {
    let text = "A maddesi: en az 2 kanal. B maddesi: en az 6 ölçüm kanalı.";
    assert_eq!(Extractor::new().extract(text).channel_min, Some(6));
}

#[test]
fn test_group_blocks() {
    let text = "\
A GRUBU: Tam otomatik koagülasyon cihazı, en az 8 kanal, kapak delme.
B GRUBU: Yarı otomatik cihaz, en az 2 kanal.
Genel Şartlar: teslim";

    let extractor = Extractor::new();
    let a = extractor.extract_group(text, Group::A);
    let b = extractor.extract_group(text, Group::B);

    assert_eq!(a.channel_min, Some(8));
    assert_eq!(a.automation_type, Some(AutomationType::Full));
    assert_eq!(a.capability(Capability::CapPiercing), Some(true));

    assert_eq!(b.channel_min, Some(2));
    assert_eq!(b.automation_type, Some(AutomationType::Semi));
    assert_eq!(b.capability(Capability::CapPiercing), None);
}

#[test]
fn test_factor_without_external_lab_is_mandatory() {
    let text = "Çalışılacak testler: PT, APTT, Faktör VIII, Faktör IX";
    let record = Extractor::new().extract(text);
    assert_eq!(record.factor_status, Some(FactorStatus::Mandatory));
}
