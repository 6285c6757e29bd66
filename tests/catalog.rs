//! Device Catalog Integration Tests
//!
//! Tests for loading catalog files from disk and evaluating catalog
//! profiles end to end.

use std::io::Write;

use tempfile::NamedTempFile;

use ihalebind::catalog::{CatalogError, DeviceCatalog};
use ihalebind::core::ComplianceEngine;
use ihalebind::domain::{ClauseKind, OverallStatus, Status, TestName, TestSupport};

const DEVICES_JSON: &str = r#"{
    "Succeeder": {
        "SF-8300": {
            "koagulasyon": {
                "kanal_toplam": 4,
                "kanal_optik": 4,
                "kanal_manyetik": 4,
                "prob_sayisi": 2,
                "hiz_test_saat": 390,
                "barkod": { "numune": true, "reaktif": true, "dahili": true },
                "cap_piercing": false,
                "testler": {
                    "PT": "manyetik",
                    "APTT": "manyetik",
                    "Fibrinojen": "manyetik",
                    "D-Dimer": "optik",
                    "Faktör": true
                }
            }
        },
        "SF-400": {
            "koagulasyon": {
                "kanal_toplam": 4,
                "kanal_manyetik": 4,
                "barkod": { "numune": false, "reaktif": false },
                "testler": { "PT": true, "APTT": true, "Fibrinojen": true }
            }
        }
    }
}"#;

fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_load_from_disk() {
    let file = write_catalog(DEVICES_JSON);
    let catalog = DeviceCatalog::load(file.path()).await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.brands(), vec!["Succeeder"]);

    let sf8300 = catalog.get("Succeeder", "SF-8300").unwrap();
    assert_eq!(sf8300.channels_total, Some(4));
    assert_eq!(sf8300.speed_tests_per_hour, Some(390));
    assert_eq!(
        sf8300.test_support(TestName::DDimer),
        Some(&TestSupport::SupportedWithMethod("optik".to_string()))
    );
    assert_eq!(
        sf8300.test_support(TestName::Factor),
        Some(&TestSupport::SupportedGeneric)
    );
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = DeviceCatalog::load(dir.path().join("missing.json")).await;
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}

#[tokio::test]
async fn test_malformed_file() {
    let file = write_catalog(r#"{ "Succeeder": [1, 2, 3] }"#);
    let result = DeviceCatalog::load(file.path()).await;
    assert!(matches!(result, Err(CatalogError::Parse(_))));
}

#[tokio::test]
async fn test_catalog_report() {
    let file = write_catalog(DEVICES_JSON);
    let catalog = DeviceCatalog::load(file.path()).await.unwrap();
    let devices = catalog.devices("Succeeder", None).unwrap();

    let tender = "Cihaz en az 4 kanallı olmalıdır. Numune barkod ve reaktif barkod okuyucu \
                  bulunmalıdır. Mekanik pıhtı algılama. İstenen testler: PT, APTT, Fibrinojen, D-Dimer";
    let report = ComplianceEngine::default()
        .report(tender, None, devices)
        .unwrap();

    assert_eq!(report.evaluations.len(), 2);
    assert_eq!(report.document_id.as_str().len(), 16);

    // SF-400 sorts first; it has no sample barcode and no D-Dimer
    let sf400 = &report.evaluations[0];
    assert_eq!(sf400.device_label, "Succeeder SF-400");
    assert_eq!(sf400.overall.status, OverallStatus::NonCompliant);
    let tests = sf400.verdict(ClauseKind::Tests.label()).unwrap();
    assert_eq!(tests.status, Status::NonCompliant);
    assert!(tests.explanation.contains("D-Dimer"));

    // SF-8300 reads clots magnetically: compliant with amendment
    let sf8300 = &report.evaluations[1];
    assert_eq!(sf8300.overall.status, OverallStatus::PartiallyCompliant);
    assert_eq!(sf8300.amendments.len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["evaluations"][1]["device_label"], "Succeeder SF-8300");
}
