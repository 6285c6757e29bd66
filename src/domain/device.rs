//! Device capability profiles.
//!
//! A profile describes one instrument model as published by the catalog.
//! Missing fields stay `None` and are evaluated as unknown, never as false.
//! Field names accept both the English keys and the Turkish keys used by
//! existing catalog files (`kanal_toplam`, `prob_sayisi`, `barkod`, `testler`).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::requirement::{AutomationType, Capability, ReadingMethod, TestName};

/// Static technical profile of one instrument model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilityRecord {
    #[serde(default, alias = "kanal_toplam", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub channels_total: Option<u32>,

    #[serde(default, alias = "kanal_optik", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub channels_optical: Option<u32>,

    #[serde(default, alias = "kanal_manyetik", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub channels_magnetic: Option<u32>,

    #[serde(default, alias = "prob_sayisi", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub probe_count: Option<u32>,

    #[serde(default, alias = "hiz_test_saat", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub speed_tests_per_hour: Option<u32>,

    #[serde(default, alias = "inkubasyon_pozisyon", deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub incubation_positions: Option<u32>,

    #[serde(default, alias = "barkod", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<DeviceBarcode>,

    /// Explicitly declared detection principles
    #[serde(default, alias = "okuma_yontemi", skip_serializing_if = "Option::is_none")]
    pub reading_methods: Option<BTreeSet<ReadingMethod>>,

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

    /// Test name (as written in the catalog) to support level
    #[serde(default, alias = "testler", skip_serializing_if = "Option::is_none")]
    pub supported_tests: Option<BTreeMap<String, TestSupport>>,
}

impl DeviceCapabilityRecord {
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

    /// Support level for a test.
    ///
    /// `None` when the device publishes no test list at all. A list that
    /// does not mention the test counts as unsupported.
    pub fn test_support(&self, test: TestName) -> Option<&TestSupport> {
        let tests = self.supported_tests.as_ref()?;
        let found = tests
            .iter()
            .find(|(key, _)| test.matches(key))
            .map(|(_, support)| support);
        Some(found.unwrap_or(&UNSUPPORTED))
    }

    /// Names of the tests the device runs, as written in the catalog
    pub fn supported_test_names(&self) -> Vec<&str> {
        self.supported_tests
            .iter()
            .flatten()
            .filter(|(_, support)| support.is_supported())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Detection principles the device is known to offer.
    ///
    /// Combines the explicit declaration, dedicated channel counts and the
    /// methods noted on individual tests. `None` when none of these sources
    /// says anything.
    pub fn detection_methods(&self) -> Option<DetectionMethods> {
        let mut methods = DetectionMethods::default();
        let mut informed = false;

        if let Some(declared) = &self.reading_methods {
            informed = true;
            for method in declared {
                match method {
                    ReadingMethod::Magnetic => methods.magnetic = true,
                    ReadingMethod::MechanicalClot => methods.mechanical = true,
                    ReadingMethod::Chromogenic | ReadingMethod::Immunologic => {
                        methods.optical = true
                    }
                }
            }
        }

        if let Some(count) = self.channels_magnetic {
            informed = true;
            methods.magnetic |= count > 0;
        }
        if let Some(count) = self.channels_optical {
            informed = true;
            methods.optical |= count > 0;
        }

        for support in self.supported_tests.iter().flat_map(|t| t.values()) {
            if let TestSupport::SupportedWithMethod(tag) = support {
                informed = true;
                let tag = tag.to_lowercase();
                methods.magnetic |= tag.contains("manyetik") || tag.contains("magnetic");
                methods.optical |= tag.contains("optik") || tag.contains("optical");
                methods.mechanical |= tag.contains("mekanik") || tag.contains("mechanical");
            }
        }

        informed.then_some(methods)
    }
}

/// Count field that tolerates catalog noise: a number or a numeric string,
/// anything else reads as absent
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn count_from_value(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(count).ok()
}

/// Detection capability derived from a device profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionMethods {
    pub magnetic: bool,
    pub optical: bool,
    pub mechanical: bool,
}

impl DetectionMethods {
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.magnetic {
            labels.push("manyetik");
        }
        if self.mechanical {
            labels.push("mekanik");
        }
        if self.optical {
            labels.push("optik");
        }
        labels
    }
}

/// Barcode reader capabilities of a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBarcode {
    #[serde(default, alias = "numune", skip_serializing_if = "Option::is_none")]
    pub sample: Option<bool>,

    #[serde(default, alias = "reaktif", skip_serializing_if = "Option::is_none")]
    pub reagent: Option<bool>,

    #[serde(default, alias = "dahili", skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

static UNSUPPORTED: TestSupport = TestSupport::Unsupported;

/// Whether (and how) a device runs a test.
///
/// Catalog files write this as `true`, `false` or a method tag string such
/// as `"manyetik"`. `null` and any other value count as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTestSupport", into = "RawTestSupport")]
pub enum TestSupport {
    Unsupported,
    SupportedGeneric,
    SupportedWithMethod(String),
}

impl TestSupport {
    pub fn is_supported(&self) -> bool {
        !matches!(self, TestSupport::Unsupported)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTestSupport {
    Null,
    Flag(bool),
    Method(String),
    Other(Value),
}

impl From<RawTestSupport> for TestSupport {
    fn from(raw: RawTestSupport) -> Self {
        match raw {
            RawTestSupport::Flag(true) => TestSupport::SupportedGeneric,
            RawTestSupport::Method(tag) => TestSupport::SupportedWithMethod(tag),
            RawTestSupport::Flag(false) | RawTestSupport::Null | RawTestSupport::Other(_) => {
                TestSupport::Unsupported
            }
        }
    }
}

impl From<TestSupport> for RawTestSupport {
    fn from(support: TestSupport) -> Self {
        match support {
            TestSupport::Unsupported => RawTestSupport::Flag(false),
            TestSupport::SupportedGeneric => RawTestSupport::Flag(true),
            TestSupport::SupportedWithMethod(tag) => RawTestSupport::Method(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF8300: &str = r#"{
        "kanal_toplam": 4,
        "prob_sayisi": 2,
        "barkod": { "numune": true, "reaktif": false },
        "testler": { "PT": "manyetik", "APTT": "manyetik", "D-Dimer": "optik", "Faktor": false }
    }"#;

    #[test]
    fn test_parse_turkish_keys() {
        let device: DeviceCapabilityRecord = serde_json::from_str(SF8300).unwrap();
        assert_eq!(device.channels_total, Some(4));
        assert_eq!(device.probe_count, Some(2));
        let barcode = device.barcode.unwrap();
        assert_eq!(barcode.sample, Some(true));
        assert_eq!(barcode.reagent, Some(false));
        assert_eq!(barcode.internal, None);
        assert_eq!(device.speed_tests_per_hour, None);
    }

    #[test]
    fn test_test_support_variants() {
        let device: DeviceCapabilityRecord = serde_json::from_str(SF8300).unwrap();
        assert_eq!(
            device.test_support(TestName::Pt),
            Some(&TestSupport::SupportedWithMethod("manyetik".to_string()))
        );
        assert_eq!(device.test_support(TestName::Factor), Some(&TestSupport::Unsupported));
        // Listed nowhere in a published list
        assert_eq!(device.test_support(TestName::Fibrinogen), Some(&TestSupport::Unsupported));

        let bare = DeviceCapabilityRecord::default();
        assert_eq!(bare.test_support(TestName::Pt), None);
    }

    #[test]
    fn test_detection_methods_from_tests() {
        let device: DeviceCapabilityRecord = serde_json::from_str(SF8300).unwrap();
        let methods = device.detection_methods().unwrap();
        assert!(methods.magnetic);
        assert!(methods.optical);
        assert!(!methods.mechanical);
    }

    #[test]
    fn test_detection_methods_unknown_for_boolean_only_tests() {
        let device: DeviceCapabilityRecord =
            serde_json::from_str(r#"{ "testler": { "PT": true, "APTT": true } }"#).unwrap();
        assert_eq!(device.detection_methods(), None);
    }

    #[test]
    fn test_lenient_counts() {
        let device: DeviceCapabilityRecord = serde_json::from_str(
            r#"{
                "kanal_toplam": "4",
                "prob_sayisi": null,
                "hiz_test_saat": "yaklasik 100",
                "kanal_optik": 2.0,
                "kanal_manyetik": -1,
                "inkubasyon_pozisyon": [8]
            }"#,
        )
        .unwrap();
        assert_eq!(device.channels_total, Some(4));
        assert_eq!(device.channels_optical, Some(2));
        assert_eq!(device.probe_count, None);
        assert_eq!(device.speed_tests_per_hour, None);
        assert_eq!(device.channels_magnetic, None);
        assert_eq!(device.incubation_positions, None);
    }

    #[test]
    fn test_null_and_odd_test_entries_are_unsupported() {
        let device: DeviceCapabilityRecord =
            serde_json::from_str(r#"{ "testler": { "PT": null, "APTT": 1, "Fibrinojen": true } }"#)
                .unwrap();
        assert_eq!(device.test_support(TestName::Pt), Some(&TestSupport::Unsupported));
        assert_eq!(device.test_support(TestName::Aptt), Some(&TestSupport::Unsupported));
        assert_eq!(device.supported_test_names(), vec!["Fibrinojen"]);
    }

    #[test]
    fn test_supported_round_trip_shape() {
        let json = serde_json::to_string(&TestSupport::SupportedGeneric).unwrap();
        assert_eq!(json, "true");
        let json = serde_json::to_string(&TestSupport::SupportedWithMethod("optik".into())).unwrap();
        assert_eq!(json, r#""optik""#);
    }
}
