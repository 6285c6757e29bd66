//! Input Limits Integration Tests
//!
//! Tests for the document-text preconditions checked before extraction.

use ihalebind::core::{ComplianceEngine, InputLimits, InputViolation};
use ihalebind::extract::ExtractorSettings;

#[test]
fn test_max_input_bytes() {
    let limits = InputLimits {
        max_input_bytes: 100,
    };

    // Input within limits
    let small_input = "x".repeat(50);
    assert!(limits.validate_input(&small_input).is_ok());

    // Input at exact limit
    let exact_input = "x".repeat(100);
    assert!(limits.validate_input(&exact_input).is_ok());

    // Input exceeding limit
    let large_input = "x".repeat(200);
    match limits.validate_input(&large_input) {
        Err(InputViolation::MaxInputBytes { actual, limit }) => {
            assert_eq!(actual, 200);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected MaxInputBytes violation, got {:?}", other),
    }
}

#[test]
fn test_empty_text_is_hard_stop() {
    let engine = ComplianceEngine::default();

    for input in ["", "   ", "\n\n\t\r\n"] {
        let result = engine.prepare(input, None);
        assert!(matches!(result, Err(InputViolation::EmptyText)));
    }
}

#[test]
fn test_empty_text_message() {
    let message = InputViolation::EmptyText.to_string();
    assert!(message.starts_with("Metin çıkarılamadı"));
}

#[test]
fn test_engine_uses_configured_limit() {
    let engine = ComplianceEngine::new(
        ExtractorSettings::default(),
        InputLimits {
            max_input_bytes: 10,
        },
    );

    assert!(engine.prepare("en az 4 kanal", None).is_err());
    assert!(engine.prepare("4 kanal", None).is_ok());
}
