//! Preconditions on document text.
//!
//! The document-text supplier signals a failed extraction (scanned PDF,
//! unreadable file) with an empty or whitespace-only string. That is a hard
//! stop before extraction runs, as is text above the configured size limit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits applied to incoming document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum input size in bytes (default: 5MB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_max_input_bytes() -> u64 {
    5 * 1024 * 1024
} // 5MB

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl InputLimits {
    /// Validate raw document text before extraction
    pub fn validate_input(&self, input: &str) -> Result<(), InputViolation> {
        let size = input.len() as u64;
        if size > self.max_input_bytes {
            return Err(InputViolation::MaxInputBytes {
                actual: size,
                limit: self.max_input_bytes,
            });
        }

        if input.trim().is_empty() {
            return Err(InputViolation::EmptyText);
        }

        Ok(())
    }
}

/// Input precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputViolation {
    #[error("Metin çıkarılamadı: belge boş veya taranmış olabilir (OCR gerekebilir)")]
    EmptyText,

    #[error("Maximum input bytes exceeded: {actual} > {limit}")]
    MaxInputBytes { actual: u64, limit: u64 },
}
