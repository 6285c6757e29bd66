//! Device catalog.
//!
//! A JSON file maps brand → model → tender type → capability profile:
//!
//! ```text
//! {
//!   "Succeeder": {
//!     "SF-8300": {
//!       "koagulasyon": { "kanal_toplam": 4, "prob_sayisi": 2, ... }
//!     }
//!   }
//! }
//! ```
//!
//! Only the coagulation profile (`koagulasyon`, alias `coagulation`) is
//! read. The catalog is loaded once and passed by reference; it is never
//! mutated during an evaluation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::domain::DeviceCapabilityRecord;

/// Errors that can occur loading or querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown brand: {0}")]
    UnknownBrand(String),

    #[error("Unknown model: {brand} {model}")]
    UnknownModel { brand: String, model: String },
}

/// Per-model entry; other tender types in the file are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogModel {
    #[serde(default, alias = "coagulation")]
    pub koagulasyon: DeviceCapabilityRecord,
}

/// Brand → model → capability profile
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    brands: BTreeMap<String, BTreeMap<String, DeviceCapabilityRecord>>,
}

impl DeviceCatalog {
    /// Load the catalog from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            brands = catalog.brands.len(),
            models = catalog.len(),
            "Device catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, CatalogModel>> = serde_json::from_str(content)?;
        let brands = raw
            .into_iter()
            .map(|(brand, models)| {
                let models = models
                    .into_iter()
                    .map(|(model, entry)| (model, entry.koagulasyon))
                    .collect();
                (brand, models)
            })
            .collect();
        Ok(Self { brands })
    }

    /// Brand names in sorted order
    pub fn brands(&self) -> Vec<&str> {
        self.brands.keys().map(String::as_str).collect()
    }

    /// Model names of a brand in sorted order
    pub fn models(&self, brand: &str) -> Result<Vec<&str>, CatalogError> {
        let models = self
            .brands
            .get(brand)
            .ok_or_else(|| CatalogError::UnknownBrand(brand.to_string()))?;
        Ok(models.keys().map(String::as_str).collect())
    }

    pub fn get(&self, brand: &str, model: &str) -> Result<&DeviceCapabilityRecord, CatalogError> {
        let models = self
            .brands
            .get(brand)
            .ok_or_else(|| CatalogError::UnknownBrand(brand.to_string()))?;
        models.get(model).ok_or_else(|| CatalogError::UnknownModel {
            brand: brand.to_string(),
            model: model.to_string(),
        })
    }

    /// Labelled profiles of a brand, optionally restricted to some models.
    ///
    /// Labels read "<brand> <model>". Requested models keep the given order.
    pub fn devices(
        &self,
        brand: &str,
        models: Option<&[String]>,
    ) -> Result<Vec<(String, &DeviceCapabilityRecord)>, CatalogError> {
        let label = |model: &str| format!("{} {}", brand, model);
        match models {
            Some(models) => models
                .iter()
                .map(|model| -> Result<_, CatalogError> {
                    Ok((label(model.as_str()), self.get(brand, model)?))
                })
                .collect(),
            None => {
                let all = self
                    .brands
                    .get(brand)
                    .ok_or_else(|| CatalogError::UnknownBrand(brand.to_string()))?;
                Ok(all
                    .iter()
                    .map(|(model, record)| (label(model.as_str()), record))
                    .collect())
            }
        }
    }

    /// Total number of models across brands
    pub fn len(&self) -> usize {
        self.brands.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
