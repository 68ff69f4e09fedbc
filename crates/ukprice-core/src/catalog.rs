use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Smallest multi-unit pack size a catalog item may declare.
pub const PACK_SIZE_MIN: u32 = 3;
/// Largest pack size a catalog item may declare.
pub const PACK_SIZE_MAX: u32 = 50;

/// One trackable product variant: a brand, a line/vitola name, and the
/// number of units sold together. A `pack_size` of 1 denotes a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub brand: String,
    pub name: String,
    pub pack_size: u32,
}

impl CatalogItem {
    /// Identity key used throughout the pipeline and in output files,
    /// e.g. `"Cohiba|Siglo VI|25"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.brand, self.name, self.pack_size)
    }

    /// Returns `true` if `pack_size` is 1 or within the plausible box range.
    #[must_use]
    pub fn pack_size_plausible(&self) -> bool {
        self.pack_size == 1 || (PACK_SIZE_MIN..=PACK_SIZE_MAX).contains(&self.pack_size)
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub items: Vec<CatalogItem>,
}

/// Load and validate the catalog from a YAML file.
///
/// Duplicate `(brand, name, pack_size)` rows (case-insensitive) are dropped
/// with a warning so the core never sees the same item twice in one run.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty brand/name, implausible pack size).
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    validate_and_dedup(catalog)
}

fn validate_and_dedup(catalog: CatalogFile) -> Result<CatalogFile, ConfigError> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(catalog.items.len());

    for item in catalog.items {
        if item.brand.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalog item '{}' has an empty brand",
                item.key()
            )));
        }
        if item.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalog item '{}' has an empty name",
                item.key()
            )));
        }
        if !item.pack_size_plausible() {
            return Err(ConfigError::Validation(format!(
                "catalog item '{}' has implausible pack size {}; must be 1 or {PACK_SIZE_MIN}-{PACK_SIZE_MAX}",
                item.key(),
                item.pack_size
            )));
        }

        if seen.insert(item.key().to_lowercase()) {
            items.push(item);
        } else {
            tracing::warn!(key = %item.key(), "dropping duplicate catalog row");
        }
    }

    Ok(CatalogFile { items })
}
