use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One retail source the scraper queries for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier used in observations and output files, e.g. `"cgars"`.
    pub id: String,
    /// Human-readable name, e.g. `"C.Gars Ltd"`.
    pub name: String,
    /// Store root, e.g. `"https://www.havanahouse.co.uk"`.
    pub base_url: String,
    /// Listings priced below this are ignored; filters out accessories and
    /// single sticks when pricing boxes.
    pub min_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the source list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, if any id or
/// base URL is empty or duplicated, or if a base URL lacks an http(s) scheme.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;
    validate_sources(&sources_file)?;
    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for source in &sources_file.sources {
        if source.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(source.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source id: '{}'",
                source.id
            )));
        }
        if !source.base_url.starts_with("http://") && !source.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "source '{}' base_url '{}' must start with http:// or https://",
                source.id, source.base_url
            )));
        }
        if let Some(min_price) = source.min_price {
            if min_price <= Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "source '{}' min_price must be positive",
                    source.id
                )));
            }
        }
    }

    Ok(())
}
