use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One matched, parsed price from a single source for a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObservation {
    pub source_id: String,
    /// Strictly positive; callers must not construct zero/negative observations.
    pub price: Decimal,
    /// The listing title that produced the match, kept for the audit trail.
    pub listing_title: String,
}

/// Which algorithmic path produced a final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileMethod {
    SingleSource,
    Averaged,
    AveragedFiltered,
    Median,
    Lowest,
}

impl std::fmt::Display for ReconcileMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileMethod::SingleSource => write!(f, "single-source"),
            ReconcileMethod::Averaged => write!(f, "averaged"),
            ReconcileMethod::AveragedFiltered => write!(f, "averaged-filtered"),
            ReconcileMethod::Median => write!(f, "median"),
            ReconcileMethod::Lowest => write!(f, "lowest"),
        }
    }
}

/// Final reconciled price for one catalog item.
///
/// `final_price = None` means "not found" — a normal outcome distinguishable
/// from a zero price, which never occurs. `excluded_sources` lists sources
/// whose observations were discarded as outliers; retained so callers can
/// audit why a source did not contribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledPrice {
    pub item_key: String,
    pub final_price: Option<Decimal>,
    pub method: Option<ReconcileMethod>,
    pub contributing_sources: Vec<String>,
    #[serde(default)]
    pub excluded_sources: Vec<String>,
}

impl ReconciledPrice {
    /// A "not found" result: no price, no method, no sources.
    #[must_use]
    pub fn not_found(item_key: &str) -> Self {
        Self {
            item_key: item_key.to_string(),
            final_price: None,
            method: None,
            contributing_sources: Vec::new(),
            excluded_sources: Vec::new(),
        }
    }

    /// Returns `true` when a final price was produced.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.final_price.is_some()
    }
}
