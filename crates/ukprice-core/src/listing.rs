use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A product listing exactly as the retrieval layer observed it.
///
/// Read-only to the matching core: the engine decides whether the `title`
/// denotes a catalog item but never mutates the listing. Either `price_text`
/// carries one free-text price, or `price_by_pack_size` maps pack sizes to
/// price text for listings that expose multiple purchase options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    #[serde(default)]
    pub price_text: Option<String>,
    /// Structured per-pack-size prices, e.g. `{10: "£355.00", 25: "£870.00"}`.
    /// Empty when the listing only exposes a single price.
    #[serde(default)]
    pub price_by_pack_size: BTreeMap<u32, String>,
    pub source_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_availability")]
    pub availability: bool,
}

fn default_availability() -> bool {
    true
}

impl RawListing {
    /// Builds a listing with a single free-text price and default availability.
    #[must_use]
    pub fn with_price_text(title: &str, price_text: &str, source_id: &str) -> Self {
        Self {
            title: title.to_string(),
            price_text: Some(price_text.to_string()),
            price_by_pack_size: BTreeMap::new(),
            source_id: source_id.to_string(),
            url: None,
            availability: true,
        }
    }

    /// Returns the price text to use for the given pack size: the structured
    /// entry when one exists, otherwise the free-text price.
    ///
    /// When the listing exposes structured pack options but none for
    /// `pack_size`, returns `None` — the free-text price belongs to a
    /// different pack and must not be attributed to this one.
    #[must_use]
    pub fn price_text_for_pack(&self, pack_size: u32) -> Option<&str> {
        if self.price_by_pack_size.is_empty() {
            self.price_text.as_deref()
        } else {
            self.price_by_pack_size.get(&pack_size).map(String::as_str)
        }
    }
}
