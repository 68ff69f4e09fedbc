//! WooCommerce Store API response types for `GET /wp-json/wc/store/v1/products`.
//!
//! ## Observed shape from live WooCommerce stores
//!
//! ### `prices.price`
//! A string of **minor units** (pence), not a decimal: `"135500"` with
//! `currency_minor_unit: 2` means £1,355.00. `regular_price` and `sale_price`
//! follow the same convention; `price` already reflects any active sale.
//!
//! ### `is_in_stock`
//! Boolean; may be absent on older store versions. We default to `true`
//! (optimistic) when missing.
//!
//! ### `variations`
//! Present for variable products. Each variation carries an attribute list
//! like `[{"name": "Pack", "value": "Box of 25"}]` but **no prices**; the
//! top-level `prices.price` is the cheapest variation ("from" price). The
//! attribute values are the only structured pack-size signal available.

use serde::Deserialize;

/// A single product from the Store API search response. The endpoint returns
/// a bare JSON array, not a wrapper object.
#[derive(Debug, Deserialize)]
pub struct StoreProduct {
    /// WooCommerce numeric product ID.
    pub id: i64,

    /// Display name, HTML-entity-encoded by some stores.
    pub name: String,

    /// Canonical product page URL.
    #[serde(default)]
    pub permalink: Option<String>,

    pub prices: StorePrices,

    /// Defaults to `true` when absent.
    #[serde(default = "default_in_stock")]
    pub is_in_stock: bool,

    /// Variations of a variable product; empty for simple products.
    #[serde(default)]
    pub variations: Vec<StoreVariation>,
}

/// Price block of a [`StoreProduct`].
#[derive(Debug, Deserialize)]
pub struct StorePrices {
    /// Current price in minor units, e.g. `"135500"` for £1,355.00.
    pub price: String,

    /// Number of minor-unit digits; `2` for GBP.
    #[serde(default = "default_minor_unit")]
    pub currency_minor_unit: u32,

    /// ISO currency code, e.g. `"GBP"`.
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// One variation of a variable product.
#[derive(Debug, Deserialize)]
pub struct StoreVariation {
    pub id: i64,

    #[serde(default)]
    pub attributes: Vec<StoreAttribute>,
}

/// A name/value attribute on a variation, e.g. `Pack` / `Box of 25`.
#[derive(Debug, Deserialize)]
pub struct StoreAttribute {
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
}

/// Default for `StoreProduct::is_in_stock` when the field is absent.
///
/// This cannot be a `const`: serde's `default = "..."` attribute expects a
/// function path to call for each missing field.
fn default_in_stock() -> bool {
    true
}

fn default_minor_unit() -> u32 {
    2
}
