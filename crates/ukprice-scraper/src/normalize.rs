//! Converts Store API products into the engine's [`RawListing`] shape.
//!
//! This is the only place wire-format quirks are handled: minor-unit price
//! decoding, HTML entities in names, accessory listings that share catalog
//! vocabulary (a "Cohiba humidor" is not a box of cigars), and the mapping of
//! variation attributes to per-pack-size prices.

use std::collections::BTreeMap;

use ukprice_core::RawListing;
use ukprice_engine::extract_pack_size;

use crate::types::StoreProduct;

/// Listings whose names contain any of these are accessories, not cigars.
const ACCESSORY_WORDS: [&str; 8] = [
    "humidor", "ashtray", "cutter", "lighter", "case", "holder", "pouch", "sampler",
];

/// Decodes a minor-unit price string into decimal text: `"135500"` at
/// 2 minor-unit digits becomes `"1355.00"`. Returns `None` for non-numeric
/// input.
#[must_use]
pub fn format_minor_units(price: &str, minor_unit: u32) -> Option<String> {
    let trimmed = price.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = minor_unit as usize;
    if digits == 0 {
        return Some(trimmed.to_string());
    }
    let padded = format!("{trimmed:0>width$}", width = digits + 1);
    let split = padded.len() - digits;
    Some(format!("{}.{}", &padded[..split], &padded[split..]))
}

/// Minimal entity decoding for the handful WooCommerce emits in names.
fn decode_entities(name: &str) -> String {
    name.replace("&amp;", "&")
        .replace("&#039;", "'")
        .replace("&#8211;", "-")
}

fn is_accessory(name: &str) -> bool {
    let lower = name.to_lowercase();
    ACCESSORY_WORDS.iter().any(|w| lower.contains(w))
}

/// Converts one wire product into a [`RawListing`], or `None` when the
/// product is not a priceable cigar listing.
///
/// Drops accessories and non-GBP products. When variation attributes name
/// exactly one pack size the price is attributed to it; with several pack
/// sizes the "from" price belongs to the smallest, and the other sizes stay
/// unpriced rather than inheriting a price that is not theirs.
#[must_use]
pub fn listing_from_product(product: &StoreProduct, source_id: &str) -> Option<RawListing> {
    if is_accessory(&product.name) {
        tracing::trace!(name = %product.name, "skipping accessory listing");
        return None;
    }

    if let Some(code) = &product.prices.currency_code {
        if code != "GBP" {
            tracing::debug!(name = %product.name, currency = %code, "skipping non-GBP listing");
            return None;
        }
    }

    let price_text = format_minor_units(&product.prices.price, product.prices.currency_minor_unit)?;

    let mut pack_sizes: Vec<u32> = product
        .variations
        .iter()
        .flat_map(|v| v.attributes.iter())
        .filter_map(|a| extract_pack_size(&a.value))
        .collect();
    pack_sizes.sort_unstable();
    pack_sizes.dedup();

    // A "from" price on a variable product is only trustworthy for the
    // cheapest option, which is the smallest pack.
    let mut price_by_pack_size = BTreeMap::new();
    if let Some(&smallest) = pack_sizes.first() {
        price_by_pack_size.insert(smallest, price_text.clone());
    }

    Some(RawListing {
        title: decode_entities(&product.name),
        price_text: Some(price_text),
        price_by_pack_size,
        source_id: source_id.to_string(),
        url: product.permalink.clone(),
        availability: product.is_in_stock,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
