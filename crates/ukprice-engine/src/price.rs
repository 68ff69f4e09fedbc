//! Price text parsing.
//!
//! Retail price strings arrive as anything from `"£1,355.00"` to
//! `"£100.00 → £75.00"` to a bare minor-unit digit run. Parsing always
//! degrades to "no price" rather than failing; the caller treats `None` as
//! the absence of an observation.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Tokens separating an original price from a current/sale price. The text
/// after the last separator wins.
const SALE_SEPARATORS: [&str; 2] = ["→", "->"];

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d{2})?").expect("valid amount regex"))
}

/// Parses noisy currency text into a positive decimal amount.
///
/// Steps: keep only the text after the last was/now separator (sale price
/// wins), strip currency symbols and whitespace, decode "pence-appended"
/// digit runs (four or more digits with no decimal point get a point two
/// digits from the end), drop thousands separators, and parse the last
/// amount-shaped token.
///
/// Returns `None` for empty, non-numeric, or non-positive input.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let mut text = raw.trim();
    if text.is_empty() {
        return None;
    }

    for sep in SALE_SEPARATORS {
        if let Some(idx) = text.rfind(sep) {
            text = &text[idx + sep.len()..];
        }
    }

    let mut clean: String = text
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | '€') && !c.is_whitespace())
        .collect();

    // A bare digit run like "1355" is almost always pence-appended ("13.55");
    // genuine four-figure prices carry a thousands separator or decimals.
    if clean.len() >= 4 && clean.bytes().all(|b| b.is_ascii_digit()) {
        clean.insert(clean.len() - 2, '.');
    }

    let clean = clean.replace(',', "");

    let amount = amount_re().find_iter(&clean).last()?;
    let value: Decimal = amount.as_str().parse().ok()?;
    (value > Decimal::ZERO).then_some(value)
}
