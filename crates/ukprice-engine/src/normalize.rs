//! Title and name normalization.
//!
//! Listing titles arrive in every format retailers can invent; normalization
//! reduces them to a lowercase token stream with pack-size phrasing removed,
//! so the matcher compares product words against product words.

use std::sync::OnceLock;

use regex::Regex;

fn pack_phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:box|cabinet|pack)\s*(?:of\s*)?\d+|\(\d+\)")
            .expect("valid pack phrase regex")
    })
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"))
}

/// Normalizes a listing title or catalog name for matching.
///
/// Lowercases, removes pack-size phrases (`"box of 25"`, `"cabinet of 10"`,
/// `"pack of 3"`, `"(25)"`), replaces punctuation with spaces, collapses
/// whitespace runs, and trims. Total: empty input yields empty output.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let depacked = pack_phrase_re().replace_all(&lower, " ");
    let depunct = punctuation_re().replace_all(&depacked, " ");
    depunct.split_whitespace().collect::<Vec<_>>().join(" ")
}
