//! Identifier extraction: Roman numerals, significant numbers, pack sizes.
//!
//! These three extractors carry most of the matching signal. Product lines
//! within a brand differ by a Roman numeral ("Siglo VI" vs "Siglo I") or a
//! ring-gauge number ("Behike 52" vs "Behike 56"), and the same line is sold
//! at several pack sizes; getting any of the three wrong prices the wrong
//! product. All functions are total and deterministic.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use ukprice_core::{PACK_SIZE_MAX, PACK_SIZE_MIN};

/// Numbers that identify nothing: plausible pack sizes and counts that show
/// up in titles without distinguishing the product line.
const NUMERIC_DENYLIST: [u32; 11] = [1, 3, 5, 8, 10, 12, 15, 18, 20, 25, 50];

fn roman_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(i{1,3}|iv|vi{0,3}|ix|x{1,3})\b").expect("valid roman numeral regex")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d+)\b").expect("valid number regex"))
}

/// Extracts the set of whole-word Roman numeral tokens (I through XXX range
/// used by cigar lines), uppercased. Case-insensitive on input.
#[must_use]
pub fn roman_numerals(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    roman_re()
        .find_iter(&lower)
        .map(|m| m.as_str().to_uppercase())
        .collect()
}

/// Two names are Roman-numeral-compatible iff either set is empty or the
/// sets are exactly equal. Subset is not sufficient: "Siglo VI" must not
/// match "Siglo I".
#[must_use]
pub fn roman_compatible(target: &BTreeSet<String>, candidate: &BTreeSet<String>) -> bool {
    target.is_empty() || candidate.is_empty() || target == candidate
}

/// Extracts significant numeric identifiers: all whole-number tokens minus
/// the pack-size/count denylist and year-like numbers (1900–2099).
#[must_use]
pub fn numeric_identifiers(text: &str) -> BTreeSet<u32> {
    number_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| !NUMERIC_DENYLIST.contains(n))
        .filter(|n| !(1900..=2099).contains(n))
        .collect()
}

/// Returns `true` if the candidate's numbers conflict with the target's.
///
/// A conflict exists when the target has identifiers and either (a) they are
/// not all present in the candidate, or (b) the candidate carries a different
/// identifier within `max_distance` of one of the target's — this rejects
/// "Behike 52" against a "Behike 56" listing even though both share the
/// "Behike" keyword.
#[must_use]
pub fn numeric_conflict(
    target: &BTreeSet<u32>,
    candidate: &BTreeSet<u32>,
    max_distance: u32,
) -> bool {
    if target.is_empty() {
        return false;
    }
    if !target.is_subset(candidate) {
        return true;
    }
    candidate
        .difference(target)
        .any(|&c| target.iter().any(|&t| c.abs_diff(t) <= max_distance))
}

fn pack_size_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"box\s*(?:of\s*)?(\d+)",
            r"cabinet\s*(?:of\s*)?(\d+)",
            r"v?slb\s*(?:of\s*)?(\d+)",
            r"pack\s*(?:of\s*)?(\d+)",
            r"\((\d+)\)",
            r"(\d+)\s*(?:cigars?|sticks?)",
            r"of\s*(\d+)\s*cuban",
            r"-\s*(\d+)\s*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid pack size regex"))
        .collect()
    })
}

/// Detects the pack size a piece of text refers to.
///
/// Tries the packaging patterns in order ("box of N", "cabinet of N",
/// "slb/vslb N", "pack of N", "(N)", "N cigars/sticks", "of N cuban",
/// trailing "- N") and returns the first captured value inside the plausible
/// box range; a bare "single" maps to 1. `None` means undetermined, which
/// the matcher treats permissively rather than as a mismatch.
#[must_use]
pub fn extract_pack_size(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    for re in pack_size_res() {
        if let Some(captures) = re.captures(&lower) {
            if let Ok(size) = captures[1].parse::<u32>() {
                if (PACK_SIZE_MIN..=PACK_SIZE_MAX).contains(&size) {
                    return Some(size);
                }
            }
        }
    }

    if lower.contains("single") {
        return Some(1);
    }

    None
}
