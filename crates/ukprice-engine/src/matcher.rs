//! The listing-title matcher.
//!
//! Decides whether a scraped listing title denotes a given catalog item at a
//! given pack size. The decision is an ordered list of named rules evaluated
//! short-circuit; the first failing rule supplies the rejection reason, so
//! reasons are reproducible across runs. New rules are added to [`RULES`] by
//! composition rather than by forking the matcher.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::identifiers::{
    extract_pack_size, numeric_conflict, numeric_identifiers, roman_compatible, roman_numerals,
};
use crate::normalize::normalize;
use crate::stem::words_match;

/// Tuning knobs for the matcher. Defaults mirror long-observed behavior.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Maximum absolute distance at which a different numeric identifier in
    /// the candidate counts as a conflict (rejects 52 vs 56).
    pub numeric_distance: u32,
    /// Item-name tokens must exceed this length to count as keywords.
    pub keyword_min_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            numeric_distance: 10,
            keyword_min_len: 3,
        }
    }
}

/// Why a listing was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    BrandAbsent,
    RomanNumeralMismatch,
    NumericIdentifierConflict,
    PackSizeMismatch,
    InsufficientKeywordOverlap,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectReason::BrandAbsent => "brand-absent",
            RejectReason::RomanNumeralMismatch => "roman-numeral-mismatch",
            RejectReason::NumericIdentifierConflict => "numeric-identifier-conflict",
            RejectReason::PackSizeMismatch => "pack-size-mismatch",
            RejectReason::InsufficientKeywordOverlap => "insufficient-keyword-overlap",
        };
        write!(f, "{s}")
    }
}

/// Outcome of matching one listing title against one catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDecision {
    pub matched: bool,
    /// On a match: the pack size this listing was judged to refer to — the
    /// detected size, or the requested size when the title left it
    /// undetermined.
    pub resolved_pack_size: Option<u32>,
    pub reason: Option<RejectReason>,
}

impl MatchDecision {
    fn accepted(resolved_pack_size: u32) -> Self {
        Self {
            matched: true,
            resolved_pack_size: Some(resolved_pack_size),
            reason: None,
        }
    }

    fn rejected(reason: RejectReason) -> Self {
        Self {
            matched: false,
            resolved_pack_size: None,
            reason: Some(reason),
        }
    }
}

/// Everything a rule needs, computed once per match call.
struct MatchContext<'a> {
    norm_title: String,
    norm_brand: String,
    norm_name: String,
    pack_size: u32,
    detected_pack_size: Option<u32>,
    target_roman: BTreeSet<String>,
    candidate_roman: BTreeSet<String>,
    target_numbers: BTreeSet<u32>,
    candidate_numbers: BTreeSet<u32>,
    config: &'a MatcherConfig,
}

type Rule = (&'static str, fn(&MatchContext<'_>) -> Option<RejectReason>);

/// Ordered rule list. Order matters: the first failure names the reason.
static RULES: &[Rule] = &[
    ("brand", check_brand),
    ("roman-numerals", check_roman),
    ("numeric-identifiers", check_numbers),
    ("pack-size", check_pack_size),
    ("keyword-overlap", check_keywords),
];

fn check_brand(ctx: &MatchContext<'_>) -> Option<RejectReason> {
    match ctx.norm_brand.split_whitespace().next() {
        Some(first) if ctx.norm_title.contains(first) => None,
        // A blank brand can never be confirmed present; reject rather than
        // risk a false positive.
        _ => Some(RejectReason::BrandAbsent),
    }
}

fn check_roman(ctx: &MatchContext<'_>) -> Option<RejectReason> {
    if roman_compatible(&ctx.target_roman, &ctx.candidate_roman) {
        None
    } else {
        Some(RejectReason::RomanNumeralMismatch)
    }
}

fn check_numbers(ctx: &MatchContext<'_>) -> Option<RejectReason> {
    if numeric_conflict(
        &ctx.target_numbers,
        &ctx.candidate_numbers,
        ctx.config.numeric_distance,
    ) {
        Some(RejectReason::NumericIdentifierConflict)
    } else {
        None
    }
}

fn check_pack_size(ctx: &MatchContext<'_>) -> Option<RejectReason> {
    match ctx.detected_pack_size {
        Some(detected) if detected != ctx.pack_size => Some(RejectReason::PackSizeMismatch),
        // Undetermined is not a rejection; the caller must still verify the
        // pack size against a structured price field when one exists.
        _ => None,
    }
}

fn check_keywords(ctx: &MatchContext<'_>) -> Option<RejectReason> {
    let name_words: Vec<&str> = ctx
        .norm_name
        .split_whitespace()
        .filter(|w| w.len() > ctx.config.keyword_min_len)
        .collect();
    if name_words.is_empty() {
        return None;
    }

    let title_words: Vec<&str> = ctx.norm_title.split_whitespace().collect();
    let has_equivalent =
        |nw: &&str| title_words.iter().any(|tw| words_match(nw, tw));

    // Short names carry little redundancy: with two or fewer significant
    // tokens every one of them must be present, otherwise one is enough.
    let ok = if name_words.len() <= 2 {
        name_words.iter().all(has_equivalent)
    } else {
        name_words.iter().any(has_equivalent)
    };

    if ok {
        None
    } else {
        Some(RejectReason::InsufficientKeywordOverlap)
    }
}

/// Decides whether `title` denotes the catalog item `(brand, name)` at
/// `pack_size`.
///
/// Total, deterministic, and side-effect free: malformed text degrades to
/// "no identifiers found", never to an error. Rules run in [`RULES`] order
/// and short-circuit on the first failure.
#[must_use]
pub fn match_listing(
    title: &str,
    brand: &str,
    name: &str,
    pack_size: u32,
    config: &MatcherConfig,
) -> MatchDecision {
    let norm_title = normalize(title);
    let norm_name = normalize(name);
    let detected_pack_size = extract_pack_size(title);

    let ctx = MatchContext {
        target_roman: roman_numerals(&norm_name),
        candidate_roman: roman_numerals(&norm_title),
        target_numbers: numeric_identifiers(&norm_name),
        candidate_numbers: numeric_identifiers(&norm_title),
        norm_title,
        norm_brand: normalize(brand),
        norm_name,
        pack_size,
        detected_pack_size,
        config,
    };

    for (rule_name, rule) in RULES {
        if let Some(reason) = rule(&ctx) {
            tracing::trace!(rule = rule_name, %reason, title, "listing rejected");
            return MatchDecision::rejected(reason);
        }
    }

    MatchDecision::accepted(ctx.detected_pack_size.unwrap_or(pack_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(title: &str, brand: &str, name: &str, pack_size: u32) -> MatchDecision {
        match_listing(title, brand, name, pack_size, &MatcherConfig::default())
    }

    #[test]
    fn accepts_exact_listing_with_box_size() {
        let decision = decide("Cohiba Siglo VI Box of 25", "Cohiba", "Siglo VI", 25);
        assert!(decision.matched);
        assert_eq!(decision.resolved_pack_size, Some(25));
        assert!(decision.reason.is_none());
    }

    #[test]
    fn rejects_roman_numeral_mismatch() {
        let decision = decide("Cohiba Siglo I Box of 25", "Cohiba", "Siglo VI", 25);
        assert!(!decision.matched);
        assert_eq!(decision.reason, Some(RejectReason::RomanNumeralMismatch));
    }

    #[test]
    fn rejects_numeric_identifier_conflict() {
        let decision = decide("Cohiba Behike 52 Box of 10", "Cohiba", "Behike 56", 10);
        assert!(!decision.matched);
        assert_eq!(
            decision.reason,
            Some(RejectReason::NumericIdentifierConflict)
        );
    }

    #[test]
    fn rejects_missing_brand() {
        let decision = decide("Montecristo No.2 Box of 25", "Cohiba", "Siglo VI", 25);
        assert!(!decision.matched);
        assert_eq!(decision.reason, Some(RejectReason::BrandAbsent));
    }

    #[test]
    fn brand_check_uses_first_brand_word() {
        let decision = decide(
            "Hoyo Epicure No.2 Box of 25",
            "Hoyo de Monterrey",
            "Epicure No 2",
            25,
        );
        assert!(decision.matched);
    }

    #[test]
    fn rejects_pack_size_mismatch() {
        let decision = decide("Cohiba Siglo VI Box of 10", "Cohiba", "Siglo VI", 25);
        assert!(!decision.matched);
        assert_eq!(decision.reason, Some(RejectReason::PackSizeMismatch));
    }

    #[test]
    fn undetermined_pack_size_resolves_to_requested() {
        let decision = decide("Cohiba Siglo VI", "Cohiba", "Siglo VI", 25);
        assert!(decision.matched);
        assert_eq!(decision.resolved_pack_size, Some(25));
    }

    #[test]
    fn rejects_insufficient_keyword_overlap() {
        let decision = decide("Cohiba Esplendidos Box of 25", "Cohiba", "Robusto Reserva", 25);
        assert!(!decision.matched);
        assert_eq!(
            decision.reason,
            Some(RejectReason::InsufficientKeywordOverlap)
        );
    }

    #[test]
    fn keyword_overlap_accepts_plural_variant() {
        let decision = decide("Partagas Lusitania Box of 10", "Partagas", "Lusitanias", 10);
        assert!(decision.matched);
    }

    #[test]
    fn short_names_require_all_keywords() {
        // "Double Corona" has two significant tokens; both must appear.
        let decision = decide(
            "Hoyo de Monterrey Double Box of 25",
            "Hoyo de Monterrey",
            "Double Coronas",
            25,
        );
        assert!(!decision.matched);
        assert_eq!(
            decision.reason,
            Some(RejectReason::InsufficientKeywordOverlap)
        );
    }

    #[test]
    fn rule_order_reports_roman_before_keywords() {
        // Fails both roman and keyword checks; the roman rule runs first.
        let decision = decide("Cohiba Siglo I", "Cohiba", "Esplendidos VI", 25);
        assert_eq!(decision.reason, Some(RejectReason::RomanNumeralMismatch));
    }

    #[test]
    fn deterministic_across_calls() {
        let a = decide("Cohiba Siglo VI Box of 25", "Cohiba", "Siglo VI", 25);
        let b = decide("Cohiba Siglo VI Box of 25", "Cohiba", "Siglo VI", 25);
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_text_degrades_to_no_identifiers() {
        let decision = decide("£$%^&*", "Cohiba", "Siglo VI", 25);
        assert!(!decision.matched);
        assert_eq!(decision.reason, Some(RejectReason::BrandAbsent));
    }

    #[test]
    fn reject_reason_serializes_as_kebab_case() {
        let json = serde_json::to_string(&RejectReason::NumericIdentifierConflict).unwrap();
        assert_eq!(json, "\"numeric-identifier-conflict\"");
        assert_eq!(
            json.trim_matches('"'),
            RejectReason::NumericIdentifierConflict.to_string()
        );
    }

    #[test]
    fn empty_brand_never_matches_reason_is_brand() {
        let decision = decide("Cohiba Siglo VI", "", "Siglo VI", 25);
        assert!(!decision.matched);
        assert_eq!(decision.reason, Some(RejectReason::BrandAbsent));
    }
}
