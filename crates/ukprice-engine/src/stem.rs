//! Plural/singular stemming and known alternate spellings.
//!
//! Retailers disagree on plurals ("Lusitania" vs "Lusitanias") and on the
//! spelling of a few vitola names; equality tests go through this module so
//! one canonical form wins.

/// Pairs of alternate spellings seen in the wild for specific catalog
/// vocabulary. Both directions are accepted.
const SPELLING_VARIANTS: [(&str, &str); 1] = [("esmerelda", "esmeralda")];

/// Minimum word length before the loose substring rule applies.
const SUBSTRING_MIN_LEN: usize = 4;

/// Derives a stem by removing a trailing `"s"` (words longer than 3) or
/// `"es"` (words longer than 4). Lowercases and trims first.
#[must_use]
pub fn stem(word: &str) -> String {
    let w = word.trim().to_lowercase();
    if w.ends_with('s') && w.len() > 3 {
        return w[..w.len() - 1].to_string();
    }
    if w.ends_with("es") && w.len() > 4 {
        return w[..w.len() - 2].to_string();
    }
    w
}

/// Returns the accepted spellings of a word: itself, any table alternates,
/// and its stem when distinct.
#[must_use]
pub fn spelling_variants(word: &str) -> Vec<String> {
    let w = word.trim().to_lowercase();
    let mut variants = vec![w.clone()];

    for (a, b) in SPELLING_VARIANTS {
        if w.contains(a) {
            variants.push(w.replace(a, b));
        }
        if w.contains(b) {
            variants.push(w.replace(b, a));
        }
    }

    let stemmed = stem(&w);
    if stemmed != w {
        variants.push(stemmed);
    }

    variants.sort();
    variants.dedup();
    variants
}

/// Decides whether two words denote the same catalog vocabulary.
///
/// True when the words are identical, share a stem, share a spelling-variant
/// table entry, or one is a substring of the other with both longer than
/// [`SUBSTRING_MIN_LEN`]. The substring rule is intentionally loose and is
/// the engine's main source of false positives.
#[must_use]
pub fn words_match(a: &str, b: &str) -> bool {
    let w1 = a.trim().to_lowercase();
    let w2 = b.trim().to_lowercase();

    if w1 == w2 {
        return true;
    }
    if stem(&w1) == stem(&w2) {
        return true;
    }

    let v1 = spelling_variants(&w1);
    let v2 = spelling_variants(&w2);
    if v1.iter().any(|v| v2.contains(v)) {
        return true;
    }

    if w1.len() > SUBSTRING_MIN_LEN && w2.len() > SUBSTRING_MIN_LEN {
        return w1.contains(&w2) || w2.contains(&w1);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_trailing_s() {
        assert_eq!(stem("Lusitanias"), "lusitania");
        assert_eq!(stem("leyendas"), "leyenda");
    }

    #[test]
    fn stem_leaves_short_words_alone() {
        assert_eq!(stem("gas"), "gas");
        assert_eq!(stem("vi"), "vi");
    }

    #[test]
    fn variants_include_table_alternates() {
        let variants = spelling_variants("Esmerelda");
        assert!(variants.contains(&"esmeralda".to_string()));
        assert!(variants.contains(&"esmerelda".to_string()));
    }

    #[test]
    fn variants_include_stem() {
        let variants = spelling_variants("destinos");
        assert!(variants.contains(&"destino".to_string()));
    }

    #[test]
    fn words_match_identical() {
        assert!(words_match("siglo", "Siglo"));
    }

    #[test]
    fn words_match_plural_singular() {
        assert!(words_match("lusitania", "lusitanias"));
    }

    #[test]
    fn words_match_spelling_table() {
        assert!(words_match("esmerelda", "esmeralda"));
    }

    #[test]
    fn words_match_substring_when_both_long() {
        assert!(words_match("esplendido", "esplendidos"));
        assert!(words_match("monterrey", "monterreys"));
    }

    #[test]
    fn words_match_rejects_short_substring() {
        // Both must exceed the minimum length for the loose rule.
        assert!(!words_match("oro", "corona"));
    }

    #[test]
    fn words_match_rejects_unrelated() {
        assert!(!words_match("siglo", "behike"));
    }
}
