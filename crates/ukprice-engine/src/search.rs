//! Search term generation.
//!
//! Source search boxes are weak: too specific a query misses listings whose
//! titles abbreviate or re-order the name. The generator fans one catalog
//! item out into a short ordered list of progressively broader terms, most
//! specific first, capped so a run stays polite.

use std::sync::OnceLock;

use regex::Regex;

use crate::stem::spelling_variants;

/// Hard cap on terms per item.
const MAX_TERMS: usize = 8;

/// Vitola and line vocabulary worth searching on its own. A title that
/// contains one of these almost always names the product line.
const TYPE_KEYWORDS: [&str; 51] = [
    "siglo",
    "behike",
    "maduro",
    "esplendido",
    "lusitania",
    "lusitanias",
    "epicure",
    "robusto",
    "torpedo",
    "churchill",
    "lancero",
    "magnum",
    "corona",
    "petit",
    "double",
    "short",
    "wide",
    "especial",
    "medio",
    "reserva",
    "secretos",
    "magicos",
    "genios",
    "piramides",
    "topes",
    "coloniales",
    "prominente",
    "exquisito",
    "panatela",
    "cazadores",
    "lonsdale",
    "leyenda",
    "leyendas",
    "brillantes",
    "brillante",
    "destinos",
    "destino",
    "vistosos",
    "vistoso",
    "absolutos",
    "absoluto",
    "esmeralda",
    "esmerelda",
    "linea",
    "1935",
    "dragon",
    "extra",
    "gold",
    "medal",
    "new",
    "origen",
];

fn trailing_identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s+(i{1,3}|iv|vi{0,3}|\d+)$").expect("valid trailing identifier regex")
    })
}

fn trailing_packaging_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s+(tubos?|slb|cabinet|vslb)$").expect("valid trailing packaging regex")
    })
}

/// Generates the ordered search terms for one catalog item.
///
/// The list starts with the bare brand, then the first type keyword found in
/// the name (plus its spelling variants and a "brand keyword" pairing), the
/// name's first word, every name word longer than four characters, and
/// finally "brand name" with trailing numerals and packaging words stripped.
/// Duplicates are removed preserving order and the result is capped at eight
/// terms.
#[must_use]
pub fn generate_search_terms(brand: &str, name: &str) -> Vec<String> {
    let brand_l = brand.trim().to_lowercase();
    let name_l = name.trim().to_lowercase();

    let mut terms: Vec<String> = vec![brand_l.clone()];

    if let Some(kw) = TYPE_KEYWORDS.iter().find(|kw| name_l.contains(**kw)) {
        terms.push((*kw).to_string());
        terms.extend(spelling_variants(kw));
        terms.push(format!("{brand_l} {kw}"));
    }

    if let Some(first) = name_l.split_whitespace().next() {
        if first.len() > 2 {
            terms.push(first.to_string());
            terms.extend(spelling_variants(first));
        }
    }

    for word in name_l.split_whitespace() {
        if word.len() > 4 {
            terms.push(word.to_string());
            terms.extend(spelling_variants(word));
        }
    }

    let clean = trailing_identifier_re().replace(&name_l, "");
    let clean = trailing_packaging_re().replace(&clean, "");
    let clean = clean.trim();
    if !clean.is_empty() {
        terms.push(format!("{brand_l} {clean}"));
    }

    let mut unique = Vec::with_capacity(MAX_TERMS);
    for term in terms {
        if !term.is_empty() && !unique.contains(&term) {
            unique.push(term);
            if unique.len() == MAX_TERMS {
                break;
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_comes_first() {
        let terms = generate_search_terms("Cohiba", "Siglo VI");
        assert_eq!(terms[0], "cohiba");
    }

    #[test]
    fn type_keyword_and_pairing_are_included() {
        let terms = generate_search_terms("Cohiba", "Siglo VI");
        assert!(terms.contains(&"siglo".to_string()));
        assert!(terms.contains(&"cohiba siglo".to_string()));
    }

    #[test]
    fn trailing_numeral_is_stripped_from_full_term() {
        let terms = generate_search_terms("Cohiba", "Siglo VI");
        assert!(terms.contains(&"cohiba siglo".to_string()));
        assert!(!terms.contains(&"cohiba siglo vi".to_string()));
    }

    #[test]
    fn trailing_packaging_word_is_stripped() {
        let terms = generate_search_terms("Partagas", "Lusitanias Slb");
        assert!(terms.contains(&"partagas lusitanias".to_string()));
    }

    #[test]
    fn spelling_variants_are_fanned_out() {
        let terms = generate_search_terms("San Cristobal", "La Punta Esmerelda");
        assert!(terms.contains(&"esmerelda".to_string()));
        assert!(terms.contains(&"esmeralda".to_string()));
    }

    #[test]
    fn terms_are_deduplicated_and_capped() {
        let terms = generate_search_terms(
            "Hoyo de Monterrey",
            "Epicure Especial Reserva Coleccion Grandiosos Magnificos",
        );
        assert!(terms.len() <= 8);
        let mut sorted = terms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), terms.len());
    }

    #[test]
    fn empty_name_still_yields_brand() {
        let terms = generate_search_terms("Cohiba", "");
        assert_eq!(terms, vec!["cohiba".to_string()]);
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            generate_search_terms("Cohiba", "Behike 52"),
            generate_search_terms("Cohiba", "Behike 52")
        );
    }
}
