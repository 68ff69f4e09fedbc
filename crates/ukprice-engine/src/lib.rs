//! Matching & reconciliation engine for noisy retail listings.
//!
//! Everything in this crate is purely functional: no I/O, no shared mutable
//! state, no hidden caches. Evaluating every catalog item × listing pair
//! concurrently is safe with no coordination. The only stateful piece is the
//! explicitly injected [`cache::SearchCache`], which the caller owns and
//! scopes to a single run.

pub mod cache;
pub mod identifiers;
pub mod matcher;
pub mod normalize;
pub mod price;
pub mod reconcile;
pub mod search;
pub mod stem;

pub use cache::{cache_key, MemoryCache, SearchCache};
pub use identifiers::{extract_pack_size, numeric_identifiers, roman_numerals};
pub use matcher::{match_listing, MatchDecision, MatcherConfig, RejectReason};
pub use normalize::normalize;
pub use price::parse_price;
pub use reconcile::{reconcile, ReconcileConfig, ReconcilePolicy};
pub use search::generate_search_terms;
