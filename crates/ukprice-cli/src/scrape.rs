//! The `scrape` pipeline: catalog → search terms → cached retrieval →
//! match → parse → reconcile → persist.
//!
//! Items are processed concurrently up to the configured limit; within one
//! item the sources run in order, and per-source search results are shared
//! across items through the run-scoped cache.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;

use ukprice_core::{
    load_catalog, load_sources, AppConfig, CatalogItem, RawListing, ReconciledPrice, SourceConfig,
    SourceObservation,
};
use ukprice_engine::{
    cache_key, generate_search_terms, match_listing, parse_price, reconcile, MatcherConfig,
    MemoryCache, ReconcileConfig, SearchCache,
};
use ukprice_scraper::{listing_from_product, SearchClient};

use crate::output::{self, PriceRecord};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path)?;
    let sources = load_sources(&config.sources_path)?;
    anyhow::ensure!(!sources.sources.is_empty(), "no sources configured");

    let client = SearchClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;
    let cache = MemoryCache::new();
    let matcher = MatcherConfig::default();
    let reconciler = ReconcileConfig::default();

    tracing::info!(
        items = catalog.items.len(),
        sources = sources.sources.len(),
        "starting scrape run"
    );

    let max_concurrent = config.scraper_max_concurrent_items.max(1);
    let source_list = &sources.sources;
    let client_ref = &client;
    let cache_ref = &cache;
    let matcher_ref = &matcher;

    let outcomes: Vec<(CatalogItem, Vec<SourceObservation>)> = stream::iter(catalog.items)
        .map(|item| async move {
            let observations =
                observe_item(client_ref, cache_ref, source_list, &item, matcher_ref, config).await;
            (item, observations)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut records = BTreeMap::new();
    for (item, observations) in &outcomes {
        let reconciled = reconcile(&item.key(), observations, &reconciler);
        match build_record(item, &reconciled) {
            Some(record) => {
                tracing::info!(
                    item = %item.key(),
                    price = %record.price_gbp,
                    method = %record.method,
                    sources = record.sources.len(),
                    "price reconciled"
                );
                records.insert(item.key(), record);
            }
            None => tracing::warn!(item = %item.key(), "no price found"),
        }
    }

    output::save(&config.output_dir, &records, config.history_window)?;
    print_stats(source_list, &outcomes);
    println!(
        "\nSaved {} of {} prices to {}",
        records.len(),
        outcomes.len(),
        config.output_dir.display()
    );
    Ok(())
}

/// Collects at most one observation per source for one catalog item.
async fn observe_item(
    client: &SearchClient,
    cache: &MemoryCache,
    sources: &[SourceConfig],
    item: &CatalogItem,
    matcher: &MatcherConfig,
    config: &AppConfig,
) -> Vec<SourceObservation> {
    let terms = generate_search_terms(&item.brand, &item.name);
    let mut observations = Vec::new();

    for source in sources {
        for term in &terms {
            let listings = search_listings(client, cache, source, term, config).await;
            if let Some(obs) = first_match(&listings, source, item, matcher) {
                tracing::debug!(
                    item = %item.key(),
                    source = %obs.source_id,
                    price = %obs.price,
                    title = %obs.listing_title,
                    "observation"
                );
                observations.push(obs);
                break;
            }
        }
    }

    observations
}

/// Returns the listings for one search, from cache when possible.
///
/// A failed search logs a warning and caches an empty result so the term is
/// not retried for other items in the same run.
async fn search_listings(
    client: &SearchClient,
    cache: &MemoryCache,
    source: &SourceConfig,
    term: &str,
    config: &AppConfig,
) -> Vec<RawListing> {
    let key = cache_key(&source.id, term);
    if let Some(hit) = cache.get(&key) {
        return hit;
    }

    if config.scraper_inter_request_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.scraper_inter_request_delay_ms)).await;
    }

    match client.search(source, term, config.scraper_per_page).await {
        Ok(products) => {
            let listings: Vec<RawListing> = products
                .iter()
                .filter_map(|p| listing_from_product(p, &source.id))
                .collect();
            cache.put(&key, listings.clone());
            listings
        }
        Err(err) => {
            tracing::warn!(source = %source.id, term, error = %err, "search failed");
            cache.put(&key, Vec::new());
            Vec::new()
        }
    }
}

/// Scans listings in order and returns the first one that matches the item
/// and yields a usable price.
fn first_match(
    listings: &[RawListing],
    source: &SourceConfig,
    item: &CatalogItem,
    matcher: &MatcherConfig,
) -> Option<SourceObservation> {
    for listing in listings {
        if !listing.availability {
            continue;
        }
        let decision =
            match_listing(&listing.title, &item.brand, &item.name, item.pack_size, matcher);
        if !decision.matched {
            continue;
        }
        let Some(text) = listing.price_text_for_pack(item.pack_size) else {
            continue;
        };
        let Some(price) = parse_price(text) else {
            continue;
        };
        if source.min_price.is_some_and(|min| price < min) {
            tracing::debug!(
                source = %source.id,
                title = %listing.title,
                %price,
                "price below source floor"
            );
            continue;
        }
        return Some(SourceObservation {
            source_id: source.id.clone(),
            price,
            listing_title: listing.title.clone(),
        });
    }
    None
}

fn build_record(item: &CatalogItem, reconciled: &ReconciledPrice) -> Option<PriceRecord> {
    let price = reconciled.final_price?;
    let method = reconciled.method?;
    Some(PriceRecord {
        brand: item.brand.clone(),
        name: item.name.clone(),
        pack_size: item.pack_size,
        price_gbp: price.round_dp(2),
        per_unit_gbp: (price / Decimal::from(item.pack_size)).round_dp(2),
        method: method.to_string(),
        sources: reconciled.contributing_sources.clone(),
        excluded_sources: reconciled.excluded_sources.clone(),
        timestamp: Utc::now(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn print_stats(sources: &[SourceConfig], outcomes: &[(CatalogItem, Vec<SourceObservation>)]) {
    let total = outcomes.len();
    println!("\nSource success rates");
    println!("{}", "-".repeat(44));

    let mut total_found = 0;
    for source in sources {
        let found = outcomes
            .iter()
            .filter(|(_, obs)| obs.iter().any(|o| o.source_id == source.id))
            .count();
        total_found += found;
        let rate = if total > 0 {
            found as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("  {:<24} {found:>3}/{total:<3} = {rate:>5.1}%", source.name);
    }

    println!("{}", "-".repeat(44));
    let possible = total * sources.len();
    let overall = if possible > 0 {
        total_found as f64 / possible as f64 * 100.0
    } else {
        0.0
    };
    println!("  {:<24} {total_found:>3}/{possible:<3} = {overall:>5.1}%", "OVERALL");
}

#[cfg(test)]
mod tests {
    use super::*;

    use ukprice_core::ReconcileMethod;

    fn item() -> CatalogItem {
        CatalogItem {
            brand: "Cohiba".to_string(),
            name: "Siglo VI".to_string(),
            pack_size: 25,
        }
    }

    fn source(min_price: Option<&str>) -> SourceConfig {
        SourceConfig {
            id: "cgars".to_string(),
            name: "C.Gars Ltd".to_string(),
            base_url: "https://www.cgarsltd.co.uk".to_string(),
            min_price: min_price.map(|p| p.parse().unwrap()),
        }
    }

    fn listing(title: &str, price: &str) -> RawListing {
        RawListing::with_price_text(title, price, "cgars")
    }

    #[test]
    fn first_match_picks_first_matching_listing() {
        let listings = vec![
            listing("Montecristo No.2 Box of 25", "£450.00"),
            listing("Cohiba Siglo VI Box of 25", "£870.00"),
        ];
        let obs = first_match(&listings, &source(None), &item(), &MatcherConfig::default())
            .expect("second listing matches");
        assert_eq!(obs.price, "870.00".parse().unwrap());
        assert_eq!(obs.listing_title, "Cohiba Siglo VI Box of 25");
    }

    #[test]
    fn first_match_skips_unavailable_listings() {
        let mut sold_out = listing("Cohiba Siglo VI Box of 25", "£870.00");
        sold_out.availability = false;
        assert!(first_match(
            &[sold_out],
            &source(None),
            &item(),
            &MatcherConfig::default()
        )
        .is_none());
    }

    #[test]
    fn first_match_applies_min_price_floor() {
        // A £35 hit on a box search is a single stick leaking through.
        let listings = vec![listing("Cohiba Siglo VI", "£35.00")];
        assert!(first_match(
            &listings,
            &source(Some("50")),
            &item(),
            &MatcherConfig::default()
        )
        .is_none());
    }

    #[test]
    fn first_match_skips_structured_listing_without_the_pack() {
        let mut other_pack = listing("Cohiba Siglo VI", "£355.00");
        other_pack
            .price_by_pack_size
            .insert(10, "£355.00".to_string());
        assert!(first_match(
            &[other_pack],
            &source(None),
            &item(),
            &MatcherConfig::default()
        )
        .is_none());
    }

    #[test]
    fn build_record_rounds_and_derives_per_unit() {
        let reconciled = ReconciledPrice {
            item_key: "Cohiba|Siglo VI|25".to_string(),
            final_price: Some("870.005".parse().unwrap()),
            method: Some(ReconcileMethod::Averaged),
            contributing_sources: vec!["cgars".to_string()],
            excluded_sources: Vec::new(),
        };
        let record = build_record(&item(), &reconciled).unwrap();
        assert_eq!(record.price_gbp, "870.00".parse().unwrap());
        assert_eq!(record.per_unit_gbp, "34.80".parse().unwrap());
        assert_eq!(record.method, "averaged");
    }

    #[test]
    fn build_record_is_none_when_not_found() {
        let reconciled = ReconciledPrice::not_found("Cohiba|Siglo VI|25");
        assert!(build_record(&item(), &reconciled).is_none());
    }
}
