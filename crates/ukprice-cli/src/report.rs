//! The `report` command: print the latest reconciled snapshot.

use std::collections::BTreeMap;
use std::fs;

use anyhow::Context;

use ukprice_core::AppConfig;

use crate::output::{PriceRecord, PRICES_FILE};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let path = config.output_dir.join(PRICES_FILE);
    let body = fs::read_to_string(&path)
        .with_context(|| format!("reading {}; run `ukprice scrape` first", path.display()))?;
    let records: BTreeMap<String, PriceRecord> =
        serde_json::from_str(&body).with_context(|| format!("parsing {}", path.display()))?;

    if records.is_empty() {
        println!("No prices recorded.");
        return Ok(());
    }

    println!("{:<40} {:>10} {:>9} {:<18} Sources", "Item", "Price", "Per unit", "Method");
    println!("{}", "-".repeat(90));
    for (key, record) in &records {
        let price = format!("£{}", record.price_gbp);
        let per_unit = format!("£{}", record.per_unit_gbp);
        println!(
            "{key:<40} {price:>10} {per_unit:>9} {:<18} {}",
            record.method,
            record.sources.join(", ")
        );
    }
    println!("{}", "-".repeat(90));
    println!("{} items", records.len());
    Ok(())
}
