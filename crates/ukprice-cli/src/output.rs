//! Persists reconciled prices: the current snapshot, a rolling weekly
//! history, and a JS module consumed by the price comparison page.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

pub const PRICES_FILE: &str = "prices.json";
pub const HISTORY_FILE: &str = "price_history.json";
pub const JS_EXPORT_FILE: &str = "uk_market_prices.js";

/// One reconciled price, keyed in the output files by `brand|name|pack_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub brand: String,
    pub name: String,
    pub pack_size: u32,
    pub price_gbp: Decimal,
    pub per_unit_gbp: Decimal,
    pub method: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub excluded_sources: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// One point in an item's price history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub price_gbp: Decimal,
    pub sources: Vec<String>,
}

type History = BTreeMap<String, Vec<HistoryEntry>>;

/// Writes the snapshot, appends to the rolling history, and regenerates the
/// JS export.
///
/// Each file is written to a temp file beside the target and renamed into
/// place, so readers (and the next run's history load) never observe a
/// partial file. The history keeps the most recent `history_window` entries
/// per item; a missing or unreadable history file starts a fresh one rather
/// than aborting the run.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or any of the
/// three files cannot be written.
pub fn save(
    output_dir: &Path,
    records: &BTreeMap<String, PriceRecord>,
    history_window: usize,
) -> anyhow::Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let body = serde_json::to_string_pretty(records).context("serializing price snapshot")?;
    write_atomic(&output_dir.join(PRICES_FILE), &body)?;

    let history_path = output_dir.join(HISTORY_FILE);
    let history = append_history(load_history(&history_path), records, history_window);
    let body = serde_json::to_string_pretty(&history).context("serializing price history")?;
    write_atomic(&history_path, &body)?;

    write_atomic(&output_dir.join(JS_EXPORT_FILE), &render_js_export(records)?)?;

    tracing::info!(
        count = records.len(),
        dir = %output_dir.display(),
        "saved price files"
    );
    Ok(())
}

/// Writes `contents` to a temp file in the target's directory, then renames
/// it over `path`. An interrupted write leaves the old file untouched.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("no parent directory for {}", path.display()))?;
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("renaming temp file to {}", path.display()))?;
    Ok(())
}

fn load_history(path: &Path) -> History {
    match fs::read_to_string(path) {
        Ok(body) => serde_json::from_str(&body).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "history file unreadable, starting fresh");
            History::new()
        }),
        Err(_) => History::new(),
    }
}

fn append_history(
    mut history: History,
    records: &BTreeMap<String, PriceRecord>,
    window: usize,
) -> History {
    for (key, record) in records {
        let entries = history.entry(key.clone()).or_default();
        entries.push(HistoryEntry {
            date: record.timestamp.format("%Y-%m-%d").to_string(),
            price_gbp: record.price_gbp,
            sources: record.sources.clone(),
        });
        if entries.len() > window {
            entries.drain(..entries.len() - window);
        }
    }
    history
}

fn render_js_export(records: &BTreeMap<String, PriceRecord>) -> anyhow::Result<String> {
    let mut js = format!("// UK market prices - {}\n", Utc::now().to_rfc3339());
    js.push_str("export const ukMarketPrices = {\n");
    for (key, record) in records {
        let value = serde_json::to_string(record).context("serializing JS export record")?;
        js.push_str(&format!("  {}: {value},\n", serde_json::to_string(key)?));
    }
    js.push_str("};\n");
    Ok(js)
}
