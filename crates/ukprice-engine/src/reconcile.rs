//! Price reconciliation: many per-source observations, one defensible price.
//!
//! A large spread between sources usually means one of them matched the
//! wrong pack size, not that the market disagrees; the default policy
//! filters around the median before averaging and keeps the excluded
//! sources on the result for the caller's audit trail.

use rust_decimal::Decimal;

use ukprice_core::{ReconcileMethod, ReconciledPrice, SourceObservation};

/// Strategy for reducing multiple observations to one price. Historical
/// variants of this pipeline disagreed on the policy, so it is explicit
/// configuration rather than a hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Average when spread is small; otherwise average the subset within the
    /// outlier band of the median (the documented default).
    #[default]
    MedianFiltered,
    /// Always take the median observation.
    Median,
    /// Always take the lowest observation.
    Lowest,
}

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub policy: ReconcilePolicy,
    /// Maximum relative spread `(max - min) / min` before outlier filtering
    /// kicks in.
    pub discrepancy_threshold: Decimal,
    /// Observations further than this relative distance from the median are
    /// treated as outliers.
    pub outlier_band: Decimal,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::MedianFiltered,
            discrepancy_threshold: Decimal::new(30, 2),
            outlier_band: Decimal::new(30, 2),
        }
    }
}

/// Reduces the observations for one catalog item to a final price.
///
/// Zero observations yield a "not found" result; one observation passes
/// through as `single-source`; otherwise the configured policy applies.
/// The reduction is order-independent: observations are sorted internally.
#[must_use]
pub fn reconcile(
    item_key: &str,
    observations: &[SourceObservation],
    config: &ReconcileConfig,
) -> ReconciledPrice {
    match observations {
        [] => ReconciledPrice::not_found(item_key),
        [only] => ReconciledPrice {
            item_key: item_key.to_string(),
            final_price: Some(only.price),
            method: Some(ReconcileMethod::SingleSource),
            contributing_sources: vec![only.source_id.clone()],
            excluded_sources: Vec::new(),
        },
        _ => match config.policy {
            ReconcilePolicy::MedianFiltered => median_filtered(item_key, observations, config),
            ReconcilePolicy::Median => {
                let sorted = sorted_by_price(observations);
                let median = median_price(&sorted);
                ReconciledPrice {
                    item_key: item_key.to_string(),
                    final_price: Some(median),
                    method: Some(ReconcileMethod::Median),
                    contributing_sources: source_ids(&sorted),
                    excluded_sources: Vec::new(),
                }
            }
            ReconcilePolicy::Lowest => {
                let sorted = sorted_by_price(observations);
                ReconciledPrice {
                    item_key: item_key.to_string(),
                    final_price: Some(sorted[0].price),
                    method: Some(ReconcileMethod::Lowest),
                    contributing_sources: vec![sorted[0].source_id.clone()],
                    excluded_sources: Vec::new(),
                }
            }
        },
    }
}

fn median_filtered(
    item_key: &str,
    observations: &[SourceObservation],
    config: &ReconcileConfig,
) -> ReconciledPrice {
    let sorted = sorted_by_price(observations);
    let min = sorted[0].price;
    let max = sorted[sorted.len() - 1].price;
    let median = median_price(&sorted);

    let spread_ok = min > Decimal::ZERO && (max - min) / min <= config.discrepancy_threshold;
    if spread_ok {
        return ReconciledPrice {
            item_key: item_key.to_string(),
            final_price: Some(mean(&sorted)),
            method: Some(ReconcileMethod::Averaged),
            contributing_sources: source_ids(&sorted),
            excluded_sources: Vec::new(),
        };
    }

    let (kept, excluded): (Vec<_>, Vec<_>) = sorted.iter().partition(|obs| {
        median > Decimal::ZERO && (obs.price - median).abs() / median <= config.outlier_band
    });

    if kept.is_empty() {
        // Every observation is an outlier relative to every other; the
        // median is the least-wrong answer available.
        return ReconciledPrice {
            item_key: item_key.to_string(),
            final_price: Some(median),
            method: Some(ReconcileMethod::Median),
            contributing_sources: source_ids(&sorted),
            excluded_sources: Vec::new(),
        };
    }

    if excluded.is_empty() {
        // Spread tripped the threshold but nothing falls outside the band
        // around the median; averaging everything is equivalent.
        return ReconciledPrice {
            item_key: item_key.to_string(),
            final_price: Some(mean(&sorted)),
            method: Some(ReconcileMethod::Averaged),
            contributing_sources: source_ids(&sorted),
            excluded_sources: Vec::new(),
        };
    }

    let kept_owned: Vec<SourceObservation> = kept.into_iter().cloned().collect();
    let excluded_ids: Vec<String> = excluded.iter().map(|obs| obs.source_id.clone()).collect();
    tracing::debug!(
        item_key,
        excluded = ?excluded_ids,
        "excluded outlier sources during reconciliation"
    );

    ReconciledPrice {
        item_key: item_key.to_string(),
        final_price: Some(mean(&kept_owned)),
        method: Some(ReconcileMethod::AveragedFiltered),
        contributing_sources: source_ids(&kept_owned),
        excluded_sources: excluded_ids,
    }
}

fn sorted_by_price(observations: &[SourceObservation]) -> Vec<SourceObservation> {
    let mut sorted = observations.to_vec();
    sorted.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.source_id.cmp(&b.source_id)));
    sorted
}

/// Upper median: the middle element of the sorted slice, taking the higher
/// of the two candidates for even counts.
fn median_price(sorted: &[SourceObservation]) -> Decimal {
    sorted[sorted.len() / 2].price
}

fn mean(observations: &[SourceObservation]) -> Decimal {
    let sum: Decimal = observations.iter().map(|obs| obs.price).sum();
    sum / Decimal::from(observations.len())
}

fn source_ids(observations: &[SourceObservation]) -> Vec<String> {
    observations
        .iter()
        .map(|obs| obs.source_id.clone())
        .collect()
}
