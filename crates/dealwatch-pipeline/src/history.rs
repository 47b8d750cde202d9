//! Change tracking against the previously published snapshot.
//!
//! The previous snapshot IS the history: no separate storage exists. A
//! by-code lookup is built once at run start and treated as immutable for
//! the rest of the run.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use dealwatch_core::Deal;
use serde::Deserialize;

/// The observable state of one previously published deal, deserialized
/// leniently so snapshots written before change tracking existed (no
/// `last_updated` field) still load.
#[derive(Debug, Clone, Deserialize)]
struct PreviousDeal {
    #[serde(default)]
    product_code: String,
    original_price: f64,
    sale_price: f64,
    #[serde(default)]
    in_stock: bool,
    scraped_date: NaiveDate,
    #[serde(default)]
    last_updated: Option<NaiveDate>,
}

impl PreviousDeal {
    // Prices round-trip losslessly through the JSON snapshot, so exact
    // comparison is correct here.
    #[allow(clippy::float_cmp)]
    fn same_observable_state(&self, deal: &Deal) -> bool {
        self.original_price == deal.original_price
            && self.sale_price == deal.sale_price
            && self.in_stock == deal.in_stock
    }

    /// The date to carry over when the deal is unchanged. Falls back to the
    /// observation date for pre-change-tracking snapshots.
    fn effective_last_updated(&self) -> NaiveDate {
        self.last_updated.unwrap_or(self.scraped_date)
    }
}

/// By-identity index over the last published snapshot. Read-only input to
/// [`stamp_last_updated`].
#[derive(Debug, Default)]
pub struct PreviousLookup {
    by_code: HashMap<String, PreviousDeal>,
}

impl PreviousLookup {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the lookup from the snapshot at `path`.
    ///
    /// A missing file is not an error — it means no snapshot has ever been
    /// published and every deal is newly observed. An unreadable or corrupt
    /// file is logged and likewise treated as empty: history only influences
    /// `last_updated` stamps, and the next publish rebuilds the snapshot
    /// wholesale anyway.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no previous snapshot, starting fresh");
                return Self::empty();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read previous snapshot, treating as empty"
                );
                return Self::empty();
            }
        };

        match serde_json::from_str::<Vec<PreviousDeal>>(&content) {
            Ok(deals) => {
                let lookup = Self::from_previous(deals);
                tracing::info!(
                    path = %path.display(),
                    entries = lookup.len(),
                    "previous snapshot loaded"
                );
                lookup
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "previous snapshot is not a valid deal array, treating as empty"
                );
                Self::empty()
            }
        }
    }

    /// Builds the lookup from an in-memory deal list, e.g. a snapshot that
    /// was just published.
    #[must_use]
    pub fn from_deals(deals: &[Deal]) -> Self {
        Self::from_previous(
            deals
                .iter()
                .map(|deal| PreviousDeal {
                    product_code: deal.product_code.clone(),
                    original_price: deal.original_price,
                    sale_price: deal.sale_price,
                    in_stock: deal.in_stock,
                    scraped_date: deal.scraped_date,
                    last_updated: Some(deal.last_updated),
                })
                .collect(),
        )
    }

    fn from_previous(deals: Vec<PreviousDeal>) -> Self {
        let by_code = deals
            .into_iter()
            .filter(|deal| !deal.product_code.is_empty())
            .map(|deal| (deal.product_code.clone(), deal))
            .collect();
        Self { by_code }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Stamps each deal's `last_updated` date against the previous snapshot.
///
/// - Unknown product code: newly observed, stamped `today`.
/// - Known code with unchanged original price, sale price, and stock flag:
///   the previous `last_updated` is carried over.
/// - Known code with any of those three changed: stamped `today`.
pub fn stamp_last_updated(deals: &mut [Deal], previous: &PreviousLookup, today: NaiveDate) {
    for deal in deals {
        deal.last_updated = match previous.by_code.get(&deal.product_code) {
            Some(prev) if prev.same_observable_state(deal) => prev.effective_last_updated(),
            _ => today,
        };
    }
}
