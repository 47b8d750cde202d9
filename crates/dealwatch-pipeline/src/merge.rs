//! Global deduplication and ordering of the merged deal set.

use std::collections::HashSet;

use dealwatch_core::Deal;

/// Deduplicates deals by product code (first seen wins, including across
/// categories) and sorts the unique set by discount percentage descending.
///
/// Deals with an empty product code carry no usable identity and are never
/// deduplicated against each other. The sort is stable, so ties keep their
/// arrival order and the output is fully deterministic for a given input
/// order. Running this over an already-deduplicated list is a no-op.
#[must_use]
pub fn dedup_and_sort(deals: Vec<Deal>) -> Vec<Deal> {
    let mut seen_codes: HashSet<String> = HashSet::with_capacity(deals.len());
    let mut unique: Vec<Deal> = Vec::with_capacity(deals.len());

    for deal in deals {
        if !deal.product_code.is_empty() && !seen_codes.insert(deal.product_code.clone()) {
            continue;
        }
        unique.push(deal);
    }

    unique.sort_by(|a, b| b.discount_pct.total_cmp(&a.discount_pct));
    unique
}
