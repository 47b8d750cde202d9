use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A product currently on sale, as published in the snapshot file.
///
/// This is the sole contract with downstream consumers (dashboard, email
/// digest). A `Deal` only exists for products where
/// `0 < sale_price < original_price`; anything else is filtered out before
/// this type is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Upstream product identity code — the deduplication key.
    pub product_code: String,
    pub product_name: String,
    pub brand: String,
    /// Pre-discount price. Always `> sale_price`.
    pub original_price: f64,
    pub sale_price: f64,
    /// `(original - sale) / original * 100`, rounded to 2 decimal places.
    pub discount_pct: f64,
    /// Key of the category this deal was fetched under.
    pub category: String,
    /// Absolute image URL, or empty when the product has no images.
    pub image_url: String,
    /// Absolute product page URL, or empty when the upstream record has none.
    pub product_url: String,
    pub in_stock: bool,
    /// Date the current run observed this product.
    pub scraped_date: NaiveDate,
    /// Most recent date on which price or stock state differed from the
    /// prior published snapshot.
    pub last_updated: NaiveDate,
}

impl Deal {
    /// Computes the discount percentage from an original and sale price,
    /// rounded to 2 decimal places.
    #[must_use]
    pub fn discount_percentage(original: f64, sale: f64) -> f64 {
        ((original - sale) / original * 100.0 * 100.0).round() / 100.0
    }

    /// Returns `true` when the observable state (original price, sale price,
    /// in-stock flag) matches `other`. Used by change tracking to decide
    /// whether `last_updated` may be carried over from a prior snapshot.
    // Prices round-trip losslessly through the JSON snapshot, so exact
    // comparison is correct here.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn same_observable_state(&self, other: &Deal) -> bool {
        self.original_price == other.original_price
            && self.sale_price == other.sale_price
            && self.in_stock == other.in_stock
    }
}
