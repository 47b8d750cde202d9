//! Upstream search API response types.
//!
//! ## Observed schema variance
//!
//! The search endpoint has shipped two incompatible price shapes:
//!
//! - The legacy shape carries separate `price` and `promotionPrice` objects,
//!   each `{ currencyIso, value, formattedValue }`.
//! - The newer shape carries a `priceList` array of tiers tagged by
//!   `priceType` (`"BUY"` for the regular price, `"DISCOUNT"` for the sale
//!   price, with other tags observed occasionally).
//!
//! Both shapes are deserialized here; [`crate::normalize`] resolves them
//! into a single sale price so variant-specific field names never propagate
//! further.
//!
//! Price `value` fields have been observed as JSON numbers *and* as numeric
//! strings depending on API version, so they are modeled as
//! `serde_json::Value` and parsed via [`parse_amount`]. Non-numeric values
//! are treated as absent, never as errors.

use serde::Deserialize;

/// One bounded-size response unit from the paginated search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total page count for the query. Only trustworthy on page 0.
    #[serde(default = "default_number_of_pages")]
    pub number_of_pages: u32,
    #[serde(default)]
    pub total_number_of_results: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            number_of_pages: 1,
            total_number_of_results: 0,
        }
    }
}

/// Upstream absence of pagination metadata means a single page.
fn default_number_of_pages() -> u32 {
    1
}

/// An opaque upstream product record. Every field is optional at the wire
/// level; validation happens in [`crate::filter`], not here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    /// Upstream identity code, e.g. `"H0888001_S_P001"`.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand_name: String,
    /// Regular price (legacy shape).
    #[serde(default)]
    pub price: Option<PriceValue>,
    /// Sale price (legacy shape). Synthesized from `price_list` during
    /// normalization when only the tiered shape is present.
    #[serde(default)]
    pub promotion_price: Option<PriceValue>,
    /// Tiered prices (newer shape).
    #[serde(default)]
    pub price_list: Vec<PriceEntry>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Product page URL; may be relative to the site base URL.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stock: Option<StockInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceValue {
    #[serde(default)]
    pub currency_iso: Option<String>,
    /// JSON number or numeric string depending on API version.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub formatted_value: Option<String>,
}

impl PriceValue {
    /// Returns the price as a currency amount, or `None` when the value is
    /// absent or non-numeric.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        parse_amount(self.value.as_ref())
    }
}

/// One entry of the tiered `priceList` shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    #[serde(default)]
    pub price_type: PriceTier,
    #[serde(default)]
    pub currency_iso: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub formatted_value: Option<String>,
}

impl PriceEntry {
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        parse_amount(self.value.as_ref())
    }
}

/// Tag on a [`PriceEntry`]. Unknown tags deserialize to [`PriceTier::Other`]
/// rather than failing the whole page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceTier {
    Buy,
    Discount,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    /// May be protocol-relative (`//img...`); resolved in the filter.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    #[serde(default)]
    pub stock_level_status: Option<StockLevelStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockLevelStatus {
    /// `"inStock"` is the only in-stock sentinel; anything else means out
    /// of stock.
    #[serde(default)]
    pub code: String,
}

fn parse_amount(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
