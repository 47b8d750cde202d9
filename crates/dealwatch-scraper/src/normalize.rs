//! Price resolution across the two upstream price shapes.
//!
//! Everything downstream of this module sees exactly one optional original
//! price and one optional sale price; which wire shape they came from is
//! decided here and nowhere else.

use crate::types::{PriceTier, RawProduct};

/// A raw product with its prices resolved and its source category attached.
/// Transient: consumed by [`crate::filter::deal_from_product`] immediately
/// after the page that produced it.
#[derive(Debug, Clone)]
pub struct NormalizedProduct {
    pub raw: RawProduct,
    /// Resolved regular price, or `None` when absent in both shapes.
    pub original_price: Option<f64>,
    /// Resolved sale price, or `None` when no promotional price is present
    /// in either shape.
    pub sale_price: Option<f64>,
    /// Key of the category this product was fetched under.
    pub category: String,
}

/// Resolves the original and sale prices for a raw product.
///
/// The original price comes from the legacy `price` field, falling back to
/// the `BUY` tier of `priceList` (newer shape). For the sale price the
/// `DISCOUNT` tier takes precedence: when both shapes coexist the tier is
/// the current promotion and a leftover legacy `promotionPrice` is stale,
/// so the tier overwrites it. Missing or unknown tiers are not errors — the
/// product simply lacks that price and the filter will drop it.
#[must_use]
pub fn normalize_product(raw: RawProduct, category: &str) -> NormalizedProduct {
    let original_price = raw
        .price
        .as_ref()
        .and_then(crate::types::PriceValue::amount)
        .or_else(|| tier_amount(&raw, PriceTier::Buy));

    let sale_price = tier_amount(&raw, PriceTier::Discount).or_else(|| {
        raw.promotion_price
            .as_ref()
            .and_then(crate::types::PriceValue::amount)
    });

    NormalizedProduct {
        raw,
        original_price,
        sale_price,
        category: category.to_owned(),
    }
}

fn tier_amount(raw: &RawProduct, tier: PriceTier) -> Option<f64> {
    raw.price_list
        .iter()
        .find(|entry| entry.price_type == tier)
        .and_then(crate::types::PriceEntry::amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceEntry, PriceValue};

    fn price(value: f64) -> PriceValue {
        PriceValue {
            currency_iso: Some("HKD".to_owned()),
            value: Some(serde_json::json!(value)),
            formatted_value: None,
        }
    }

    fn tier(price_type: PriceTier, value: f64) -> PriceEntry {
        PriceEntry {
            price_type,
            currency_iso: Some("HKD".to_owned()),
            value: Some(serde_json::json!(value)),
            formatted_value: None,
        }
    }

    fn bare_product() -> RawProduct {
        serde_json::from_str(r#"{"code": "P1", "name": "Dog Food"}"#).unwrap()
    }

    #[test]
    fn discount_tier_overwrites_legacy_promotion_price() {
        let mut raw = bare_product();
        raw.price = Some(price(120.0));
        raw.promotion_price = Some(price(75.0));
        raw.price_list = vec![tier(PriceTier::Buy, 100.0), tier(PriceTier::Discount, 60.0)];
        let normalized = normalize_product(raw, "dog_food");
        assert_eq!(normalized.original_price, Some(120.0));
        assert_eq!(normalized.sale_price, Some(60.0));
        assert_eq!(normalized.category, "dog_food");
    }

    #[test]
    fn legacy_promotion_price_used_when_no_discount_tier() {
        let mut raw = bare_product();
        raw.price = Some(price(100.0));
        raw.promotion_price = Some(price(75.0));
        raw.price_list = vec![tier(PriceTier::Buy, 100.0)];
        let normalized = normalize_product(raw, "dog_food");
        assert_eq!(normalized.original_price, Some(100.0));
        assert_eq!(normalized.sale_price, Some(75.0));
    }

    #[test]
    fn tiered_shape_resolves_both_prices() {
        let mut raw = bare_product();
        raw.price_list = vec![tier(PriceTier::Buy, 100.0), tier(PriceTier::Discount, 75.0)];
        let normalized = normalize_product(raw, "dog_food");
        assert_eq!(normalized.original_price, Some(100.0));
        assert_eq!(normalized.sale_price, Some(75.0));
    }

    #[test]
    fn no_discount_tier_means_no_sale_price() {
        let mut raw = bare_product();
        raw.price_list = vec![tier(PriceTier::Buy, 100.0), tier(PriceTier::Other, 90.0)];
        let normalized = normalize_product(raw, "cat_food");
        assert_eq!(normalized.original_price, Some(100.0));
        assert!(normalized.sale_price.is_none());
    }

    #[test]
    fn empty_price_data_resolves_nothing() {
        let normalized = normalize_product(bare_product(), "cat_food");
        assert!(normalized.original_price.is_none());
        assert!(normalized.sale_price.is_none());
    }
}
