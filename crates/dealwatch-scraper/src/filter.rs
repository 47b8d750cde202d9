//! Converts normalized products into published [`Deal`] records.
//!
//! Returning `None` here is an expected filtering outcome (no discount,
//! missing prices), not a fault — nothing is logged per product.

use chrono::NaiveDate;
use dealwatch_core::Deal;

use crate::normalize::NormalizedProduct;

/// The only stock-status code that counts as in stock. Anything else,
/// including a missing status block, means out of stock.
const IN_STOCK_CODE: &str = "inStock";

/// Converts a normalized product into a [`Deal`], or `None` when the
/// product is not genuinely on sale.
///
/// A deal is emitted only when both prices resolved to positive amounts and
/// `sale < original`. The run's observation date is stamped as a provisional
/// `last_updated`; change tracking may override it against the previous
/// snapshot later.
#[must_use]
pub fn deal_from_product(
    product: NormalizedProduct,
    base_url: &str,
    scraped_date: NaiveDate,
) -> Option<Deal> {
    let original_price = product.original_price?;
    let sale_price = product.sale_price?;

    if original_price <= 0.0 || sale_price <= 0.0 {
        return None;
    }
    if sale_price >= original_price {
        return None;
    }

    let raw = product.raw;

    let image_url = raw
        .images
        .first()
        .map(|image| resolve_image_url(&image.url))
        .unwrap_or_default();

    let product_url = resolve_product_url(&raw.url, base_url);

    let in_stock = raw
        .stock
        .as_ref()
        .and_then(|stock| stock.stock_level_status.as_ref())
        .is_some_and(|status| status.code == IN_STOCK_CODE);

    Some(Deal {
        product_code: raw.code,
        product_name: raw.name,
        brand: raw.brand_name,
        original_price,
        sale_price,
        discount_pct: Deal::discount_percentage(original_price, sale_price),
        category: product.category,
        image_url,
        product_url,
        in_stock,
        scraped_date,
        last_updated: scraped_date,
    })
}

/// Protocol-relative image URLs (`//img...`) get an `https:` prefix.
fn resolve_image_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_owned()
    }
}

/// Relative product URLs are absolutized against the site base URL. An
/// empty URL stays empty.
fn resolve_product_url(url: &str, base_url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_owned()
    } else {
        format!("{base_url}{url}")
    }
}
