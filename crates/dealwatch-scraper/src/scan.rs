//! Category scanning: exhaustively walks one category's pages, feeding each
//! page's products through normalization and filtering.

use std::time::Duration;

use chrono::NaiveDate;
use dealwatch_core::{CategoryConfig, Deal};

use crate::client::SearchClient;
use crate::error::ScraperError;
use crate::filter::deal_from_product;
use crate::normalize::normalize_product;

/// Per-run scan settings, lifted from `AppConfig` by the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct ScanParams {
    pub page_size: u32,
    /// Cap on pages walked per category; protects against runaway categories.
    pub max_pages: u32,
    /// Cooperative pause between page fetches within a category.
    pub request_delay_ms: u64,
}

/// Walks all pages of one category and returns its accumulated deals.
///
/// Protocol:
/// - Page 0 failure aborts the whole category: pagination totals are only
///   known from page 0, so no recovery is possible.
/// - The declared page count is capped at `max_pages`.
/// - Pages `1..cap`: wait the inter-request delay, fetch; a failed fetch is
///   logged and skipped (that page contributes nothing); a page with zero
///   products ends the walk — the result set is exhausted. A page whose
///   products are all filtered out is NOT an end signal; scanning continues.
///
/// # Errors
///
/// Returns [`ScraperError::FirstPage`] when page 0 cannot be fetched.
pub async fn scan_category(
    client: &SearchClient,
    category: &CategoryConfig,
    base_url: &str,
    params: ScanParams,
    scraped_date: NaiveDate,
) -> Result<Vec<Deal>, ScraperError> {
    let first_page = client
        .fetch_page(&category.query, 0, params.page_size)
        .await
        .map_err(|e| ScraperError::FirstPage {
            category: category.key.clone(),
            source: Box::new(e),
        })?;

    let total_pages = first_page.pagination.number_of_pages;
    let pages_to_walk = total_pages.min(params.max_pages);
    tracing::info!(
        category = %category.key,
        total_results = first_page.pagination.total_number_of_results,
        total_pages,
        pages_to_walk,
        "category scan started"
    );

    let mut deals: Vec<Deal> = Vec::new();
    collect_page_deals(&mut deals, first_page.products, category, base_url, scraped_date);
    tracing::debug!(category = %category.key, deals = deals.len(), "page 0 processed");

    for page in 1..pages_to_walk {
        if params.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(params.request_delay_ms)).await;
        }

        let search_page = match client
            .fetch_page(&category.query, page, params.page_size)
            .await
        {
            Ok(search_page) => search_page,
            Err(e) => {
                tracing::warn!(
                    category = %category.key,
                    page,
                    error = %e,
                    "page fetch failed, skipping to next page"
                );
                continue;
            }
        };

        if search_page.products.is_empty() {
            tracing::info!(category = %category.key, page, "empty page, end of results");
            break;
        }

        let before = deals.len();
        collect_page_deals(&mut deals, search_page.products, category, base_url, scraped_date);
        tracing::debug!(
            category = %category.key,
            page,
            page_deals = deals.len() - before,
            total_deals = deals.len(),
            "page processed"
        );
    }

    tracing::info!(category = %category.key, deals = deals.len(), "category scan complete");
    Ok(deals)
}

fn collect_page_deals(
    deals: &mut Vec<Deal>,
    products: Vec<crate::types::RawProduct>,
    category: &CategoryConfig,
    base_url: &str,
    scraped_date: NaiveDate,
) {
    deals.extend(products.into_iter().filter_map(|raw| {
        deal_from_product(
            normalize_product(raw, &category.key),
            base_url,
            scraped_date,
        )
    }));
}
