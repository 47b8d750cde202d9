use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::SearchPage;

/// Upstream-imposed maximum page size; larger requests are silently capped
/// by the API, so the client clamps before sending.
pub const MAX_PAGE_SIZE: u32 = 600;

/// HTTP client for the upstream paginated search endpoint.
///
/// Each call fetches one `(query, page)` request unit. Rate limiting (429)
/// and other non-2xx responses surface as typed errors; transient failures
/// (429, network) are retried with exponential backoff up to `max_retries`
/// additional attempts. Failure is per-call and never fatal by itself —
/// callers decide escalation.
pub struct SearchClient {
    client: Client,
    api_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SearchClient {
    /// Creates a `SearchClient` with configured timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of search results for `query`.
    ///
    /// The request carries `query`, the zero-based `currentPage`, and
    /// `pageSize` (clamped to [`MAX_PAGE_SIZE`]) as query parameters, the
    /// way the storefront's own XHR layer issues it.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`] — response body is not a valid search page (not retried).
    pub async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, ScraperError> {
        let page_size = page_size.min(MAX_PAGE_SIZE);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .post(&self.api_url)
                .query(&[
                    ("query", query),
                    ("currentPage", &page.to_string()),
                    ("pageSize", &page_size.to_string()),
                ])
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(ScraperError::RateLimited {
                    host: extract_host(&self.api_url),
                    retry_after_secs,
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.api_url.clone(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<SearchPage>(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("search page {page} for query {query}"),
                source: e,
            })
        })
        .await
    }
}

/// Extracts the hostname from the API URL for use in error messages.
/// Falls back to the full URL string if parsing fails.
fn extract_host(api_url: &str) -> String {
    let without_scheme = api_url
        .strip_prefix("https://")
        .or_else(|| api_url.strip_prefix("http://"))
        .unwrap_or(api_url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(api_url)
        .to_owned()
}
