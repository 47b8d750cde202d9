//! The orchestrator: drives category scans in configured order and
//! publishes an improving snapshot incrementally after each one.

use std::path::PathBuf;

use chrono::NaiveDate;
use dealwatch_core::{AppConfig, CategoryConfig, Deal};
use dealwatch_scraper::{scan_category, ScanParams, SearchClient};

use crate::error::PipelineError;
use crate::history::{stamp_last_updated, PreviousLookup};
use crate::merge::dedup_and_sort;
use crate::publish::publish_snapshot;
use crate::replicate::SnapshotReplicator;

/// Aggregate result of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// The final published snapshot (empty when the run failed outright).
    pub deals: Vec<Deal>,
    /// Keys of categories whose scan aborted.
    pub failed_categories: Vec<String>,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All categories scanned successfully.
    Complete,
    /// Some categories failed but at least one produced deals; the snapshot
    /// was still published.
    Partial,
    /// No category produced any deals. The previous snapshot, if any, was
    /// left untouched.
    Failed,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Complete => write!(f, "complete"),
            RunOutcome::Partial => write!(f, "partial"),
            RunOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// The incremental fetch → normalize → filter → deduplicate → diff →
/// publish pipeline.
///
/// Categories are processed strictly sequentially; the snapshot is
/// re-merged, re-stamped, and re-published after every category so
/// consumers see it improve category by category instead of waiting for
/// the slowest one.
pub struct Pipeline {
    client: SearchClient,
    replicator: Box<dyn SnapshotReplicator>,
    categories: Vec<CategoryConfig>,
    base_url: String,
    deals_path: PathBuf,
    scan: ScanParams,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns [`PipelineError::ClientBuild`] if the search client cannot be
    /// constructed.
    pub fn new(
        config: &AppConfig,
        categories: Vec<CategoryConfig>,
        replicator: Box<dyn SnapshotReplicator>,
    ) -> Result<Self, PipelineError> {
        let client = SearchClient::new(
            &config.search_api_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )?;

        Ok(Self {
            client,
            replicator,
            categories,
            base_url: config.base_url.clone(),
            deals_path: config.deals_path.clone(),
            scan: ScanParams {
                page_size: config.page_size,
                max_pages: config.max_pages,
                request_delay_ms: config.request_delay_ms,
            },
        })
    }

    /// Runs the pipeline with today's date as the observation date.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for publish failures — the durable
    /// artifact's correctness is never sacrificed. Category failures are
    /// reported in the [`RunReport`] instead.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        self.run_on(chrono::Local::now().date_naive()).await
    }

    /// Runs the pipeline with an explicit observation date.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run`].
    pub async fn run_on(&self, today: NaiveDate) -> Result<RunReport, PipelineError> {
        tracing::info!(scraped_date = %today, categories = self.categories.len(), "run started");

        // The previous snapshot is read once and stays immutable for the
        // whole run; it is the sole source of last_updated history.
        let previous = PreviousLookup::load(&self.deals_path);

        let mut all_deals: Vec<Deal> = Vec::new();
        let mut failed_categories: Vec<String> = Vec::new();

        for category in &self.categories {
            match scan_category(&self.client, category, &self.base_url, self.scan, today).await {
                Ok(deals) => {
                    tracing::info!(
                        category = %category.key,
                        deals = deals.len(),
                        "category completed"
                    );
                    all_deals.extend(deals);
                }
                Err(e) => {
                    tracing::error!(category = %category.key, error = %e, "category failed");
                    failed_categories.push(category.key.clone());
                }
            }

            // Publish the improved union after every category. While the
            // union is still empty there is nothing worth replacing the
            // previous snapshot with.
            if !all_deals.is_empty() {
                self.merge_and_publish(&all_deals, &previous, today).await?;
            }
        }

        if all_deals.is_empty() {
            tracing::error!("no deals collected from any category, previous snapshot left untouched");
            return Ok(RunReport {
                deals: Vec::new(),
                failed_categories,
                outcome: RunOutcome::Failed,
            });
        }

        // Final pass over everything.
        let snapshot = self.merge_and_publish(&all_deals, &previous, today).await?;

        let outcome = if failed_categories.is_empty() {
            RunOutcome::Complete
        } else {
            tracing::warn!(failed = ?failed_categories, "partial success");
            RunOutcome::Partial
        };
        tracing::info!(deals = snapshot.len(), %outcome, "run finished");

        Ok(RunReport {
            deals: snapshot,
            failed_categories,
            outcome,
        })
    }

    /// Merger + Change Tracker + Publisher + Replicator over the union of
    /// all deals produced so far.
    async fn merge_and_publish(
        &self,
        all_deals: &[Deal],
        previous: &PreviousLookup,
        today: NaiveDate,
    ) -> Result<Vec<Deal>, PipelineError> {
        let mut snapshot = dedup_and_sort(all_deals.to_vec());
        stamp_last_updated(&mut snapshot, previous, today);

        let body = publish_snapshot(&self.deals_path, &snapshot).await?;
        self.replicator.replicate(&body).await;

        Ok(snapshot)
    }
}
