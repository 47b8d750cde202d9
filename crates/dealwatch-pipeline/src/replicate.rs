//! Best-effort replication of the published snapshot to a remote object
//! store.
//!
//! Replication is a capability chosen once at startup: when replica config
//! is present the pipeline gets an [`HttpReplicator`], otherwise a
//! [`NoopReplicator`]. The rest of the pipeline is unaware which is in
//! effect, and no replication outcome ever influences the run's
//! success/failure — the authoritative local write has already happened by
//! the time this runs.

use std::time::Duration;

use async_trait::async_trait;
use dealwatch_core::ReplicaConfig;

use crate::error::PipelineError;

#[async_trait]
pub trait SnapshotReplicator: Send + Sync {
    /// Pushes an already-published snapshot body to the remote store.
    /// Must never fail: errors are logged and swallowed internally.
    async fn replicate(&self, body: &[u8]);
}

/// Replicator used when no remote store is configured.
pub struct NoopReplicator;

#[async_trait]
impl SnapshotReplicator for NoopReplicator {
    async fn replicate(&self, _body: &[u8]) {
        tracing::debug!("replication disabled, skipping upload");
    }
}

/// Uploads the snapshot to `{endpoint}/{bucket}/{object_key}` with a bearer
/// token, via HTTP PUT.
pub struct HttpReplicator {
    client: reqwest::Client,
    url: String,
    access_token: String,
}

impl HttpReplicator {
    /// # Errors
    ///
    /// Returns [`PipelineError::ReplicatorClient`] if the HTTP client cannot
    /// be constructed.
    pub fn new(
        config: &ReplicaConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(PipelineError::ReplicatorClient)?;

        let url = format!(
            "{}/{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.bucket.trim_matches('/'),
            config.object_key.trim_start_matches('/'),
        );

        Ok(Self {
            client,
            url,
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl SnapshotReplicator for HttpReplicator {
    async fn replicate(&self, body: &[u8]) {
        let result = self
            .client
            .put(&self.url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %self.url, bytes = body.len(), "snapshot replicated");
            }
            Ok(response) => {
                tracing::warn!(
                    url = %self.url,
                    status = response.status().as_u16(),
                    "snapshot replication rejected, continuing"
                );
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "snapshot replication failed, continuing");
            }
        }
    }
}
