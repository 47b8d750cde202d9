use std::path::PathBuf;

/// Remote object-store replication settings.
///
/// Presence of this config selects the real replicator at startup; absence
/// selects the no-op replicator and disables the interface entirely.
#[derive(Clone)]
pub struct ReplicaConfig {
    /// Object-store endpoint, e.g. `https://objects.example.com`.
    pub endpoint: String,
    pub bucket: String,
    /// Bearer token used to authenticate uploads.
    pub access_token: String,
    /// Fixed object key receiving the snapshot on every publish.
    pub object_key: String,
}

#[derive(Clone)]
pub struct AppConfig {
    /// Destination path of the published snapshot (`deals.json`).
    pub deals_path: PathBuf,
    /// Path to the YAML category catalog.
    pub categories_path: PathBuf,
    /// Site base URL used to absolutize relative product URLs.
    pub base_url: String,
    /// Upstream paginated search endpoint.
    pub search_api_url: String,
    /// Requested page size; the client clamps this to the upstream maximum.
    pub page_size: u32,
    /// Cap on pages walked per category, protecting against runaway categories.
    pub max_pages: u32,
    /// Cooperative pause between page fetches within a category.
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient page errors.
    pub max_retries: u32,
    /// Base delay for exponential retry backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    pub log_level: String,
    pub replica: Option<ReplicaConfig>,
}

impl std::fmt::Debug for ReplicaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicaConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("access_token", &"[redacted]")
            .field("object_key", &self.object_key)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("deals_path", &self.deals_path)
            .field("categories_path", &self.categories_path)
            .field("base_url", &self.base_url)
            .field("search_api_url", &self.search_api_url)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("log_level", &self.log_level)
            .field("replica", &self.replica)
            .finish()
    }
}
