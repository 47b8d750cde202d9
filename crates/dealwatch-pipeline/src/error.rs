use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build replicator client: {0}")]
    ReplicatorClient(#[source] reqwest::Error),

    #[error("failed to build search client: {0}")]
    ClientBuild(#[from] dealwatch_scraper::ScraperError),
}
