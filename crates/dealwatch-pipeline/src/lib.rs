pub mod error;
pub mod history;
pub mod merge;
pub mod publish;
pub mod replicate;
pub mod run;

pub use error::PipelineError;
pub use history::{stamp_last_updated, PreviousLookup};
pub use merge::dedup_and_sort;
pub use publish::publish_snapshot;
pub use replicate::{HttpReplicator, NoopReplicator, SnapshotReplicator};
pub use run::{Pipeline, RunOutcome, RunReport};
