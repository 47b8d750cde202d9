//! Crash-safe snapshot publication.
//!
//! The snapshot is written in full to a fresh temporary file in the
//! destination directory (same filesystem, so the final rename is atomic),
//! then renamed over the destination. A reader therefore always sees either
//! the complete old snapshot or the complete new one, never a partial file.
//! Staging and commit are separate steps so the crash-between-them case can
//! be exercised directly in tests.

use std::path::{Path, PathBuf};

use dealwatch_core::Deal;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::PipelineError;

/// Serializes `deals` and atomically replaces the file at `path` with the
/// result, returning the serialized bytes for reuse (e.g. replication).
///
/// On any failure the temporary file is removed, the destination is left
/// untouched, and the error propagates — snapshot correctness is never
/// traded for availability.
///
/// # Errors
///
/// Returns [`PipelineError::Serialize`] or [`PipelineError::Io`].
pub async fn publish_snapshot(path: &Path, deals: &[Deal]) -> Result<Vec<u8>, PipelineError> {
    let body = serde_json::to_vec_pretty(deals)?;
    let staged = stage_snapshot(path, &body).await?;
    commit_snapshot(&staged, path).await?;
    tracing::info!(
        path = %path.display(),
        deals = deals.len(),
        bytes = body.len(),
        "snapshot published"
    );
    Ok(body)
}

fn io_error(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Writes the serialized snapshot to a fresh temp file next to `dest`,
/// creating parent directories as needed. The temp file name embeds the
/// process id plus a timestamp; the publisher assumes a single writer, so
/// this only has to avoid colliding with leftovers of crashed runs.
pub(crate) async fn stage_snapshot(dest: &Path, body: &[u8]) -> Result<PathBuf, PipelineError> {
    let parent = dest.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    fs::create_dir_all(&parent)
        .await
        .map_err(|e| io_error(&parent, e))?;

    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("snapshot");
    let temp_path = parent.join(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    ));

    let result = async {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .await?;
        file.write_all(body).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    match result {
        Ok(()) => Ok(temp_path),
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(io_error(&temp_path, e))
        }
    }
}

/// Atomically replaces `dest` with the staged temp file. On failure the
/// temp file is removed and `dest` keeps its previous contents.
pub(crate) async fn commit_snapshot(staged: &Path, dest: &Path) -> Result<(), PipelineError> {
    if let Err(e) = fs::rename(staged, dest).await {
        let _ = fs::remove_file(staged).await;
        return Err(io_error(dest, e));
    }
    Ok(())
}
