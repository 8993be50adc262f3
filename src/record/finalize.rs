//! Annotation finalizer.
//!
//! Moves a completed temporary recording into the target memory's
//! permanent audio slot. Finalization always represents the latest
//! annotation: a pre-existing audio file is deleted first, then the
//! temp recording is renamed into place (move, not copy — the replace
//! is as atomic as the filesystem makes it, and disk usage never
//! doubles). Any step failure aborts the rest; there is no retry.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::MemoryId;
use crate::store::naming;

/// Error replacing the audio slot during finalization.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Failed to replace annotation audio: {0}")]
    Replace(#[source] std::io::Error),
}

/// Relocate the temporary recording into `target`'s audio slot.
///
/// Returns the destination path on success so the caller can hand it to
/// the transcription pipeline.
pub async fn finalize(root: &Path, target: &MemoryId) -> Result<PathBuf, FinalizeError> {
    let destination = naming::audio_path(root, target);
    let recording = naming::temp_recording_path(root);

    // Latest annotation wins: clear any prior audio before the move.
    match tokio::fs::remove_file(&destination).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FinalizeError::Replace(e)),
    }

    tokio::fs::rename(&recording, &destination)
        .await
        .map_err(FinalizeError::Replace)?;

    tracing::info!("Annotation finalized for {}", target);

    Ok(destination)
}
