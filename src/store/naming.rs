//! Artifact path convention.
//!
//! Single source of truth for the suffix scheme — import this instead of
//! hardcoding extensions, so the suffixes cannot drift between the
//! scanner, ingest, finalizer, and transcription pipeline.
//!
//! Layout of the (flat) storage root:
//!
//! ```text
//! <root>/memory-<epoch-secs>.jpg     full image
//! <root>/memory-<epoch-secs>.thumb   thumbnail (JPEG bytes)
//! <root>/memory-<epoch-secs>.m4a     audio annotation
//! <root>/memory-<epoch-secs>.txt     transcript (UTF-8)
//! <root>/recording.m4a               shared in-progress recording slot
//! ```

use std::path::{Path, PathBuf};

use crate::domain::MemoryId;

/// Suffix whose presence defines a memory's existence.
pub const THUMBNAIL_SUFFIX: &str = ".thumb";

/// Suffix of the full-size image.
pub const IMAGE_SUFFIX: &str = ".jpg";

/// Suffix of the audio annotation.
pub const AUDIO_SUFFIX: &str = ".m4a";

/// Suffix of the transcript.
pub const TRANSCRIPT_SUFFIX: &str = ".txt";

/// Filename of the single shared temporary recording, overwritten each
/// session. Recordings never target a memory's audio slot directly.
pub const TEMP_RECORDING: &str = "recording.m4a";

/// Path of the full-size image for a memory.
pub fn image_path(root: &Path, id: &MemoryId) -> PathBuf {
    artifact_path(root, id, IMAGE_SUFFIX)
}

/// Path of the thumbnail for a memory.
pub fn thumbnail_path(root: &Path, id: &MemoryId) -> PathBuf {
    artifact_path(root, id, THUMBNAIL_SUFFIX)
}

/// Path of the audio annotation for a memory.
pub fn audio_path(root: &Path, id: &MemoryId) -> PathBuf {
    artifact_path(root, id, AUDIO_SUFFIX)
}

/// Path of the transcript for a memory.
pub fn transcript_path(root: &Path, id: &MemoryId) -> PathBuf {
    artifact_path(root, id, TRANSCRIPT_SUFFIX)
}

/// Path of the shared temporary recording slot.
pub fn temp_recording_path(root: &Path) -> PathBuf {
    root.join(TEMP_RECORDING)
}

fn artifact_path(root: &Path, id: &MemoryId, suffix: &str) -> PathBuf {
    root.join(format!("{}{}", id.as_str(), suffix))
}
