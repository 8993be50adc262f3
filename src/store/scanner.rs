//! Memory directory scanner.
//!
//! Lists the storage root and recovers memory identifiers from the
//! thumbnail naming convention. Thumbnail presence is the sole existence
//! signal: a partially-written memory whose thumbnail write failed is
//! invisible here, by design.

use std::path::Path;

use crate::domain::{Artifacts, Memory, MemoryId};
use crate::store::naming;

/// Scan the storage root and materialize all memories found there.
///
/// Order is whatever the directory enumeration yields; callers needing a
/// deterministic display order must sort explicitly.
///
/// Fails softly: an unlistable root (missing, permission denied — e.g. a
/// fresh install with no storage initialized yet) degrades to an empty
/// listing rather than an error.
pub async fn scan(root: &Path) -> Vec<Memory> {
    let mut memories = Vec::new();

    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Storage root {} not listable: {}", root.display(), e);
            return memories;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Error listing {}: {}", root.display(), e);
                break;
            }
        };

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        // Count each memory exactly once, via its thumbnail.
        let Some(base) = name.strip_suffix(naming::THUMBNAIL_SUFFIX) else {
            continue;
        };
        if base.is_empty() {
            continue;
        }

        let id = MemoryId::new(base);
        let artifacts = probe_artifacts(root, &id);
        memories.push(Memory::new(id, artifacts));
    }

    memories
}

/// Check which optional artifact files exist alongside the thumbnail.
fn probe_artifacts(root: &Path, id: &MemoryId) -> Artifacts {
    Artifacts {
        image: naming::image_path(root, id).exists(),
        audio: naming::audio_path(root, id).exists(),
        transcript: naming::transcript_path(root, id).exists(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_missing_root_is_empty() {
        let memories = scan(Path::new("/nonexistent/memento-test")).await;
        assert!(memories.is_empty());
    }

    #[tokio::test]
    async fn test_scan_keys_on_thumbnail_only() {
        let temp = TempDir::new().unwrap();

        // A complete memory.
        tokio::fs::write(temp.path().join("memory-100.thumb"), b"t")
            .await
            .unwrap();
        tokio::fs::write(temp.path().join("memory-100.jpg"), b"i")
            .await
            .unwrap();

        // Audio + transcript without a thumbnail: must not appear.
        tokio::fs::write(temp.path().join("memory-200.m4a"), b"a")
            .await
            .unwrap();
        tokio::fs::write(temp.path().join("memory-200.txt"), b"x")
            .await
            .unwrap();

        // Unrelated file.
        tokio::fs::write(temp.path().join("recording.m4a"), b"r")
            .await
            .unwrap();

        let memories = scan(temp.path()).await;
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].id.as_str(), "memory-100");
    }

    #[tokio::test]
    async fn test_scan_probes_artifacts() {
        let temp = TempDir::new().unwrap();

        tokio::fs::write(temp.path().join("memory-300.thumb"), b"t")
            .await
            .unwrap();
        tokio::fs::write(temp.path().join("memory-300.jpg"), b"i")
            .await
            .unwrap();
        tokio::fs::write(temp.path().join("memory-300.m4a"), b"a")
            .await
            .unwrap();

        let memories = scan(temp.path()).await;
        assert_eq!(memories.len(), 1);

        let artifacts = memories[0].artifacts;
        assert!(artifacts.image);
        assert!(artifacts.audio);
        assert!(!artifacts.transcript);
    }
}
