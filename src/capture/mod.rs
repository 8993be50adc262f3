//! Capture ingest: turn raw image bytes into a new memory.
//!
//! Writes the full-size JPEG and the thumbnail under a freshly allocated
//! base identifier. The two writes are independent: a thumbnail failure
//! after a successful image write leaves an orphaned full-size image
//! that the scanner never sees (thumbnail presence is the existence
//! signal). That inconsistency is accepted, not reconciled.

pub mod thumbnail;

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use crate::config::CaptureSettings;
use crate::domain::MemoryId;
use crate::store::naming;

pub use thumbnail::{encode_jpeg, JpegThumbnailer, ThumbnailError, ThumbnailGenerator};

/// Errors that can occur during capture ingest.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to encode image: {0}")]
    Encoding(#[from] ThumbnailError),

    #[error("Failed to persist artifact: {0}")]
    Persist(#[from] std::io::Error),
}

/// Ingest raw image bytes as a new memory.
///
/// Encodes the source as JPEG at the configured quality, generates a
/// thumbnail at the configured width, and writes both files. Returns
/// the allocated identifier. On failure, already-written artifacts are
/// left in place; there is no rollback.
pub async fn ingest(
    root: &Path,
    image_bytes: &[u8],
    thumbnailer: &dyn ThumbnailGenerator,
    settings: CaptureSettings,
) -> Result<MemoryId, IngestError> {
    tokio::fs::create_dir_all(root).await?;

    let id = allocate_id(root);

    // Encode both artifacts before touching the filesystem, so a bad
    // source image surfaces as Encoding without leaving files behind.
    let jpeg = encode_jpeg(image_bytes, settings.jpeg_quality)?;
    let thumb = thumbnailer.thumbnail(image_bytes, settings.thumbnail_width)?;

    tokio::fs::write(naming::image_path(root, &id), &jpeg).await?;
    tokio::fs::write(naming::thumbnail_path(root, &id), &thumb).await?;

    tracing::info!("Ingested new memory {} ({} bytes)", id, jpeg.len());

    Ok(id)
}

/// Allocate a base identifier from the capture wall-clock time.
///
/// Epoch seconds collide for same-second captures, so the identifier is
/// disambiguated with a counter suffix until the artifact slots are
/// free.
fn allocate_id(root: &Path) -> MemoryId {
    let base = MemoryId::from_timestamp(Utc::now());

    if !is_taken(root, &base) {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = base.with_counter(n);
        if !is_taken(root, &candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn is_taken(root: &Path, id: &MemoryId) -> bool {
    naming::thumbnail_path(root, id).exists() || naming::image_path(root, id).exists()
}
