//! Session facade: the surface the presentation layer talks to.
//!
//! Owns the registry, the recorder, and the transcription pipeline for
//! one foreground user session. Single-writer by assumption — nothing
//! here locks the storage root against other processes.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::capture::{self, IngestError, JpegThumbnailer, ThumbnailGenerator};
use crate::config::CaptureSettings;
use crate::domain::{Memory, MemoryId};
use crate::record::{self, CaptureDevice, FinalizeError, Recorder, RecorderError};
use crate::store::MemoryRegistry;
use crate::transcribe::{TranscribeHandle, Transcriber, TranscriptionService};

/// Errors from stopping an annotation (recording or finalize step).
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

/// One foreground session over a storage root.
pub struct MemorySession {
    root: PathBuf,
    settings: CaptureSettings,
    registry: MemoryRegistry,
    recorder: Recorder,
    transcriber: Transcriber,
    thumbnailer: Arc<dyn ThumbnailGenerator>,
}

impl MemorySession {
    /// Open a session over `root` with the given collaborators,
    /// building the initial memory index by scanning.
    pub async fn open(
        root: impl Into<PathBuf>,
        settings: CaptureSettings,
        device: Arc<dyn CaptureDevice>,
        service: Arc<dyn TranscriptionService>,
    ) -> Self {
        let root = root.into();
        let registry = MemoryRegistry::load(&root).await;

        Self {
            settings,
            registry,
            recorder: Recorder::new(&root, device),
            transcriber: Transcriber::new(&root, service),
            thumbnailer: Arc::new(JpegThumbnailer::new(settings.jpeg_quality)),
            root,
        }
    }

    /// Replace the default thumbnailer.
    pub fn with_thumbnailer(mut self, thumbnailer: Arc<dyn ThumbnailGenerator>) -> Self {
        self.thumbnailer = thumbnailer;
        self
    }

    /// All known memories, in scan order.
    pub fn list_memories(&self) -> &[Memory] {
        self.registry.list()
    }

    /// Look up one memory.
    pub fn get_memory(&self, id: &MemoryId) -> Option<&Memory> {
        self.registry.get(id)
    }

    /// Rebuild the memory index from disk.
    pub async fn reload(&mut self) {
        self.registry.reload().await;
    }

    /// Ingest a captured image as a new memory, then rebuild the index
    /// so the new memory is visible.
    pub async fn ingest_capture(&mut self, image_bytes: &[u8]) -> Result<MemoryId, IngestError> {
        let id = capture::ingest(
            &self.root,
            image_bytes,
            self.thumbnailer.as_ref(),
            self.settings,
        )
        .await?;

        self.registry.reload().await;
        Ok(id)
    }

    /// Begin recording a voice annotation for `id`.
    pub async fn begin_annotation(&mut self, id: MemoryId) -> Result<(), RecorderError> {
        self.recorder.begin(id).await
    }

    /// Stop the active annotation.
    ///
    /// On `success=true`, finalizes the recording into the memory's
    /// audio slot and kicks off transcription; the returned handle is a
    /// cancellable subscription to that attempt. On `success=false` the
    /// recording is abandoned and `Ok(None)` is returned.
    pub async fn stop_annotation(
        &mut self,
        success: bool,
    ) -> Result<Option<TranscribeHandle>, AnnotationError> {
        let Some(target) = self.recorder.stop(success).await? else {
            return Ok(None);
        };

        record::finalize(&self.root, &target).await?;
        self.registry.reload().await;

        Ok(Some(self.transcriber.spawn(target)))
    }

    /// The capture device reported a mid-recording failure: force-stop
    /// without finalizing.
    pub async fn annotation_device_failure(&mut self) -> Result<(), RecorderError> {
        self.recorder.device_failure().await
    }

    /// Whether an annotation recording is currently active.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// The target of the active recording, if any.
    pub fn active_annotation(&self) -> Option<&MemoryId> {
        self.recorder.active_target()
    }
}
