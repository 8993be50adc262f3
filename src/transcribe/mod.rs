//! Transcription pipeline.
//!
//! Fire-and-forget from the caller's perspective: submitting finalized
//! audio never blocks, and the transcript file is written independently
//! whenever (and only if) the service delivers a result marked final.
//! Interim results never touch disk. Service failures are logged and
//! dropped — nothing flows back to the caller. There is no timeout: a
//! stalled service leaves that one memory without a transcript forever,
//! without affecting any other memory.

pub mod whisper;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::MemoryId;
use crate::store::naming;

pub use whisper::WhisperService;

/// One event in a transcription attempt's stream: zero or more interim
/// results, then at most one final result or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Non-authoritative partial text. Never persisted.
    Interim(String),

    /// The authoritative end state for the submitted clip.
    Final(String),

    /// Service-reported failure; no transcript for this attempt.
    Failed(String),
}

/// Error submitting audio to the transcription service.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Transcription service error: {0}")]
    Service(String),
}

/// Speech-to-text collaborator: audio file in, event stream out.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit an audio file and subscribe to its result events. The
    /// sender side closing without a `Final` or `Failed` event means
    /// the attempt produced no result.
    async fn submit(&self, audio: &Path)
        -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptionError>;
}

/// Spawns and tracks transcription attempts against a storage root.
pub struct Transcriber {
    root: PathBuf,
    service: Arc<dyn TranscriptionService>,
}

impl Transcriber {
    pub fn new(root: impl Into<PathBuf>, service: Arc<dyn TranscriptionService>) -> Self {
        Self {
            root: root.into(),
            service,
        }
    }

    /// Kick off transcription for `target`'s audio. Returns immediately;
    /// the handle is a cancellable subscription to the attempt.
    pub fn spawn(&self, target: MemoryId) -> TranscribeHandle {
        let root = self.root.clone();
        let service = self.service.clone();
        let task_target = target.clone();

        let task = tokio::spawn(async move {
            run_attempt(root, service, task_target).await;
        });

        TranscribeHandle { target, task }
    }
}

/// One transcription attempt: submit, consume events, write on final.
async fn run_attempt(root: PathBuf, service: Arc<dyn TranscriptionService>, target: MemoryId) {
    let audio = naming::audio_path(&root, &target);

    let mut events = match service.submit(&audio).await {
        Ok(events) => events,
        Err(e) => {
            tracing::warn!("Transcription submit failed for {}: {}", target, e);
            return;
        }
    };

    while let Some(event) = events.recv().await {
        match event {
            TranscriptEvent::Interim(text) => {
                tracing::debug!("Interim transcript for {} ({} chars)", target, text.len());
            }
            TranscriptEvent::Final(text) => {
                let path = naming::transcript_path(&root, &target);
                match tokio::fs::write(&path, &text).await {
                    Ok(()) => tracing::info!("Transcript written for {}", target),
                    Err(e) => {
                        tracing::warn!("Failed to write transcript for {}: {}", target, e)
                    }
                }
                return;
            }
            TranscriptEvent::Failed(reason) => {
                tracing::warn!("Transcription failed for {}: {}", target, reason);
                return;
            }
        }
    }

    tracing::warn!("Transcription for {} ended without a final result", target);
}

/// Handle to an in-flight transcription attempt.
///
/// Dropping the handle does not stop the attempt — the eventual write is
/// idempotent and scoped to its own memory, so abandonment is safe.
pub struct TranscribeHandle {
    target: MemoryId,
    task: tokio::task::JoinHandle<()>,
}

impl TranscribeHandle {
    /// The memory this attempt belongs to.
    pub fn target(&self) -> &MemoryId {
        &self.target
    }

    /// Cancel the subscription; no transcript will be written by this
    /// attempt.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the attempt to finish (used by the CLI and tests; the
    /// core never blocks on this).
    pub async fn wait(self) {
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Service whose event stream is driven manually by the test.
    struct ScriptedService {
        sender: Mutex<Option<mpsc::Sender<TranscriptEvent>>>,
        handout: Mutex<Option<mpsc::Receiver<TranscriptEvent>>>,
    }

    impl ScriptedService {
        fn new() -> (Arc<Self>, mpsc::Sender<TranscriptEvent>) {
            let (tx, rx) = mpsc::channel(8);
            let service = Arc::new(Self {
                sender: Mutex::new(Some(tx.clone())),
                handout: Mutex::new(Some(rx)),
            });
            (service, tx)
        }
    }

    #[async_trait]
    impl TranscriptionService for ScriptedService {
        async fn submit(
            &self,
            _audio: &Path,
        ) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptionError> {
            drop(self.sender.lock().await.take());
            self.handout
                .lock()
                .await
                .take()
                .ok_or_else(|| TranscriptionError::Service("already submitted".into()))
        }
    }

    #[tokio::test]
    async fn test_final_event_writes_transcript() {
        let temp = TempDir::new().unwrap();
        let (service, tx) = ScriptedService::new();
        let transcriber = Transcriber::new(temp.path(), service);

        let target = MemoryId::new("memory-1");
        let handle = transcriber.spawn(target.clone());

        tx.send(TranscriptEvent::Final("hello".into()))
            .await
            .unwrap();
        handle.wait().await;

        let path = naming::transcript_path(temp.path(), &target);
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_interim_events_never_write() {
        let temp = TempDir::new().unwrap();
        let (service, tx) = ScriptedService::new();
        let transcriber = Transcriber::new(temp.path(), service);

        let target = MemoryId::new("memory-1");
        let handle = transcriber.spawn(target.clone());

        for text in ["h", "he", "hel"] {
            tx.send(TranscriptEvent::Interim(text.into())).await.unwrap();
        }

        // Let the pipeline drain the interim events.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let path = naming::transcript_path(temp.path(), &target);
        assert!(!path.exists(), "interim results must not produce a write");

        tx.send(TranscriptEvent::Final("hello".into()))
            .await
            .unwrap();
        handle.wait().await;

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_failed_event_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let (service, tx) = ScriptedService::new();
        let transcriber = Transcriber::new(temp.path(), service);

        let target = MemoryId::new("memory-1");
        let handle = transcriber.spawn(target.clone());

        tx.send(TranscriptEvent::Failed("no speech detected".into()))
            .await
            .unwrap();
        handle.wait().await;

        assert!(!naming::transcript_path(temp.path(), &target).exists());
    }

    #[tokio::test]
    async fn test_stream_ending_without_final_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let (service, tx) = ScriptedService::new();
        let transcriber = Transcriber::new(temp.path(), service);

        let target = MemoryId::new("memory-1");
        let handle = transcriber.spawn(target.clone());

        tx.send(TranscriptEvent::Interim("partial".into()))
            .await
            .unwrap();
        drop(tx);
        handle.wait().await;

        assert!(!naming::transcript_path(temp.path(), &target).exists());
    }

    #[tokio::test]
    async fn test_cancel_abandons_attempt() {
        let temp = TempDir::new().unwrap();
        let (service, tx) = ScriptedService::new();
        let transcriber = Transcriber::new(temp.path(), service);

        let target = MemoryId::new("memory-1");
        let handle = transcriber.spawn(target.clone());
        handle.cancel();

        // A final result arriving after cancellation is dropped.
        let _ = tx.send(TranscriptEvent::Final("too late".into())).await;
        handle.wait().await;

        assert!(!naming::transcript_path(temp.path(), &target).exists());
    }
}
