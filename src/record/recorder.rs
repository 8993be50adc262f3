//! Exclusive voice annotation recorder.
//!
//! State machine: Idle → Recording → (Stopped | Failed). At most one
//! session is active at a time, bound to exactly one target memory.
//! Recordings always go to the shared temporary slot, never directly
//! into a memory's audio path — in-progress capture must not affect a
//! memory's visible, completed state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::MemoryId;
use crate::record::device::{CaptureDevice, DeviceError};
use crate::store::naming;

/// Errors from the recorder.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("A recording session is already active for {0}")]
    AlreadyRecording(MemoryId),

    #[error("No recording session is active")]
    NotRecording,

    #[error("Capture device error: {0}")]
    Device(#[from] DeviceError),
}

/// The transient state of one in-flight recording.
#[derive(Debug, Clone)]
pub struct RecorderSession {
    /// The memory this recording will be attached to.
    pub target: MemoryId,
    pub started_at: DateTime<Utc>,
}

/// Manages the single in-flight recording session.
pub struct Recorder {
    root: PathBuf,
    device: Arc<dyn CaptureDevice>,
    session: Option<RecorderSession>,
}

impl Recorder {
    pub fn new(root: impl Into<PathBuf>, device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            root: root.into(),
            device,
            session: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// The target of the active session, if one exists.
    pub fn active_target(&self) -> Option<&MemoryId> {
        self.session.as_ref().map(|s| &s.target)
    }

    /// Begin recording an annotation for `target`.
    ///
    /// Exclusivity is a caller error, not a queue: a second `begin`
    /// while a session is active fails with `AlreadyRecording` and
    /// leaves the original session untouched.
    pub async fn begin(&mut self, target: MemoryId) -> Result<(), RecorderError> {
        if let Some(active) = &self.session {
            return Err(RecorderError::AlreadyRecording(active.target.clone()));
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            return Err(RecorderError::Device(DeviceError::new(format!(
                "Storage root unavailable: {}",
                e
            ))));
        }

        let destination = naming::temp_recording_path(&self.root);
        self.device.start(&destination).await?;

        tracing::info!("Recording annotation for {}", target);
        self.session = Some(RecorderSession {
            target,
            started_at: Utc::now(),
        });

        Ok(())
    }

    /// Stop the active session.
    ///
    /// Stops the capture hardware and destroys the session. On
    /// `success=true` returns the target memory so the caller can
    /// finalize; on `success=false` the temporary recording is simply
    /// abandoned and `None` is returned.
    pub async fn stop(&mut self, success: bool) -> Result<Option<MemoryId>, RecorderError> {
        let session = self.session.take().ok_or(RecorderError::NotRecording)?;

        self.device.stop().await?;

        if success {
            tracing::debug!("Recording for {} stopped cleanly", session.target);
            Ok(Some(session.target))
        } else {
            tracing::warn!("Recording for {} stopped as failed", session.target);
            Ok(None)
        }
    }

    /// The capture hardware asynchronously reported a non-successful
    /// completion: force-stop the session, skipping finalization.
    pub async fn device_failure(&mut self) -> Result<(), RecorderError> {
        self.stop(false).await.map(|_| ())
    }

    /// The storage root this recorder records under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    /// Device that records bytes handed to it at construction.
    struct ScriptedDevice {
        bytes: Vec<u8>,
        destination: tokio::sync::Mutex<Option<PathBuf>>,
        fail_start: AtomicBool,
    }

    impl ScriptedDevice {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                destination: tokio::sync::Mutex::new(None),
                fail_start: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl CaptureDevice for ScriptedDevice {
        async fn start(&self, destination: &Path) -> Result<(), DeviceError> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(DeviceError::new("input unavailable"));
            }
            *self.destination.lock().await = Some(destination.to_path_buf());
            Ok(())
        }

        async fn stop(&self) -> Result<(), DeviceError> {
            if let Some(dest) = self.destination.lock().await.take() {
                tokio::fs::write(&dest, &self.bytes)
                    .await
                    .map_err(|e| DeviceError::new(e.to_string()))?;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_begin_is_exclusive() {
        let temp = TempDir::new().unwrap();
        let device = Arc::new(ScriptedDevice::new(b"audio"));
        let mut recorder = Recorder::new(temp.path(), device);

        recorder.begin(MemoryId::new("memory-1")).await.unwrap();

        let err = recorder.begin(MemoryId::new("memory-2")).await.unwrap_err();
        assert!(matches!(err, RecorderError::AlreadyRecording(ref id) if id.as_str() == "memory-1"));

        // Original session still active.
        assert_eq!(recorder.active_target().unwrap().as_str(), "memory-1");
    }

    #[tokio::test]
    async fn test_stop_success_returns_target() {
        let temp = TempDir::new().unwrap();
        let device = Arc::new(ScriptedDevice::new(b"audio"));
        let mut recorder = Recorder::new(temp.path(), device);

        recorder.begin(MemoryId::new("memory-1")).await.unwrap();
        let target = recorder.stop(true).await.unwrap();

        assert_eq!(target.unwrap().as_str(), "memory-1");
        assert!(!recorder.is_recording());

        // Recording landed in the shared temp slot.
        let temp_path = naming::temp_recording_path(temp.path());
        assert_eq!(std::fs::read(temp_path).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn test_stop_failure_skips_finalization() {
        let temp = TempDir::new().unwrap();
        let device = Arc::new(ScriptedDevice::new(b"audio"));
        let mut recorder = Recorder::new(temp.path(), device);

        recorder.begin(MemoryId::new("memory-1")).await.unwrap();
        let target = recorder.stop(false).await.unwrap();

        assert!(target.is_none());
        assert!(!recorder.is_recording());
    }

    #[tokio::test]
    async fn test_stop_without_session() {
        let temp = TempDir::new().unwrap();
        let device = Arc::new(ScriptedDevice::new(b"audio"));
        let mut recorder = Recorder::new(temp.path(), device);

        let err = recorder.stop(true).await.unwrap_err();
        assert!(matches!(err, RecorderError::NotRecording));
    }

    #[tokio::test]
    async fn test_begin_device_failure_leaves_idle() {
        let temp = TempDir::new().unwrap();
        let device = Arc::new(ScriptedDevice::new(b"audio"));
        device.fail_start.store(true, Ordering::SeqCst);
        let mut recorder = Recorder::new(temp.path(), device.clone());

        let err = recorder.begin(MemoryId::new("memory-1")).await.unwrap_err();
        assert!(matches!(err, RecorderError::Device(_)));
        assert!(!recorder.is_recording());

        // Recovers once the device does.
        device.fail_start.store(false, Ordering::SeqCst);
        recorder.begin(MemoryId::new("memory-1")).await.unwrap();
        assert!(recorder.is_recording());
    }
}
