//! Audio capture device seam.
//!
//! The recorder talks to hardware through [`CaptureDevice`] so tests and
//! the CLI can drive recording without a microphone.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Error reported by a capture device.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DeviceError(pub String);

impl DeviceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// An audio input that records into a destination file.
///
/// `start` configures the input and begins capturing into `destination`;
/// `stop` halts capture. The recording bytes must be present at the
/// destination once `stop` returns successfully.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn start(&self, destination: &Path) -> Result<(), DeviceError>;
    async fn stop(&self) -> Result<(), DeviceError>;
}

/// Capture device backed by a pre-existing audio file.
///
/// "Records" by copying the source file into the destination when the
/// session stops. Used by the CLI's annotate command and by tests.
pub struct FileCaptureDevice {
    source: PathBuf,
    destination: Mutex<Option<PathBuf>>,
}

impl FileCaptureDevice {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CaptureDevice for FileCaptureDevice {
    async fn start(&self, destination: &Path) -> Result<(), DeviceError> {
        if !self.source.exists() {
            return Err(DeviceError::new(format!(
                "Source audio not found: {}",
                self.source.display()
            )));
        }

        *self.destination.lock().await = Some(destination.to_path_buf());
        Ok(())
    }

    async fn stop(&self) -> Result<(), DeviceError> {
        let destination = self
            .destination
            .lock()
            .await
            .take()
            .ok_or_else(|| DeviceError::new("Device was not started"))?;

        tokio::fs::copy(&self.source, &destination)
            .await
            .map_err(|e| DeviceError::new(format!("Failed to deliver recording: {}", e)))?;

        Ok(())
    }
}
