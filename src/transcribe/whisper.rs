//! Whisper transcription backend.
//!
//! Shells out to a local whisper binary and adapts its one-shot output
//! to the event stream the pipeline consumes: a single `Final` on
//! success, a single `Failed` otherwise. Whisper produces no interim
//! results.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::mpsc;

use super::{TranscriptEvent, TranscriptionError, TranscriptionService};

/// Whisper output JSON structure
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
}

/// Transcription service backed by a local whisper binary.
pub struct WhisperService {
    binary: PathBuf,
    model: String,
}

impl WhisperService {
    /// Use the binary at `WHISPER_PATH` (or `whisper` on the PATH) with
    /// the given model.
    pub fn new(model: impl Into<String>) -> Self {
        let binary = std::env::var("WHISPER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("whisper"));

        Self {
            binary,
            model: model.into(),
        }
    }

    pub fn with_binary(binary: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TranscriptionService for WhisperService {
    async fn submit(
        &self,
        audio: &Path,
    ) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptionError> {
        if !audio.exists() {
            return Err(TranscriptionError::Service(format!(
                "Audio not found: {}",
                audio.display()
            )));
        }

        let (tx, rx) = mpsc::channel(2);
        let binary = self.binary.clone();
        let model = self.model.clone();
        let audio = audio.to_path_buf();

        tokio::spawn(async move {
            let event = match run_whisper(&binary, &model, &audio).await {
                Ok(text) => TranscriptEvent::Final(text),
                Err(e) => TranscriptEvent::Failed(format!("{:#}", e)),
            };
            let _ = tx.send(event).await;
        });

        Ok(rx)
    }
}

/// Run whisper and return the transcript text.
async fn run_whisper(binary: &Path, model: &str, audio: &Path) -> Result<String> {
    // Temp dir for whisper's JSON output
    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;

    let output = Command::new(binary)
        .arg(audio)
        .arg("--model")
        .arg(model)
        .arg("--output_dir")
        .arg(temp_dir.path())
        .arg("--output_format")
        .arg("json")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .context("Failed to run whisper")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Whisper failed: {}", stderr);
    }

    let stem = audio.file_stem().unwrap_or_default().to_string_lossy();
    let json_path = temp_dir.path().join(format!("{}.json", stem));

    let json_content = tokio::fs::read_to_string(&json_path)
        .await
        .context("Failed to read whisper output")?;

    let whisper: WhisperOutput =
        serde_json::from_str(&json_content).context("Failed to parse whisper JSON")?;

    Ok(whisper.text.trim().to_string())
}
