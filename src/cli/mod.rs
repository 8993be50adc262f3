//! Command-line interface for memento.
//!
//! Provides commands for listing memories, capturing images, attaching
//! voice annotations (with transcription), and inspecting configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::capture::JpegThumbnailer;
use crate::config;
use crate::domain::MemoryId;
use crate::record::FileCaptureDevice;
use crate::session::MemorySession;
use crate::store::{naming, scanner};
use crate::transcribe::WhisperService;

/// memento - photo + voice-annotation memory manager
#[derive(Parser, Debug)]
#[command(name = "memento")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List memories in the storage root
    List {
        /// Maximum number of memories to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Capture an image file as a new memory
    Capture {
        /// Path to the source image
        image: PathBuf,
    },

    /// Attach a voice annotation to a memory and transcribe it
    Annotate {
        /// Memory identifier (e.g. memory-1700000000)
        id: String,

        /// Audio file to record from
        #[arg(short, long)]
        input: PathBuf,

        /// Whisper model for transcription
        #[arg(long, default_value = "base")]
        model: String,

        /// Skip waiting for the transcription to complete
        #[arg(long)]
        no_wait: bool,
    },

    /// Show one memory's artifacts and transcript
    Show {
        /// Memory identifier
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::List { limit } => execute_list(limit).await,
            Commands::Capture { image } => execute_capture(image).await,
            Commands::Annotate {
                id,
                input,
                model,
                no_wait,
            } => execute_annotate(id, input, model, no_wait).await,
            Commands::Show { id } => execute_show(id).await,
            Commands::Config => execute_config(),
        }
    }
}

async fn execute_list(limit: usize) -> Result<()> {
    let root = config::storage_root()?;
    let memories = scanner::scan(&root).await;

    if memories.is_empty() {
        println!("No memories in {}", root.display());
        return Ok(());
    }

    println!("Memories in {}:", root.display());
    for memory in memories.iter().take(limit) {
        let audio = if memory.artifacts.audio { "audio" } else { "-" };
        let transcript = if memory.artifacts.transcript {
            "transcript"
        } else {
            "-"
        };
        println!("  {}  [{} {}]", memory.id, audio, transcript);
    }

    if memories.len() > limit {
        println!("  ... and {} more", memories.len() - limit);
    }

    Ok(())
}

async fn execute_capture(image: PathBuf) -> Result<()> {
    let root = config::storage_root()?;
    let settings = config::capture_settings()?;

    let bytes = tokio::fs::read(&image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let thumbnailer = JpegThumbnailer::new(settings.jpeg_quality);
    let id = crate::capture::ingest(&root, &bytes, &thumbnailer, settings)
        .await
        .context("Failed to ingest capture")?;

    println!("Captured {}", id);
    Ok(())
}

async fn execute_annotate(id: String, input: PathBuf, model: String, no_wait: bool) -> Result<()> {
    let root = config::storage_root()?;
    let settings = config::capture_settings()?;
    let target = MemoryId::new(id);

    let device = Arc::new(FileCaptureDevice::new(&input));
    let service = Arc::new(WhisperService::new(model));

    let mut session = MemorySession::open(&root, settings, device, service).await;

    if session.get_memory(&target).is_none() {
        anyhow::bail!("No such memory: {}", target);
    }

    session.begin_annotation(target.clone()).await?;
    let handle = session
        .stop_annotation(true)
        .await
        .context("Failed to finalize annotation")?;

    println!("Annotation saved for {}", target);

    if let Some(handle) = handle {
        if no_wait {
            println!("Transcription running in the background");
        } else {
            handle.wait().await;
            let transcript_path = naming::transcript_path(&root, &target);
            match tokio::fs::read_to_string(&transcript_path).await {
                Ok(text) => println!("Transcript: {}", text),
                Err(_) => println!("No transcript produced"),
            }
        }
    }

    Ok(())
}

async fn execute_show(id: String) -> Result<()> {
    let root = config::storage_root()?;
    let target = MemoryId::new(id);

    let memories = scanner::scan(&root).await;
    let Some(memory) = memories.iter().find(|m| m.id == target) else {
        anyhow::bail!("No such memory: {}", target);
    };

    println!("{}", memory.id);
    println!(
        "  image:      {}",
        artifact_line(memory.artifacts.image, &naming::image_path(&root, &target))
    );
    println!(
        "  thumbnail:  {}",
        naming::thumbnail_path(&root, &target).display()
    );
    println!(
        "  audio:      {}",
        artifact_line(memory.artifacts.audio, &naming::audio_path(&root, &target))
    );

    if memory.artifacts.transcript {
        let text = tokio::fs::read_to_string(naming::transcript_path(&root, &target))
            .await
            .unwrap_or_default();
        println!("  transcript: {}", text);
    } else {
        println!("  transcript: (none)");
    }

    Ok(())
}

fn artifact_line(present: bool, path: &std::path::Path) -> String {
    if present {
        path.display().to_string()
    } else {
        "(missing)".to_string()
    }
}

fn execute_config() -> Result<()> {
    let config = config::config()?;

    println!("Resolved configuration:");
    println!("  home:            {}", config.home.display());
    println!(
        "  storage root:    {}",
        config.home.join("memories").display()
    );
    match &config.config_file {
        Some(path) => println!("  config file:     {}", path.display()),
        None => println!("  config file:     (none)"),
    }
    println!(
        "  thumbnail width: {}",
        config.capture.thumbnail_width
    );
    println!("  jpeg quality:    {}", config.capture.jpeg_quality);

    Ok(())
}
