//! memento - photo + voice-annotation memory lifecycle manager
//!
//! Each *memory* is a virtual aggregate of up to four files in a flat
//! storage root sharing a base identifier: a thumbnail (whose presence
//! defines the memory's existence), a full-size image, an optional
//! audio annotation, and an optional transcript.
//!
//! # Architecture
//!
//! - Capture ingest writes the image + thumbnail pair under a fresh id
//! - The registry is rebuilt by rescanning, never diffed
//! - The recorder holds at most one session, recording into a shared
//!   temporary slot
//! - The finalizer moves a completed recording into the memory's audio
//!   slot (latest annotation wins)
//! - The transcription pipeline runs fire-and-forget and writes the
//!   transcript only when a final result arrives
//!
//! # Modules
//!
//! - `store`: path convention, directory scanner, registry
//! - `capture`: image ingest and thumbnailing
//! - `record`: capture device seam, recorder, finalizer
//! - `transcribe`: transcription pipeline and whisper backend
//! - `session`: the facade exposed to a presentation layer
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Capture an image as a new memory
//! memento capture photo.jpg
//!
//! # List memories
//! memento list
//!
//! # Attach and transcribe a voice annotation
//! memento annotate memory-1700000000 --input note.m4a
//! ```

pub mod capture;
pub mod cli;
pub mod config;
pub mod domain;
pub mod record;
pub mod session;
pub mod store;
pub mod transcribe;

// Re-export main types at crate root for convenience
pub use capture::{IngestError, JpegThumbnailer, ThumbnailGenerator};
pub use domain::{Artifacts, Memory, MemoryId};
pub use record::{CaptureDevice, FileCaptureDevice, FinalizeError, Recorder, RecorderError};
pub use session::{AnnotationError, MemorySession};
pub use store::MemoryRegistry;
pub use transcribe::{
    TranscribeHandle, Transcriber, TranscriptEvent, TranscriptionError, TranscriptionService,
};
