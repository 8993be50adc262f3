//! The memory aggregate and its identity.
//!
//! A memory is not a single file: it is up to four files in the storage
//! root sharing a base name (`memory-<epoch-secs>`), distinguished only
//! by suffix. The scanner materializes that convention into an explicit
//! `Memory` value so consumers don't re-derive it from the filesystem.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix shared by every memory base identifier.
pub const ID_PREFIX: &str = "memory-";

/// Base identifier of a memory: the filename stem shared by all of its
/// artifact files. Chosen at capture time, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(String);

impl MemoryId {
    /// Wrap an existing base name (e.g. recovered by the scanner).
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Derive a fresh identifier from a capture timestamp.
    ///
    /// Epoch seconds alone can collide for same-second captures; callers
    /// that need uniqueness disambiguate with [`MemoryId::with_counter`].
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(format!("{}{}", ID_PREFIX, at.timestamp()))
    }

    /// The same identifier with a `-<n>` disambiguation suffix.
    pub fn with_counter(&self, n: u32) -> Self {
        Self(format!("{}-{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which optional artifacts exist for a memory.
///
/// The thumbnail is not listed: its presence *is* the memory's existence,
/// so a `Memory` value implies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifacts {
    /// Full-size image (written together with the thumbnail at ingest,
    /// but a partial ingest can leave it missing).
    pub image: bool,

    /// Voice annotation audio.
    pub audio: bool,

    /// Transcript text. Only ever produced from the audio, so this
    /// should not be set without `audio` — maintained by construction
    /// order, not enforced.
    pub transcript: bool,
}

/// A memory as materialized by the scanner: the base identifier plus the
/// set of artifacts found on disk at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub id: MemoryId,
    pub artifacts: Artifacts,
}

impl Memory {
    pub fn new(id: MemoryId, artifacts: Artifacts) -> Self {
        Self { id, artifacts }
    }

    /// True when every artifact slot is filled.
    pub fn is_complete(&self) -> bool {
        self.artifacts.image && self.artifacts.audio && self.artifacts.transcript
    }
}
