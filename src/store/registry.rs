//! In-memory registry of known memories.
//!
//! The authoritative list for the current session. Rebuilt in full from
//! the scanner on every reload — never incrementally diffed.

use std::path::{Path, PathBuf};

use crate::domain::{Memory, MemoryId};
use crate::store::scanner;

/// Ordered index of memories under a storage root.
#[derive(Debug)]
pub struct MemoryRegistry {
    root: PathBuf,
    memories: Vec<Memory>,
}

impl MemoryRegistry {
    /// Create an empty registry over a storage root. Call
    /// [`reload`](Self::reload) to populate it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            memories: Vec::new(),
        }
    }

    /// Create and immediately populate a registry.
    pub async fn load(root: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new(root);
        registry.reload().await;
        registry
    }

    /// Discard the current index and rebuild it by rescanning the root.
    pub async fn reload(&mut self) {
        self.memories = scanner::scan(&self.root).await;
        tracing::debug!(
            "Registry reloaded: {} memories under {}",
            self.memories.len(),
            self.root.display()
        );
    }

    /// All known memories, in scan order.
    pub fn list(&self) -> &[Memory] {
        &self.memories
    }

    /// Look up a memory by identifier.
    pub fn get(&self, id: &MemoryId) -> Option<&Memory> {
        self.memories.iter().find(|m| &m.id == id)
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// The storage root this registry indexes.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reload_rebuilds_from_disk() {
        let temp = TempDir::new().unwrap();
        let mut registry = MemoryRegistry::load(temp.path()).await;
        assert!(registry.is_empty());

        tokio::fs::write(temp.path().join("memory-1.thumb"), b"t")
            .await
            .unwrap();

        // Not visible until reloaded.
        assert!(registry.is_empty());

        registry.reload().await;
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&MemoryId::new("memory-1")).is_some());
        assert!(registry.get(&MemoryId::new("memory-2")).is_none());
    }
}
