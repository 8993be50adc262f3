//! Domain types for the memory lifecycle.
//!
//! A `Memory` is the central entity: a virtual aggregate of up to four
//! files sharing a base identifier, materialized from the filesystem by
//! the scanner rather than re-derived ad hoc by every consumer.

pub mod memory;

pub use memory::{Artifacts, Memory, MemoryId};
