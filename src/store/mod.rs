//! Storage layer: path convention, directory scanning, and the
//! in-memory registry rebuilt from it.

pub mod naming;
pub mod registry;
pub mod scanner;

pub use registry::MemoryRegistry;
pub use scanner::scan;
