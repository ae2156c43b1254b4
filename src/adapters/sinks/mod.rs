//! Content sink implementations.

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirSink;
pub use memory::MemorySink;
