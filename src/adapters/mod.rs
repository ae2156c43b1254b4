//! Adapters for external systems.

pub mod providers;
pub mod sinks;
