//! CLI command implementations.

pub mod agent;
pub mod autopilot;
pub mod generate;
pub mod ping;
pub mod settings;
