//! Service layer: routing, agents, autopilot and throttling.

pub mod agents;
pub mod autopilot;
pub mod generation_router;
pub mod rate_limiter;
pub mod structured;

pub use agents::{score_lead, AgentLibrary};
pub use autopilot::{AutopilotEngine, AutopilotReport, AutopilotState, ItemOutcome, RunStatus};
pub use generation_router::{GenerationRouter, GENERATION_FAILURE_SENTINEL};
pub use rate_limiter::RequestThrottle;
