//! Domain ports (interfaces).

pub mod clock;
pub mod content_sink;
pub mod provider;

pub use clock::{Clock, FixedClock, SystemClock};
pub use content_sink::ContentSink;
pub use provider::GenerationProvider;
