//! Agent library.
//!
//! Each agent turns one business intent into a prompt, routes it through
//! the [`GenerationRouter`], and parses the reply into a domain object.
//! Structured agents fall back to an empty value on malformed output; the
//! article writer is the only agent that reports failure to its caller.

pub mod article_writer;
pub mod competitor_analyst;
pub mod content_planner;
pub mod lead_scorer;
pub mod writing_assistant;

pub use article_writer::{compute_seo_score, slugify};
pub use lead_scorer::{score_lead, MAX_LEAD_SCORE};

use std::sync::Arc;

use crate::domain::ports::{Clock, SystemClock};
use crate::services::generation_router::GenerationRouter;

/// Stateless collection of content agents sharing one router.
#[derive(Clone)]
pub struct AgentLibrary {
    router: GenerationRouter,
    clock: Arc<dyn Clock>,
}

impl AgentLibrary {
    pub fn new(router: GenerationRouter) -> Self {
        Self {
            router,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn router(&self) -> &GenerationRouter {
        &self.router
    }
}
