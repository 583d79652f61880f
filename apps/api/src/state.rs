use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::pipeline::AnswerScoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Answer scoring. Holds the optional evaluator; fallback scoring is built in.
    pub pipeline: Arc<AnswerScoringPipeline>,
}
