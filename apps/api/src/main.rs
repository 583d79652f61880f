mod config;
mod errors;
mod evaluation;
mod llm_client;
mod resume;
mod routes;
mod state;
mod text;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::evaluator::{Evaluator, LlmEvaluator};
use crate::evaluation::pipeline::AnswerScoringPipeline;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));
    info!("Resume rules version {}", text::tables::RULES_VERSION);

    // Evaluator is optional; without it every answer is scored heuristically
    let evaluator: Option<Arc<dyn Evaluator>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                Duration::from_secs(config.evaluator_timeout_secs),
            )?;
            info!("LLM evaluator initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmEvaluator::new(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, answers will be scored by heuristics only");
            None
        }
    };

    let settings = config.pipeline_settings();
    info!(
        "Answer pipeline: timeout {}s, batch concurrency {}",
        settings.evaluator_timeout.as_secs(),
        settings.batch_concurrency
    );

    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(AnswerScoringPipeline::new(evaluator, settings)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
