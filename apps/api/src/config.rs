use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::evaluation::pipeline::PipelineSettings;

/// Application configuration loaded from environment variables.
/// Every variable is optional; the answer evaluator is only enabled when
/// `ANTHROPIC_API_KEY` is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub evaluator_timeout_secs: u64,
    pub batch_concurrency: usize,
    pub off_topic_max_len: usize,
    /// Per-field character limit on every text input.
    pub max_input_chars: usize,
    pub max_batch_answers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            evaluator_timeout_secs: 30,
            batch_concurrency: 5,
            off_topic_max_len: 100,
            max_input_chars: 100_000,
            max_batch_answers: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            evaluator_timeout_secs: parse_env(
                "EVALUATOR_TIMEOUT_SECS",
                defaults.evaluator_timeout_secs,
            )?,
            batch_concurrency: parse_env("BATCH_CONCURRENCY", defaults.batch_concurrency)?,
            off_topic_max_len: parse_env("OFF_TOPIC_MAX_LEN", defaults.off_topic_max_len)?,
            max_input_chars: parse_env("MAX_INPUT_CHARS", defaults.max_input_chars)?,
            max_batch_answers: parse_env("MAX_BATCH_ANSWERS", defaults.max_batch_answers)?,
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            evaluator_timeout: Duration::from_secs(self.evaluator_timeout_secs),
            batch_concurrency: self.batch_concurrency.max(1),
            off_topic_max_len: self.off_topic_max_len,
        }
    }
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
    }
}
