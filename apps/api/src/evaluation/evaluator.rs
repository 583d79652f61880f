use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::evaluation::models::{CoachMode, QuestionKind};
use crate::evaluation::prompts::{build_evaluation_prompt, system_prompt};
use crate::llm_client::LlmClient;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// Transport or upstream failure; the pipeline falls back to heuristics.
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),

    /// The evaluator answered but the output could not be read as scores.
    #[error("evaluator output malformed: {reason}")]
    Malformed { raw: String, reason: String },
}

/// Evaluator output as received. Key aliases are resolved here and nowhere else.
///
/// `overall` is required; any missing subscore is filled in by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEvaluation {
    #[serde(alias = "overall_score", alias = "overallScore", alias = "score")]
    pub overall: f64,
    #[serde(default, alias = "clarity_score", alias = "clarityScore")]
    pub clarity: Option<f64>,
    #[serde(default, alias = "structure_score", alias = "structureScore")]
    pub structure: Option<f64>,
    #[serde(default, alias = "relevance_score", alias = "relevanceScore")]
    pub relevance: Option<f64>,
    #[serde(default, alias = "confidence_score", alias = "confidenceScore")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl RawEvaluation {
    /// Parses evaluator text, keeping the raw text on failure.
    pub fn parse(text: &str) -> Result<Self, EvaluatorError> {
        serde_json::from_str(text).map_err(|e| EvaluatorError::Malformed {
            raw: text.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pluggable answer evaluator.
/// Implementations: `LlmEvaluator` (Claude). Tests use in-process fakes.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        kind: QuestionKind,
        mode: CoachMode,
    ) -> Result<RawEvaluation, EvaluatorError>;

    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

// ─────────────────────────────────────────────────────────────────────────────
// Claude-backed evaluator
// ─────────────────────────────────────────────────────────────────────────────

pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        kind: QuestionKind,
        mode: CoachMode,
    ) -> Result<RawEvaluation, EvaluatorError> {
        let prompt = build_evaluation_prompt(question, answer, kind_label(kind), mode.prompt_hint());
        let text = self
            .llm
            .call_text(&prompt, &system_prompt())
            .await
            .map_err(|e| EvaluatorError::Unavailable(e.to_string()))?;
        debug!("Evaluator returned {} chars", text.len());
        RawEvaluation::parse(&text)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn kind_label(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Behavioral => "behavioral",
        QuestionKind::Technical => "technical",
        QuestionKind::SystemDesign => "system design",
        QuestionKind::General => "general",
    }
}
