// Interview answer evaluation.
// Implements: quality classification, evaluator integration, heuristic fallback,
// relevance capping and batch assessment.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod assessment;
pub mod evaluator;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod quality;
