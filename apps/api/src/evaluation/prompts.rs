// LLM prompt constants for answer evaluation.
// Reuses cross-cutting fragments from llm_client::prompts.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SCORE_SCALE_INSTRUCTION};

static USER_FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(question|answer)\}").unwrap());

/// Persona half of the system prompt; joined with `JSON_ONLY_SYSTEM` at call time.
pub const EVALUATION_PERSONA: &str = "You are an experienced interview coach who grades \
    candidate answers to interview questions.";

/// Answer evaluation prompt. Replace `{question}`, `{answer}`, `{question_kind}`,
/// `{coach_mode}` and `{score_scale}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Grade the candidate's answer to the interview question below.

QUESTION ({question_kind}):
{question}

ANSWER:
{answer}

COACHING STYLE: {coach_mode}

{score_scale}

Return a JSON object with this EXACT schema (no extra fields):
{
  "overall": 7.5,
  "clarity": 8.0,
  "structure": 7.0,
  "relevance": 8.5,
  "confidence": 6.5,
  "feedback": "Two or three sentences of direct, actionable feedback.",
  "strengths": ["..."],
  "improvements": ["..."]
}

Rules:
- relevance measures how directly the answer addresses THIS question. An answer about a different topic gets relevance 2 or lower.
- structure rewards a clear arc; for behavioral questions, Situation, Task, Action, Result.
- Keep strengths and improvements to at most 3 items each, each one short sentence."#;

pub fn system_prompt() -> String {
    format!("{EVALUATION_PERSONA} {JSON_ONLY_SYSTEM}")
}

pub fn build_evaluation_prompt(
    question: &str,
    answer: &str,
    question_kind: &str,
    coach_mode: &str,
) -> String {
    let template = EVALUATION_PROMPT_TEMPLATE
        .replace("{question_kind}", question_kind)
        .replace("{coach_mode}", coach_mode)
        .replace("{score_scale}", SCORE_SCALE_INSTRUCTION);
    // Single pass: text inserted for one field is never rescanned for the other.
    USER_FIELD_RE
        .replace_all(&template, |caps: &Captures| match &caps[1] {
            "question" => question,
            _ => answer,
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_evaluation_prompt("Why Rust?", "Memory safety.", "general", "Be fair.");
        assert!(prompt.contains("Why Rust?"));
        assert!(prompt.contains("Memory safety."));
        assert!(prompt.contains("QUESTION (general)"));
        for placeholder in ["{question}", "{answer}", "{coach_mode}", "{score_scale}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
    }

    #[test]
    fn test_answer_braces_survive() {
        let prompt = build_evaluation_prompt("Q", "use {question} literally", "general", "x");
        assert!(prompt.contains("use {question} literally"));
    }

    #[test]
    fn test_question_braces_survive() {
        let prompt = build_evaluation_prompt(
            "Explain the {answer} placeholder in our templates.",
            "It is filled at render time.",
            "technical",
            "x",
        );
        assert!(prompt.contains("Explain the {answer} placeholder in our templates."));
        assert_eq!(prompt.matches("It is filled at render time.").count(), 1);
    }

    #[test]
    fn test_system_prompt_demands_json() {
        assert!(system_prompt().contains("valid JSON only"));
    }
}
