//! Fallback Heuristic Scorer — deterministic answer scoring used whenever the
//! external evaluator is absent, fails or times out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::evaluation::models::{round1, EvaluationScore, QuestionKind, MAX_SCORE};
use crate::text::metrics::{count_vocabulary, word_tokens};
use crate::text::tables::{
    ACTION_VERBS, ANSWER_METRIC_PATTERN, EXAMPLE_MARKERS, IMPLEMENTATION_TERMS,
    PROBLEM_SOLVING_TERMS, STAR_ACTION, STAR_RESULT, STAR_SITUATION, STAR_TASK, TECHNICAL_TERMS,
};

const BASE_SCORE: f64 = 4.0;

static METRIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(ANSWER_METRIC_PATTERN).unwrap());

/// Observable features of one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSignals {
    pub word_count: usize,
    pub sentence_count: usize,
    /// How many of Situation/Task/Action/Result are present (0–4).
    pub star_components: usize,
    pub has_technical: bool,
    pub has_implementation: bool,
    pub has_example: bool,
    pub has_metric: bool,
    pub has_action_verb: bool,
    pub has_problem_solving: bool,
    /// Starts with a capital letter and contains terminal punctuation.
    pub well_punctuated: bool,
}

impl AnswerSignals {
    pub fn detect(answer: &str) -> Self {
        let lower = answer.to_lowercase();
        let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

        let star_components = [STAR_SITUATION, STAR_TASK, STAR_ACTION, STAR_RESULT]
            .iter()
            .filter(|group| contains_any(**group))
            .count();

        let starts_capitalized = answer
            .trim_start()
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        let has_terminal = answer.contains(['.', '!', '?']);

        Self {
            word_count: answer.split_whitespace().count(),
            sentence_count: answer
                .split(['.', '!', '?'])
                .filter(|s| !s.trim().is_empty())
                .count(),
            star_components,
            has_technical: contains_any(TECHNICAL_TERMS),
            has_implementation: contains_any(IMPLEMENTATION_TERMS),
            has_example: contains_any(EXAMPLE_MARKERS),
            has_metric: METRIC_RE.is_match(answer),
            has_action_verb: count_vocabulary(&word_tokens(answer), ACTION_VERBS) > 0,
            has_problem_solving: contains_any(PROBLEM_SOLVING_TERMS),
            well_punctuated: starts_capitalized && has_terminal,
        }
    }
}

/// Heuristic scores plus the feedback that explains them.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    pub scores: EvaluationScore,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackHeuristicScorer;

impl FallbackHeuristicScorer {
    pub fn score(&self, answer: &str, kind: QuestionKind) -> FallbackResult {
        let signals = AnswerSignals::detect(answer);
        let scores = derive_scores(overall_score(&signals, kind), &signals);
        FallbackResult {
            scores,
            feedback: feedback_text(scores.overall),
            strengths: strengths(&signals, kind),
            improvements: improvements(&signals, kind),
        }
    }
}

fn overall_score(s: &AnswerSignals, kind: QuestionKind) -> f64 {
    let mut score = BASE_SCORE;

    score += match s.word_count {
        w if w >= 100 => 2.0,
        w if w >= 50 => 1.5,
        w if w >= 20 => 0.5,
        _ => -1.0,
    };

    if s.sentence_count >= 3 {
        score += 0.5;
    } else if s.sentence_count <= 1 {
        score -= 0.5;
    }

    match kind {
        QuestionKind::Behavioral => {
            score += match s.star_components {
                4 => 2.0,
                3 => 1.0,
                2 => 0.5,
                _ => -0.5,
            };
        }
        QuestionKind::Technical | QuestionKind::SystemDesign => {
            if s.has_technical {
                score += 1.0;
            }
            if s.has_implementation {
                score += 0.5;
            }
        }
        QuestionKind::General => {}
    }

    if s.has_example {
        score += 1.0;
    }
    if s.has_metric {
        score += 0.5;
    }
    if s.has_action_verb {
        score += 0.5;
    }
    if s.has_problem_solving {
        score += 0.5;
    }
    if s.well_punctuated {
        score += 0.5;
    }

    round1(score.clamp(0.0, MAX_SCORE))
}

/// Subscores derived from the (already rounded) overall score.
fn derive_scores(overall: f64, s: &AnswerSignals) -> EvaluationScore {
    let clarity = if s.sentence_count >= 2 && s.well_punctuated {
        (overall + 0.5).min(10.0)
    } else {
        overall - 0.5
    };
    let structure = if s.star_components >= 3 || s.sentence_count >= 3 {
        (overall + 0.5).min(9.0)
    } else {
        overall - 1.0
    };
    let relevance = if s.word_count > 50 {
        (overall + 0.5).min(8.0)
    } else {
        overall - 1.0
    };
    let confidence = if s.has_metric || s.has_example {
        (overall + 0.5).min(9.0)
    } else {
        overall - 0.5
    };

    EvaluationScore {
        overall,
        clarity,
        structure,
        relevance,
        confidence,
    }
    .normalized()
}

fn feedback_text(overall: f64) -> String {
    let band = if overall >= 8.0 {
        "Strong answer."
    } else if overall >= 6.0 {
        "Solid answer with room to sharpen."
    } else if overall >= 4.0 {
        "Reasonable start, but the answer needs more depth."
    } else {
        "The answer needs significant improvement."
    };
    format!("{band} Overall score: {overall:.1}/10 (automated heuristic review).")
}

fn strengths(s: &AnswerSignals, kind: QuestionKind) -> Vec<String> {
    let mut out = Vec::new();
    if s.word_count >= 50 {
        out.push("Provides a detailed, well-developed answer");
    }
    if kind == QuestionKind::Behavioral && s.star_components >= 3 {
        out.push("Follows the STAR structure");
    }
    if s.has_metric {
        out.push("Quantifies impact with concrete numbers");
    }
    if s.has_example {
        out.push("Grounds the answer in a specific example");
    }
    if matches!(kind, QuestionKind::Technical | QuestionKind::SystemDesign) && s.has_technical {
        out.push("Uses relevant technical terminology");
    }
    if s.has_problem_solving {
        out.push("Shows a problem-solving mindset");
    }
    if out.is_empty() {
        out.push("Attempts to address the question");
    }
    out.into_iter().map(String::from).collect()
}

fn improvements(s: &AnswerSignals, kind: QuestionKind) -> Vec<String> {
    let mut out = Vec::new();
    if s.word_count < 50 {
        out.push("Expand your answer with more detail; aim for 50 to 100 words");
    }
    if kind == QuestionKind::Behavioral && s.star_components < 3 {
        out.push("Structure your answer with the STAR method: Situation, Task, Action, Result");
    }
    if !s.has_metric {
        out.push("Quantify your impact with numbers or percentages");
    }
    if !s.has_example {
        out.push("Include a concrete example from your own experience");
    }
    if matches!(kind, QuestionKind::Technical | QuestionKind::SystemDesign) && !s.has_technical {
        out.push("Use precise technical terminology to show depth");
    }
    if !s.well_punctuated {
        out.push("Write in complete, well-punctuated sentences");
    }
    out.into_iter().map(String::from).collect()
}
