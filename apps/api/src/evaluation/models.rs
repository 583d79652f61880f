use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::evaluation::quality::QualityVerdict;
use crate::text::tables::TECHNICAL_TERMS;

/// Upper bound of every answer subscore.
pub const MAX_SCORE: f64 = 10.0;

static BEHAVIORAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(tell me about a time|describe a (time|situation)|give (me )?an example|how did you (handle|deal)|have you ever|what would you do|walk me through a)\b",
    )
    .unwrap()
});
static SYSTEM_DESIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdesign\b.*\b(system|service|architecture|platform|scal\w*)\b|\bsystem design\b")
        .unwrap()
});
static TECHNICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(explain|implement|algorithm|complexity|difference between|how does|how would you optimi[sz]e|data structure)\b")
        .unwrap()
});

/// Canonical answer scores, each in [0, 10] with one decimal place.
///
/// This is the only shape scoring logic works with. Evaluator key aliases
/// (`clarityScore`, `clarity_score`, ...) are resolved in `RawEvaluation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScore {
    pub overall: f64,
    pub clarity: f64,
    pub structure: f64,
    pub relevance: f64,
    pub confidence: f64,
}

impl EvaluationScore {
    pub fn uniform(value: f64) -> Self {
        Self {
            overall: value,
            clarity: value,
            structure: value,
            relevance: value,
            confidence: value,
        }
    }

    /// Clamps every field to [0, 10] and rounds to one decimal.
    pub fn normalized(self) -> Self {
        let n = |v: f64| round1(v.clamp(0.0, MAX_SCORE));
        Self {
            overall: n(self.overall),
            clarity: n(self.clarity),
            structure: n(self.structure),
            relevance: n(self.relevance),
            confidence: n(self.confidence),
        }
    }

    /// Low relevance bounds the overall score: ≤2 caps at 2, ≤4 caps at 4.
    /// Idempotent.
    pub fn with_relevance_cap(self) -> Self {
        let ceiling = if self.relevance <= 2.0 {
            2.0
        } else if self.relevance <= 4.0 {
            4.0
        } else {
            return self;
        };
        Self {
            overall: self.overall.min(ceiling),
            ..self
        }
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Interview question category; drives which fallback bonuses apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Behavioral,
    Technical,
    SystemDesign,
    General,
}

impl QuestionKind {
    /// Best-effort category from the question wording.
    pub fn infer(question: &str) -> Self {
        if BEHAVIORAL_RE.is_match(question) {
            return QuestionKind::Behavioral;
        }
        if SYSTEM_DESIGN_RE.is_match(question) {
            return QuestionKind::SystemDesign;
        }
        let lower = question.to_lowercase();
        if TECHNICAL_RE.is_match(question) || TECHNICAL_TERMS.iter().any(|t| lower.contains(t)) {
            return QuestionKind::Technical;
        }
        QuestionKind::General
    }
}

/// Tone the external evaluator is asked to adopt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachMode {
    Supportive,
    #[default]
    Balanced,
    Strict,
}

impl CoachMode {
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            CoachMode::Supportive => {
                "Be encouraging. Lead with what worked before naming improvements."
            }
            CoachMode::Balanced => "Be fair and direct. Weigh strengths and gaps evenly.",
            CoachMode::Strict => {
                "Grade like a demanding hiring panel. Reserve scores above 8 for exceptional answers."
            }
        }
    }
}

/// Where the final scores came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Short-circuited by the quality classifier.
    Classifier,
    Evaluator,
    Fallback,
    /// Evaluator answered but the output could not be parsed.
    Neutral,
}

/// One answer to score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub question_kind: Option<QuestionKind>,
    #[serde(default)]
    pub coach_mode: CoachMode,
}

/// Scores plus feedback for one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub scores: EvaluationScore,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub verdict: QualityVerdict,
    pub source: ScoreSource,
    pub question_kind: QuestionKind,
}
