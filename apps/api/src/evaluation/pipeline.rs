//! Answer Scoring Pipeline — classify, evaluate (or fall back), cap.
//!
//! `score_answer` never fails. Every evaluator failure mode maps to a
//! deterministic result:
//!   invalid answer     → all zeros, fixed remediation feedback
//!   no evaluator       → heuristic scores
//!   timeout / error    → heuristic scores
//!   malformed output   → neutral 5.0 everywhere, raw text as feedback
//! The relevance cap is applied last, whatever the source.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::evaluation::evaluator::{Evaluator, EvaluatorError, RawEvaluation};
use crate::evaluation::fallback::{FallbackHeuristicScorer, FallbackResult};
use crate::evaluation::models::{
    AnswerEvaluation, AnswerRequest, EvaluationScore, QuestionKind, ScoreSource,
};
use crate::evaluation::quality::{AnswerQualityClassifier, QualityVerdict, DEFAULT_OFF_TOPIC_MAX_LEN};

/// Score given on every axis when the evaluator output cannot be read.
pub const NEUTRAL_SCORE: f64 = 5.0;

const INVALID_IMPROVEMENTS: [&str; 3] = [
    "Answer the question that was asked, in your own words",
    "Use complete sentences and aim for at least 50 words",
    "Describe a specific situation, what you did and the outcome",
];

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub evaluator_timeout: Duration,
    pub batch_concurrency: usize,
    pub off_topic_max_len: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            evaluator_timeout: Duration::from_secs(30),
            batch_concurrency: 5,
            off_topic_max_len: DEFAULT_OFF_TOPIC_MAX_LEN,
        }
    }
}

pub struct AnswerScoringPipeline {
    evaluator: Option<Arc<dyn Evaluator>>,
    classifier: AnswerQualityClassifier,
    fallback: FallbackHeuristicScorer,
    settings: PipelineSettings,
}

impl AnswerScoringPipeline {
    pub fn new(evaluator: Option<Arc<dyn Evaluator>>, settings: PipelineSettings) -> Self {
        Self {
            evaluator,
            classifier: AnswerQualityClassifier::new(settings.off_topic_max_len),
            fallback: FallbackHeuristicScorer,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// "llm", "fallback", ... for the health endpoint.
    pub fn backend(&self) -> &'static str {
        self.evaluator
            .as_ref()
            .map(|e| e.backend())
            .unwrap_or("fallback")
    }

    pub async fn score_answer(&self, request: &AnswerRequest) -> AnswerEvaluation {
        let kind = request
            .question_kind
            .unwrap_or_else(|| QuestionKind::infer(&request.question));

        let verdict = self.classifier.classify(&request.answer, &request.question);
        if let Some(rejected) = rejection(&verdict, kind) {
            return rejected;
        }

        let scored = match &self.evaluator {
            None => self.from_fallback(&request.answer, kind),
            Some(evaluator) => {
                let call = evaluator.evaluate(
                    &request.question,
                    &request.answer,
                    kind,
                    request.coach_mode,
                );
                match timeout(self.settings.evaluator_timeout, call).await {
                    Ok(Ok(raw)) => self.from_evaluator(raw, &request.answer, kind),
                    Ok(Err(EvaluatorError::Malformed { raw, reason })) => {
                        warn!("Evaluator output malformed ({}), using neutral scores", reason);
                        neutral(raw)
                    }
                    Ok(Err(e)) => {
                        warn!("Evaluator failed ({}), using heuristic scores", e);
                        self.from_fallback(&request.answer, kind)
                    }
                    Err(_) => {
                        warn!(
                            "Evaluator timed out after {}s, using heuristic scores",
                            self.settings.evaluator_timeout.as_secs()
                        );
                        self.from_fallback(&request.answer, kind)
                    }
                }
            }
        };

        AnswerEvaluation {
            scores: scored.scores.with_relevance_cap(),
            feedback: scored.feedback,
            strengths: scored.strengths,
            improvements: scored.improvements,
            verdict,
            source: scored.source,
            question_kind: kind,
        }
    }

    fn from_fallback(&self, answer: &str, kind: QuestionKind) -> Scored {
        Scored::new(self.fallback.score(answer, kind), ScoreSource::Fallback)
    }

    /// Missing relevance takes the heuristic relevance for the same answer;
    /// other missing subscores take the overall score.
    fn from_evaluator(&self, raw: RawEvaluation, answer: &str, kind: QuestionKind) -> Scored {
        let relevance = raw
            .relevance
            .unwrap_or_else(|| self.fallback.score(answer, kind).scores.relevance);
        let scores = EvaluationScore {
            overall: raw.overall,
            clarity: raw.clarity.unwrap_or(raw.overall),
            structure: raw.structure.unwrap_or(raw.overall),
            relevance,
            confidence: raw.confidence.unwrap_or(raw.overall),
        }
        .normalized();

        let feedback = if raw.feedback.trim().is_empty() {
            format!("Overall score: {:.1}/10.", scores.overall)
        } else {
            raw.feedback
        };

        Scored {
            scores,
            feedback,
            strengths: raw.strengths,
            improvements: raw.improvements,
            source: ScoreSource::Evaluator,
        }
    }
}

struct Scored {
    scores: EvaluationScore,
    feedback: String,
    strengths: Vec<String>,
    improvements: Vec<String>,
    source: ScoreSource,
}

impl Scored {
    fn new(result: FallbackResult, source: ScoreSource) -> Self {
        Self {
            scores: result.scores,
            feedback: result.feedback,
            strengths: result.strengths,
            improvements: result.improvements,
            source,
        }
    }
}

fn neutral(raw: String) -> Scored {
    Scored {
        scores: EvaluationScore::uniform(NEUTRAL_SCORE),
        feedback: raw,
        strengths: Vec::new(),
        improvements: Vec::new(),
        source: ScoreSource::Neutral,
    }
}

/// Result for an answer the classifier turned away: every score pinned to the
/// verdict's cap. `None` for a valid verdict.
fn rejection(verdict: &QualityVerdict, kind: QuestionKind) -> Option<AnswerEvaluation> {
    let QualityVerdict::Invalid {
        score_cap, message, ..
    } = verdict
    else {
        return None;
    };
    debug!("Answer rejected by classifier: {}", message);
    Some(AnswerEvaluation {
        scores: EvaluationScore::uniform(*score_cap),
        feedback: format!(
            "{} Please give a genuine, complete answer to the question so it can be evaluated.",
            message
        ),
        strengths: Vec::new(),
        improvements: INVALID_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
        verdict: verdict.clone(),
        source: ScoreSource::Classifier,
        question_kind: kind,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::evaluation::models::CoachMode;
    use crate::evaluation::quality::InvalidReason;
    use async_trait::async_trait;

    pub const BEHAVIORAL_QUESTION: &str =
        "Tell me about a time you handled a difficult project deadline.";

    pub const GOOD_ANSWER: &str = "In my previous role I led a migration of our payment service \
        to Kubernetes. The situation was tense because the deadline was fixed. I planned the \
        rollout, wrote runbooks and coordinated with three teams. As a result we cut deployment \
        time by 40% and had zero downtime.";

    /// Returns a fixed evaluation, or an error, after an optional delay.
    pub struct FakeEvaluator {
        pub response: Result<RawEvaluation, fn() -> EvaluatorError>,
        pub delay: Duration,
    }

    impl FakeEvaluator {
        pub fn ok(raw: RawEvaluation) -> Self {
            Self {
                response: Ok(raw),
                delay: Duration::ZERO,
            }
        }

        pub fn failing(err: fn() -> EvaluatorError) -> Self {
            Self {
                response: Err(err),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl Evaluator for FakeEvaluator {
        async fn evaluate(
            &self,
            _question: &str,
            _answer: &str,
            _kind: QuestionKind,
            _mode: CoachMode,
        ) -> Result<RawEvaluation, EvaluatorError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.response {
                Ok(raw) => Ok(raw.clone()),
                Err(make) => Err(make()),
            }
        }

        fn backend(&self) -> &'static str {
            "fake"
        }
    }

    fn full_raw(overall: f64, relevance: f64) -> RawEvaluation {
        RawEvaluation {
            overall,
            clarity: Some(overall),
            structure: Some(overall),
            relevance: Some(relevance),
            confidence: Some(overall),
            feedback: "Clear and specific.".to_string(),
            strengths: vec!["Specific".to_string()],
            improvements: vec![],
        }
    }

    fn pipeline(evaluator: Option<Arc<dyn Evaluator>>) -> AnswerScoringPipeline {
        AnswerScoringPipeline::new(evaluator, PipelineSettings::default())
    }

    pub fn request(question: &str, answer: &str) -> AnswerRequest {
        AnswerRequest {
            question: question.to_string(),
            answer: answer.to_string(),
            question_kind: None,
            coach_mode: CoachMode::Balanced,
        }
    }

    #[tokio::test]
    async fn test_throwaway_answers_score_zero_everywhere() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(9.0, 9.0)))));
        for answer in ["asdf", "qwerty qwerty qwerty"] {
            let result = p.score_answer(&request(BEHAVIORAL_QUESTION, answer)).await;
            assert_eq!(result.scores, EvaluationScore::uniform(0.0));
            assert_eq!(result.source, ScoreSource::Classifier);
            assert_eq!(result.improvements.len(), 3);
            assert!(!result.verdict.is_valid());
        }
    }

    #[test]
    fn test_rejection_pins_scores_to_verdict_cap() {
        let verdict = QualityVerdict::Invalid {
            reason: InvalidReason::OffTopic,
            score_cap: 1.5,
            message: "Off topic.".to_string(),
        };
        let result = rejection(&verdict, QuestionKind::General).expect("invalid verdict");
        assert_eq!(result.scores, EvaluationScore::uniform(1.5));
        assert_eq!(result.verdict, verdict);
        assert!(result.feedback.starts_with("Off topic."));

        assert!(rejection(&QualityVerdict::Valid, QuestionKind::General).is_none());
    }

    #[tokio::test]
    async fn test_evaluator_scores_used_when_valid() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(8.0, 9.0)))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.source, ScoreSource::Evaluator);
        assert_eq!(result.scores.overall, 8.0);
        assert_eq!(result.feedback, "Clear and specific.");
        assert_eq!(result.question_kind, QuestionKind::Behavioral);
    }

    #[tokio::test]
    async fn test_relevance_cap_applied_to_evaluator_scores() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(9.0, 1.0)))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert!(result.scores.overall <= 2.0);

        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(7.0, 4.0)))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert!(result.scores.overall <= 4.0);

        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(7.0, 5.0)))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.scores.overall, 7.0);
    }

    #[tokio::test]
    async fn test_evaluator_scores_clamped() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(full_raw(14.0, 12.0)))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.scores.overall, 10.0);
        assert_eq!(result.scores.relevance, 10.0);
    }

    #[tokio::test]
    async fn test_missing_relevance_takes_heuristic_relevance() {
        let raw = RawEvaluation {
            relevance: None,
            ..full_raw(8.0, 0.0)
        };
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(raw))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;

        let heuristic = FallbackHeuristicScorer
            .score(GOOD_ANSWER, QuestionKind::Behavioral)
            .scores
            .relevance;
        assert_eq!(result.scores.relevance, heuristic);
        assert_eq!(result.source, ScoreSource::Evaluator);
    }

    #[tokio::test]
    async fn test_missing_subscores_take_overall() {
        let raw = RawEvaluation {
            overall: 6.0,
            relevance: Some(7.0),
            ..RawEvaluation::default()
        };
        let p = pipeline(Some(Arc::new(FakeEvaluator::ok(raw))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.scores.clarity, 6.0);
        assert_eq!(result.scores.structure, 6.0);
        assert_eq!(result.scores.confidence, 6.0);
        assert!(result.feedback.contains("6.0/10"));
    }

    #[tokio::test]
    async fn test_no_evaluator_uses_fallback() {
        let p = pipeline(None);
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.source, ScoreSource::Fallback);
        assert_eq!(p.backend(), "fallback");
        let expected = FallbackHeuristicScorer
            .score(GOOD_ANSWER, QuestionKind::Behavioral)
            .scores
            .with_relevance_cap();
        assert_eq!(result.scores, expected);
    }

    #[tokio::test]
    async fn test_evaluator_error_uses_fallback() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::failing(|| {
            EvaluatorError::Unavailable("connection refused".to_string())
        }))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.source, ScoreSource::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_output_is_neutral_with_raw_feedback() {
        let p = pipeline(Some(Arc::new(FakeEvaluator::failing(|| {
            EvaluatorError::Malformed {
                raw: "Nice answer overall!".to_string(),
                reason: "expected value".to_string(),
            }
        }))));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.source, ScoreSource::Neutral);
        assert_eq!(result.scores, EvaluationScore::uniform(NEUTRAL_SCORE));
        assert_eq!(result.feedback, "Nice answer overall!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_evaluator_times_out_to_fallback() {
        let slow = FakeEvaluator {
            response: Ok(full_raw(9.0, 9.0)),
            delay: Duration::from_secs(120),
        };
        let p = pipeline(Some(Arc::new(slow)));
        let result = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(result.source, ScoreSource::Fallback);
    }

    #[tokio::test]
    async fn test_explicit_question_kind_wins() {
        let p = pipeline(None);
        let mut req = request(BEHAVIORAL_QUESTION, GOOD_ANSWER);
        req.question_kind = Some(QuestionKind::Technical);
        let result = p.score_answer(&req).await;
        assert_eq!(result.question_kind, QuestionKind::Technical);
    }

    #[tokio::test]
    async fn test_fallback_scoring_is_deterministic() {
        let p = pipeline(None);
        let a = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        let b = p.score_answer(&request(BEHAVIORAL_QUESTION, GOOD_ANSWER)).await;
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.feedback, b.feedback);
    }
}
