use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::evaluation::models::{round1, AnswerEvaluation, AnswerRequest};
use crate::evaluation::pipeline::AnswerScoringPipeline;

/// All answers of one assessment, scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub assessment_id: Uuid,
    /// Same order as the submitted answers.
    pub evaluations: Vec<AnswerEvaluation>,
    /// Mean overall score across every answer, invalid ones counting as 0.
    pub average_score: f64,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub evaluated_at: DateTime<Utc>,
}

impl AnswerScoringPipeline {
    /// Scores every answer with at most `batch_concurrency` in flight.
    /// Output order matches input order; one slow or failing answer only
    /// degrades its own result.
    pub async fn score_batch(&self, requests: &[AnswerRequest]) -> Vec<AnswerEvaluation> {
        let limit = self.settings().batch_concurrency.max(1);
        // Collected first so the returned future does not borrow a closure.
        let pending: Vec<_> = requests.iter().map(|r| self.score_answer(r)).collect();
        stream::iter(pending)
            .buffered(limit)
            .collect()
            .await
    }

    pub async fn evaluate_assessment(
        &self,
        assessment_id: Option<Uuid>,
        requests: &[AnswerRequest],
    ) -> AssessmentReport {
        let assessment_id = assessment_id.unwrap_or_else(Uuid::new_v4);
        let evaluations = self.score_batch(requests).await;

        let valid_count = evaluations.iter().filter(|e| e.verdict.is_valid()).count();
        let average_score = if evaluations.is_empty() {
            0.0
        } else {
            let total: f64 = evaluations.iter().map(|e| e.scores.overall).sum();
            round1(total / evaluations.len() as f64)
        };

        info!(
            "Assessment {} scored: {} answers, {} valid, average {:.1}",
            assessment_id,
            evaluations.len(),
            valid_count,
            average_score
        );

        AssessmentReport {
            assessment_id,
            invalid_count: evaluations.len() - valid_count,
            valid_count,
            average_score,
            evaluations,
            evaluated_at: Utc::now(),
        }
    }
}
