//! Axum route handlers for the answer and assessment evaluation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::assessment::AssessmentReport;
use crate::evaluation::models::{AnswerEvaluation, AnswerRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub assessment_id: Option<Uuid>,
    pub answers: Vec<AnswerRequest>,
}

fn check_answer_size(request: &AnswerRequest, limit: usize) -> Result<(), AppError> {
    AppError::check_input_size("question", &request.question, limit)?;
    AppError::check_input_size("answer", &request.answer, limit)
}

/// POST /api/v1/answers/evaluate
///
/// Scores one interview answer. Evaluator failures degrade to heuristic
/// scores; the response is always a full evaluation.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerEvaluation>, AppError> {
    check_answer_size(&request, state.config.max_input_chars)?;

    let evaluation = state.pipeline.score_answer(&request).await;
    info!(
        "Answer evaluated: overall={:.1} source={:?}",
        evaluation.scores.overall, evaluation.source
    );
    Ok(Json(evaluation))
}

/// POST /api/v1/assessments/evaluate
///
/// Scores every answer of an assessment, preserving submission order.
pub async fn handle_evaluate_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentReport>, AppError> {
    let max = state.config.max_batch_answers;
    if request.answers.len() > max {
        return Err(AppError::Validation(format!(
            "an assessment may contain at most {max} answers, got {}",
            request.answers.len()
        )));
    }
    for answer in &request.answers {
        check_answer_size(answer, state.config.max_input_chars)?;
    }

    let report = state
        .pipeline
        .evaluate_assessment(request.assessment_id, &request.answers)
        .await;
    Ok(Json(report))
}
