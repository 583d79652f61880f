//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::resume::ats::{score_ats, AtsReport};
use crate::resume::jd_match::{score_jd_match, JdMatchReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AtsRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct JdMatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/ats
///
/// Scores ATS-friendliness of a plain-text resume. Empty text is scored, not rejected.
pub async fn handle_score_ats(
    State(state): State<AppState>,
    Json(request): Json<AtsRequest>,
) -> Result<Json<AtsReport>, AppError> {
    AppError::check_input_size("resume_text", &request.resume_text, state.config.max_input_chars)?;

    let report = score_ats(&request.resume_text);
    debug!(
        "ATS score {} ({} words)",
        report.ats_score, report.metrics.word_count
    );
    Ok(Json(report))
}

/// POST /api/v1/resume/jd-match
///
/// Scores how well a resume matches a job description.
pub async fn handle_jd_match(
    State(state): State<AppState>,
    Json(request): Json<JdMatchRequest>,
) -> Result<Json<JdMatchReport>, AppError> {
    let limit = state.config.max_input_chars;
    AppError::check_input_size("resume_text", &request.resume_text, limit)?;
    AppError::check_input_size("jd_text", &request.jd_text, limit)?;

    let report = score_jd_match(&request.resume_text, &request.jd_text);
    debug!(
        "JD match score {} ({} matched, {} missing)",
        report.match_score, report.keyword_stats.matched_count, report.keyword_stats.missing_count
    );
    Ok(Json(report))
}
