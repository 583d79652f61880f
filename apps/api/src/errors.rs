use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Scoring itself never fails; only request validation produces these.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {field} exceeds {limit} characters")]
    PayloadTooLarge { field: String, limit: usize },
}

impl AppError {
    /// Rejects `text` when it is longer than `limit` characters.
    pub fn check_input_size(field: &str, text: &str, limit: usize) -> Result<(), AppError> {
        if text.chars().count() > limit {
            return Err(AppError::PayloadTooLarge {
                field: field.to_string(),
                limit,
            });
        }
        Ok(())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        };
        tracing::debug!("Rejecting request: {self}");

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_input_size_counts_chars() {
        assert!(AppError::check_input_size("answer", "héllo", 5).is_ok());
        assert!(matches!(
            AppError::check_input_size("answer", "héllo!", 5),
            Err(AppError::PayloadTooLarge { limit: 5, .. })
        ));
    }

    #[test]
    fn test_status_codes() {
        let resp = AppError::Validation("too many".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::PayloadTooLarge {
            field: "resume_text".to_string(),
            limit: 1,
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
