pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resume/ats", post(resume::handle_score_ats))
        .route("/api/v1/resume/jd-match", post(resume::handle_jd_match))
        // Interview API
        .route(
            "/api/v1/answers/evaluate",
            post(evaluation::handle_evaluate_answer),
        )
        .route(
            "/api/v1/assessments/evaluate",
            post(evaluation::handle_evaluate_assessment),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::evaluation::pipeline::AnswerScoringPipeline;

    fn app(config: Config) -> Router {
        let pipeline = AnswerScoringPipeline::new(None, config.pipeline_settings());
        build_router(AppState {
            config,
            pipeline: Arc::new(pipeline),
        })
    }

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_fallback_backend() {
        let response = app(Config::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["evaluator"], "fallback");
    }

    #[tokio::test]
    async fn test_ats_endpoint_scores_empty_resume() {
        let (status, body) = post_json(
            app(Config::default()),
            "/api/v1/resume/ats",
            json!({"resume_text": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ats_score"], 34);
        assert!(body["rules_version"].is_string());
    }

    #[tokio::test]
    async fn test_jd_match_endpoint_neutral_for_empty_jd() {
        let (status, body) = post_json(
            app(Config::default()),
            "/api/v1/resume/jd-match",
            json!({"resume_text": "Rust engineer", "jd_text": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_score"], 50);
    }

    #[tokio::test]
    async fn test_oversize_input_is_413() {
        let config = Config {
            max_input_chars: 10,
            ..Config::default()
        };
        let (status, body) = post_json(
            app(config),
            "/api/v1/resume/ats",
            json!({"resume_text": "this resume is far too long"}),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_answer_endpoint_zeroes_throwaway_answer() {
        let (status, body) = post_json(
            app(Config::default()),
            "/api/v1/answers/evaluate",
            json!({"question": "Tell me about yourself.", "answer": "asdf"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scores"]["overall"], 0.0);
        assert_eq!(body["verdict"]["status"], "invalid");
        assert_eq!(body["verdict"]["reason"], "random_pattern");
        assert_eq!(body["source"], "classifier");
    }

    #[tokio::test]
    async fn test_assessment_endpoint_preserves_order() {
        let (status, body) = post_json(
            app(Config::default()),
            "/api/v1/assessments/evaluate",
            json!({
                "answers": [
                    {"question": "Tell me about yourself.", "answer": "asdf"},
                    {
                        "question": "Tell me about a time you improved a process.",
                        "answer": "At my last company I improved our release process. \
                            I automated the build, wrote a checklist and we reduced failed \
                            deployments by 30% over two months.",
                        "coach_mode": "strict"
                    }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let evaluations = body["evaluations"].as_array().unwrap();
        assert_eq!(evaluations.len(), 2);
        assert_eq!(evaluations[0]["source"], "classifier");
        assert_eq!(evaluations[1]["source"], "fallback");
        assert_eq!(body["valid_count"], 1);
        assert_eq!(body["invalid_count"], 1);
    }

    #[tokio::test]
    async fn test_assessment_too_many_answers_is_400() {
        let config = Config {
            max_batch_answers: 1,
            ..Config::default()
        };
        let answer = json!({"question": "Q?", "answer": "asdf"});
        let (status, body) = post_json(
            app(config),
            "/api/v1/assessments/evaluate",
            json!({"answers": [answer.clone(), answer]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
