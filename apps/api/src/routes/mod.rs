pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse))
        .route("/api/v1/resumes/score", post(handlers::handle_score))
        .route("/api/v1/resumes/skills", post(handlers::handle_skills))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::lexicon::Lexicon;
    use crate::analysis::pipeline::RuleBasedPipeline;
    use crate::config::Config;
    use crate::extraction::docx::tests::build_docx;

    const BOUNDARY: &str = "ats-test-boundary";

    fn app_with(config: Config) -> Router {
        build_router(AppState::new(
            config,
            Arc::new(Lexicon::builtin()),
            Arc::new(RuleBasedPipeline::new()),
        ))
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    fn multipart_body(file: Option<(&str, &[u8])>, job_description: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(jd) = job_description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn parse_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn resume_docx() -> Vec<u8> {
        build_docx(&[
            "Jane Doe",
            "Summary",
            "Backend engineer building payment systems in Rust and Python.",
            "Skills",
            "Rust, Python, PostgreSQL, Docker",
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ats-api");
    }

    #[tokio::test]
    async fn test_parse_docx_upload() {
        let docx = resume_docx();
        let (status, body) =
            send(app(), parse_request(multipart_body(Some(("jane.docx", &docx)), None))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_format"], "docx");
        assert_eq!(body["sections"]["skills"], "Rust, Python, PostgreSQL, Docker");
        assert!(body["skills"].as_array().unwrap().contains(&json!("rust")));
        assert_eq!(body["scores"]["keyword_score"], 25);
        assert!(body["scores"]["job_similarity"].is_null());
    }

    #[tokio::test]
    async fn test_parse_with_job_description_rescores() {
        let docx = resume_docx();
        let (status, body) = send(
            app(),
            parse_request(multipart_body(
                Some(("jane.docx", &docx)),
                Some("Forklift operator for a busy warehouse"),
            )),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scores"]["keyword_score"], 0);
        assert!(body["scores"]["job_similarity"].is_number());
    }

    #[tokio::test]
    async fn test_parse_rejects_unsupported_format() {
        let (status, body) = send(
            app(),
            parse_request(multipart_body(Some(("resume.txt", b"Jane Doe")), None)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_empty_document_is_unprocessable() {
        let docx = build_docx(&[]);
        let (status, body) =
            send(app(), parse_request(multipart_body(Some(("blank.docx", &docx)), None))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["message"],
            "Could not extract text from the uploaded resume"
        );
    }

    #[tokio::test]
    async fn test_parse_requires_file_field() {
        let (status, body) =
            send(app(), parse_request(multipart_body(None, Some("Rust engineer")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_enforces_upload_limit() {
        let app = app_with(Config {
            max_upload_bytes: 64,
            ..Config::default()
        });
        let docx = resume_docx();
        let (status, _) =
            send(app, parse_request(multipart_body(Some(("jane.docx", &docx)), None))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let text = "Developed Rust services. Led a team of 4 engineers.";
        let (status, body) = send(
            app(),
            json_request(
                "/api/v1/resumes/score",
                json!({ "text": text, "job_description": text }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keyword_score"], 25);
        let sum = ["format_score", "content_score", "skills_score", "keyword_score"]
            .iter()
            .map(|key| body[key].as_u64().unwrap())
            .sum::<u64>();
        assert_eq!(body["total_score"].as_u64().unwrap(), sum);
        assert!(body["feedback"].is_array());
    }

    #[tokio::test]
    async fn test_skills_endpoint_exposes_both_strategies() {
        let (status, body) = send(
            app(),
            json_request("/api/v1/resumes/skills", json!({ "text": "JavaScript and React" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let flat = body["skills"].as_array().unwrap();
        assert!(flat.contains(&json!("javascript")));
        assert!(!flat.contains(&json!("java")));
        let languages = body["by_category"]["programming_languages"].as_array().unwrap();
        assert!(languages.contains(&json!("java")));
        assert!(languages.contains(&json!("javascript")));
        assert!(body["by_category"]["frameworks"]
            .as_array()
            .unwrap()
            .contains(&json!("react")));
    }
}
