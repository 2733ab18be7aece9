//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use liftlens_media::AnalysisPipeline;

use crate::attachments;
use crate::health_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<AnalysisPipeline>,
    pub started_at: Instant,
    pub max_upload_bytes: usize,
}

impl GatewayState {
    pub fn new(pipeline: Arc<AnalysisPipeline>, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
            max_upload_bytes,
        }
    }
}

/// Build the router with all API routes.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/api/upload", post(attachments::upload_screenshots))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the Axum HTTP server.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use liftlens_understanding::MockVisionModel;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "liftlens-test-boundary";
    const MUSCLE_JSON: &str = r#"{"muscleGroups":"Glutes, Calves","calories":"262","caloriesUnit":"kcal","volume":"23,700","volumeUnit":"lb","exercises":"Barbell Hip Thrust"}"#;

    fn app(mock: &Arc<MockVisionModel>) -> Router {
        let pipeline = Arc::new(AnalysisPipeline::new(mock.clone()));
        build_router(GatewayState::new(pipeline, 1024 * 1024))
    }

    /// Build a multipart body; each part is (field, filename, content type, data).
    fn multipart(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, filename, content_type, data) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_upload(app: Router, body: Vec<u8>, content_type: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn form_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[tokio::test]
    async fn health_reports_provider() {
        let mock = Arc::new(MockVisionModel::new());
        let response = app(&mock)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "mock");
    }

    #[tokio::test]
    async fn analyzes_uploaded_pair() {
        let mock = Arc::new(
            MockVisionModel::new()
                .then_reply("workout_summary")
                .then_reply(r#"{"date":"Oct 3","duration":"45 min","exercises":[]}"#)
                .then_reply("muscle_groups")
                .then_reply(MUSCLE_JSON),
        );
        let body = multipart(&[
            ("files", "summary.png", "image/png", b"\x89PNG-one"),
            ("note", "ignored.txt", "text/plain", b"hello"),
            ("files", "muscles.jpg", "image/jpeg", b"\xff\xd8-two"),
        ]);

        let (status, json) = post_upload(app(&mock), body, &form_type()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["files"][0]["name"], "summary.png");
        assert_eq!(json["files"][0]["imageType"], "workout_summary");
        assert_eq!(json["files"][1]["type"], "image/jpeg");
        assert_eq!(json["files"][1]["imageType"], "muscle_groups");
        assert_eq!(json["files"][1]["analysis"]["caloriesUnit"], "kcal");
        assert_eq!(mock.calls(), 4);
    }

    #[tokio::test]
    async fn wrong_count_is_bad_request_without_model_calls() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let body = multipart(&[("files", "only.png", "image/png", b"data")]);

        let (status, json) = post_upload(app(&mock), body, &form_type()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Please upload exactly 2 images: one workout summary and one muscle group summary"
        );
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn non_image_is_bad_request() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let body = multipart(&[
            ("files", "a.png", "image/png", b"data"),
            ("files", "b.pdf", "application/pdf", b"%PDF"),
        ]);

        let (status, json) = post_upload(app(&mock), body, &form_type()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Only non-empty image files are accepted");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn declared_binary_part_is_rejected_without_model_calls() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let body = multipart(&[
            ("files", "notes.png", "application/octet-stream", b"data"),
            ("files", "b.png", "image/png", b"data"),
        ]);

        let (status, json) = post_upload(app(&mock), body, &form_type()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Only non-empty image files are accepted");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let pipeline = Arc::new(AnalysisPipeline::new(mock.clone()));
        let app = build_router(GatewayState::new(pipeline, 256));
        let big = vec![7u8; 4096];
        let body = multipart(&[
            ("files", "a.png", "image/png", big.as_slice()),
            ("files", "b.png", "image/png", big.as_slice()),
        ]);

        let (status, json) = post_upload(app, body, &form_type()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Upload exceeds the maximum allowed size");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let mock = Arc::new(MockVisionModel::new());
        let (status, json) =
            post_upload(app(&mock), br#"{"files": []}"#.to_vec(), "application/json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Expected a multipart/form-data upload");
    }

    #[tokio::test]
    async fn duplicate_category_is_ok_status_with_failure_body() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let body = multipart(&[
            ("files", "a.png", "image/png", b"data"),
            ("files", "b.png", "image/png", b"data"),
        ]);

        let (status, json) = post_upload(app(&mock), body, &form_type()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert!(json.get("files").is_none());
    }
}
