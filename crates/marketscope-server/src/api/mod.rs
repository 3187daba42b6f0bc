mod analyses;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use marketscope_orchestrator::TaskOrchestrator;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: TaskOrchestrator,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    inference: &'static str,
    categories: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/analyses",
            get(analyses::list_analyses).post(analyses::create_analysis),
        )
        .route("/api/v1/analyses/{task_id}", get(analyses::get_analysis))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let pipeline = state.orchestrator.pipeline();
    let categories = pipeline
        .aggregator()
        .catalog()
        .classifier()
        .rules()
        .iter()
        .map(|rule| rule.category)
        .collect::<std::collections::HashSet<_>>()
        .len();
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            inference: if pipeline.is_live() {
                "enabled"
            } else {
                "disabled"
            },
            categories,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use marketscope_core::Catalog;
    use marketscope_orchestrator::{InMemoryTaskStore, InsightPipeline};
    use marketscope_report::InsightAggregator;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let catalog = Arc::new(Catalog::builtin().expect("builtin catalog"));
        let pipeline = InsightPipeline::new(InsightAggregator::new(catalog), None);
        let orchestrator =
            TaskOrchestrator::new(Arc::new(InMemoryTaskStore::new()), Arc::new(pipeline));
        build_app(AppState { orchestrator })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn post_analysis(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/analyses")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("bad_request", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "message").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[tokio::test]
    async fn health_reports_catalog_only_mode() {
        let response = test_app()
            .oneshot(get("/api/v1/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["inference"], "disabled");
        assert!(json["data"]["categories"].as_u64().expect("count") > 0);
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/api/v1/health")
            .header("x-request-id", "trace-abc")
            .body(Body::empty())
            .expect("request");
        let response = test_app().oneshot(request).await.expect("response");
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.as_bytes()),
            Some(&b"trace-abc"[..])
        );
        let json = json_body(response).await;
        assert_eq!(json["meta"]["request_id"], "trace-abc");
    }

    #[tokio::test]
    async fn create_analysis_returns_pending_task_with_default_type() {
        let response = test_app()
            .oneshot(post_analysis(r#"{"url":"https://www.apple.com"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let json = json_body(response).await;
        assert_eq!(json["data"]["url"], "https://www.apple.com");
        assert_eq!(json["data"]["analysis_type"], "full");
        assert_eq!(json["data"]["status"], "pending");
        assert_eq!(json["data"]["progress"], 0);
        assert!(json["data"]["task_id"].is_string());
    }

    #[tokio::test]
    async fn submitted_analysis_can_be_polled_to_completion() {
        let app = test_app();
        let created = app
            .clone()
            .oneshot(post_analysis(
                r#"{"url":"https://www.tesla.com","analysis_type":"market"}"#,
            ))
            .await
            .expect("response");
        let task_id = json_body(created).await["data"]["task_id"]
            .as_str()
            .expect("task id")
            .to_string();

        let mut task = serde_json::Value::Null;
        for _ in 0..200 {
            let response = app
                .clone()
                .oneshot(get(&format!("/api/v1/analyses/{task_id}")))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            task = json_body(response).await["data"].clone();
            if task["status"] == "completed" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(task["status"], "completed");
        assert_eq!(task["progress"], 100);
        assert_eq!(task["result"]["category"], "electric_vehicle");
        assert!(task["result"]["user_profile"].is_null());

        let listed = app
            .oneshot(get("/api/v1/analyses"))
            .await
            .expect("response");
        let json = json_body(listed).await;
        assert_eq!(json["data"].as_array().expect("list").len(), 1);
    }

    #[tokio::test]
    async fn invalid_url_is_a_validation_error() {
        let response = test_app()
            .oneshot(post_analysis(r#"{"url":"ftp://files.example.org"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn malformed_body_uses_error_envelope() {
        for body in [r#"{"url":"#, r#"{"url":"https://a.com","analysis_type":"everything"}"#] {
            let response = test_app()
                .oneshot(post_analysis(body))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            let json = json_body(response).await;
            assert_eq!(json["error"]["code"], "bad_request");
            assert!(json["meta"]["request_id"].is_string());
        }
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let response = test_app()
            .oneshot(get(&format!("/api/v1/analyses/{}", uuid::Uuid::new_v4())))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn malformed_task_id_is_a_bad_request() {
        let response = test_app()
            .oneshot(get("/api/v1/analyses/not-a-uuid"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }
}
