//! Analysis task handlers: submit, poll, list.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use marketscope_core::{AnalysisTask, AnalysisType};
use marketscope_orchestrator::OrchestratorError;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateAnalysisRequest {
    pub url: String,
    #[serde(default)]
    pub analysis_type: AnalysisType,
}

fn map_orchestrator_error(request_id: String, error: &OrchestratorError) -> ApiError {
    match error {
        OrchestratorError::InvalidUrl { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        other => {
            tracing::error!(error = %other, "task orchestrator request failed");
            ApiError::new(request_id, "internal_error", "task store unavailable")
        }
    }
}

pub(super) async fn create_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateAnalysisRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AnalysisTask>>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;

    let task = state
        .orchestrator
        .submit(&body.url, body.analysis_type)
        .map_err(|e| map_orchestrator_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: task,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(task_id): Path<String>,
) -> Result<Json<ApiResponse<AnalysisTask>>, ApiError> {
    let task_id = Uuid::parse_str(&task_id).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("'{task_id}' is not a valid task id"),
        )
    })?;

    let task = state
        .orchestrator
        .poll(task_id)
        .map_err(|e| map_orchestrator_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("analysis task {task_id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: task,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_analyses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<AnalysisTask>>>, ApiError> {
    let tasks = state
        .orchestrator
        .list()
        .map_err(|e| map_orchestrator_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: tasks,
        meta: ResponseMeta::new(req_id.0),
    }))
}
