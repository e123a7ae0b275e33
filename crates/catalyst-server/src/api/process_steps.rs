use crate::api::pagination::PaginationParams;
use crate::api::{
    error_response, not_found_response, storage_error_response, success_empty_response,
    success_paginated_response, success_response, ApiError, ApiJson,
};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use catalyst_storage::store::{NewProcessStep, ProcessStepRow, ProcessStepUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "process step";

#[utoipa::path(
    get,
    path = "/v1/process-steps",
    tag = "Process Steps",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated process step list", body = Vec<ProcessStepRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_process_steps(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_process_steps().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count process steps"),
    };
    match state.store.list_process_steps(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list process steps"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/process-steps/{id}",
    tag = "Process Steps",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Process step", body = ProcessStepRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_process_step(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_process_step(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load process step"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/process-steps",
    tag = "Process Steps",
    security(("bearer_auth" = [])),
    request_body = NewProcessStep,
    responses(
        (status = 201, description = "Created", body = ProcessStepRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_process_step(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProcessStep>,
) -> impl IntoResponse {
    if body.title.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title is required",
        );
    }
    match state.store.insert_process_step(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created process step");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create process step"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/process-steps/{id}",
    tag = "Process Steps",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = ProcessStepUpdate,
    responses(
        (status = 200, description = "Updated", body = ProcessStepRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_process_step(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProcessStepUpdate>,
) -> impl IntoResponse {
    if body.title.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title must not be empty",
        );
    }
    match state.store.update_process_step(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update process step"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/process-steps/{id}",
    tag = "Process Steps",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_process_step(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_process_step(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted process step");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete process step"),
    }
}

pub fn process_step_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_process_steps, create_process_step))
        .routes(routes!(get_process_step, update_process_step, delete_process_step))
}
