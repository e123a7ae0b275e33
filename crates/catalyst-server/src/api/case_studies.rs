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
use catalyst_storage::store::{NewCaseStudy, CaseStudyRow, CaseStudyUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "case study";

#[utoipa::path(
    get,
    path = "/v1/case-studies",
    tag = "Case Studies",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated case study list", body = Vec<CaseStudyRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_case_studies(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_case_studies().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count case studies"),
    };
    match state.store.list_case_studies(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list case studies"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/case-studies/{id}",
    tag = "Case Studies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Case study", body = CaseStudyRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_case_study(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_case_study(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load case study"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/case-studies",
    tag = "Case Studies",
    security(("bearer_auth" = [])),
    request_body = NewCaseStudy,
    responses(
        (status = 201, description = "Created", body = CaseStudyRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_case_study(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCaseStudy>,
) -> impl IntoResponse {
    if body.client.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "client is required",
        );
    }
    match state.store.insert_case_study(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created case study");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create case study"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/case-studies/{id}",
    tag = "Case Studies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = CaseStudyUpdate,
    responses(
        (status = 200, description = "Updated", body = CaseStudyRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_case_study(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CaseStudyUpdate>,
) -> impl IntoResponse {
    if body.client.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "client must not be empty",
        );
    }
    match state.store.update_case_study(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update case study"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/case-studies/{id}",
    tag = "Case Studies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_case_study(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_case_study(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted case study");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete case study"),
    }
}

pub fn case_study_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_case_studies, create_case_study))
        .routes(routes!(get_case_study, update_case_study, delete_case_study))
}
