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
use catalyst_storage::store::{NewCareer, CareerRow, CareerUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "career";

#[utoipa::path(
    get,
    path = "/v1/careers",
    tag = "Careers",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated career list", body = Vec<CareerRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_careers(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_careers().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count careers"),
    };
    match state.store.list_careers(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list careers"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/careers/{id}",
    tag = "Careers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Career", body = CareerRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_career(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_career(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load career"),
    }
}

/// Requirements are trimmed and blank entries dropped.
#[utoipa::path(
    post,
    path = "/v1/careers",
    tag = "Careers",
    security(("bearer_auth" = [])),
    request_body = NewCareer,
    responses(
        (status = 201, description = "Created", body = CareerRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_career(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCareer>,
) -> impl IntoResponse {
    if body.title.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title is required",
        );
    }
    match state.store.insert_career(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created career");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create career"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/careers/{id}",
    tag = "Careers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = CareerUpdate,
    responses(
        (status = 200, description = "Updated", body = CareerRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_career(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CareerUpdate>,
) -> impl IntoResponse {
    if body.title.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title must not be empty",
        );
    }
    match state.store.update_career(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update career"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/careers/{id}",
    tag = "Careers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_career(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_career(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted career");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete career"),
    }
}

pub fn career_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_careers, create_career))
        .routes(routes!(get_career, update_career, delete_career))
}
