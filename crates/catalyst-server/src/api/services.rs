//! Admin routes for the services shown on the homepage.

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
use catalyst_storage::store::{NewService, ServiceRow, ServiceUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "service";

#[utoipa::path(
    get,
    path = "/v1/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated service list", body = Vec<ServiceRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_services(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_services().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count services"),
    };
    match state.store.list_services(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list services"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Service", body = ServiceRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_service(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_service(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load service"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = NewService,
    responses(
        (status = 201, description = "Created", body = ServiceRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_service(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewService>,
) -> impl IntoResponse {
    if body.title.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title is required",
        );
    }
    match state.store.insert_service(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created service");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create service"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = ServiceUpdate,
    responses(
        (status = 200, description = "Updated", body = ServiceRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_service(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ServiceUpdate>,
) -> impl IntoResponse {
    if body.title.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title must not be empty",
        );
    }
    match state.store.update_service(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update service"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_service(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_service(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted service");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete service"),
    }
}

pub fn service_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_services, create_service))
        .routes(routes!(get_service, update_service, delete_service))
}
