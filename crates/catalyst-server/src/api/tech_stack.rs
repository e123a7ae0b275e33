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
use catalyst_storage::store::{NewTechItem, TechItemRow, TechItemUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "tech item";

/// Flat list; the public endpoint groups by category.
#[utoipa::path(
    get,
    path = "/v1/tech-stack",
    tag = "Tech Stack",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated tech item list", body = Vec<TechItemRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_tech_items(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_tech_items().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count tech items"),
    };
    match state.store.list_tech_items(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list tech items"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/tech-stack/{id}",
    tag = "Tech Stack",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Tech item", body = TechItemRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_tech_item(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_tech_item(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load tech item"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/tech-stack",
    tag = "Tech Stack",
    security(("bearer_auth" = [])),
    request_body = NewTechItem,
    responses(
        (status = 201, description = "Created", body = TechItemRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_tech_item(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTechItem>,
) -> impl IntoResponse {
    if body.name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "name is required",
        );
    }
    match state.store.insert_tech_item(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created tech item");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create tech item"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/tech-stack/{id}",
    tag = "Tech Stack",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = TechItemUpdate,
    responses(
        (status = 200, description = "Updated", body = TechItemRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_tech_item(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TechItemUpdate>,
) -> impl IntoResponse {
    if body.name.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "name must not be empty",
        );
    }
    match state.store.update_tech_item(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update tech item"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/tech-stack/{id}",
    tag = "Tech Stack",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_tech_item(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_tech_item(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted tech item");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete tech item"),
    }
}

pub fn tech_stack_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_tech_items, create_tech_item))
        .routes(routes!(get_tech_item, update_tech_item, delete_tech_item))
}
