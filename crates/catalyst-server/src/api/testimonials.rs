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
use catalyst_storage::store::{NewTestimonial, TestimonialRow, TestimonialUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "testimonial";

/// Newest first.
#[utoipa::path(
    get,
    path = "/v1/testimonials",
    tag = "Testimonials",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated testimonial list", body = Vec<TestimonialRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_testimonials(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_testimonials().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count testimonials"),
    };
    match state.store.list_testimonials(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list testimonials"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/testimonials/{id}",
    tag = "Testimonials",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Testimonial", body = TestimonialRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_testimonial(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_testimonial(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load testimonial"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/testimonials",
    tag = "Testimonials",
    security(("bearer_auth" = [])),
    request_body = NewTestimonial,
    responses(
        (status = 201, description = "Created", body = TestimonialRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_testimonial(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTestimonial>,
) -> impl IntoResponse {
    if body.quote.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "quote is required",
        );
    }
    match state.store.insert_testimonial(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created testimonial");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create testimonial"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/testimonials/{id}",
    tag = "Testimonials",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = TestimonialUpdate,
    responses(
        (status = 200, description = "Updated", body = TestimonialRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_testimonial(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TestimonialUpdate>,
) -> impl IntoResponse {
    if body.quote.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "quote must not be empty",
        );
    }
    match state.store.update_testimonial(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update testimonial"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/testimonials/{id}",
    tag = "Testimonials",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_testimonial(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_testimonial(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted testimonial");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete testimonial"),
    }
}

pub fn testimonial_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_testimonials, create_testimonial))
        .routes(routes!(get_testimonial, update_testimonial, delete_testimonial))
}
