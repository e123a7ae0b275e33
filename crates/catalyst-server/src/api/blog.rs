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
use catalyst_storage::store::{NewBlogPost, BlogPostRow, BlogPostUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "blog post";

/// Every post, drafts included, newest first.
#[utoipa::path(
    get,
    path = "/v1/blog-posts",
    tag = "Blog",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated blog post list", body = Vec<BlogPostRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_blog_posts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_blog_posts().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count blog posts"),
    };
    match state.store.list_blog_posts(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list blog posts"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/blog-posts/{id}",
    tag = "Blog",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Blog post", body = BlogPostRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_blog_post(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_blog_post(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load blog post"),
    }
}

/// Creates a post. The slug is derived from the title when omitted; a post
/// created as published is stamped with the current time.
#[utoipa::path(
    post,
    path = "/v1/blog-posts",
    tag = "Blog",
    security(("bearer_auth" = [])),
    request_body = NewBlogPost,
    responses(
        (status = 201, description = "Created", body = BlogPostRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_blog_post(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewBlogPost>,
) -> impl IntoResponse {
    if body.title.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title is required",
        );
    }
    match state.store.insert_blog_post(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created blog post");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create blog post"),
    }
}

/// Partial update. Flipping `is_published` on stamps `published_at`,
/// flipping it off clears it.
#[utoipa::path(
    put,
    path = "/v1/blog-posts/{id}",
    tag = "Blog",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = BlogPostUpdate,
    responses(
        (status = 200, description = "Updated", body = BlogPostRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_blog_post(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BlogPostUpdate>,
) -> impl IntoResponse {
    if body.title.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "title must not be empty",
        );
    }
    match state.store.update_blog_post(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update blog post"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/blog-posts/{id}",
    tag = "Blog",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_blog_post(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_blog_post(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted blog post");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete blog post"),
    }
}

pub fn blog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_blog_posts, create_blog_post))
        .routes(routes!(get_blog_post, update_blog_post, delete_blog_post))
}
