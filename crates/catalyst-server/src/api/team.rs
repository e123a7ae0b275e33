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
use catalyst_storage::store::{NewTeamMember, TeamMemberRow, TeamMemberUpdate};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "team member";

#[utoipa::path(
    get,
    path = "/v1/team-members",
    tag = "Team",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated team member list", body = Vec<TeamMemberRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_team_members(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_team_members().await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count team members"),
    };
    match state.store.list_team_members(limit, offset).await {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list team members"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/team-members/{id}",
    tag = "Team",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Team member", body = TeamMemberRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn get_team_member(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_team_member(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load team member"),
    }
}

#[utoipa::path(
    post,
    path = "/v1/team-members",
    tag = "Team",
    security(("bearer_auth" = [])),
    request_body = NewTeamMember,
    responses(
        (status = 201, description = "Created", body = TeamMemberRow),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn create_team_member(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTeamMember>,
) -> impl IntoResponse {
    if body.name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "name is required",
        );
    }
    match state.store.insert_team_member(body).await {
        Ok(row) => {
            tracing::info!(id = %row.id, "Created team member");
            success_response(StatusCode::CREATED, &trace_id, row)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to create team member"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/team-members/{id}",
    tag = "Team",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    request_body = TeamMemberUpdate,
    responses(
        (status = 200, description = "Updated", body = TeamMemberRow),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn update_team_member(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TeamMemberUpdate>,
) -> impl IntoResponse {
    if body.name.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "name must not be empty",
        );
    }
    match state.store.update_team_member(&id, body).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update team member"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/team-members/{id}",
    tag = "Team",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Row id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such row", body = ApiError)
    )
)]
async fn delete_team_member(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_team_member(&id).await {
        Ok(true) => {
            tracing::info!(id = %id, "Deleted team member");
            success_empty_response(StatusCode::OK, &trace_id, "deleted")
        }
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete team member"),
    }
}

pub fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_team_members, create_team_member))
        .routes(routes!(get_team_member, update_team_member, delete_team_member))
}
