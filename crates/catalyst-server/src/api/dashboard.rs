use crate::api::{storage_error_response, success_response, ApiError};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use catalyst_storage::store::DashboardCounts;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Row counts for the admin landing page.
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts per table", body = DashboardCounts),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn get_dashboard(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.dashboard_counts().await {
        Ok(counts) => success_response(StatusCode::OK, &trace_id, counts),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load dashboard"),
    }
}

pub fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_dashboard))
}
