use crate::api::{
    error_response, not_found_response, storage_error_response, success_response, ApiError,
    ApiJson,
};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use catalyst_common::settings::{SiteSetting, SiteSettings};
use catalyst_storage::store::SettingRow;
use serde_json::Value;
use utoipa_axum::{router::OpenApiRouter, routes};

/// All three sections, with defaults for anything not stored.
#[utoipa::path(
    get,
    path = "/v1/settings",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Site settings", body = SiteSettings),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn get_settings(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.load_site_settings().await {
        Ok(settings) => success_response(StatusCode::OK, &trace_id, settings),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load settings"),
    }
}

/// Upserts hero, contact and social in one call.
#[utoipa::path(
    put,
    path = "/v1/settings",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body = SiteSettings,
    responses(
        (status = 200, description = "Saved settings", body = SiteSettings),
        (status = 400, description = "Invalid body", body = ApiError)
    )
)]
async fn put_settings(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SiteSettings>,
) -> impl IntoResponse {
    match state.store.save_site_settings(body).await {
        Ok(saved) => {
            tracing::info!("Site settings saved");
            success_response(StatusCode::OK, &trace_id, saved)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to save settings"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/settings/{key}",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "hero, contact or social")),
    responses(
        (status = 200, description = "Stored row", body = SettingRow),
        (status = 404, description = "Nothing stored under this key", body = ApiError)
    )
)]
async fn get_setting(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.store.get_setting_row(&key).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, "setting", &key),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load setting"),
    }
}

/// Upserts one section. The body is the section's value object.
#[utoipa::path(
    put,
    path = "/v1/settings/{key}",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "hero, contact or social")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Stored row", body = SettingRow),
        (status = 400, description = "Unknown key or value of the wrong shape", body = ApiError)
    )
)]
async fn put_setting(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(value): ApiJson<Value>,
) -> impl IntoResponse {
    let setting = match SiteSetting::from_parts(&key, value) {
        Ok(setting) => setting,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &trace_id,
                "bad_request",
                &format!("invalid setting '{key}': {e}"),
            )
        }
    };
    match state.store.upsert_setting(&setting).await {
        Ok(row) => success_response(StatusCode::OK, &trace_id, row),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to save setting"),
    }
}

pub fn settings_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_settings, put_settings))
        .routes(routes!(get_setting, put_setting))
}
