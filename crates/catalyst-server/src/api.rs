pub mod blog;
pub mod careers;
pub mod case_studies;
pub mod contact;
pub mod dashboard;
pub mod import;
pub mod media;
pub mod pagination;
pub mod process_steps;
pub mod public;
pub mod services;
pub mod settings;
pub mod team;
pub mod tech_stack;
pub mod testimonials;

use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalyst_storage::StorageError;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Error envelope as documented in the OpenAPI document.
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
}

/// Response envelope used by every JSON endpoint except the email webhook.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 0 on success.
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
    pub data: Option<T>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedData<T>
where
    T: Serialize,
{
    pub items: Vec<T>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data: Some(data),
        }),
    )
        .into_response()
}

pub fn success_empty_response(status: StatusCode, trace_id: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: 0,
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

pub fn success_paginated_response<T>(
    status: StatusCode,
    trace_id: &str,
    items: Vec<T>,
    total: u64,
    limit: usize,
    offset: usize,
) -> Response
where
    T: Serialize,
{
    success_response(
        status,
        trace_id,
        PaginatedData {
            items,
            total,
            limit,
            offset,
        },
    )
}

fn to_custom_error_code(code: &str) -> i32 {
    match code {
        "bad_request" => 1001,
        "unauthorized" => 1002,
        "token_expired" => 1003,
        "not_found" => 1004,
        "conflict" => 1005,
        "unknown_table" => 1104,
        "mail_error" => 1201,
        "media_error" => 1301,
        "storage_error" => 1501,
        "internal_error" => 1500,
        _ => 1999,
    }
}

pub fn error_response(status: StatusCode, trace_id: &str, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: to_custom_error_code(code),
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

/// Maps a storage failure onto the error envelope. Database internals are
/// logged, not returned.
pub fn storage_error_response(trace_id: &str, err: &StorageError, context: &str) -> Response {
    match err {
        StorageError::Conflict(msg) => {
            error_response(StatusCode::CONFLICT, trace_id, "conflict", msg)
        }
        StorageError::NotFound { entity, id } => error_response(
            StatusCode::NOT_FOUND,
            trace_id,
            "not_found",
            &format!("{entity} '{id}' not found"),
        ),
        StorageError::Invalid(_) | StorageError::InvalidRow { .. } => {
            error_response(StatusCode::BAD_REQUEST, trace_id, "bad_request", &err.to_string())
        }
        _ => {
            tracing::error!(trace_id = %trace_id, error = %err, "{context}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                trace_id,
                "storage_error",
                context,
            )
        }
    }
}

pub fn not_found_response(trace_id: &str, entity: &str, id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        trace_id,
        "not_found",
        &format!("{entity} '{id}' not found"),
    )
}

/// `Json` extractor whose rejection is a `400 bad_request` envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                &trace_id,
                "bad_request",
                &rejection.body_text(),
            )),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    version: String,
    uptime_secs: i64,
    storage_status: String,
}

/// Service health. No authentication.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let uptime = (Utc::now() - state.start_time).num_seconds();
    let storage_status = match state.store.count_users().await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            "unavailable"
        }
    };
    success_response(
        StatusCode::OK,
        &trace_id,
        HealthResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: uptime,
            storage_status: storage_status.to_string(),
        },
    )
}

/// Routes reachable without credentials.
pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .merge(public::public_routes())
        .merge(contact::public_contact_routes())
        .merge(media::public_media_routes())
        .merge(crate::webhook::webhook_routes())
}

pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(crate::auth::login))
}

/// Routes that require an admin or service session.
pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(crate::auth::current_session))
        .merge(services::service_routes())
        .merge(case_studies::case_study_routes())
        .merge(testimonials::testimonial_routes())
        .merge(process_steps::process_step_routes())
        .merge(tech_stack::tech_stack_routes())
        .merge(blog::blog_routes())
        .merge(careers::career_routes())
        .merge(team::team_routes())
        .merge(contact::contact_routes())
        .merge(settings::settings_routes())
        .merge(media::media_routes())
        .merge(dashboard::dashboard_routes())
        .merge(import::import_routes())
}
