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
use catalyst_common::types::{ContactMessage, ContactStatus};
use catalyst_notify::SendReceipt;
use catalyst_storage::store::{ContactSubmissionRow, NewContactSubmission};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

const ENTITY: &str = "contact submission";

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactCreated {
    pub id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactFilter {
    /// Only rows in this triage state.
    #[param(required = false, value_type = Option<String>)]
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: ContactStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendContactEmailResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub admin_email: SendReceipt,
    #[schema(value_type = Object)]
    pub user_email: SendReceipt,
}

/// Rejects the message if any field is blank after trimming. The fields
/// themselves are kept as submitted.
fn validate_message(msg: ContactMessage) -> Result<ContactMessage, &'static str> {
    if msg.name.trim().is_empty() {
        return Err("name is required");
    }
    if msg.email.trim().is_empty() {
        return Err("email is required");
    }
    if msg.message.trim().is_empty() {
        return Err("message is required");
    }
    Ok(msg)
}

/// Public contact form. Stores the submission with status `new`; the
/// notification mail, when enabled, is sent in the background and cannot
/// fail the request.
#[utoipa::path(
    post,
    path = "/v1/contact",
    tag = "Contact",
    request_body = ContactMessage,
    responses(
        (status = 201, description = "Submission stored", body = ContactCreated),
        (status = 400, description = "A field is blank", body = ApiError)
    )
)]
async fn submit_contact(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactMessage>,
) -> impl IntoResponse {
    let msg = match validate_message(body) {
        Ok(msg) => msg,
        Err(reason) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", reason)
        }
    };

    let row = match state
        .store
        .insert_contact_submission(NewContactSubmission::from(msg.clone()))
        .await
    {
        Ok(row) => row,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to store submission"),
    };
    tracing::info!(id = %row.id, "Contact submission stored");

    let mail = &state.config.mail;
    if mail.enabled && mail.notify_on_submit {
        if let Some(notifier) = state.contact_notifier.clone() {
            let submission_id = row.id.clone();
            tokio::spawn(async move {
                match notifier.notify(&msg).await {
                    Ok(receipts) => tracing::info!(
                        submission_id = %submission_id,
                        admin_email = ?receipts.admin_email.id,
                        user_email = ?receipts.user_email.id,
                        "Contact notification sent"
                    ),
                    Err(e) => tracing::error!(
                        submission_id = %submission_id,
                        error = %e,
                        "Contact notification failed"
                    ),
                }
            });
        }
    }

    success_response(StatusCode::CREATED, &trace_id, ContactCreated { id: row.id })
}

/// Sends the admin notification and auto-reply for a message right away.
#[utoipa::path(
    post,
    path = "/v1/functions/send-contact-email",
    tag = "Contact",
    security(("bearer_auth" = [])),
    request_body = ContactMessage,
    responses(
        (status = 200, description = "Both mails accepted", body = SendContactEmailResponse),
        (status = 400, description = "A field is blank or mail is not configured", body = ApiError),
        (status = 500, description = "Mail provider rejected a message", body = ApiError)
    )
)]
async fn send_contact_email(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactMessage>,
) -> impl IntoResponse {
    let msg = match validate_message(body) {
        Ok(msg) => msg,
        Err(reason) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", reason)
        }
    };
    let Some(notifier) = state.contact_notifier.as_ref() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "mail_error",
            "mail is not configured",
        );
    };
    match notifier.notify(&msg).await {
        Ok(receipts) => success_response(
            StatusCode::OK,
            &trace_id,
            SendContactEmailResponse {
                success: true,
                admin_email: receipts.admin_email,
                user_email: receipts.user_email,
            },
        ),
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "Contact mail failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "mail_error",
                &e.to_string(),
            )
        }
    }
}

/// Submissions newest first, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/v1/contact-submissions",
    tag = "Contact",
    security(("bearer_auth" = [])),
    params(PaginationParams, ContactFilter),
    responses(
        (status = 200, description = "Paginated submissions", body = Vec<ContactSubmissionRow>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_contact_submissions(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ContactFilter>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let total = match state.store.count_contact_submissions(filter.status).await {
        Ok(total) => total,
        Err(e) => return storage_error_response(&trace_id, &e, "Failed to count submissions"),
    };
    match state
        .store
        .list_contact_submissions(filter.status, limit, offset)
        .await
    {
        Ok(items) => {
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list submissions"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/contact-submissions/{id}",
    tag = "Contact",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Submission", body = ContactSubmissionRow),
        (status = 404, description = "No such submission", body = ApiError)
    )
)]
async fn get_contact_submission(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_contact_submission(&id).await {
        Ok(Some(row)) => success_response(StatusCode::OK, &trace_id, row),
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load submission"),
    }
}

#[utoipa::path(
    put,
    path = "/v1/contact-submissions/{id}/status",
    tag = "Contact",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = ContactSubmissionRow),
        (status = 400, description = "Unknown status", body = ApiError),
        (status = 404, description = "No such submission", body = ApiError)
    )
)]
async fn update_contact_status(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> impl IntoResponse {
    match state.store.update_contact_status(&id, body.status).await {
        Ok(Some(row)) => {
            tracing::info!(id = %id, status = %row.status, "Contact status changed");
            success_response(StatusCode::OK, &trace_id, row)
        }
        Ok(None) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to update submission"),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/contact-submissions/{id}",
    tag = "Contact",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such submission", body = ApiError)
    )
)]
async fn delete_contact_submission(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_contact_submission(&id).await {
        Ok(true) => success_empty_response(StatusCode::OK, &trace_id, "deleted"),
        Ok(false) => not_found_response(&trace_id, ENTITY, &id),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete submission"),
    }
}

pub fn public_contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(submit_contact))
}

pub fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(send_contact_email))
        .routes(routes!(list_contact_submissions))
        .routes(routes!(get_contact_submission, delete_contact_submission))
        .routes(routes!(update_contact_status))
}
