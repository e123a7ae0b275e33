use crate::api::{
    error_response, not_found_response, storage_error_response, success_empty_response,
    success_response, ApiError,
};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use catalyst_storage::media::MediaItem;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Up to 100 files, newest first, each with its public URL.
#[utoipa::path(
    get,
    path = "/v1/media",
    tag = "Media",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Media files", body = Vec<MediaItem>),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
async fn list_media(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.media.list().await {
        Ok(items) => success_response(StatusCode::OK, &trace_id, items),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to list media"),
    }
}

/// Uploads every file part of a multipart body. Non-file parts are ignored.
#[utoipa::path(
    post,
    path = "/v1/media",
    tag = "Media",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", description = "One or more file parts"),
    responses(
        (status = 201, description = "Uploaded files", body = Vec<MediaItem>),
        (status = 400, description = "No file in the body", body = ApiError)
    )
)]
async fn upload_media(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut uploaded = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &trace_id,
                    "bad_request",
                    &e.body_text(),
                )
            }
        };
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &trace_id,
                    "bad_request",
                    &e.body_text(),
                )
            }
        };
        match state.media.upload(&file_name, &mime_type, data).await {
            Ok(item) => uploaded.push(item),
            Err(e) => {
                tracing::error!(trace_id = %trace_id, file = %file_name, error = %e, "Media upload failed");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &trace_id,
                    "media_error",
                    &format!("failed to upload {file_name}"),
                );
            }
        }
    }

    if uploaded.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "no file in request",
        );
    }
    success_response(StatusCode::CREATED, &trace_id, uploaded)
}

#[utoipa::path(
    delete,
    path = "/v1/media/{name}",
    tag = "Media",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Object key")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such file", body = ApiError)
    )
)]
async fn delete_media(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.media.remove(&name).await {
        Ok(true) => success_empty_response(StatusCode::OK, &trace_id, "deleted"),
        Ok(false) => not_found_response(&trace_id, "media file", &name),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to delete media"),
    }
}

/// Raw bytes of an uploaded file, served with its stored content type.
#[utoipa::path(
    get,
    path = "/media/{name}",
    tag = "Media",
    params(("name" = String, Path, description = "Object key")),
    responses(
        (status = 200, description = "File bytes with the stored content type"),
        (status = 404, description = "No such file", body = ApiError)
    )
)]
async fn serve_media(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    match state.media.fetch(&name).await {
        Ok(Some((file, bytes))) => {
            ([(header::CONTENT_TYPE, file.mime_type)], bytes).into_response()
        }
        Ok(None) => not_found_response(&trace_id, "media file", &name),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to read media"),
    }
}

pub fn public_media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(serve_media))
}

pub fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_media, upload_media))
        .routes(routes!(delete_media))
}
