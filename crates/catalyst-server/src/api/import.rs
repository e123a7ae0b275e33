use crate::api::{error_response, storage_error_response, success_response, ApiError, ApiJson};
use crate::auth::Session;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use catalyst_common::types::ContentTable;
use catalyst_storage::store::ImportSummary;
use serde_json::Value;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Inserts a chunk of rows into one table in a single transaction. Rows may
/// carry their original `id` and `created_at`.
#[utoipa::path(
    post,
    path = "/v1/import/{table}",
    tag = "Import",
    security(("bearer_auth" = [])),
    params(("table" = String, Path, description = "Target table name, e.g. blog_posts")),
    request_body = Vec<serde_json::Value>,
    responses(
        (status = 200, description = "Chunk inserted", body = ImportSummary),
        (status = 400, description = "Unknown table or malformed row", body = ApiError),
        (status = 409, description = "A row violates a unique constraint", body = ApiError)
    )
)]
async fn import_rows(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    session: Session,
    Path(table): Path<String>,
    ApiJson(rows): ApiJson<Vec<Value>>,
) -> impl IntoResponse {
    let table = match table.parse::<ContentTable>() {
        Ok(table) => table,
        Err(msg) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "unknown_table", &msg)
        }
    };
    let count = rows.len();
    match state.store.import_rows(table, rows).await {
        Ok(inserted) => {
            tracing::info!(
                table = %table,
                rows = count,
                caller = %session.username,
                "Imported chunk"
            );
            success_response(
                StatusCode::OK,
                &trace_id,
                ImportSummary {
                    table: table.to_string(),
                    inserted,
                },
            )
        }
        Err(e) => {
            tracing::warn!(table = %table, rows = count, error = %e, "Import chunk rejected");
            storage_error_response(&trace_id, &e, "Failed to import rows")
        }
    }
}

pub fn import_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(import_rows))
}
