//! Inbound email webhook.
//!
//! Mail providers (Mailgun, Postmark, SendGrid, SES via SNS) post parsed
//! messages in different shapes. Extraction is best-effort: each field is the
//! first non-empty string among the provider-specific names. Deliveries are
//! not deduplicated.

use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalyst_storage::store::NewContactSubmission;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use utoipa_axum::{router::OpenApiRouter, routes};

static NAMED_ADDRESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(.*)<(.+@.+)>$").ok());

const FALLBACK_NAME: &str = "Incoming Email";

/// Looks up a dotted path such as `mail.commonHeaders.subject` and returns it
/// when it is a non-empty string.
fn string_at<'a>(payload: &'a Map<String, Value>, path: &str) -> Option<&'a str> {
    let mut parts = path.split('.');
    let mut current = payload.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    current.as_str().filter(|s| !s.is_empty())
}

fn first_of<'a>(payload: &'a Map<String, Value>, paths: &[&str]) -> Option<&'a str> {
    paths.iter().find_map(|path| string_at(payload, path))
}

/// Splits `Name <addr@host>` into a trimmed, unquoted name and the address.
/// A bare value containing `@` is taken as the address.
fn parse_sender(from: &str) -> (Option<String>, Option<String>) {
    let captures = NAMED_ADDRESS.as_ref().and_then(|re| re.captures(from));
    if let Some(caps) = captures {
        let name = caps.get(1).map_or("", |m| m.as_str()).trim();
        let name = name.strip_prefix('"').unwrap_or(name);
        let name = name.strip_suffix('"').unwrap_or(name);
        let email = caps.get(2).map_or("", |m| m.as_str()).trim();
        return (
            Some(name.to_string()).filter(|s| !s.is_empty()),
            Some(email.to_string()).filter(|s| !s.is_empty()),
        );
    }
    if from.contains('@') {
        return (None, Some(from.trim().to_string()));
    }
    (None, None)
}

/// Maps a provider payload onto a new contact submission.
pub fn parse_inbound_email(payload: &Map<String, Value>) -> NewContactSubmission {
    let from = first_of(payload, &["from", "sender", "mail.source", "from_email"]).unwrap_or("");
    let subject = first_of(payload, &["subject", "mail.commonHeaders.subject"]).unwrap_or("");
    let text = first_of(payload, &["text", "body", "content", "plain", "mail.text"]);
    let raw = first_of(payload, &["body-plain", "raw", "Message-Body"]);
    let body = text
        .or(raw)
        .or(Some(subject).filter(|s| !s.is_empty()))
        .or_else(|| string_at(payload, "message"))
        .unwrap_or("");

    let (parsed_name, parsed_email) = parse_sender(from);
    let name = parsed_name
        .or_else(|| first_of(payload, &["name", "sender_name"]).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_NAME.to_string());
    let email = parsed_email
        .or_else(|| first_of(payload, &["email", "from"]).map(str::to_string))
        .unwrap_or_default();

    let message = if subject.is_empty() {
        body.to_string()
    } else {
        format!("{subject}\n\n{body}")
    };

    NewContactSubmission {
        name,
        email,
        message,
        status: Default::default(),
    }
}

/// Decodes a JSON or form-encoded body into a flat object. An empty body is
/// an empty object.
fn decode_payload(headers: &HeaderMap, body: &[u8]) -> Option<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Some(Map::new());
    }
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).ok()?;
        return Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        );
    }
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Stores an inbound email as a contact submission with status `new`.
#[utoipa::path(
    post,
    path = "/webhook/email",
    tag = "Webhook",
    request_body(content = serde_json::Value, description = "Provider payload, JSON or form-encoded"),
    responses(
        (status = 200, description = "Stored: {\"ok\": true, \"inserted\": {\"id\": ...}}"),
        (status = 400, description = "Body is not an object: {\"error\": \"invalid_payload\"}"),
        (status = 500, description = "Store failure: {\"error\": \"db_error\", \"details\": ...}")
    )
)]
async fn receive_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(payload) = decode_payload(&headers, &body) else {
        tracing::warn!("Rejected unreadable email webhook payload");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_payload" })),
        )
            .into_response();
    };

    let submission = parse_inbound_email(&payload);
    match state.store.insert_contact_submission(submission).await {
        Ok(row) => {
            tracing::info!(id = %row.id, email = %row.email, "Stored inbound email");
            (
                StatusCode::OK,
                Json(json!({ "ok": true, "inserted": { "id": row.id } })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store inbound email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "db_error", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub fn webhook_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(receive_email))
}
