#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use catalyst_common::types::LoginRequest;
use catalyst_notify::{ContactMailSettings, ContactNotifier, Mailer, OutboundEmail, SendReceipt};
use catalyst_server::app;
use catalyst_server::config::{DatabaseConfig, MailConfig, ServerConfig};
use catalyst_server::state::AppState;
use catalyst_storage::auth::hash_password;
use catalyst_storage::{ContentStore, MediaLibrary};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const SERVICE_KEY: &str = "test-service-key";

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
}

/// Mailer that records what it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> catalyst_notify::Result<SendReceipt> {
        let mut sent = self.sent.lock().expect("mailer lock");
        sent.push(email.clone());
        Ok(SendReceipt {
            id: Some(format!("msg-{}", sent.len())),
            provider: "recording".to_string(),
        })
    }

    fn provider(&self) -> &str {
        "recording"
    }
}

fn ensure_rustls_provider() {
    static RUSTLS_PROVIDER_INIT: OnceLock<()> = OnceLock::new();
    RUSTLS_PROVIDER_INIT.get_or_init(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

pub async fn build_test_context() -> Result<TestContext> {
    build_context(None).await
}

/// Context with mail enabled and every message captured by `mailer`.
pub async fn build_test_context_with_mailer(mailer: Arc<RecordingMailer>) -> Result<TestContext> {
    build_context(Some(mailer)).await
}

async fn build_context(mailer: Option<Arc<RecordingMailer>>) -> Result<TestContext> {
    catalyst_common::id::init(1, 1);
    ensure_rustls_provider();

    let temp_dir = tempfile::tempdir()?;
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("catalyst.db").display()
    );
    let store = Arc::new(ContentStore::new(&db_url).await?);

    let password_hash = hash_password("changeme")?;
    store.create_user("admin", &password_hash).await?;

    let media = MediaLibrary::local(temp_dir.path(), store.clone(), "http://localhost:8080")?;

    let config = ServerConfig {
        database: DatabaseConfig { url: db_url },
        mail: MailConfig {
            enabled: mailer.is_some(),
            ..Default::default()
        },
        ..Default::default()
    };

    let contact_notifier = mailer.map(|m| {
        let mailer: Arc<dyn Mailer> = m;
        Arc::new(ContactNotifier::new(mailer, ContactMailSettings::default()))
    });

    let state = AppState {
        store,
        media: Arc::new(media),
        contact_notifier,
        start_time: Utc::now(),
        jwt_secret: Arc::new("test-secret".to_string()),
        service_key: Some(Arc::new(SERVICE_KEY.to_string())),
        token_expire_secs: 3600,
        config: Arc::new(config),
    };

    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
    })
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder = builder.header("Content-Type", "application/json");

    let req_body = body.unwrap_or(Value::Null).to_string();
    let req = builder
        .body(Body::from(req_body))
        .expect("request should build");
    send(app, req).await
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = builder.body(Body::empty()).expect("request should build");
    send(app, req).await
}

/// Sends a raw body with an explicit content type.
pub async fn request_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    content_type: &str,
    body: impl Into<Body>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", content_type);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = builder.body(body.into()).expect("request should build");
    send(app, req).await
}

pub async fn login_and_get_token(app: &axum::Router) -> String {
    let (status, body, _) = request_json(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(
            serde_json::to_value(LoginRequest {
                username: "admin".to_string(),
                password: "changeme".to_string(),
            })
            .expect("login request should serialize"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["err_code"], 0);
    body["data"]["token"]
        .as_str()
        .expect("token should exist")
        .to_string()
}

/// Polls until `mailer` has recorded `count` messages or a second passes.
pub async fn wait_for_mail(mailer: &RecordingMailer, count: usize) -> Vec<OutboundEmail> {
    for _ in 0..100 {
        let sent = mailer.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    mailer.sent()
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json.get("data").is_some());
    assert!(json["data"].is_null());
}

pub fn decode_data<T: DeserializeOwned>(json: &Value) -> T {
    serde_json::from_value(json["data"].clone()).expect("data should decode")
}
