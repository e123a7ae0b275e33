use crate::api::{error_response, success_response, ApiError, ApiJson};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Extension, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use catalyst_common::types::{LoginRequest, LoginResponse};
use catalyst_storage::auth::{constant_time_eq, verify_password};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn create_token(
    secret: &str,
    user_id: &str,
    username: &str,
    expire_secs: u64,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now + expire_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Logged-in admin holding a JWT.
    Admin,
    /// Machine caller holding the service key (migration tooling).
    Service,
}

/// Who is calling a protected route. Inserted by [`require_session`] and
/// extracted by handlers that need it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Session {
    pub subject: String,
    pub username: String,
    pub kind: SessionKind,
}

impl Session {
    fn service() -> Self {
        Self {
            subject: "service".to_string(),
            username: "service".to_string(),
            kind: SessionKind::Service,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = parts
            .extensions
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            error_response(
                StatusCode::UNAUTHORIZED,
                &trace_id,
                "unauthorized",
                "authentication required",
            )
        })
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Accepts either the configured service key or an admin JWT.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let trace_id = req
        .extensions()
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_default();

    let Some(token) = bearer_token(&req) else {
        return error_response(
            StatusCode::UNAUTHORIZED,
            &trace_id,
            "unauthorized",
            "missing or invalid authorization header",
        );
    };

    let session = match &state.service_key {
        Some(key) if constant_time_eq(token, key) => Session::service(),
        _ => match validate_token(&state.jwt_secret, token) {
            Ok(claims) => Session {
                subject: claims.sub,
                username: claims.username,
                kind: SessionKind::Admin,
            },
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                return error_response(
                    StatusCode::UNAUTHORIZED,
                    &trace_id,
                    "token_expired",
                    "token expired",
                );
            }
            Err(_) => {
                return error_response(
                    StatusCode::UNAUTHORIZED,
                    &trace_id,
                    "unauthorized",
                    "invalid token",
                );
            }
        },
    };

    req.extensions_mut().insert(session);
    next.run(req).await
}

/// Exchange admin credentials for a JWT.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    )
)]
pub async fn login(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "username and password are required",
        );
    }

    let user = match state.store.get_user_by_username(req.username.trim()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                &trace_id,
                "unauthorized",
                "invalid credentials",
            );
        }
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "Failed to query user");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "internal_error",
                "internal error",
            );
        }
    };

    if !matches!(verify_password(&req.password, &user.password_hash), Ok(true)) {
        tracing::warn!(username = %user.username, "Rejected login");
        return error_response(
            StatusCode::UNAUTHORIZED,
            &trace_id,
            "unauthorized",
            "invalid credentials",
        );
    }

    match create_token(
        &state.jwt_secret,
        &user.id,
        &user.username,
        state.token_expire_secs,
    ) {
        Ok(token) => success_response(
            StatusCode::OK,
            &trace_id,
            LoginResponse {
                token,
                expires_in: state.token_expire_secs,
            },
        ),
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "Failed to create token");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "internal_error",
                "internal error",
            )
        }
    }
}

/// The caller's session, for the admin shell to confirm who is logged in.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session", body = Session),
        (status = 401, description = "Not authenticated", body = ApiError)
    )
)]
pub async fn current_session(
    Extension(trace_id): Extension<TraceId>,
    session: Session,
) -> impl IntoResponse {
    success_response(StatusCode::OK, &trace_id, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token("secret", "u1", "admin", 60).unwrap();
        let claims = validate_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("secret", "u1", "admin", 60).unwrap();
        assert!(validate_token("other", &token).is_err());
    }
}
