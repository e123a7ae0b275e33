use crate::state::AppState;
use crate::{api, auth, logging};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalyst API",
        description = "Content, contact and media API for the Catalyst site",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Login and session"),
        (name = "Public", description = "Published site content"),
        (name = "Services", description = "Service offerings"),
        (name = "Case Studies", description = "Client results"),
        (name = "Testimonials", description = "Client quotes"),
        (name = "Process Steps", description = "Engagement timeline"),
        (name = "Tech Stack", description = "Tools by category"),
        (name = "Blog", description = "Blog posts"),
        (name = "Careers", description = "Open positions"),
        (name = "Team", description = "Team members"),
        (name = "Contact", description = "Contact form and submissions"),
        (name = "Settings", description = "Hero, contact and social settings"),
        (name = "Media", description = "Uploaded files"),
        (name = "Dashboard", description = "Admin overview"),
        (name = "Import", description = "Bulk row import"),
        (name = "Webhook", description = "Inbound email")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_http_app(state: AppState) -> Router {
    let (public_router, public_spec) = api::public_routes().split_for_parts();
    let (login_router, login_spec) = api::auth_routes().split_for_parts();
    let (protected_router, protected_spec) = api::protected_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(public_spec);
    merged_spec.merge(login_spec);
    merged_spec.merge(protected_spec);

    let cors = cors_layer(&state.config.cors_allowed_origins);
    let body_limit = state.config.media.max_upload_bytes;

    public_router
        .merge(login_router)
        .merge(protected_router.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        )))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", merged_spec))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
