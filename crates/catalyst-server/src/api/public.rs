//! Read-only endpoints backing the public site. Lists contain only active
//! or published rows, in display order.

use crate::api::{not_found_response, storage_error_response, success_response, ApiError};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalyst_common::settings::{HeroSettings, SiteSettings};
use catalyst_storage::store::{
    group_by_category, BlogPostRow, CareerRow, CaseStudyRow, ProcessStepRow, ServiceRow,
    TeamMemberRow, TechCategory, TestimonialRow,
};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Everything the home page renders, in one round trip.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub hero: HeroSettings,
    pub services: Vec<ServiceRow>,
    pub process_steps: Vec<ProcessStepRow>,
    pub case_studies: Vec<CaseStudyRow>,
    pub testimonials: Vec<TestimonialRow>,
    pub tech_stack: Vec<TechCategory>,
}

fn respond<T: Serialize>(
    trace_id: &str,
    result: catalyst_storage::Result<T>,
    context: &str,
) -> Response {
    match result {
        Ok(data) => success_response(StatusCode::OK, trace_id, data),
        Err(e) => storage_error_response(trace_id, &e, context),
    }
}

#[utoipa::path(
    get,
    path = "/v1/public/home",
    tag = "Public",
    responses(
        (status = 200, description = "Home page sections", body = HomePage),
        (status = 500, description = "Store failure", body = ApiError)
    )
)]
async fn home(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let store = &state.store;
    let loaded = tokio::try_join!(
        store.load_site_settings(),
        store.list_active_services(),
        store.list_active_process_steps(),
        store.list_active_case_studies(),
        store.list_active_testimonials(),
        store.list_active_tech_items(),
    );
    let page = loaded.map(
        |(settings, services, process_steps, case_studies, testimonials, tech)| HomePage {
            hero: settings.hero,
            services,
            process_steps,
            case_studies,
            testimonials,
            tech_stack: group_by_category(tech),
        },
    );
    respond(&trace_id, page, "Failed to load home page")
}

#[utoipa::path(
    get,
    path = "/v1/public/services",
    tag = "Public",
    responses((status = 200, description = "Active services", body = Vec<ServiceRow>))
)]
async fn services(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_services().await,
        "Failed to load services",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/case-studies",
    tag = "Public",
    responses((status = 200, description = "Active case studies", body = Vec<CaseStudyRow>))
)]
async fn case_studies(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_case_studies().await,
        "Failed to load case studies",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/testimonials",
    tag = "Public",
    responses((status = 200, description = "Active testimonials, newest first", body = Vec<TestimonialRow>))
)]
async fn testimonials(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_testimonials().await,
        "Failed to load testimonials",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/process-steps",
    tag = "Public",
    responses((status = 200, description = "Active process steps", body = Vec<ProcessStepRow>))
)]
async fn process_steps(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_process_steps().await,
        "Failed to load process steps",
    )
}

/// Active items grouped by category, categories in order of first
/// appearance.
#[utoipa::path(
    get,
    path = "/v1/public/tech-stack",
    tag = "Public",
    responses((status = 200, description = "Tech stack by category", body = Vec<TechCategory>))
)]
async fn tech_stack(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let grouped = state
        .store
        .list_active_tech_items()
        .await
        .map(group_by_category);
    respond(&trace_id, grouped, "Failed to load tech stack")
}

#[utoipa::path(
    get,
    path = "/v1/public/blog",
    tag = "Public",
    responses((status = 200, description = "Published posts, newest first", body = Vec<BlogPostRow>))
)]
async fn blog(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_published_blog_posts().await,
        "Failed to load blog",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/blog/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Published post", body = BlogPostRow),
        (status = 404, description = "Missing or unpublished", body = ApiError)
    )
)]
async fn blog_post(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.store.get_published_blog_post(&slug).await {
        Ok(Some(post)) => success_response(StatusCode::OK, &trace_id, post),
        Ok(None) => not_found_response(&trace_id, "blog post", &slug),
        Err(e) => storage_error_response(&trace_id, &e, "Failed to load blog post"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/public/careers",
    tag = "Public",
    responses((status = 200, description = "Open positions", body = Vec<CareerRow>))
)]
async fn careers(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_careers().await,
        "Failed to load careers",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/team",
    tag = "Public",
    responses((status = 200, description = "Active team members", body = Vec<TeamMemberRow>))
)]
async fn team(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.list_active_team_members().await,
        "Failed to load team",
    )
}

#[utoipa::path(
    get,
    path = "/v1/public/settings",
    tag = "Public",
    responses((status = 200, description = "Site settings with defaults", body = SiteSettings))
)]
async fn settings(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    respond(
        &trace_id,
        state.store.load_site_settings().await,
        "Failed to load settings",
    )
}

pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(home))
        .routes(routes!(services))
        .routes(routes!(case_studies))
        .routes(routes!(testimonials))
        .routes(routes!(process_steps))
        .routes(routes!(tech_stack))
        .routes(routes!(blog))
        .routes(routes!(blog_post))
        .routes(routes!(careers))
        .routes(routes!(team))
        .routes(routes!(settings))
}
