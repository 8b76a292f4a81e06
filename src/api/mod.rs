// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug_span, Span};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authorization_gate, AuthenticatedUser},
    error::ApiError,
    models::{
        Article, ArticleListResponse, CategoryListResponse, CreateArticleRequest,
        CreateProjectRequest, MessageResponse, Project, ProjectListResponse, ProjectResponse,
        UpdateArticleRequest, UpdateProjectRequest,
    },
    state::AppState,
};

pub mod articles;
pub mod auth_check;
pub mod categories;
pub mod health;
pub mod projects;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    // Every route under /api sits behind the authorization gate; GET stays public.
    let api_routes = Router::new()
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/categories", get(categories::list_categories))
        .route(
            "/auth-check",
            get(auth_check::auth_check)
                .post(auth_check::auth_check)
                .delete(auth_check::auth_check),
        )
        .fallback(unknown_api_route)
        .layer(from_fn_with_state(
            state.verifier.clone(),
            authorization_gate,
        ));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive()),
        )
}

// Headers are left out of the span: they carry bearer tokens.
fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("none");

    debug_span!(
        "http-request",
        method = %request.method(),
        path = request.uri().path(),
        request_id
    )
}

/// Unmatched `/api/*` paths. Registered before the gate layer so writes to
/// unknown paths still need a token.
async fn unknown_api_route() -> ApiError {
    ApiError::not_found("Not found")
}

/// Parse a numeric path id, answering 400 `Invalid {resource} ID` otherwise.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {resource} ID")))
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        articles::list_articles,
        articles::create_article,
        articles::get_article,
        articles::update_article,
        articles::delete_article,
        projects::list_projects,
        projects::create_project,
        projects::get_project,
        projects::update_project,
        projects::delete_project,
        categories::list_categories,
        auth_check::auth_check,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Article,
            ArticleListResponse,
            CreateArticleRequest,
            UpdateArticleRequest,
            Project,
            ProjectListResponse,
            ProjectResponse,
            CreateProjectRequest,
            UpdateProjectRequest,
            CategoryListResponse,
            MessageResponse,
            AuthenticatedUser,
            auth_check::AuthCheckResponse,
            health::ReadyResponse,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Articles", description = "Blog articles"),
        (name = "Projects", description = "Portfolio projects"),
        (name = "Categories", description = "Article categories"),
        (name = "Auth", description = "Authorization probe"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        let _ = app.into_make_service();
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("42", "article").unwrap(), 42);
        let err = parse_id("abc", "article").unwrap_err();
        assert_eq!(err.message, "Invalid article ID");
    }

    #[test]
    fn openapi_documents_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/articles/{id}"));
    }
}
