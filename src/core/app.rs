use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{Config, SwaggerConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{routes as auth_routes, AuthService, TokenService};
use crate::features::issues::repositories::IssueRepositoryObject;
use crate::features::issues::{routes as issues_routes, IssueService};
use crate::features::users::repositories::UserRepositoryObject;
use crate::features::users::{routes as users_routes, UserService};

const BANNER: &str = "GreenGuardian API Server

Endpoints:
  GET    /api/issues
  GET    /api/issues/{id}
  GET    /api/issues/nearby?lat=&lng=&radius=
  GET    /api/issues/status/{status}
  POST   /api/issues
  PATCH  /api/issues/{id}/status?status=
  DELETE /api/issues/{id}
  POST   /api/auth/register
  POST   /api/auth/login
  GET    /api/auth/me
  GET    /health
  GET    /swagger-ui/
";

/// Services shared by every route, constructed once at startup
#[derive(Clone)]
pub struct AppServices {
    pub issue_service: Arc<IssueService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
}

impl AppServices {
    pub fn new(
        issues: IssueRepositoryObject,
        users: UserRepositoryObject,
        config: &Config,
    ) -> Self {
        Self::with_user_service(issues, Arc::new(UserService::new(users)), config)
    }

    pub fn with_user_service(
        issues: IssueRepositoryObject,
        user_service: Arc<UserService>,
        config: &Config,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(&config.auth));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_service),
            Arc::clone(&token_service),
        ));

        Self {
            issue_service: Arc::new(IssueService::new(issues)),
            user_service,
            auth_service,
            token_service,
        }
    }
}

async fn banner() -> &'static str {
    BANNER
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn swagger_router(swagger: &SwaggerConfig) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: swagger.title.clone(),
        version: swagger.version.clone(),
        description: swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi);

    if let Some(credentials) = swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(ui)
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(ui)
    }
}

/// Assembles the full HTTP application
pub fn build_router(services: &AppServices, config: &Config) -> Router {
    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(
            &services.auth_service,
        )))
        .merge(users_routes::routes(Arc::clone(&services.user_service)))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.token_service),
            middleware::auth_middleware,
        ));

    // Reporting routes (anonymous allowed, presented tokens must be valid)
    let reporting_routes = issues_routes::reporting_routes(
        Arc::clone(&services.issue_service),
        Arc::clone(&services.user_service),
    )
        .route_layer(from_fn_with_state(
            Arc::clone(&services.token_service),
            middleware::optional_auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .merge(auth_routes::public_routes(Arc::clone(&services.auth_service)))
        .merge(issues_routes::public_routes(Arc::clone(
            &services.issue_service,
        )));

    Router::new()
        .merge(swagger_router(&config.swagger))
        .merge(protected_routes)
        .merge(reporting_routes)
        .merge(public_routes)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
