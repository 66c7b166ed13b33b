use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response, Router};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Words};
use fake::faker::name::en::Name;
use fake::Fake;

use crate::core::app::{build_router, AppServices};
use crate::core::config::{AppConfig, AuthConfig, Config, SwaggerConfig};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::dtos::CreateIssueRequest;
use crate::features::issues::models::{IssueCategory, IssueSeverity};
use crate::features::issues::InMemoryIssueRepository;
use crate::features::users::{InMemoryUserRepository, UserService};

/// bcrypt cost used in tests; the production default is far slower
pub const TEST_HASH_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
        },
        database: None,
        auth: AuthConfig::default(),
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "GreenGuardian API".to_string(),
            version: "test".to_string(),
            description: "test".to_string(),
        },
        bootstrap_admin: None,
    }
}

/// Services over fresh in-memory repositories
pub fn test_services() -> AppServices {
    let user_service = Arc::new(UserService::with_hash_cost(
        Arc::new(InMemoryUserRepository::new()),
        TEST_HASH_COST,
    ));
    AppServices::with_user_service(
        Arc::new(InMemoryIssueRepository::new()),
        user_service,
        &test_config(),
    )
}

/// Full application router plus the services behind it
pub fn test_app() -> (Router, AppServices) {
    let services = test_services();
    let router = build_router(&services, &test_config());
    (router, services)
}

pub fn fake_email() -> String {
    SafeEmail().fake()
}

pub fn fake_name() -> String {
    Name().fake()
}

pub fn fake_issue_request() -> CreateIssueRequest {
    let title_words: Vec<String> = Words(2..5).fake();
    CreateIssueRequest {
        title: title_words.join(" "),
        description: Sentence(6..12).fake(),
        category: IssueCategory::IllegalDumping,
        latitude: (-60.0..60.0).fake::<f64>(),
        longitude: (-170.0..170.0).fake::<f64>(),
        image_base64: None,
        severity: IssueSeverity::High,
    }
}

pub fn fake_authenticated_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: uuid::Uuid::new_v4(),
        email: fake_email(),
    }
}

async fn inject_user_middleware(
    user: AuthenticatedUser,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Wraps a feature router so every request carries `user` without a token
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
        inject_user_middleware(user.clone(), request, next)
    }))
}
