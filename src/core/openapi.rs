use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::issues::{dtos as issues_dtos, handlers as issues_handlers, models as issues_models};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Issues
        issues_handlers::list_issues,
        issues_handlers::get_issue,
        issues_handlers::nearby_issues,
        issues_handlers::issues_by_status,
        issues_handlers::create_issue,
        issues_handlers::update_issue_status,
        issues_handlers::delete_issue,
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::get_me,
        // Users (admin)
        users_handlers::list_users,
        users_handlers::update_user_role,
        users_handlers::delete_user,
    ),
    components(
        schemas(
            MessageResponse,
            // Issues
            issues_models::IssueCategory,
            issues_models::IssueStatus,
            issues_models::IssueSeverity,
            issues_dtos::IssueDto,
            issues_dtos::CreateIssueRequest,
            issues_dtos::IssueResponse,
            issues_dtos::IssuesListResponse,
            // Auth
            auth_dtos::RegisterRequest,
            auth_dtos::LoginRequest,
            auth_dtos::AuthResponse,
            // Users
            users_models::UserRole,
            users_dtos::UserDto,
            users_dtos::UserResponse,
            users_dtos::UsersListResponse,
        )
    ),
    tags(
        (name = "issues", description = "Environmental issue reports"),
        (name = "auth", description = "Registration, login and current user"),
        (name = "users", description = "User administration (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "GreenGuardian API",
        version = "0.1.0",
        description = "Environmental issue reporting API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
