use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateRoleQuery, UserDto, UsersListResponse};
use crate::features::users::models::UserRole;
use crate::features::users::services::UserService;
use crate::shared::types::MessageResponse;

fn parse_user_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("User not found".to_string()))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = UsersListResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin access required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<UsersListResponse>> {
    service.require_admin(&user).await?;

    let users = service.list_all().await?;
    Ok(Json(UsersListResponse {
        success: true,
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// Change a user's role (admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        UpdateRoleQuery
    ),
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 400, description = "Missing or unknown role", body = MessageResponse),
        (status = 403, description = "Admin access required", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user_role(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    Query(query): Query<UpdateRoleQuery>,
) -> Result<Json<MessageResponse>> {
    service.require_admin(&user).await?;

    let role: UserRole = query
        .role
        .ok_or_else(|| AppError::BadRequest("Missing role".to_string()))?
        .parse()
        .map_err(AppError::BadRequest)?;
    let id = parse_user_id(&id)?;

    if !service.update_role(id, role).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(MessageResponse::success("User role updated")))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Admin access required", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    service.require_admin(&user).await?;

    let id = parse_user_id(&id)?;
    if !service.delete(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(MessageResponse::success("User deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppServices;
    use crate::features::auth::dtos::{AuthResponse, RegisterRequest};
    use crate::shared::test_helpers::{fake_email, fake_name, test_app};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    async fn register(server: &TestServer) -> (UserDto, String) {
        let body = server
            .post("/api/auth/register")
            .json(&RegisterRequest {
                name: fake_name(),
                email: fake_email(),
                password: "green123".to_string(),
            })
            .await
            .json::<AuthResponse>();
        (body.user.unwrap(), body.token.unwrap())
    }

    async fn admin_token(server: &TestServer, services: &AppServices) -> String {
        let (user, token) = register(server).await;
        services
            .user_service
            .update_role(user.id, UserRole::Admin)
            .await
            .unwrap();
        token
    }

    #[tokio::test]
    async fn test_admin_routes_require_token_and_admin_role() {
        let (router, _services) = test_app();
        let server = TestServer::new(router).unwrap();

        server
            .get("/api/users")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let (_, citizen_token) = register(&server).await;
        let response = server
            .get("/api/users")
            .authorization_bearer(&citizen_token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert!(!response.json::<MessageResponse>().success);
    }

    #[tokio::test]
    async fn test_admin_lists_and_updates_users() {
        let (router, services) = test_app();
        let server = TestServer::new(router).unwrap();
        let token = admin_token(&server, &services).await;
        let (citizen, _) = register(&server).await;

        let list = server
            .get("/api/users")
            .authorization_bearer(&token)
            .await
            .json::<UsersListResponse>();
        assert_eq!(list.users.len(), 2);

        let response = server
            .patch(&format!("/api/users/{}/role", citizen.id))
            .authorization_bearer(&token)
            .add_query_param("role", "ngo")
            .await;
        response.assert_status_ok();
        let updated = services.user_service.find_by_id(citizen.id).await.unwrap();
        assert_eq!(updated.map(|u| u.role), Some(UserRole::Ngo));

        server
            .patch(&format!("/api/users/{}/role", citizen.id))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .patch(&format!("/api/users/{}/role", Uuid::new_v4()))
            .authorization_bearer(&token)
            .add_query_param("role", "ADMIN")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_deletes_user() {
        let (router, services) = test_app();
        let server = TestServer::new(router).unwrap();
        let token = admin_token(&server, &services).await;
        let (citizen, _) = register(&server).await;

        server
            .delete(&format!("/api/users/{}", citizen.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .delete(&format!("/api/users/{}", citizen.id))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
