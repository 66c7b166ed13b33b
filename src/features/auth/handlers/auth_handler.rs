use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthResponse, LoginRequest, RegisterRequest};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::users::dtos::UserResponse;
use crate::shared::types::MessageResponse;
use crate::shared::validation::format_validation_errors;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

    let auth_response = service.register(dto).await?;
    Ok((StatusCode::CREATED, Json(auth_response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(auth_response))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<UserResponse>> {
    let user_data = service.get_current_user(&user).await?;
    Ok(Json(UserResponse {
        success: true,
        message: "Current user".to_string(),
        user: user_data,
    }))
}
