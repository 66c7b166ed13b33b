use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponse, LoginRequest, RegisterRequest};
use crate::features::auth::model::AuthenticatedUser;
use super::TokenService;
use crate::features::users::dtos::UserDto;
use crate::features::users::models::UserRole;
use crate::features::users::services::UserService;

/// Service for authentication operations (register, login, current user)
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new citizen account and issue a token for it
    pub async fn register(&self, dto: RegisterRequest) -> Result<AuthResponse> {
        let user = self
            .user_service
            .create(dto.name.trim(), &dto.email, &dto.password, UserRole::Citizen)
            .await?
            .ok_or_else(|| AppError::Conflict("User with this email already exists".to_string()))?;

        let token = self.token_service.issue(user.id, &user.email)?;

        Ok(AuthResponse::authenticated(
            "Registration successful",
            token,
            user.into(),
        ))
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequest) -> Result<AuthResponse> {
        if !self
            .user_service
            .verify_password(&dto.email, &dto.password)
            .await?
        {
            tracing::info!("Failed login attempt for {}", dto.email);
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }

        let user = self
            .user_service
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

        let token = self.token_service.issue(user.id, &user.email)?;

        Ok(AuthResponse::authenticated(
            "Login successful",
            token,
            user.into(),
        ))
    }

    /// Get the account behind the caller's token
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<UserDto> {
        self.user_service
            .find_by_id(user.user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::users::repositories::InMemoryUserRepository;

    fn services() -> (AuthService, Arc<TokenService>) {
        let users = Arc::new(UserService::with_hash_cost(
            Arc::new(InMemoryUserRepository::new()),
            4,
        ));
        let tokens = Arc::new(TokenService::new(&AuthConfig::default()));
        (AuthService::new(users, Arc::clone(&tokens)), tokens)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_round_trip() {
        let (auth, tokens) = services();

        let registered = auth.register(register_request()).await.unwrap();
        let user = registered.user.unwrap();
        assert_eq!(user.role, UserRole::Citizen);

        let logged_in = auth
            .login(LoginRequest {
                email: "asha@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        let claims = tokens.validate(&logged_in.token.unwrap()).unwrap();
        assert_eq!(claims.user_id, user.id.to_string());
        assert_eq!(claims.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let (auth, _) = services();
        auth.register(register_request()).await.unwrap();

        let err = auth.register(register_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_auth_error() {
        let (auth, _) = services();
        auth.register(register_request()).await.unwrap();

        let err = auth
            .login(LoginRequest {
                email: "asha@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));

        let err = auth
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_get_current_user() {
        let (auth, tokens) = services();
        let registered = auth.register(register_request()).await.unwrap();
        let caller = tokens.authenticate(&registered.token.unwrap()).unwrap();

        let me = auth.get_current_user(&caller).await.unwrap();
        assert_eq!(me.email, "asha@example.com");
    }
}
