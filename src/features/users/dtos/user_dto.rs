use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::users::models::{User, UserRole};

/// Public view of a user; the password hash never leaves the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
        }
    }
}

/// Response envelope for user lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub success: bool,
    pub users: Vec<UserDto>,
}

/// Response envelope for a single user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub user: UserDto,
}

/// Query parameters for the role update endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateRoleQuery {
    /// New role: CITIZEN, ADMIN, NGO or GOVERNMENT (case-insensitive)
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_dto_omits_password_hash() {
        let user = User {
            id: Uuid::nil(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: UserRole::Ngo,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(UserDto::from(user)).unwrap();
        assert_eq!(value["role"], "NGO");
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());
    }
}
