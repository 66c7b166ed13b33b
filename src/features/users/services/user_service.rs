use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::{User, UserRole};
use crate::features::users::repositories::UserRepositoryObject;

/// Service for user accounts: registration, credential checks and role management
pub struct UserService {
    repository: UserRepositoryObject,
    hash_cost: u32,
}

impl UserService {
    pub fn new(repository: UserRepositoryObject) -> Self {
        Self::with_hash_cost(repository, bcrypt::DEFAULT_COST)
    }

    pub fn with_hash_cost(repository: UserRepositoryObject, hash_cost: u32) -> Self {
        Self {
            repository,
            hash_cost,
        }
    }

    /// Create a user with a bcrypt-hashed password.
    /// Returns `None` if a user with exactly this email already exists.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Option<User>> {
        // Skip the hashing cost when the email is obviously taken
        if self.repository.find_by_email(email).await?.is_some() {
            return Ok(None);
        }

        let password_hash = self.hash_password(password).await?;
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let created = self.repository.insert_if_absent(&user).await?;
        if let Some(ref u) = created {
            tracing::info!("Created user: {} ({}) with role {}", u.id, u.email, u.role);
        }
        Ok(created)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.repository.find_by_id(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        self.repository.list_all().await
    }

    /// False when the user does not exist or the password does not match
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            return Ok(false);
        };

        let password = password.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &user.password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }

    pub async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool> {
        let updated = self.repository.update_role(id, role).await?;
        if updated {
            tracing::info!("Updated role of user {} to {}", id, role);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::info!("Deleted user {}", id);
        }
        Ok(deleted)
    }

    /// Resolves the caller's account and requires the ADMIN role
    pub async fn require_admin(&self, caller: &AuthenticatedUser) -> Result<User> {
        let user = self
            .repository
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(user)
    }

    /// Makes sure an ADMIN account exists for the given email, creating or promoting it
    pub async fn ensure_admin_account(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if let Some(existing) = self.repository.find_by_email(email).await? {
            if !existing.is_admin() {
                self.repository.update_role(existing.id, UserRole::Admin).await?;
                tracing::info!("Promoted {} to ADMIN", email);
            }
            return Ok(User {
                role: UserRole::Admin,
                ..existing
            });
        }

        self.create(name, email, password, UserRole::Admin)
            .await?
            .ok_or_else(|| AppError::Conflict("User with this email already exists".to_string()))
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::features::users::repositories::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::with_hash_cost(Arc::new(InMemoryUserRepository::new()), 4)
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let service = service();
        let user = service
            .create("Asha", "asha@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.role, UserRole::Citizen);
        assert_ne!(user.password_hash, "secret123");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_returns_none() {
        let service = service();
        service
            .create("Asha", "asha@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap();

        let duplicate = service
            .create("Other", "asha@example.com", "another1", UserRole::Ngo)
            .await
            .unwrap();
        assert!(duplicate.is_none());

        // Exact match only: a differently-cased email is a different account
        let cased = service
            .create("Other", "Asha@example.com", "another1", UserRole::Ngo)
            .await
            .unwrap();
        assert!(cased.is_some());
    }

    #[tokio::test]
    async fn test_verify_password() {
        let service = service();
        service
            .create("Asha", "asha@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap();

        assert!(service
            .verify_password("asha@example.com", "secret123")
            .await
            .unwrap());
        assert!(!service
            .verify_password("asha@example.com", "wrong-pass")
            .await
            .unwrap());
        assert!(!service
            .verify_password("nobody@example.com", "secret123")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_update_role_and_delete() {
        let service = service();
        let user = service
            .create("Asha", "asha@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap()
            .unwrap();

        assert!(service.update_role(user.id, UserRole::Ngo).await.unwrap());
        let found = service.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.role, UserRole::Ngo);

        assert!(service.delete(user.id).await.unwrap());
        assert!(!service.delete(user.id).await.unwrap());
        assert!(!service
            .update_role(user.id, UserRole::Admin)
            .await
            .unwrap());
        assert!(service
            .find_by_email("asha@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_require_admin() {
        let service = service();
        let citizen = service
            .create("C", "c@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap()
            .unwrap();
        let admin = service
            .ensure_admin_account("A", "a@example.com", "secret123")
            .await
            .unwrap();

        let as_caller = |u: &User| AuthenticatedUser {
            user_id: u.id,
            email: u.email.clone(),
        };

        assert!(matches!(
            service.require_admin(&as_caller(&citizen)).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(
            service.require_admin(&as_caller(&admin)).await.unwrap().id,
            admin.id
        );
    }

    #[tokio::test]
    async fn test_ensure_admin_account_promotes_existing_user() {
        let service = service();
        let user = service
            .create("C", "c@example.com", "secret123", UserRole::Citizen)
            .await
            .unwrap()
            .unwrap();

        let admin = service
            .ensure_admin_account("C", "c@example.com", "ignored1")
            .await
            .unwrap();
        assert_eq!(admin.id, user.id);
        assert_eq!(
            service.find_by_id(user.id).await.unwrap().unwrap().role,
            UserRole::Admin
        );
    }
}
