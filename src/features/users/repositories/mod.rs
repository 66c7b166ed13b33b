mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::users::models::{User, UserRole};

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user unless the email is already taken (exact match), in which case `None`
    async fn insert_if_absent(&self, user: &User) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn list_all(&self) -> Result<Vec<User>>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub type UserRepositoryObject = Arc<dyn UserRepository>;
