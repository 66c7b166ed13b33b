//! Data access for issues.
//!
//! `IssueRepository` is the seam between the issue service and storage.
//! `PgIssueRepository` backs production, `InMemoryIssueRepository` backs
//! development runs without a database and the test suite.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::issues::models::{Issue, IssueStatus};

pub use memory::InMemoryIssueRepository;
pub use postgres::PgIssueRepository;

#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Persists a fully built issue and returns the stored row
    async fn insert(&self, issue: &Issue) -> Result<Issue>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>>;
    /// All issues, newest first
    async fn list_all(&self) -> Result<Vec<Issue>>;
    /// Issues in the given status, newest first
    async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>>;
    /// Returns false when no issue has the given id
    async fn update_status(&self, id: Uuid, status: IssueStatus) -> Result<bool>;
    /// Returns false when no issue has the given id
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub type IssueRepositoryObject = Arc<dyn IssueRepository>;
