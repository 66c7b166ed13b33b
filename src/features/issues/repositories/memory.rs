use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::issues::models::{Issue, IssueStatus};

use super::IssueRepository;

/// Issue storage kept in process memory
#[derive(Default)]
pub struct InMemoryIssueRepository {
    issues: RwLock<HashMap<Uuid, Issue>>,
}

impl InMemoryIssueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut issues: Vec<Issue>) -> Vec<Issue> {
        issues.sort_by(|a, b| (b.reported_at, b.id).cmp(&(a.reported_at, a.id)));
        issues
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn insert(&self, issue: &Issue) -> Result<Issue> {
        self.issues.write().await.insert(issue.id, issue.clone());
        Ok(issue.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>> {
        Ok(self.issues.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Issue>> {
        let issues = self.issues.read().await.values().cloned().collect();
        Ok(Self::newest_first(issues))
    }

    async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>> {
        let issues = self
            .issues
            .read()
            .await
            .values()
            .filter(|issue| issue.status == status)
            .cloned()
            .collect();
        Ok(Self::newest_first(issues))
    }

    async fn update_status(&self, id: Uuid, status: IssueStatus) -> Result<bool> {
        let mut issues = self.issues.write().await;
        match issues.get_mut(&id) {
            Some(issue) => {
                issue.apply_status(status, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.issues.write().await.remove(&id).is_some())
    }
}
