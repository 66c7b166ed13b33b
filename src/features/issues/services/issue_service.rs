use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::issues::models::{CreateIssue, Issue, IssueStatus};
use crate::features::issues::repositories::IssueRepositoryObject;
use crate::shared::geo::haversine_km;

/// Service for issue operations: submission, lookup, geofiltering and status workflow
pub struct IssueService {
    repository: IssueRepositoryObject,
}

impl IssueService {
    pub fn new(repository: IssueRepositoryObject) -> Self {
        Self { repository }
    }

    /// Submit a new issue. Status starts as SUBMITTED and reported_at is set to now.
    pub async fn create(&self, data: CreateIssue) -> Result<Issue> {
        if data.title.trim().is_empty() || data.description.trim().is_empty() {
            return Err(AppError::Validation(
                "Title and description are required".to_string(),
            ));
        }

        let issue = self.repository.insert(&Issue::submitted(data)).await?;

        tracing::info!(
            "Created issue: {} ({:?}) reported by: {}",
            issue.id,
            issue.category,
            issue.reported_by
        );

        Ok(issue)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Issue> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Issue not found".to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<Issue>> {
        self.repository.list_all().await
    }

    pub async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>> {
        self.repository.list_by_status(status).await
    }

    /// Issues whose haversine distance from (lat, lng) is at most `radius_km`.
    ///
    /// Scans every stored issue; there is no spatial index.
    pub async fn list_nearby(&self, lat: f64, lng: f64, radius_km: f64) -> Result<Vec<Issue>> {
        let nearby: Vec<Issue> = self
            .repository
            .list_all()
            .await?
            .into_iter()
            .filter(|issue| haversine_km(lat, lng, issue.latitude, issue.longitude) <= radius_km)
            .collect();

        tracing::debug!(
            "Nearby query ({}, {}) radius {}km matched {} issues",
            lat,
            lng,
            radius_km,
            nearby.len()
        );

        Ok(nearby)
    }

    /// Returns false when the issue does not exist
    pub async fn update_status(&self, id: Uuid, status: IssueStatus) -> Result<bool> {
        let updated = self.repository.update_status(id, status).await?;
        if updated {
            tracing::info!("Updated issue {} status to {}", id, status);
        }
        Ok(updated)
    }

    /// Returns false when the issue does not exist
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::info!("Deleted issue {}", id);
        }
        Ok(deleted)
    }
}
