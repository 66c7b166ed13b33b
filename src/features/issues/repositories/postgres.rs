use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::issues::models::{Issue, IssueStatus};

use super::IssueRepository;

const ISSUE_COLUMNS: &str = r#"
    id, title, description, category, latitude, longitude, image_url,
    status, severity, reported_by, reported_at, verified_at, resolved_at, user_id
"#;

pub struct PgIssueRepository {
    pool: PgPool,
}

impl PgIssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueRepository for PgIssueRepository {
    async fn insert(&self, issue: &Issue) -> Result<Issue> {
        // A user_id whose account no longer exists is stored as NULL
        let query = format!(
            r#"
            INSERT INTO issues (
                id, title, description, category, latitude, longitude, image_url,
                status, severity, reported_by, reported_at, user_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                (SELECT id FROM users WHERE id = $12)
            )
            RETURNING {ISSUE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Issue>(&query)
            .bind(issue.id)
            .bind(&issue.title)
            .bind(&issue.description)
            .bind(issue.category)
            .bind(issue.latitude)
            .bind(issue.longitude)
            .bind(&issue.image_url)
            .bind(issue.status)
            .bind(issue.severity)
            .bind(&issue.reported_by)
            .bind(issue.reported_at)
            .bind(issue.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert issue: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>> {
        let query = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = $1");

        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch issue {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn list_all(&self) -> Result<Vec<Issue>> {
        let query = format!("SELECT {ISSUE_COLUMNS} FROM issues ORDER BY reported_at DESC, id DESC");

        sqlx::query_as::<_, Issue>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issues: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE status = $1 ORDER BY reported_at DESC, id DESC"
        );

        sqlx::query_as::<_, Issue>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issues by status {}: {:?}", status, e);
                AppError::Database(e)
            })
    }

    async fn update_status(&self, id: Uuid, status: IssueStatus) -> Result<bool> {
        // verified_at/resolved_at keep their first value on repeated transitions
        let result = sqlx::query(
            r#"
            UPDATE issues
            SET status = $2,
                verified_at = CASE
                    WHEN $2 = 'VERIFIED'::issue_status THEN COALESCE(verified_at, NOW())
                    ELSE verified_at
                END,
                resolved_at = CASE
                    WHEN $2 = 'RESOLVED'::issue_status THEN COALESCE(resolved_at, NOW())
                    ELSE resolved_at
                END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update status of issue {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete issue {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
