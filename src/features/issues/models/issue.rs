use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Issue category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    IllegalDumping,
    PlasticPollution,
    ForestDamage,
    WaterContamination,
    WasteDisposal,
    AirPollution,
    Other,
}

/// Issue status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Submitted,
    Verified,
    InProgress,
    Resolved,
    Rejected,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 5] = [
        IssueStatus::Submitted,
        IssueStatus::Verified,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Submitted => "SUBMITTED",
            IssueStatus::Verified => "VERIFIED",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status case-insensitively; `in-progress`, `in_progress` and `IN_PROGRESS` are equivalent
impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown issue status: {}", s))
    }
}

/// Issue severity enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "issue_severity", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Database model for issue
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub status: IssueStatus,
    pub severity: IssueSeverity,
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
}

/// Data for creating a new issue
#[derive(Debug, Clone)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub severity: IssueSeverity,
    pub reported_by: String,
    pub user_id: Option<Uuid>,
}

impl Issue {
    /// Builds a freshly submitted issue: new id, SUBMITTED status, reported now
    pub fn submitted(data: CreateIssue) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: data.title,
            description: data.description,
            category: data.category,
            latitude: data.latitude,
            longitude: data.longitude,
            image_url: data.image_url,
            status: IssueStatus::Submitted,
            severity: data.severity,
            reported_by: data.reported_by,
            reported_at: Utc::now(),
            verified_at: None,
            resolved_at: None,
            user_id: data.user_id,
        }
    }

    /// Applies a status transition, stamping verified_at/resolved_at the first time
    /// the issue reaches VERIFIED/RESOLVED
    pub fn apply_status(&mut self, status: IssueStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            IssueStatus::Verified => {
                self.verified_at.get_or_insert(now);
            }
            IssueStatus::Resolved => {
                self.resolved_at.get_or_insert(now);
            }
            _ => {}
        }
    }
}
