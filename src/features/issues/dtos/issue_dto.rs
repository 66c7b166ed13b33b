use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::issues::models::{
    CreateIssue, Issue, IssueCategory, IssueSeverity, IssueStatus,
};

/// Wire representation of an issue. Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: IssueStatus,
    pub reported_by: String,
    pub reported_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
    #[serde(default)]
    pub severity: IssueSeverity,
}

impl From<Issue> for IssueDto {
    fn from(i: Issue) -> Self {
        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            category: i.category,
            latitude: i.latitude,
            longitude: i.longitude,
            image_url: i.image_url,
            status: i.status,
            reported_by: i.reported_by,
            reported_at: i.reported_at.timestamp_millis(),
            verified_at: i.verified_at.map(|t| t.timestamp_millis()),
            resolved_at: i.resolved_at.map(|t| t.timestamp_millis()),
            severity: i.severity,
        }
    }
}

/// Request DTO for submitting an issue
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    pub description: String,

    pub category: IssueCategory,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,

    /// Photo payload, stored as the issue's image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    #[serde(default)]
    pub severity: IssueSeverity,
}

impl CreateIssueRequest {
    pub fn into_create_issue(self, reported_by: String, user_id: Option<Uuid>) -> CreateIssue {
        CreateIssue {
            title: self.title,
            description: self.description,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_base64,
            severity: self.severity,
            reported_by,
            user_id,
        }
    }
}

/// Response envelope for a single issue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueDto>,
}

impl IssueResponse {
    pub fn found(message: impl Into<String>, issue: IssueDto) -> Self {
        Self {
            success: true,
            message: message.into(),
            issue: Some(issue),
        }
    }
}

/// Response envelope for issue lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuesListResponse {
    pub success: bool,
    #[serde(default)]
    pub issues: Vec<IssueDto>,
}

impl IssuesListResponse {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            success: true,
            issues: issues.into_iter().map(IssueDto::from).collect(),
        }
    }
}

/// Query parameters for the nearby-issues endpoint.
///
/// Values arrive as raw strings; unparseable lat/lng are treated as missing
/// and an unparseable radius falls back to the default.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lng: Option<String>,
    /// Search radius in kilometres (default: 10)
    pub radius: Option<String>,
}

/// Query parameters for the status update endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateStatusQuery {
    /// New status (case-insensitive, e.g. `verified`, `IN_PROGRESS`)
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_create_request_defaults() {
        let json = r#"{
            "title": "Plastic on beach",
            "description": "Bottles everywhere",
            "category": "PLASTIC_POLLUTION",
            "latitude": 15.5,
            "longitude": 73.8
        }"#;
        let request: CreateIssueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.severity, IssueSeverity::Medium);
        assert!(request.image_base64.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_out_of_range_coordinates() {
        let request = CreateIssueRequest {
            title: "t".to_string(),
            description: "d".to_string(),
            category: IssueCategory::Other,
            latitude: 91.0,
            longitude: 181.0,
            image_base64: None,
            severity: IssueSeverity::Low,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("longitude"));
    }

    #[test]
    fn test_issue_dto_uses_camel_case_and_millis() {
        let reported_at = Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap();
        let issue = Issue {
            id: Uuid::nil(),
            title: "t".to_string(),
            description: "d".to_string(),
            category: IssueCategory::ForestDamage,
            latitude: 1.0,
            longitude: 2.0,
            image_url: Some("img".to_string()),
            status: IssueStatus::Verified,
            severity: IssueSeverity::Critical,
            reported_by: "r@e.com".to_string(),
            reported_at,
            verified_at: Some(reported_at),
            resolved_at: None,
            user_id: None,
        };

        let value = serde_json::to_value(IssueDto::from(issue)).unwrap();
        assert_eq!(value["imageUrl"], "img");
        assert_eq!(value["reportedBy"], "r@e.com");
        assert_eq!(value["reportedAt"], reported_at.timestamp_millis());
        assert_eq!(value["verifiedAt"], reported_at.timestamp_millis());
        assert!(value.get("resolvedAt").is_none());
        assert_eq!(value["status"], "VERIFIED");
        assert_eq!(value["category"], "FOREST_DAMAGE");
    }
}
