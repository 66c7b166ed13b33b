use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::dtos::{
    CreateIssueRequest, IssueDto, IssueResponse, IssuesListResponse, NearbyQuery,
    UpdateStatusQuery,
};
use crate::features::issues::models::IssueStatus;
use crate::features::issues::services::IssueService;
use crate::features::users::services::UserService;
use crate::shared::constants::{ANONYMOUS_REPORTER, DEFAULT_NEARBY_RADIUS_KM};
use crate::shared::types::MessageResponse;
use crate::shared::validation::format_validation_errors;

/// State for issue submission. Reporter accounts are resolved before linking.
#[derive(Clone)]
pub struct ReportState {
    pub issue_service: Arc<IssueService>,
    pub user_service: Arc<UserService>,
}

fn parse_issue_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Issue not found".to_string()))
}

/// Resolves (lat, lng, radius_km) from the raw query strings
fn parse_nearby_query(query: &NearbyQuery) -> Result<(f64, f64, f64)> {
    let coordinate = |raw: &Option<String>| raw.as_deref().and_then(|v| v.trim().parse::<f64>().ok());

    let (lat, lng) = match (coordinate(&query.lat), coordinate(&query.lng)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(AppError::BadRequest(
                "Missing latitude or longitude".to_string(),
            ))
        }
    };

    let radius = coordinate(&query.radius).unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if radius < 0.0 || !radius.is_finite() {
        return Err(AppError::BadRequest(
            "Radius must be a non-negative number".to_string(),
        ));
    }

    Ok((lat, lng, radius))
}

/// List all issues, newest first
#[utoipa::path(
    get,
    path = "/api/issues",
    responses(
        (status = 200, description = "All issues", body = IssuesListResponse)
    ),
    tag = "issues"
)]
pub async fn list_issues(
    State(service): State<Arc<IssueService>>,
) -> Result<Json<IssuesListResponse>> {
    let issues = service.list_all().await?;
    Ok(Json(IssuesListResponse::from_issues(issues)))
}

/// Get a single issue
#[utoipa::path(
    get,
    path = "/api/issues/{id}",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue found", body = IssueResponse),
        (status = 404, description = "Issue not found", body = MessageResponse)
    ),
    tag = "issues"
)]
pub async fn get_issue(
    State(service): State<Arc<IssueService>>,
    Path(id): Path<String>,
) -> Result<Json<IssueResponse>> {
    let issue = service.get_by_id(parse_issue_id(&id)?).await?;
    Ok(Json(IssueResponse::found("Issue found", IssueDto::from(issue))))
}

/// Issues within a radius of a point
#[utoipa::path(
    get,
    path = "/api/issues/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Issues within the radius", body = IssuesListResponse),
        (status = 400, description = "Missing latitude or longitude", body = MessageResponse)
    ),
    tag = "issues"
)]
pub async fn nearby_issues(
    State(service): State<Arc<IssueService>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<IssuesListResponse>> {
    let (lat, lng, radius) = parse_nearby_query(&query)?;
    let issues = service.list_nearby(lat, lng, radius).await?;
    Ok(Json(IssuesListResponse::from_issues(issues)))
}

/// Issues in a given status
#[utoipa::path(
    get,
    path = "/api/issues/status/{status}",
    params(
        ("status" = String, Path, description = "Issue status, e.g. SUBMITTED or in_progress")
    ),
    responses(
        (status = 200, description = "Issues in the status", body = IssuesListResponse),
        (status = 404, description = "Unknown status", body = MessageResponse)
    ),
    tag = "issues"
)]
pub async fn issues_by_status(
    State(service): State<Arc<IssueService>>,
    Path(status): Path<String>,
) -> Result<Json<IssuesListResponse>> {
    let status: IssueStatus = status.parse().map_err(AppError::NotFound)?;
    let issues = service.list_by_status(status).await?;
    Ok(Json(IssuesListResponse::from_issues(issues)))
}

/// Report a new issue. Anonymous when no bearer token is sent.
#[utoipa::path(
    post,
    path = "/api/issues",
    request_body = CreateIssueRequest,
    responses(
        (status = 201, description = "Issue created successfully", body = IssueResponse),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 401, description = "Invalid token", body = MessageResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn create_issue(
    user: Option<AuthenticatedUser>,
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateIssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

    let (reported_by, user_id) = match user {
        Some(user) => {
            // Tokens outlive deleted accounts; such reports keep the email but no link
            let account = state.user_service.find_by_id(user.user_id).await?;
            if account.is_none() {
                tracing::warn!(
                    "Issue reported with a token for missing account {}",
                    user.user_id
                );
            }
            (user.email, account.map(|a| a.id))
        }
        None => (ANONYMOUS_REPORTER.to_string(), None),
    };

    let issue = state
        .issue_service
        .create(dto.into_create_issue(reported_by, user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse::found(
            "Issue created successfully",
            IssueDto::from(issue),
        )),
    ))
}

/// Move an issue through its status workflow
#[utoipa::path(
    patch,
    path = "/api/issues/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Issue ID"),
        UpdateStatusQuery
    ),
    responses(
        (status = 200, description = "Issue status updated", body = MessageResponse),
        (status = 400, description = "Missing or unknown status", body = MessageResponse),
        (status = 404, description = "Issue not found", body = MessageResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn update_issue_status(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<IssueService>>,
    Path(id): Path<String>,
    Query(query): Query<UpdateStatusQuery>,
) -> Result<Json<MessageResponse>> {
    let status: IssueStatus = query
        .status
        .ok_or_else(|| AppError::BadRequest("Missing status".to_string()))?
        .parse()
        .map_err(AppError::BadRequest)?;
    let id = parse_issue_id(&id)?;

    if !service.update_status(id, status).await? {
        return Err(AppError::NotFound("Issue not found".to_string()));
    }

    tracing::debug!(
        "Issue {} moved to {} by {}",
        id,
        status,
        user.as_ref().map_or(ANONYMOUS_REPORTER, |u| u.email.as_str())
    );

    Ok(Json(MessageResponse::success("Issue status updated")))
}

/// Delete an issue
#[utoipa::path(
    delete,
    path = "/api/issues/{id}",
    params(
        ("id" = Uuid, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue deleted", body = MessageResponse),
        (status = 404, description = "Issue not found", body = MessageResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn delete_issue(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<IssueService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_issue_id(&id)?;

    if !service.delete(id).await? {
        return Err(AppError::NotFound("Issue not found".to_string()));
    }

    tracing::debug!(
        "Issue {} deleted by {}",
        id,
        user.as_ref().map_or(ANONYMOUS_REPORTER, |u| u.email.as_str())
    );

    Ok(Json(MessageResponse::success("Issue deleted")))
}
