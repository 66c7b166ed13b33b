use crate::features::issues::handlers::{self, issue_handler::ReportState};
use crate::features::issues::services::IssueService;
use crate::features::users::services::UserService;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

/// Read-only issue routes
pub fn public_routes(service: Arc<IssueService>) -> Router {
    Router::new()
        .route("/api/issues/nearby", get(handlers::nearby_issues))
        .route("/api/issues/status/{status}", get(handlers::issues_by_status))
        .route("/api/issues/{id}", get(handlers::get_issue))
        .route("/api/issues", get(handlers::list_issues))
        .with_state(service)
}

/// Mutating issue routes (optional bearer auth applied by caller)
pub fn reporting_routes(service: Arc<IssueService>, user_service: Arc<UserService>) -> Router {
    let report_state = ReportState {
        issue_service: Arc::clone(&service),
        user_service,
    };

    let submit_routes = Router::new()
        .route("/api/issues", post(handlers::create_issue))
        .with_state(report_state);

    Router::new()
        .route("/api/issues/{id}/status", patch(handlers::update_issue_status))
        .route("/api/issues/{id}", delete(handlers::delete_issue))
        .with_state(service)
        .merge(submit_routes)
}
