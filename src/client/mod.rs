//! Client side of the API: a typed HTTP client plus observable view-models.

pub mod api_client;
pub mod view_models;

#[cfg(test)]
mod tests;

pub use api_client::{ClientError, ClientResult, GreenGuardianClient};
pub use view_models::{
    AuthState, AuthViewModel, IssueDetailState, IssueDetailViewModel, IssuesState,
    IssuesViewModel, ReportIssueState, ReportIssueViewModel,
};
