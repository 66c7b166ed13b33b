use reqwest::StatusCode;

use super::*;
use crate::features::auth::dtos::{LoginRequest, RegisterRequest};
use crate::features::issues::models::IssueStatus;
use crate::shared::test_helpers::{fake_email, fake_issue_request, fake_name, test_app};

/// Serves the in-memory application on an ephemeral port
async fn spawn_server() -> GreenGuardianClient {
    let (router, _services) = test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    GreenGuardianClient::new(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_client_issue_lifecycle() {
    let client = spawn_server().await;

    let mut request = fake_issue_request();
    request.latitude = 28.6139;
    request.longitude = 77.2090;
    let created = client.create_issue(&request).await.unwrap();
    assert_eq!(created.status, IssueStatus::Submitted);
    assert_eq!(created.reported_by, "anonymous@greenguardian.com");

    let fetched = client.get_issue(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let nearby = client.nearby_issues(28.6139, 77.2090, Some(1.0)).await.unwrap();
    assert_eq!(nearby.len(), 1);
    let far = client.nearby_issues(-33.86, 151.2, None).await.unwrap();
    assert!(far.is_empty());

    client
        .update_issue_status(created.id, IssueStatus::Verified)
        .await
        .unwrap();
    let verified = client.issues_by_status(IssueStatus::Verified).await.unwrap();
    assert_eq!(verified.len(), 1);
    assert!(verified[0].verified_at.is_some());

    client.delete_issue(created.id).await.unwrap();
    assert!(client.list_issues().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_client_surfaces_error_envelope() {
    let client = spawn_server().await;

    let err = client.get_issue(uuid::Uuid::new_v4()).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Issue not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_login_keeps_token_for_reports() {
    let client = spawn_server().await;
    let email = fake_email();

    client
        .register(&RegisterRequest {
            name: fake_name(),
            email: email.clone(),
            password: "green123".to_string(),
        })
        .await
        .unwrap();
    client.set_token(None).await;

    let response = client
        .login(&LoginRequest {
            email: email.clone(),
            password: "green123".to_string(),
        })
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(client.token().await, response.token);

    let created = client.create_issue(&fake_issue_request()).await.unwrap();
    assert_eq!(created.reported_by, email);

    let me = client.current_user().await.unwrap();
    assert_eq!(me.email, email);
}

#[tokio::test]
async fn test_issues_view_model_loads_and_reports_errors() {
    let client = spawn_server().await;
    client.create_issue(&fake_issue_request()).await.unwrap();

    let vm = IssuesViewModel::new(client);
    let mut updates = vm.subscribe();

    vm.load_issues().await;
    assert!(updates.has_changed().unwrap());
    let state = updates.borrow_and_update().clone();
    assert!(!state.is_loading);
    assert_eq!(state.issues.len(), 1);
    assert!(state.error.is_none());

    let unreachable = IssuesViewModel::new(GreenGuardianClient::new("http://127.0.0.1:9"));
    unreachable.load_issues().await;
    assert!(unreachable.state().error.is_some());
    unreachable.clear_error();
    assert!(unreachable.state().error.is_none());
}

#[tokio::test]
async fn test_issue_detail_view_model() {
    let client = spawn_server().await;
    let created = client.create_issue(&fake_issue_request()).await.unwrap();

    let vm = IssueDetailViewModel::new(client.clone(), created.id);
    vm.load_issue().await;
    let state = vm.state();
    assert!(!state.is_loading);
    assert_eq!(state.issue.map(|i| i.id), Some(created.id));

    let missing = IssueDetailViewModel::new(client, uuid::Uuid::new_v4());
    missing.load_issue().await;
    assert_eq!(missing.state().error.as_deref(), Some("Issue not found"));
}

#[tokio::test]
async fn test_report_view_model_submit_and_reset() {
    let client = spawn_server().await;
    let vm = ReportIssueViewModel::new(client.clone());

    assert!(vm.submit().await.is_none());
    assert_eq!(vm.state().error.as_deref(), Some("Title is required"));

    vm.set_title("Burning garbage");
    vm.set_description("Smoke across the colony every evening");
    vm.set_latitude("12.97");
    vm.set_longitude("77.59");
    let created = vm.submit().await.unwrap();
    assert!(vm.state().is_success);
    assert!(vm.state().error.is_none());
    assert_eq!(created.title, "Burning garbage");

    vm.reset();
    assert_eq!(vm.state(), ReportIssueState::default());
    assert_eq!(client.list_issues().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_auth_view_model_register_login_logout() {
    let client = spawn_server().await;
    let vm = AuthViewModel::new(client.clone());
    let email = fake_email();

    vm.register("Asha", &email, "green123").await;
    let state = vm.state();
    assert!(state.is_logged_in);
    assert!(state.registration_success);
    assert!(client.token().await.is_some());

    vm.clear_registration_success();
    assert!(!vm.state().registration_success);

    vm.register("Asha", &email, "green123").await;
    assert_eq!(
        vm.state().error.as_deref(),
        Some("User with this email already exists")
    );

    vm.logout().await;
    assert_eq!(vm.state(), AuthState::default());
    assert!(client.token().await.is_none());

    vm.login(&email, "wrong-password").await;
    assert_eq!(vm.state().error.as_deref(), Some("Invalid credentials"));

    vm.login(&email, "green123").await;
    let state = vm.state();
    assert!(state.is_logged_in);
    assert_eq!(state.user.map(|u| u.email), Some(email));
}
