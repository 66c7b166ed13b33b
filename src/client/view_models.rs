//! Observable screen state for front ends.
//!
//! Each view-model owns a `watch` channel. Actions make one network call and
//! replace the state with the result; subscribers see every replacement.

use tokio::sync::watch;
use uuid::Uuid;

use crate::client::api_client::GreenGuardianClient;
use crate::features::auth::dtos::{LoginRequest, RegisterRequest};
use crate::features::issues::dtos::{CreateIssueRequest, IssueDto};
use crate::features::issues::models::{IssueCategory, IssueSeverity};
use crate::features::users::dtos::UserDto;
use crate::shared::constants::MIN_PASSWORD_LENGTH;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuesState {
    pub issues: Vec<IssueDto>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Issue list screen
pub struct IssuesViewModel {
    client: GreenGuardianClient,
    state: watch::Sender<IssuesState>,
}

impl IssuesViewModel {
    pub fn new(client: GreenGuardianClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(IssuesState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IssuesState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> IssuesState {
        self.state.borrow().clone()
    }

    pub async fn load_issues(&self) {
        self.start_loading();
        let result = self.client.list_issues().await;
        self.finish(result.map_err(|e| e.to_string()));
    }

    pub async fn load_nearby_issues(&self, lat: f64, lng: f64) {
        self.start_loading();
        let result = self.client.nearby_issues(lat, lng, None).await;
        self.finish(result.map_err(|e| e.to_string()));
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn start_loading(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn finish(&self, result: Result<Vec<IssueDto>, String>) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(issues) => s.issues = issues,
                Err(message) => s.error = Some(message),
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueDetailState {
    pub issue: Option<IssueDto>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for IssueDetailState {
    fn default() -> Self {
        Self {
            issue: None,
            is_loading: true,
            error: None,
        }
    }
}

/// Single issue screen
pub struct IssueDetailViewModel {
    client: GreenGuardianClient,
    issue_id: Uuid,
    state: watch::Sender<IssueDetailState>,
}

impl IssueDetailViewModel {
    pub fn new(client: GreenGuardianClient, issue_id: Uuid) -> Self {
        Self {
            client,
            issue_id,
            state: watch::Sender::new(IssueDetailState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IssueDetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> IssueDetailState {
        self.state.borrow().clone()
    }

    pub async fn load_issue(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.client.get_issue(self.issue_id).await;

        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(issue) => s.issue = Some(issue),
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }
}

/// Report form. Coordinates stay as typed text until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportIssueState {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    pub latitude: String,
    pub longitude: String,
    pub is_submitting: bool,
    pub is_success: bool,
    pub error: Option<String>,
}

impl Default for ReportIssueState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: IssueCategory::Other,
            severity: IssueSeverity::Medium,
            latitude: String::new(),
            longitude: String::new(),
            is_submitting: false,
            is_success: false,
            error: None,
        }
    }
}

impl ReportIssueState {
    /// Builds the request, or the message to show when the form is incomplete
    fn to_request(&self) -> Result<CreateIssueRequest, &'static str> {
        if self.title.trim().is_empty() {
            return Err("Title is required");
        }
        if self.description.trim().is_empty() {
            return Err("Description is required");
        }

        let latitude = self.latitude.trim().parse::<f64>();
        let longitude = self.longitude.trim().parse::<f64>();
        let (Ok(latitude), Ok(longitude)) = (latitude, longitude) else {
            return Err("Valid latitude and longitude are required");
        };

        Ok(CreateIssueRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            latitude,
            longitude,
            image_base64: None,
            severity: self.severity,
        })
    }
}

pub struct ReportIssueViewModel {
    client: GreenGuardianClient,
    state: watch::Sender<ReportIssueState>,
}

impl ReportIssueViewModel {
    pub fn new(client: GreenGuardianClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(ReportIssueState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReportIssueState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ReportIssueState {
        self.state.borrow().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|s| s.title = title);
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.state.send_modify(|s| s.description = description);
    }

    pub fn set_category(&self, category: IssueCategory) {
        self.state.send_modify(|s| s.category = category);
    }

    pub fn set_severity(&self, severity: IssueSeverity) {
        self.state.send_modify(|s| s.severity = severity);
    }

    pub fn set_latitude(&self, latitude: impl Into<String>) {
        let latitude = latitude.into();
        self.state.send_modify(|s| s.latitude = latitude);
    }

    pub fn set_longitude(&self, longitude: impl Into<String>) {
        let longitude = longitude.into();
        self.state.send_modify(|s| s.longitude = longitude);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn reset(&self) {
        self.state.send_replace(ReportIssueState::default());
    }

    /// Returns the created issue on success
    pub async fn submit(&self) -> Option<IssueDto> {
        let prepared = self.state.borrow().to_request();
        let request = match prepared {
            Ok(request) => request,
            Err(message) => {
                self.state.send_modify(|s| s.error = Some(message.to_string()));
                return None;
            }
        };

        self.state.send_modify(|s| {
            s.is_submitting = true;
            s.error = None;
        });

        let result = self.client.create_issue(&request).await;

        let mut created = None;
        self.state.send_modify(|s| {
            s.is_submitting = false;
            match result {
                Ok(issue) => {
                    s.is_success = true;
                    created = Some(issue);
                }
                Err(e) => s.error = Some(e.to_string()),
            }
        });
        created
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_loading: bool,
    pub is_logged_in: bool,
    pub user: Option<UserDto>,
    pub token: Option<String>,
    pub error: Option<String>,
    pub registration_success: bool,
}

/// Login and registration screens
pub struct AuthViewModel {
    client: GreenGuardianClient,
    state: watch::Sender<AuthState>,
}

impl AuthViewModel {
    pub fn new(client: GreenGuardianClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(AuthState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub async fn login(&self, email: &str, password: &str) {
        if email.trim().is_empty() || password.trim().is_empty() {
            self.fail("Email and password are required");
            return;
        }

        self.start_loading();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.client.login(&request).await;

        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(response) => {
                    s.is_logged_in = true;
                    s.user = response.user;
                    s.token = response.token;
                }
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) {
        if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
            self.fail("All fields are required");
            return;
        }
        if (password.chars().count() as u64) < MIN_PASSWORD_LENGTH {
            self.fail("Password must be at least 6 characters");
            return;
        }

        self.start_loading();
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.client.register(&request).await;

        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(response) => {
                    s.is_logged_in = true;
                    s.user = response.user;
                    s.token = response.token;
                    s.registration_success = true;
                }
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }

    /// Drops the session locally and on the shared client
    pub async fn logout(&self) {
        self.client.set_token(None).await;
        self.state.send_replace(AuthState::default());
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_registration_success(&self) {
        self.state.send_modify(|s| s.registration_success = false);
    }

    fn start_loading(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, message: &str) {
        let message = message.to_string();
        self.state.send_modify(|s| s.error = Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_form_requires_title_then_description() {
        let mut form = ReportIssueState::default();
        assert_eq!(form.to_request().unwrap_err(), "Title is required");

        form.title = "Oil spill".to_string();
        assert_eq!(form.to_request().unwrap_err(), "Description is required");
    }

    #[test]
    fn test_report_form_requires_numeric_coordinates() {
        let form = ReportIssueState {
            title: "Oil spill".to_string(),
            description: "Slick near the jetty".to_string(),
            latitude: "19.07".to_string(),
            longitude: "east".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.to_request().unwrap_err(),
            "Valid latitude and longitude are required"
        );
    }

    #[test]
    fn test_report_form_builds_request() {
        let form = ReportIssueState {
            title: "Oil spill".to_string(),
            description: "Slick near the jetty".to_string(),
            category: IssueCategory::WaterContamination,
            severity: IssueSeverity::Critical,
            latitude: " 19.07 ".to_string(),
            longitude: "72.87".to_string(),
            ..Default::default()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.latitude, 19.07);
        assert_eq!(request.longitude, 72.87);
        assert_eq!(request.category, IssueCategory::WaterContamination);
        assert_eq!(request.severity, IssueSeverity::Critical);
    }

    #[tokio::test]
    async fn test_auth_validation_happens_before_network() {
        // Nothing listens on this address; validation must short-circuit
        let vm = AuthViewModel::new(GreenGuardianClient::new("http://127.0.0.1:9"));

        vm.login("", "secret").await;
        assert_eq!(
            vm.state().error.as_deref(),
            Some("Email and password are required")
        );

        vm.clear_error();
        vm.register("Asha", "asha@example.com", "abc").await;
        assert_eq!(
            vm.state().error.as_deref(),
            Some("Password must be at least 6 characters")
        );
        assert!(!vm.state().is_loading);

        vm.register("", "asha@example.com", "secret1").await;
        assert_eq!(vm.state().error.as_deref(), Some("All fields are required"));
    }

    #[test]
    fn test_detail_starts_loading() {
        let vm = IssueDetailViewModel::new(GreenGuardianClient::new("http://127.0.0.1:9"), Uuid::nil());
        assert!(vm.state().is_loading);
        assert!(vm.state().issue.is_none());
    }
}
