use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::auth::dtos::{AuthResponse, LoginRequest, RegisterRequest};
use crate::features::issues::dtos::{CreateIssueRequest, IssueDto, IssueResponse, IssuesListResponse};
use crate::features::issues::models::IssueStatus;
use crate::features::users::dtos::{UserDto, UserResponse};
use crate::shared::types::MessageResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status and its error envelope
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// HTTP client for the GreenGuardian REST API.
///
/// Cloning is cheap and clones share the bearer token, so a login through one
/// handle authorizes requests made through every other.
#[derive(Clone)]
pub struct GreenGuardianClient {
    base_url: String,
    http_client: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl GreenGuardianClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Same as `request` but carries the bearer token when one is held
    async fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.request(method, path);
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageResponse>(&body)
            .map(|envelope| envelope.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body
                }
            });

        tracing::debug!("API error: HTTP {} - {}", status, message);
        Err(ClientError::Api { status, message })
    }

    pub async fn list_issues(&self) -> ClientResult<Vec<IssueDto>> {
        let response: IssuesListResponse = self.send(self.request(Method::GET, "/api/issues")).await?;
        Ok(response.issues)
    }

    pub async fn get_issue(&self, id: Uuid) -> ClientResult<IssueDto> {
        let response: IssueResponse = self
            .send(self.request(Method::GET, &format!("/api/issues/{}", id)))
            .await?;
        response
            .issue
            .ok_or_else(|| ClientError::InvalidResponse("issue missing from response".to_string()))
    }

    pub async fn create_issue(&self, request: &CreateIssueRequest) -> ClientResult<IssueDto> {
        let builder = self.authorized(Method::POST, "/api/issues").await.json(request);
        let response: IssueResponse = self.send(builder).await?;
        response
            .issue
            .ok_or_else(|| ClientError::InvalidResponse("issue missing from response".to_string()))
    }

    /// Issues within `radius_km` (server default 10 km when `None`)
    pub async fn nearby_issues(
        &self,
        lat: f64,
        lng: f64,
        radius_km: Option<f64>,
    ) -> ClientResult<Vec<IssueDto>> {
        let mut query = vec![("lat", lat.to_string()), ("lng", lng.to_string())];
        if let Some(radius) = radius_km {
            query.push(("radius", radius.to_string()));
        }

        let builder = self
            .request(Method::GET, "/api/issues/nearby")
            .query(&query);
        let response: IssuesListResponse = self.send(builder).await?;
        Ok(response.issues)
    }

    pub async fn issues_by_status(&self, status: IssueStatus) -> ClientResult<Vec<IssueDto>> {
        let response: IssuesListResponse = self
            .send(self.request(Method::GET, &format!("/api/issues/status/{}", status)))
            .await?;
        Ok(response.issues)
    }

    pub async fn update_issue_status(&self, id: Uuid, status: IssueStatus) -> ClientResult<()> {
        let builder = self
            .authorized(Method::PATCH, &format!("/api/issues/{}/status", id))
            .await
            .query(&[("status", status.as_str())]);
        let _: MessageResponse = self.send(builder).await?;
        Ok(())
    }

    pub async fn delete_issue(&self, id: Uuid) -> ClientResult<()> {
        let builder = self
            .authorized(Method::DELETE, &format!("/api/issues/{}", id))
            .await;
        let _: MessageResponse = self.send(builder).await?;
        Ok(())
    }

    /// Registers and keeps the returned token for later calls
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let builder = self
            .request(Method::POST, "/api/auth/register")
            .json(request);
        let response: AuthResponse = self.send(builder).await?;
        self.remember_token(&response).await;
        Ok(response)
    }

    /// Logs in and keeps the returned token for later calls
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        let builder = self.request(Method::POST, "/api/auth/login").json(request);
        let response: AuthResponse = self.send(builder).await?;
        self.remember_token(&response).await;
        Ok(response)
    }

    pub async fn current_user(&self) -> ClientResult<UserDto> {
        let response: UserResponse = self
            .send(self.authorized(Method::GET, "/api/auth/me").await)
            .await?;
        Ok(response.user)
    }

    async fn remember_token(&self, response: &AuthResponse) {
        if let Some(token) = &response.token {
            self.set_token(Some(token.clone())).await;
        }
    }
}
