//! HTTP implementation of [`AdminBackend`] on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::endpoints::{self, MatchAction, UserAction};
use super::{AdminBackend, CvBlob};
use crate::config::Config;
use crate::errors::ConsoleError;
use crate::models::{
    AdminAccount, Alumni, CreateAdminRequest, CreateMatchRequest, DashboardStats, InvitationCode,
    MatchRecord, PendingUsers, RejectMatchRequest, RejectUserRequest, Student, UserKind,
    VerificationCode,
};

/// Client for the platform backend's admin API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, ConsoleError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
            token: config.backend_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ConsoleError> {
        tracing::debug!(%method, path, "Backend request");

        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        tracing::warn!(path, status = status.as_u16(), "Backend request failed: {}", message);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ConsoleError::SessionExpired(message));
        }
        Err(ConsoleError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    /// Send a request and decode the JSON payload.
    async fn api_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ConsoleError> {
        let response = self.send(method, path, body).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose payload is not needed.
    async fn api_command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ConsoleError> {
        self.send(method, path, body).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        self.api_request(Method::GET, path, None).await
    }
}

/// Extract a human-readable message from an error body.
///
/// The backend reports errors as `{"message": ...}` or `{"error": ...}`; anything else gets a
/// static fallback naming the status.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[async_trait]
impl AdminBackend for HttpBackend {
    async fn fetch_stats(&self) -> Result<DashboardStats, ConsoleError> {
        self.get(endpoints::STATS).await
    }

    async fn list_students(&self) -> Result<Vec<Student>, ConsoleError> {
        self.get(endpoints::STUDENTS).await
    }

    async fn list_alumni(&self) -> Result<Vec<Alumni>, ConsoleError> {
        self.get(endpoints::ALUMNI).await
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>, ConsoleError> {
        self.get(endpoints::MATCHES).await
    }

    async fn list_pending(&self) -> Result<PendingUsers, ConsoleError> {
        self.get(endpoints::PENDING).await
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, ConsoleError> {
        self.get(endpoints::ADMINS).await
    }

    async fn list_invitation_codes(&self) -> Result<Vec<InvitationCode>, ConsoleError> {
        self.get(endpoints::INVITATION_CODES).await
    }

    async fn list_verification_codes(&self) -> Result<Vec<VerificationCode>, ConsoleError> {
        self.get(endpoints::VERIFICATION_CODES).await
    }

    async fn approve_user(&self, kind: UserKind, id: &str) -> Result<(), ConsoleError> {
        let path = endpoints::user_action(kind, id, UserAction::Approve)?;
        self.api_command(Method::POST, &path, None).await
    }

    async fn reject_user(
        &self,
        kind: UserKind,
        id: &str,
        reason: Option<&str>,
    ) -> Result<(), ConsoleError> {
        let path = endpoints::user_action(kind, id, UserAction::Reject)?;
        let body = serde_json::to_value(RejectUserRequest {
            reason: reason.map(str::to_string),
        })?;
        self.api_command(Method::POST, &path, Some(body)).await
    }

    async fn set_user_active(
        &self,
        kind: UserKind,
        id: &str,
        active: bool,
    ) -> Result<(), ConsoleError> {
        let action = if active {
            UserAction::Reactivate
        } else {
            UserAction::Deactivate
        };
        let path = endpoints::user_action(kind, id, action)?;
        self.api_command(Method::POST, &path, None).await
    }

    async fn create_match(
        &self,
        request: &CreateMatchRequest,
    ) -> Result<MatchRecord, ConsoleError> {
        let body = serde_json::to_value(request)?;
        self.api_request(Method::POST, endpoints::MATCHES, Some(body))
            .await
    }

    async fn approve_match(&self, id: &str) -> Result<(), ConsoleError> {
        let path = endpoints::match_action(id, MatchAction::Approve)?;
        self.api_command(Method::POST, &path, None).await
    }

    async fn reject_match(&self, id: &str, reason: &str) -> Result<(), ConsoleError> {
        let path = endpoints::match_action(id, MatchAction::Reject)?;
        let body = serde_json::to_value(RejectMatchRequest {
            reason: reason.to_string(),
        })?;
        self.api_command(Method::POST, &path, Some(body)).await
    }

    async fn cancel_match(&self, id: &str) -> Result<(), ConsoleError> {
        let path = endpoints::match_action(id, MatchAction::Cancel)?;
        self.api_command(Method::POST, &path, None).await
    }

    async fn create_admin(
        &self,
        request: &CreateAdminRequest,
    ) -> Result<AdminAccount, ConsoleError> {
        let body = serde_json::to_value(request)?;
        self.api_request(Method::POST, endpoints::ADMINS, Some(body))
            .await
    }

    async fn delete_admin(&self, id: &str) -> Result<(), ConsoleError> {
        self.api_command(Method::DELETE, &endpoints::admin(id)?, None)
            .await
    }

    async fn generate_invitation_code(&self) -> Result<InvitationCode, ConsoleError> {
        self.api_request(Method::POST, endpoints::INVITATION_CODES, None)
            .await
    }

    async fn download_cv(&self, student_id: &str) -> Result<CvBlob, ConsoleError> {
        let response = self
            .send(Method::GET, &endpoints::student_cv(student_id)?, None)
            .await?;

        let headers = response.headers();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name);

        let bytes = response.bytes().await?.to_vec();

        Ok(CvBlob {
            content_type,
            file_name,
            bytes,
        })
    }
}

/// Pull `filename="..."` out of a Content-Disposition header.
fn disposition_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
