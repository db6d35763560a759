//! REST backend access.
//!
//! `TaskBackend` is the seam between the wizard and the network: the wizard and
//! the commit executor receive an implementation explicitly instead of reaching
//! for global state. `HttpBackend` is the production implementation over
//! `reqwest`.

pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::BackendError;
use crate::models::TeamMember;
use crate::upload::UploadedFile;

pub use wire::{CreateTaskRequest, CreatedTask, SuggestionDefaults, TaskRecord};

/// Multipart field name the suggestion endpoint expects.
pub const UPLOAD_FIELD: &str = "archivo";

#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Project roster, in backend order.
    async fn fetch_team_members(&self, project_id: i64) -> Result<Vec<TeamMember>, BackendError>;

    /// Ask the backend's model for task suggestions for the uploaded document.
    async fn suggest_tasks(&self, file: &UploadedFile) -> Result<Vec<TaskRecord>, BackendError>;

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask, BackendError>;

    /// Only used to compensate a partially failed commit.
    async fn delete_task(&self, id: i64) -> Result<(), BackendError>;
}

/// `TaskBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Wrap an existing client. `base_url` must be an absolute http(s) URL.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, BackendError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"));
        if host.is_none_or(|h| h.is_empty()) {
            return Err(BackendError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Build a client with the given request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sprintplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Client)?;
        Self::new(client, base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx statuses into `BackendError::Status`.
    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let resp = request.send().await.map_err(|source| BackendError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        self.send(url, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| BackendError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn fetch_team_members(&self, project_id: i64) -> Result<Vec<TeamMember>, BackendError> {
        let url = self.url(&format!("/usuarioProyecto/proyecto/{}", project_id));
        debug!(%url, "fetching team members");
        let records: Vec<wire::MembershipRecord> =
            self.send_json(&url, self.client.get(&url)).await?;
        Ok(records.into_iter().map(TeamMember::from).collect())
    }

    async fn suggest_tasks(&self, file: &UploadedFile) -> Result<Vec<TaskRecord>, BackendError> {
        let url = self.url("/tarea/plan-sprint");
        debug!(%url, file = %file.name, bytes = file.bytes.len(), "requesting task suggestions");
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(BackendError::Client)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        self.send_json(&url, self.client.post(&url).multipart(form))
            .await
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask, BackendError> {
        let url = self.url("/tarea");
        debug!(%url, titulo = %request.titulo, "creating task");
        self.send_json(&url, self.client.post(&url).json(request))
            .await
    }

    async fn delete_task(&self, id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("/tarea/delete/{}", id));
        debug!(%url, "deleting task");
        self.send(&url, self.client.delete(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let backend = HttpBackend::new(reqwest::Client::new(), "http://localhost:8080/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(backend.url("/tarea"), "http://localhost:8080/tarea");
    }

    #[test]
    fn test_new_rejects_non_http_urls() {
        for bad in ["", "localhost:8080", "ftp://host", "http://"] {
            let result = HttpBackend::new(reqwest::Client::new(), bad);
            assert!(
                matches!(result, Err(BackendError::InvalidBaseUrl(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_with_timeout_builds_client() {
        let backend =
            HttpBackend::with_timeout("https://api.example.com", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "https://api.example.com");
    }
}
