//! In-memory `TaskBackend` for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{CreateTaskRequest, CreatedTask, TaskBackend, TaskRecord};
use crate::errors::BackendError;
use crate::models::TeamMember;
use crate::upload::UploadedFile;

fn server_error(url: &str) -> BackendError {
    BackendError::Status {
        url: url.to_string(),
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "fake failure".to_string(),
    }
}

#[derive(Default)]
struct Recorded {
    next_id: i64,
    created: Vec<CreateTaskRequest>,
    stored: BTreeMap<i64, CreateTaskRequest>,
    deleted: Vec<i64>,
    uploads: Vec<String>,
    roster_calls: usize,
}

/// Records every call; failures are opt-in per endpoint.
#[derive(Default)]
pub struct FakeBackend {
    members: Vec<TeamMember>,
    suggestions: Vec<TaskRecord>,
    fail_members: bool,
    fail_suggest: bool,
    fail_create_titles: Vec<String>,
    fail_deletes: bool,
    recorded: Mutex<Recorded>,
}

impl FakeBackend {
    pub fn with_members(mut self, members: Vec<TeamMember>) -> Self {
        self.members = members;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<TaskRecord>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn fail_members(mut self) -> Self {
        self.fail_members = true;
        self
    }

    pub fn fail_suggest(mut self) -> Self {
        self.fail_suggest = true;
        self
    }

    /// Reject creates whose `titulo` equals `title`.
    pub fn fail_create_for(mut self, title: &str) -> Self {
        self.fail_create_titles.push(title.to_string());
        self
    }

    pub fn fail_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Every create request that reached the backend, including failed ones.
    pub fn created(&self) -> Vec<CreateTaskRequest> {
        self.recorded.lock().unwrap().created.clone()
    }

    /// Tasks currently persisted (created and not deleted).
    pub fn stored(&self) -> Vec<CreateTaskRequest> {
        self.recorded.lock().unwrap().stored.values().cloned().collect()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.recorded.lock().unwrap().deleted.clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.recorded.lock().unwrap().uploads.clone()
    }

    pub fn roster_calls(&self) -> usize {
        self.recorded.lock().unwrap().roster_calls
    }
}

#[async_trait]
impl TaskBackend for FakeBackend {
    async fn fetch_team_members(&self, _project_id: i64) -> Result<Vec<TeamMember>, BackendError> {
        self.recorded.lock().unwrap().roster_calls += 1;
        if self.fail_members {
            return Err(server_error("/usuarioProyecto/proyecto"));
        }
        Ok(self.members.clone())
    }

    async fn suggest_tasks(&self, file: &UploadedFile) -> Result<Vec<TaskRecord>, BackendError> {
        self.recorded.lock().unwrap().uploads.push(file.name.clone());
        if self.fail_suggest {
            return Err(server_error("/tarea/plan-sprint"));
        }
        Ok(self.suggestions.clone())
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask, BackendError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.created.push(request.clone());
        if self.fail_create_titles.contains(&request.titulo) {
            return Err(server_error("/tarea"));
        }
        recorded.next_id += 1;
        let id = 100 + recorded.next_id;
        recorded.stored.insert(id, request.clone());
        Ok(CreatedTask {
            id,
            titulo: Some(request.titulo.clone()),
        })
    }

    async fn delete_task(&self, id: i64) -> Result<(), BackendError> {
        let mut recorded = self.recorded.lock().unwrap();
        if self.fail_deletes {
            return Err(server_error("/tarea/delete"));
        }
        recorded.deleted.push(id);
        recorded.stored.remove(&id);
        Ok(())
    }
}
