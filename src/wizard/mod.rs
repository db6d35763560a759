//! Step sequencer for one sprint-planning run.
//!
//! The wizard holds exactly one open step and threads each step's output into
//! the next: the uploaded document feeds the suggestion request, the sprint
//! dates supply defaults for suggested tasks, the reviewed task list becomes
//! the assignment board, and the board is committed. Cancelling, or a
//! successful commit, discards everything.
//!
//! Every failure is turned into an inline `alert` and the wizard stays on the
//! current step so the user can correct or retry.

use std::fmt;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::assignment::{AssignmentBoard, BucketKey};
use crate::backend::{SuggestionDefaults, TaskBackend};
use crate::commit::{CommitContext, CommitPolicy, CommitReport, commit_board};
use crate::errors::{CommitError, ValidationError, WizardError};
use crate::models::{DraftId, DraftIdAllocator, DraftTask, DraftTaskInput, SprintDraft};
use crate::upload::UploadedFile;

pub const SUGGESTIONS_FAILED: &str = "Error al generar las tareas sugeridas";
pub const TEAM_LOAD_FAILED: &str = "Error al cargar los miembros del equipo";
pub const COMMIT_FAILED: &str = "Error al guardar las tareas en la base de datos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Idle,
    Upload,
    Metadata,
    Review,
    Assignment,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Idle => "idle",
            WizardStep::Upload => "upload",
            WizardStep::Metadata => "metadata",
            WizardStep::Review => "review",
            WizardStep::Assignment => "assignment",
        };
        f.write_str(name)
    }
}

pub struct Wizard {
    step: WizardStep,
    project_id: i64,
    default_user_story_id: i64,
    uploaded_file: Option<UploadedFile>,
    sprint_draft: Option<SprintDraft>,
    draft_tasks: Vec<DraftTask>,
    board: Option<AssignmentBoard>,
    alert: Option<String>,
    ids: DraftIdAllocator,
}

impl Wizard {
    pub fn new(project_id: i64, default_user_story_id: i64) -> Self {
        Self {
            step: WizardStep::Idle,
            project_id,
            default_user_story_id,
            uploaded_file: None,
            sprint_draft: None,
            draft_tasks: Vec::new(),
            board: None,
            alert: None,
            ids: DraftIdAllocator::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.uploaded_file.as_ref()
    }

    pub fn sprint_draft(&self) -> Option<&SprintDraft> {
        self.sprint_draft.as_ref()
    }

    /// Tasks under review. Empty outside the review step.
    pub fn draft_tasks(&self) -> &[DraftTask] {
        &self.draft_tasks
    }

    pub fn board(&self) -> Option<&AssignmentBoard> {
        self.board.as_ref()
    }

    /// The inline message from the last failed action, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    fn require(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }

    fn advance(&mut self, next: WizardStep) {
        info!(from = %self.step, to = %next, "wizard step");
        self.step = next;
        self.alert = None;
    }

    fn reject(&mut self, err: ValidationError) -> WizardError {
        self.alert = Some(err.to_string());
        WizardError::Validation(err)
    }

    fn reset(&mut self) {
        self.step = WizardStep::Idle;
        self.uploaded_file = None;
        self.sprint_draft = None;
        self.draft_tasks.clear();
        self.board = None;
        self.alert = None;
        self.ids = DraftIdAllocator::new();
    }

    pub fn start(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::Idle, "start planning")?;
        self.reset();
        self.advance(WizardStep::Upload);
        Ok(())
    }

    pub fn confirm_upload(&mut self, file: UploadedFile) -> Result<(), WizardError> {
        self.require(WizardStep::Upload, "confirm the upload")?;
        info!(file = %file.name, fingerprint = %file.fingerprint(), "document selected");
        self.uploaded_file = Some(file);
        self.advance(WizardStep::Metadata);
        Ok(())
    }

    /// Validate the sprint dates, open the review step and fetch suggestions.
    ///
    /// A failed suggestion request does not fail the call: the review step
    /// opens with an empty list and the alert set.
    pub async fn submit_metadata<B: TaskBackend + ?Sized>(
        &mut self,
        backend: &B,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), WizardError> {
        self.require(WizardStep::Metadata, "submit sprint dates")?;
        let sprint = SprintDraft::new(start, end, self.project_id, today)
            .map_err(|e| self.reject(e))?;
        let Some(file) = self.uploaded_file.as_ref() else {
            return Err(self.reject(ValidationError::MissingFile));
        };

        let result = backend.suggest_tasks(file).await;
        self.sprint_draft = Some(sprint);
        self.draft_tasks.clear();
        self.advance(WizardStep::Review);

        match result {
            Ok(records) => {
                let defaults = SuggestionDefaults {
                    estimated_date: sprint.end_date,
                    project_id: sprint.project_id,
                    user_story_id: self.default_user_story_id,
                };
                for record in records {
                    let id = self.ids.allocate();
                    self.draft_tasks.push(record.into_draft(id, &defaults));
                }
                info!(count = self.draft_tasks.len(), "suggestions loaded");
            }
            Err(e) => {
                warn!(error = %e, "suggestion request failed");
                self.alert = Some(SUGGESTIONS_FAILED.to_string());
            }
        }
        Ok(())
    }

    pub fn add_task(&mut self, input: DraftTaskInput) -> Result<DraftId, WizardError> {
        self.require(WizardStep::Review, "add a task")?;
        let id = self.ids.allocate();
        let task = input
            .into_task(id, self.project_id, self.default_user_story_id)
            .map_err(|e| self.reject(e))?;
        self.draft_tasks.push(task);
        self.alert = None;
        Ok(id)
    }

    pub fn edit_task(&mut self, id: DraftId, input: &DraftTaskInput) -> Result<(), WizardError> {
        self.require(WizardStep::Review, "edit a task")?;
        let position = self
            .draft_tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(WizardError::UnknownTask(id))?;
        if let Err(e) = self.draft_tasks[position].apply(input) {
            return Err(self.reject(e));
        }
        self.alert = None;
        Ok(())
    }

    pub fn remove_task(&mut self, id: DraftId) -> Result<DraftTask, WizardError> {
        self.require(WizardStep::Review, "remove a task")?;
        let position = self
            .draft_tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(WizardError::UnknownTask(id))?;
        Ok(self.draft_tasks.remove(position))
    }

    /// Hand the reviewed list over to the assignment board.
    pub fn confirm_review(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::Review, "confirm the task list")?;
        if self.draft_tasks.is_empty() {
            return Err(self.reject(ValidationError::NoTasks));
        }
        let tasks = std::mem::take(&mut self.draft_tasks);
        self.board = Some(AssignmentBoard::new(tasks));
        self.advance(WizardStep::Assignment);
        Ok(())
    }

    /// Fetch the roster and re-run auto-assignment. Returns the roster size.
    pub async fn load_team<B: TaskBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<usize, WizardError> {
        self.require(WizardStep::Assignment, "load the team")?;
        match backend.fetch_team_members(self.project_id).await {
            Ok(members) => {
                let count = match self.board.as_mut() {
                    Some(board) => {
                        board.set_roster(members);
                        board.roster().len()
                    }
                    None => members.len(),
                };
                self.alert = None;
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, project_id = self.project_id, "team request failed");
                self.alert = Some(TEAM_LOAD_FAILED.to_string());
                Err(WizardError::Backend(e))
            }
        }
    }

    pub fn move_task(
        &mut self,
        id: DraftId,
        from: BucketKey,
        to: BucketKey,
    ) -> Result<(), WizardError> {
        self.require(WizardStep::Assignment, "move a task")?;
        let board = self.board.as_mut().ok_or(WizardError::UnknownTask(id))?;
        board.move_task(id, from, to)?;
        Ok(())
    }

    /// Persist the board. On success the wizard returns to `Idle` with all
    /// state discarded; on failure it stays on the assignment step.
    pub async fn commit<B: TaskBackend + ?Sized>(
        &mut self,
        backend: &B,
        ctx: &CommitContext,
        policy: CommitPolicy,
    ) -> Result<CommitReport, WizardError> {
        self.require(WizardStep::Assignment, "commit")?;
        let Some(board) = self.board.as_ref() else {
            return Err(self.reject(ValidationError::NoTasks));
        };

        let result = commit_board(backend, board, ctx, policy).await;
        match result {
            Ok(report) => {
                info!(created = report.len(), "sprint tasks saved");
                self.reset();
                Ok(report)
            }
            Err(CommitError::Validation(e)) => Err(self.reject(e)),
            Err(e) => {
                self.alert = Some(COMMIT_FAILED.to_string());
                Err(WizardError::Commit(e))
            }
        }
    }

    /// Abort from any step. Nothing survives into the next run.
    pub fn cancel(&mut self) {
        if self.step != WizardStep::Idle {
            info!(from = %self.step, "wizard cancelled");
        }
        self.reset();
    }
}
