use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Workflow status of a task.
///
/// The backend stores statuses as numeric ids (`estadoTareaId`) and exposes
/// Spanish display names; both are mapped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Revision,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Revision,
        TaskStatus::Done,
    ];

    /// Backend status id.
    pub fn code(self) -> i64 {
        match self {
            TaskStatus::Todo => 1,
            TaskStatus::Doing => 2,
            TaskStatus::Revision => 3,
            TaskStatus::Done => 4,
        }
    }

    /// Map a backend status id. Missing or unrecognized ids become `Todo`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => TaskStatus::Doing,
            Some(3) => TaskStatus::Revision,
            Some(4) => TaskStatus::Done,
            _ => TaskStatus::Todo,
        }
    }

    /// Lenient name mapping used for backend display names.
    pub fn normalize_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::Doing => "DOING",
            TaskStatus::Revision => "REVISION",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to do" => Ok(TaskStatus::Todo),
            "doing" | "en progreso" => Ok(TaskStatus::Doing),
            "revision" | "en revision" | "en revisión" | "revisión" => Ok(TaskStatus::Revision),
            "done" | "terminado" | "completado" => Ok(TaskStatus::Done),
            _ => Err(format!(
                "Invalid status '{}'. Valid values: todo, doing, revision, done",
                s
            )),
        }
    }
}

/// Stable identifier assigned to a draft task when it enters the wizard.
///
/// Moves and removals key off this id, never off the task's contents, so two
/// suggestions with identical fields stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DraftId(pub u64);

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing `DraftId`s for one wizard run.
#[derive(Debug, Default)]
pub struct DraftIdAllocator {
    next: u64,
}

impl DraftIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> DraftId {
        if self.next == 0 {
            self.next = 1;
        }
        let id = DraftId(self.next);
        self.next += 1;
        id
    }
}

/// A task candidate held only in wizard memory until commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTask {
    pub id: DraftId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to the commit date when absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub estimated_date: NaiveDate,
    pub story_points: u32,
    #[serde(default)]
    pub status: TaskStatus,
    /// Assignment hint. `None` and `Some(0)` both mean "no one".
    #[serde(default)]
    pub responsible_id: Option<i64>,
    pub project_id: i64,
    pub user_story_id: i64,
}

impl DraftTask {
    /// The hint as a usable member id, if it names anyone at all.
    pub fn responsible_hint(&self) -> Option<i64> {
        self.responsible_id.filter(|id| *id != 0)
    }

    /// Overwrite the editable fields from validated user input.
    pub fn apply(&mut self, input: &DraftTaskInput) -> Result<(), ValidationError> {
        input.validate()?;
        self.name = input.name.trim().to_string();
        self.description = input
            .description
            .as_ref()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.start_date = input.start_date;
        self.estimated_date = input.estimated_date.ok_or(ValidationError::MissingEstimatedDate)?;
        self.story_points = u32::try_from(input.story_points)
            .map_err(|_| ValidationError::StoryPointsTooLarge { max: u32::MAX })?;
        self.status = input.status;
        self.responsible_id = input.responsible_id.filter(|id| *id != 0);
        if let Some(project_id) = input.project_id {
            self.project_id = project_id;
        }
        if let Some(user_story_id) = input.user_story_id {
            self.user_story_id = user_story_id;
        }
        Ok(())
    }
}

/// User-entered task fields for the "add task" and "edit task" actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftTaskInput {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub estimated_date: Option<NaiveDate>,
    /// Signed so that negative entries can be rejected with a message.
    pub story_points: i64,
    pub status: TaskStatus,
    pub responsible_id: Option<i64>,
    pub project_id: Option<i64>,
    pub user_story_id: Option<i64>,
}

impl DraftTaskInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingTaskName);
        }
        if self.estimated_date.is_none() {
            return Err(ValidationError::MissingEstimatedDate);
        }
        if self.story_points < 0 {
            return Err(ValidationError::NegativeStoryPoints);
        }
        if u32::try_from(self.story_points).is_err() {
            return Err(ValidationError::StoryPointsTooLarge { max: u32::MAX });
        }
        Ok(())
    }

    /// Prefill an edit form from an existing task.
    pub fn from_task(task: &DraftTask) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            start_date: task.start_date,
            estimated_date: Some(task.estimated_date),
            story_points: i64::from(task.story_points),
            status: task.status,
            responsible_id: task.responsible_hint(),
            project_id: Some(task.project_id),
            user_story_id: Some(task.user_story_id),
        }
    }

    /// Build a new draft task. Missing project and user story fall back to the
    /// given defaults.
    pub fn into_task(
        self,
        id: DraftId,
        default_project_id: i64,
        default_user_story_id: i64,
    ) -> Result<DraftTask, ValidationError> {
        self.validate()?;
        let mut task = DraftTask {
            id,
            name: String::new(),
            description: None,
            start_date: None,
            estimated_date: self.estimated_date.ok_or(ValidationError::MissingEstimatedDate)?,
            story_points: 0,
            status: TaskStatus::Todo,
            responsible_id: None,
            project_id: default_project_id,
            user_story_id: default_user_story_id,
        };
        task.apply(&self)?;
        Ok(task)
    }
}
