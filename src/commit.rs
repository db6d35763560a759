//! Bulk commit of an assignment board.
//!
//! Every assigned draft becomes one `POST /tarea` call. Calls are issued
//! concurrently and awaited together; the batch only counts as committed when
//! all of them succeed. Because the backend has no batch endpoint, a partially
//! failed batch is compensated by deleting what was created (unless the
//! configured policy says otherwise).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assignment::AssignmentBoard;
use crate::backend::{CreateTaskRequest, CreatedTask, TaskBackend};
use crate::errors::{CommitError, ValidationError};
use crate::models::DraftId;

/// What to do with the created half of a partially failed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Delete every task created by the failed batch.
    #[default]
    Compensate,
    /// Keep whatever was created and only report the failure.
    LeavePartial,
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitPolicy::Compensate => write!(f, "compensate"),
            CommitPolicy::LeavePartial => write!(f, "leave_partial"),
        }
    }
}

impl FromStr for CommitPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compensate" => Ok(CommitPolicy::Compensate),
            "leave_partial" | "leave-partial" => Ok(CommitPolicy::LeavePartial),
            _ => anyhow::bail!(
                "Invalid commit policy '{}'. Valid values: compensate, leave_partial",
                s
            ),
        }
    }
}

/// Values attached to every created task that do not come from the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitContext {
    pub sprint_id: Option<i64>,
    /// Start date for drafts that have none.
    pub today: NaiveDate,
}

/// One create call, staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCreate {
    pub draft_id: DraftId,
    pub member_id: i64,
    pub request: CreateTaskRequest,
}

/// Successful commit outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub created: Vec<(DraftId, CreatedTask)>,
}

impl CommitReport {
    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Stage one create request per assigned task.
///
/// The request's `desarrolladorId` is the member owning the bucket, whatever
/// hint the draft carried. Fails when any task is still unassigned.
pub fn build_commit_plan(
    board: &AssignmentBoard,
    ctx: &CommitContext,
) -> Result<Vec<PlannedCreate>, ValidationError> {
    let unassigned = board.unassigned().len();
    if unassigned > 0 {
        return Err(ValidationError::UnassignedTasks { count: unassigned });
    }

    let mut plan = Vec::with_capacity(board.task_count());
    for (member, ids) in board.member_buckets() {
        for id in ids {
            let Some(task) = board.task(*id) else {
                continue;
            };
            plan.push(PlannedCreate {
                draft_id: task.id,
                member_id: member.id,
                request: CreateTaskRequest {
                    titulo: task.name.clone(),
                    descripcion: task.description.clone(),
                    fecha_inicio: task.start_date.unwrap_or(ctx.today),
                    fecha_fin_estimada: task.estimated_date,
                    fecha_fin_real: None,
                    prioridad: task.story_points,
                    estado_tarea_id: task.status.code(),
                    proyecto_id: task.project_id,
                    sprint_id: ctx.sprint_id,
                    desarrollador_id: member.id,
                    historia_usuario_id: task.user_story_id,
                },
            });
        }
    }
    Ok(plan)
}

/// Issue every staged create concurrently and wait for all of them.
pub async fn execute_commit<B: TaskBackend + ?Sized>(
    backend: &B,
    plan: &[PlannedCreate],
    policy: CommitPolicy,
) -> Result<CommitReport, CommitError> {
    let total = plan.len();
    let results = join_all(plan.iter().map(|planned| async move {
        (planned.draft_id, backend.create_task(&planned.request).await)
    }))
    .await;

    let mut created = Vec::new();
    let mut failures = Vec::new();
    for (draft_id, result) in results {
        match result {
            Ok(task) => created.push((draft_id, task)),
            Err(e) => {
                warn!(task = %draft_id, error = %e, "task creation failed");
                failures.push((draft_id, e.to_string()));
            }
        }
    }

    if failures.is_empty() {
        info!(created = created.len(), "commit complete");
        return Ok(CommitReport { created });
    }

    let created_ids: Vec<i64> = created.iter().map(|(_, task)| task.id).collect();
    let (rolled_back, orphaned) = match policy {
        CommitPolicy::Compensate => compensate(backend, &created_ids).await,
        CommitPolicy::LeavePartial => (Vec::new(), Vec::new()),
    };

    warn!(
        total,
        failed = failures.len(),
        rolled_back = rolled_back.len(),
        orphaned = orphaned.len(),
        %policy,
        "commit failed"
    );

    Err(CommitError::Partial {
        total,
        created: created_ids,
        failures,
        rolled_back,
        orphaned,
    })
}

/// Delete created tasks concurrently. Returns (deleted, still present).
async fn compensate<B: TaskBackend + ?Sized>(backend: &B, ids: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let results = join_all(
        ids.iter()
            .map(|id| async move { (*id, backend.delete_task(*id).await) }),
    )
    .await;

    let mut rolled_back = Vec::new();
    let mut orphaned = Vec::new();
    for (id, result) in results {
        match result {
            Ok(()) => rolled_back.push(id),
            Err(e) => {
                warn!(task_id = id, error = %e, "compensating delete failed");
                orphaned.push(id);
            }
        }
    }
    (rolled_back, orphaned)
}

/// Stage and execute in one step. No backend call is made if staging fails.
pub async fn commit_board<B: TaskBackend + ?Sized>(
    backend: &B,
    board: &AssignmentBoard,
    ctx: &CommitContext,
    policy: CommitPolicy,
) -> Result<CommitReport, CommitError> {
    let plan = build_commit_plan(board, ctx)?;
    execute_commit(backend, &plan, policy).await
}
