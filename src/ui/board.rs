//! Plain-text rendering of draft tasks and the assignment board.

use console::style;

use crate::assignment::{AssignmentBoard, BucketKey};
use crate::models::DraftTask;
use crate::ui::icons::{INBOX, PERSON};

/// One line per task: id, name, points, status and dates.
pub fn task_line(task: &DraftTask) -> String {
    let start = task
        .start_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>4}  {}  {} pts  {}  {} → {}",
        style(task.id).dim(),
        style(&task.name).bold(),
        task.story_points,
        task.status,
        start,
        task.estimated_date
    )
}

pub fn render_tasks(tasks: &[DraftTask]) -> String {
    if tasks.is_empty() {
        return format!("  {}", style("(no tasks)").dim());
    }
    tasks
        .iter()
        .map(|t| format!("  {}", task_line(t)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every bucket with its tasks, members in roster order and unassigned last.
pub fn render_board(board: &AssignmentBoard) -> String {
    let mut out = Vec::new();

    for (member, ids) in board.member_buckets() {
        out.push(format!(
            "{}{} [{}] {} ({} tasks, {} pts)",
            PERSON,
            style(member.initial()).cyan().bold(),
            member.id,
            style(&member.name).bold(),
            ids.len(),
            board.story_points(BucketKey::Member(member.id))
        ));
        for task in board.tasks_in(BucketKey::Member(member.id)) {
            out.push(format!("    {}", task_line(task)));
        }
    }

    let unassigned = board.unassigned();
    let header = format!("{}Unassigned ({} tasks)", INBOX, unassigned.len());
    if unassigned.is_empty() {
        out.push(header);
    } else {
        out.push(style(header).yellow().to_string());
    }
    for task in board.tasks_in(BucketKey::Unassigned) {
        out.push(format!("    {}", task_line(task)));
    }

    out.join("\n")
}
