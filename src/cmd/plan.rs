//! `sprintplan plan`: the interactive planning wizard.
//!
//! With `--yes` no prompt is shown: the suggestions are accepted as returned,
//! the auto-assignment is kept, and the batch is committed only when every
//! task found an owner.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use sprintplan::assignment::BucketKey;
use sprintplan::backend::HttpBackend;
use sprintplan::commit::CommitContext;
use sprintplan::errors::{CommitError, WizardError};
use sprintplan::models::{DraftId, DraftTask, DraftTaskInput, TaskStatus};
use sprintplan::planner_config::PlannerConfig;
use sprintplan::ui::icons::{CALENDAR, CHECK, CLIPBOARD, CROSS, DOCUMENT, ROCKET, WARN};
use sprintplan::ui::{render_board, render_tasks, with_spinner};
use sprintplan::upload::UploadedFile;
use sprintplan::wizard::Wizard;

use super::{http_backend, today};

/// Default sprint length offered at the date prompt.
const DEFAULT_SPRINT_DAYS: i64 = 14;

enum Flow {
    Continue,
    Done,
}

pub async fn cmd_plan(
    config: &PlannerConfig,
    path: &Path,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let backend = http_backend(config)?;
    let mut wizard = Wizard::new(config.project_id(), config.default_user_story_id());
    let today = today();

    wizard.start()?;
    let file = UploadedFile::from_path(path)?;
    println!();
    println!(
        "{}{} ({:.1} KB)",
        DOCUMENT,
        style(&file.name).bold(),
        file.size_kb()
    );
    wizard.confirm_upload(file)?;

    if let Flow::Done = metadata_step(config, &backend, &mut wizard, start, end, today).await? {
        return Ok(());
    }

    if let Flow::Done = review_step(config, &mut wizard)? {
        return Ok(());
    }

    assignment_step(config, &backend, &mut wizard, today).await
}

fn print_alert(wizard: &Wizard) {
    if let Some(alert) = wizard.alert() {
        println!("{}{}", WARN, style(alert).red());
    }
}

fn cancel(wizard: &mut Wizard) -> Result<()> {
    wizard.cancel();
    println!("Planning cancelled. Nothing was saved.");
    Ok(())
}

// ===== metadata =====

async fn metadata_step(
    config: &PlannerConfig,
    backend: &HttpBackend,
    wizard: &mut Wizard,
    mut start: Option<NaiveDate>,
    mut end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Flow> {
    let dates_from_flags = start.is_some() || end.is_some();
    if config.yes {
        start = start.or(Some(today));
        end = end.or(start.map(|s| s + Duration::days(DEFAULT_SPRINT_DAYS)));
    }
    loop {
        if !config.yes && !dates_from_flags {
            let default_start = start.unwrap_or(today);
            start = Some(prompt_date("Sprint start date", Some(default_start))?);
            let default_end = end.unwrap_or(default_start + Duration::days(DEFAULT_SPRINT_DAYS));
            end = Some(prompt_date("Sprint end date", Some(default_end))?);
        }

        let result = with_spinner(
            "Generating suggested tasks...",
            wizard.submit_metadata(backend, start, end, today),
        )
        .await;

        match result {
            Ok(()) => {
                if let Some(sprint) = wizard.sprint_draft() {
                    println!(
                        "{}Sprint {} → {} ({} days)",
                        CALENDAR,
                        sprint.start_date,
                        sprint.end_date,
                        sprint.duration_days()
                    );
                }
                return Ok(Flow::Continue);
            }
            Err(WizardError::Validation(e)) => {
                print_alert(wizard);
                if config.yes || dates_from_flags {
                    bail!(e);
                }
                let selection = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("The sprint dates were not accepted")
                    .items(&["Enter the dates again", "Cancel planning"])
                    .default(0)
                    .interact()?;
                if selection != 0 {
                    cancel(wizard)?;
                    return Ok(Flow::Done);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_date(prompt: &str, default: Option<NaiveDate>) -> Result<NaiveDate> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
        .validate_with(|value: &String| -> Result<(), String> {
            value
                .trim()
                .parse::<NaiveDate>()
                .map(|_| ())
                .map_err(|_| "Use the YYYY-MM-DD format".to_string())
        });
    if let Some(date) = default {
        input = input.default(date.to_string());
    }
    let value = input.interact_text()?;
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid date '{}'", value))
}

// ===== review =====

fn review_step(config: &PlannerConfig, wizard: &mut Wizard) -> Result<Flow> {
    loop {
        println!();
        println!(
            "{}Suggested tasks ({})",
            CLIPBOARD,
            wizard.draft_tasks().len()
        );
        println!("{}", render_tasks(wizard.draft_tasks()));
        print_alert(wizard);
        println!();

        if config.yes {
            wizard.confirm_review()?;
            return Ok(Flow::Continue);
        }

        let options = &[
            "Continue to assignment",
            "Add a task",
            "Edit a task",
            "Remove a task",
            "Cancel planning",
        ];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Review the task list")
            .items(options)
            .default(0)
            .interact()?;

        match selection {
            0 => match wizard.confirm_review() {
                Ok(()) => return Ok(Flow::Continue),
                Err(WizardError::Validation(_)) => continue,
                Err(e) => return Err(e.into()),
            },
            1 => {
                let end = wizard
                    .sprint_draft()
                    .map(|s| s.end_date)
                    .unwrap_or_else(today);
                let input = prompt_task(None, end)?;
                if let Err(e) = wizard.add_task(input) {
                    report_recoverable(e)?;
                }
            }
            2 => {
                if let Some(id) = pick_draft(wizard.draft_tasks(), "Task to edit")? {
                    let Some(task) = wizard.draft_tasks().iter().find(|t| t.id == id).cloned()
                    else {
                        continue;
                    };
                    let input = prompt_task(Some(&task), task.estimated_date)?;
                    if let Err(e) = wizard.edit_task(id, &input) {
                        report_recoverable(e)?;
                    }
                }
            }
            3 => {
                if let Some(id) = pick_draft(wizard.draft_tasks(), "Task to remove")? {
                    let removed = wizard.remove_task(id)?;
                    println!("Removed {}", style(&removed.name).bold());
                }
            }
            _ => {
                cancel(wizard)?;
                return Ok(Flow::Done);
            }
        }
    }
}

/// Validation failures are shown by the alert on the next render.
fn report_recoverable(err: WizardError) -> Result<()> {
    match err {
        WizardError::Validation(_) => Ok(()),
        other => Err(other.into()),
    }
}

fn pick_draft(tasks: &[DraftTask], prompt: &str) -> Result<Option<DraftId>> {
    if tasks.is_empty() {
        println!("{}", style("There are no tasks yet.").dim());
        return Ok(None);
    }
    let labels: Vec<String> = tasks
        .iter()
        .map(|t| format!("{} {}", t.id, t.name))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(selection.map(|i| tasks[i].id))
}

fn prompt_task(existing: Option<&DraftTask>, default_due: NaiveDate) -> Result<DraftTaskInput> {
    let theme = ColorfulTheme::default();
    let base = existing.map(DraftTaskInput::from_task).unwrap_or_default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Name")
        .with_initial_text(base.name.clone())
        .allow_empty(true)
        .interact_text()?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .with_initial_text(base.description.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let estimated = prompt_date(
        "Estimated end date",
        Some(base.estimated_date.unwrap_or(default_due)),
    )?;

    let story_points: i64 = Input::with_theme(&theme)
        .with_prompt("Story points")
        .default(base.story_points)
        .interact_text()?;

    let statuses: Vec<String> = TaskStatus::ALL.iter().map(|s| s.to_string()).collect();
    let current = TaskStatus::ALL
        .iter()
        .position(|s| *s == base.status)
        .unwrap_or(0);
    let status_index = Select::with_theme(&theme)
        .with_prompt("Status")
        .items(&statuses)
        .default(current)
        .interact()?;

    let responsible: String = Input::with_theme(&theme)
        .with_prompt("Responsible member id (empty for none)")
        .with_initial_text(base.responsible_id.map(|id| id.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|value: &String| -> Result<(), String> {
            if value.trim().is_empty() || value.trim().parse::<i64>().is_ok() {
                Ok(())
            } else {
                Err("Enter a numeric member id".to_string())
            }
        })
        .interact_text()?;

    Ok(DraftTaskInput {
        name,
        description: Some(description).filter(|d| !d.trim().is_empty()),
        start_date: base.start_date,
        estimated_date: Some(estimated),
        story_points,
        status: TaskStatus::ALL[status_index],
        responsible_id: responsible.trim().parse().ok(),
        project_id: base.project_id,
        user_story_id: base.user_story_id,
    })
}

// ===== assignment =====

async fn assignment_step(
    config: &PlannerConfig,
    backend: &HttpBackend,
    wizard: &mut Wizard,
    today: NaiveDate,
) -> Result<()> {
    load_team(config, backend, wizard).await?;

    let ctx = CommitContext {
        sprint_id: config.sprint_id(),
        today,
    };

    loop {
        let Some(board) = wizard.board() else {
            bail!("No assignment board is open");
        };
        println!();
        println!("{}", render_board(board));
        println!(
            "{} of {} tasks auto-assigned",
            board.auto_assigned_count(),
            board.task_count()
        );
        let unassigned = board.unassigned().len();
        print_alert(wizard);
        println!();

        if config.yes {
            if unassigned > 0 {
                wizard.cancel();
                bail!(
                    "{} task(s) have no matching team member; run without --yes to assign them",
                    unassigned
                );
            }
            return commit(config, backend, wizard, &ctx).await.and_then(|saved| {
                if saved {
                    Ok(())
                } else {
                    bail!("Sprint tasks were not saved")
                }
            });
        }

        let options = &[
            "Commit tasks",
            "Move a task",
            "Reload team (re-runs auto-assignment)",
            "Cancel planning",
        ];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Assign the tasks")
            .items(options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                if commit(config, backend, wizard, &ctx).await? {
                    return Ok(());
                }
            }
            1 => move_task(wizard)?,
            2 => load_team(config, backend, wizard).await?,
            _ => return cancel(wizard),
        }
    }
}

async fn load_team(
    config: &PlannerConfig,
    backend: &HttpBackend,
    wizard: &mut Wizard,
) -> Result<()> {
    loop {
        let result = with_spinner("Loading team members...", wizard.load_team(backend)).await;
        match result {
            Ok(count) => {
                println!("{}{} team members loaded", CHECK, count);
                return Ok(());
            }
            Err(e) => {
                print_alert(wizard);
                let retry = !config.yes
                    && Confirm::with_theme(&ColorfulTheme::default())
                        .with_prompt("Retry?")
                        .default(true)
                        .interact()?;
                if !retry {
                    wizard.cancel();
                    return Err(e).context("Planning stopped");
                }
            }
        }
    }
}

fn move_task(wizard: &mut Wizard) -> Result<()> {
    let Some(board) = wizard.board() else {
        return Ok(());
    };

    let ids = board.all_ids();
    let labels: Vec<String> = ids
        .iter()
        .filter_map(|id| {
            let task = board.task(*id)?;
            let bucket = board.locate(*id)?;
            let owner = match bucket {
                BucketKey::Unassigned => "unassigned".to_string(),
                BucketKey::Member(member_id) => board
                    .member(member_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| bucket.to_string()),
            };
            Some(format!("{} {} ({})", task.id, task.name, owner))
        })
        .collect();
    let Some(task_index) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Task to move")
        .items(&labels)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };
    let id = ids[task_index];
    let Some(from) = board.locate(id) else {
        return Ok(());
    };

    let mut targets: Vec<(BucketKey, String)> = board
        .roster()
        .iter()
        .map(|m| (BucketKey::Member(m.id), format!("{} [{}]", m.name, m.id)))
        .collect();
    targets.push((BucketKey::Unassigned, "Unassigned".to_string()));
    let target_labels: Vec<&str> = targets.iter().map(|(_, label)| label.as_str()).collect();
    let Some(target_index) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Move to")
        .items(&target_labels)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };
    let to = targets[target_index].0;

    wizard.move_task(id, from, to)?;
    Ok(())
}

/// Returns whether the batch was saved.
async fn commit(
    config: &PlannerConfig,
    backend: &HttpBackend,
    wizard: &mut Wizard,
    ctx: &CommitContext,
) -> Result<bool> {
    let result = with_spinner(
        "Saving sprint tasks...",
        wizard.commit(backend, ctx, config.commit_policy()),
    )
    .await;

    match result {
        Ok(report) => {
            println!("{}{} tasks saved", ROCKET, report.len());
            Ok(true)
        }
        Err(WizardError::Validation(_)) => {
            print_alert(wizard);
            Ok(false)
        }
        Err(WizardError::Commit(CommitError::Partial {
            failures,
            rolled_back,
            orphaned,
            created,
            ..
        })) => {
            print_alert(wizard);
            for (id, reason) in &failures {
                println!("  {}{} {}", CROSS, id, style(reason).dim());
            }
            if !rolled_back.is_empty() {
                println!("  {} created task(s) were deleted again", rolled_back.len());
            }
            if !orphaned.is_empty() {
                println!(
                    "  {}Could not delete tasks {:?}; remove them on the backend",
                    WARN, orphaned
                );
            } else if rolled_back.is_empty() && !created.is_empty() {
                println!(
                    "  {}Tasks {:?} were kept on the backend (commit_policy = leave_partial)",
                    WARN, created
                );
            }
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
