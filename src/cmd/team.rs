//! `sprintplan team`: list the project roster.

use anyhow::{Context, Result};
use console::style;

use sprintplan::backend::TaskBackend;
use sprintplan::planner_config::PlannerConfig;
use sprintplan::ui::icons::PERSON;
use sprintplan::ui::with_spinner;
use sprintplan::wizard::TEAM_LOAD_FAILED;

use super::http_backend;

pub async fn cmd_team(config: &PlannerConfig) -> Result<()> {
    let backend = http_backend(config)?;
    let members = with_spinner(
        "Loading team members...",
        backend.fetch_team_members(config.project_id()),
    )
    .await
    .context(TEAM_LOAD_FAILED)?;

    println!();
    println!(
        "Team of project {} ({} members)",
        style(config.project_id()).bold(),
        members.len()
    );
    println!();
    for member in &members {
        println!(
            "  {}{:>5}  {}  {}",
            PERSON,
            member.id,
            style(&member.name).bold(),
            style(&member.email).dim()
        );
    }
    if members.is_empty() {
        println!("  {}", style("(no members)").dim());
    }
    println!();

    Ok(())
}
