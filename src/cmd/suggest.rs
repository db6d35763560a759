//! `sprintplan suggest`: upload a document and print the suggested tasks
//! without starting a planning run.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use sprintplan::backend::TaskBackend;
use sprintplan::models::TaskStatus;
use sprintplan::planner_config::PlannerConfig;
use sprintplan::ui::icons::DOCUMENT;
use sprintplan::ui::with_spinner;
use sprintplan::upload::UploadedFile;
use sprintplan::wizard::SUGGESTIONS_FAILED;

use super::http_backend;

pub async fn cmd_suggest(config: &PlannerConfig, path: &Path, json: bool) -> Result<()> {
    let file = UploadedFile::from_path(path)?;
    let backend = http_backend(config)?;
    let records = with_spinner(
        format!("Generating tasks from {}...", file.name),
        backend.suggest_tasks(&file),
    )
    .await
    .context(SUGGESTIONS_FAILED)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!();
    println!(
        "{}{} ({:.1} KB, {})",
        DOCUMENT,
        style(&file.name).bold(),
        file.size_kb(),
        file.fingerprint()
    );
    println!("{} suggested tasks", records.len());
    println!();
    for (i, record) in records.iter().enumerate() {
        let title = record.titulo.as_deref().unwrap_or("(untitled)");
        let due = record
            .fecha_fin_estimada
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let responsible = match record.desarrollador_id {
            Some(id) if id != 0 => id.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "  {:>3}. {}  {} pts  {}  due {}  responsible {}",
            i + 1,
            style(title).bold(),
            record.prioridad.unwrap_or(0).max(0),
            TaskStatus::from_code(record.estado_tarea_id),
            due,
            responsible
        );
        if let Some(desc) = record.descripcion.as_deref().filter(|d| !d.trim().is_empty()) {
            println!("       {}", style(desc).dim());
        }
    }
    println!();

    Ok(())
}
