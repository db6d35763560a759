//! Configuration view and validation commands: `sprintplan config`.

use anyhow::Result;

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(
    project_dir: &std::path::Path,
    cli: &Cli,
    command: Option<ConfigCommands>,
) -> Result<()> {
    use sprintplan::init::{get_config_dir, is_initialized};
    use sprintplan::planner_config::{CONFIG_FILE, PlannerConfig, SprintplanToml};

    let config_dir = get_config_dir(project_dir);
    let config_path = config_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            let config = PlannerConfig::with_cli_args(
                project_dir.to_path_buf(),
                cli.verbose,
                cli.yes,
                cli.base_url.clone(),
                cli.project_id,
            )?;

            println!();
            println!("Sprintplan Configuration");
            println!("========================");
            println!();
            match &config.source {
                Some(path) => println!("Config file: {}", path.display()),
                None => {
                    println!("No sprintplan.toml found at {}", config_path.display());
                    println!("Using defaults.");
                }
            }
            println!();
            println!("Effective values (with env and CLI overrides):");
            println!("[backend]");
            println!("  base_url = \"{}\"", config.base_url());
            println!("  timeout_secs = {}", config.toml.backend.timeout_secs);
            println!("[planning]");
            println!("  project_id = {}", config.project_id());
            match config.sprint_id() {
                Some(id) => println!("  sprint_id = {}", id),
                None => println!("  sprint_id = (not set)"),
            }
            println!(
                "  default_user_story_id = {}",
                config.default_user_story_id()
            );
            println!("  commit_policy = \"{}\"", config.commit_policy());
            println!("[logging]");
            println!("  json = {}", config.json_logs());
            println!();

            if config.source.is_none() {
                println!("Run 'sprintplan config init' to create a sprintplan.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let config = PlannerConfig::with_cli_args(
                project_dir.to_path_buf(),
                cli.verbose,
                cli.yes,
                cli.base_url.clone(),
                cli.project_id,
            )?;
            let warnings = config.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if is_initialized(project_dir) {
                println!(
                    "sprintplan.toml already exists at {}",
                    config_path.display()
                );
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
            }

            SprintplanToml::default().save(&config_path)?;

            println!("Created sprintplan.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] base_url, timeout_secs");
            println!("  - [planning] project_id, sprint_id, default_user_story_id, commit_policy");
            println!("  - [logging] json");
            println!();
        }
    }

    Ok(())
}
