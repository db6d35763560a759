use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sprintplan::planner_config::PlannerConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "sprintplan")]
#[command(version, about = "Plan a sprint from a requirements document")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip prompts: accept suggestions and auto-assignment as they are
    #[arg(long, global = true)]
    pub yes: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Backend base URL. Overrides sprintplan.toml and SPRINTPLAN_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Project whose team and tasks are planned. Overrides SPRINTPLAN_PROJECT_ID.
    #[arg(long, global = true)]
    pub project_id: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .sprintplan/ with a default configuration
    Init,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// List the project's team members
    Team,
    /// Upload a document and print the suggested tasks
    Suggest {
        /// Requirements document (.doc, .docx or .txt)
        file: PathBuf,

        /// Print the backend records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the planning wizard: upload, dates, review, assignment, commit
    Plan {
        /// Requirements document (.doc, .docx or .txt)
        file: PathBuf,

        /// Sprint start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Sprint end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default sprintplan.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    if dotenvy::from_path(project_dir.join(".env")).is_err() {
        dotenvy::dotenv().ok();
    }

    match &cli.command {
        Commands::Init => {
            sprintplan::logging::init(cli.verbose, false)?;
            cmd::cmd_init(&project_dir)?;
        }
        Commands::Config { command } => {
            sprintplan::logging::init(cli.verbose, false)?;
            cmd::cmd_config(&project_dir, &cli, command.clone())?;
        }
        command => {
            let config = PlannerConfig::with_cli_args(
                project_dir,
                cli.verbose,
                cli.yes,
                cli.base_url.clone(),
                cli.project_id,
            )?;
            sprintplan::logging::init(config.verbose, config.json_logs())?;
            for warning in config.validate() {
                tracing::warn!("{}", warning);
            }

            match command {
                Commands::Team => cmd::cmd_team(&config).await?,
                Commands::Suggest { file, json } => cmd::cmd_suggest(&config, file, *json).await?,
                Commands::Plan { file, start, end } => {
                    cmd::cmd_plan(&config, file, *start, *end).await?
                }
                Commands::Init | Commands::Config { .. } => {}
            }
        }
    }

    Ok(())
}
