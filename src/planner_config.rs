//! Configuration for the sprint planner.
//!
//! Settings are read from `.sprintplan/sprintplan.toml` in the project
//! directory, falling back to the user-level file under the platform config
//! directory. Layering is file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8080"
//! timeout_secs = 30
//!
//! [planning]
//! project_id = 1
//! sprint_id = 4
//! default_user_story_id = 1
//! commit_policy = "compensate"
//!
//! [logging]
//! json = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::commit::CommitPolicy;
use crate::errors::ConfigError;

pub const CONFIG_DIR: &str = ".sprintplan";
pub const CONFIG_FILE: &str = "sprintplan.toml";

pub const ENV_BASE_URL: &str = "SPRINTPLAN_BASE_URL";
pub const ENV_PROJECT_ID: &str = "SPRINTPLAN_PROJECT_ID";
pub const ENV_SPRINT_ID: &str = "SPRINTPLAN_SPRINT_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningSection {
    #[serde(default = "default_project_id")]
    pub project_id: i64,
    /// Sprint the created tasks are attached to. The planner never creates
    /// sprints itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<i64>,
    /// User story for tasks that do not name one.
    #[serde(default = "default_user_story_id")]
    pub default_user_story_id: i64,
    #[serde(default)]
    pub commit_policy: CommitPolicy,
}

fn default_project_id() -> i64 {
    1
}

fn default_user_story_id() -> i64 {
    1
}

impl Default for PlanningSection {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            sprint_id: None,
            default_user_story_id: default_user_story_id(),
            commit_policy: CommitPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Emit JSON log lines instead of the human format.
    #[serde(default)]
    pub json: bool,
}

/// The complete sprintplan.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintplanToml {
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub planning: PlanningSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl SprintplanToml {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay environment values. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        if let Some(value) = lookup(ENV_PROJECT_ID) {
            self.planning.project_id = parse_id(ENV_PROJECT_ID, &value)?;
        }
        if let Some(value) = lookup(ENV_SPRINT_ID) {
            self.planning.sprint_id = Some(parse_id(ENV_SPRINT_ID, &value)?);
        }
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "Invalid base_url '{}': should start with http:// or https://",
                self.backend.base_url
            ));
        }
        if self.backend.timeout_secs == 0 {
            warnings.push("timeout_secs is 0: every request would time out".to_string());
        }
        if self.planning.project_id <= 0 {
            warnings.push(format!(
                "project_id should be positive, got {}",
                self.planning.project_id
            ));
        }
        match self.planning.sprint_id {
            Some(id) if id <= 0 => {
                warnings.push(format!("sprint_id should be positive, got {}", id));
            }
            None => warnings.push(
                "sprint_id is not set: created tasks will not belong to a sprint".to_string(),
            ),
            _ => {}
        }
        if self.planning.default_user_story_id <= 0 {
            warnings.push(format!(
                "default_user_story_id should be positive, got {}",
                self.planning.default_user_story_id
            ));
        }

        warnings
    }
}

fn parse_id(name: &'static str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

/// User-level config file, used when the project has none.
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sprintplan").join(CONFIG_FILE))
}

/// Resolved configuration.
///
/// It merges settings from:
/// 1. sprintplan.toml (project, else user level)
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub project_dir: PathBuf,
    /// Path to the .sprintplan directory
    pub config_dir: PathBuf,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
    pub toml: SprintplanToml,
    pub verbose: bool,
    pub yes: bool,
}

impl PlannerConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        Self::load_with(project_dir, |name| std::env::var(name).ok())
    }

    /// Same as `new` with an explicit environment lookup.
    pub fn load_with<F>(project_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let config_dir = project_dir.join(CONFIG_DIR);

        let project_file = config_dir.join(CONFIG_FILE);
        let source = if project_file.exists() {
            Some(project_file)
        } else {
            user_config_file().filter(|p| p.exists())
        };
        let mut toml = match &source {
            Some(path) => SprintplanToml::load(path)?,
            None => SprintplanToml::default(),
        };
        toml.apply_env(lookup)?;

        Ok(Self {
            project_dir,
            config_dir,
            source,
            toml,
            verbose: false,
            yes: false,
        })
    }

    /// Create PlannerConfig with CLI overrides.
    pub fn with_cli_args(
        project_dir: PathBuf,
        verbose: bool,
        yes: bool,
        base_url: Option<String>,
        project_id: Option<i64>,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.apply_cli(verbose, yes, base_url, project_id);
        Ok(config)
    }

    fn apply_cli(
        &mut self,
        verbose: bool,
        yes: bool,
        base_url: Option<String>,
        project_id: Option<i64>,
    ) {
        self.verbose = verbose;
        self.yes = yes;
        if let Some(url) = base_url {
            self.toml.backend.base_url = url;
        }
        if let Some(id) = project_id {
            self.toml.planning.project_id = id;
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn base_url(&self) -> &str {
        &self.toml.backend.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.backend.timeout_secs)
    }

    pub fn project_id(&self) -> i64 {
        self.toml.planning.project_id
    }

    pub fn sprint_id(&self) -> Option<i64> {
        self.toml.planning.sprint_id
    }

    pub fn default_user_story_id(&self) -> i64 {
        self.toml.planning.default_user_story_id
    }

    pub fn commit_policy(&self) -> CommitPolicy {
        self.toml.planning.commit_policy
    }

    pub fn json_logs(&self) -> bool {
        self.toml.logging.json
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
