//! `sprintplan init`: create the `.sprintplan/` directory.
//!
//! ```text
//! .sprintplan/
//! └── sprintplan.toml   # backend, planning and logging settings
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::planner_config::{CONFIG_DIR, CONFIG_FILE, SprintplanToml};

#[derive(Debug)]
pub struct InitResult {
    pub config_dir: PathBuf,
    /// False if the directory already existed
    pub created: bool,
    /// True if a default sprintplan.toml was written
    pub wrote_config: bool,
}

/// Initialize a project. Existing settings are never overwritten.
pub fn init_project(project_dir: &Path) -> Result<InitResult> {
    let config_dir = project_dir.join(CONFIG_DIR);
    let created = !config_dir.exists();

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory: {}", config_dir.display()))?;

    let config_file = config_dir.join(CONFIG_FILE);
    let wrote_config = if config_file.exists() {
        false
    } else {
        SprintplanToml::default().save(&config_file)?;
        true
    };

    Ok(InitResult {
        config_dir,
        created,
        wrote_config,
    })
}

pub fn is_initialized(project_dir: &Path) -> bool {
    project_dir.join(CONFIG_DIR).join(CONFIG_FILE).exists()
}

pub fn get_config_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_config() {
        let dir = tempdir().unwrap();
        assert!(!is_initialized(dir.path()));

        let result = init_project(dir.path()).unwrap();
        assert!(result.created);
        assert!(result.wrote_config);
        assert_eq!(result.config_dir, get_config_dir(dir.path()));
        assert!(is_initialized(dir.path()));

        let toml = SprintplanToml::load(&result.config_dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(toml, SprintplanToml::default());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(CONFIG_FILE), "[planning]\nproject_id = 9\n").unwrap();

        let result = init_project(dir.path()).unwrap();
        assert!(!result.created);
        assert!(!result.wrote_config);
        let content = std::fs::read_to_string(config_dir.join(CONFIG_FILE)).unwrap();
        assert!(content.contains("project_id = 9"));
    }

    #[test]
    fn test_init_completes_bare_directory() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        let result = init_project(dir.path()).unwrap();
        assert!(!result.created);
        assert!(result.wrote_config);
    }
}
