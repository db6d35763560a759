//! CLI command implementations.
//!
//! | Module    | Commands handled |
//! |-----------|------------------|
//! | `project` | `Init`           |
//! | `config`  | `Config`         |
//! | `team`    | `Team`           |
//! | `suggest` | `Suggest`        |
//! | `plan`    | `Plan`           |

pub mod config;
pub mod plan;
pub mod project;
pub mod suggest;
pub mod team;

pub use config::cmd_config;
pub use plan::cmd_plan;
pub use project::cmd_init;
pub use suggest::cmd_suggest;
pub use team::cmd_team;

use anyhow::{Context, Result};
use sprintplan::backend::HttpBackend;
use sprintplan::planner_config::PlannerConfig;

pub(crate) fn http_backend(config: &PlannerConfig) -> Result<HttpBackend> {
    HttpBackend::with_timeout(config.base_url(), config.timeout())
        .with_context(|| format!("Cannot use backend at '{}'", config.base_url()))
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
