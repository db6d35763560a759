//! Project initialization command.

use anyhow::Result;

pub fn cmd_init(project_dir: &std::path::Path) -> Result<()> {
    use sprintplan::init::init_project;

    let result = init_project(project_dir)?;

    if result.created {
        println!(
            "Initialized sprintplan project at {}",
            result.config_dir.display()
        );
        println!();
        println!("Created:");
        println!("  .sprintplan/");
        println!("  └── sprintplan.toml   # backend URL, project and sprint ids");
        println!();
        println!("Next steps:");
        println!("  1. Set [planning] project_id and sprint_id in sprintplan.toml");
        println!("  2. Run `sprintplan team` to check the backend connection");
        println!("  3. Run `sprintplan plan <document>` to plan the sprint");
    } else if result.wrote_config {
        println!(
            "Added default sprintplan.toml to {}",
            result.config_dir.display()
        );
    } else {
        println!(
            "Sprintplan project already initialized at {}",
            result.config_dir.display()
        );
    }

    Ok(())
}
