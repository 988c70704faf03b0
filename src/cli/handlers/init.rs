use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, LIST_DIR};

pub fn cmd_init(args: InitArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Check for an enclosing list and warn
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!(
            "Note: parent list found at {}/",
            parent_root.join(LIST_DIR).display()
        );
        eprintln!("Creating new list in ./{}/", LIST_DIR);
    }

    let project = project_io::init_project(root, args.force)?;
    tracing::info!(path = %project.list_dir.display(), "task list initialized");
    println!("Initialized task list in {}", project.list_dir.display());
    Ok(())
}
