use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io;
use crate::io::file_store::FileStore;
use crate::model::config::Config;

/// Directory holding the store, config and recovery log
pub const LIST_DIR: &str = ".tasklist";

/// Error type for locating and setting up a task list directory
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("no task list found: run `tl init` (no .tasklist/ directory here or above)")]
    NotAProject,
    #[error("a task list already exists at {0}")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
}

/// A located task list: the project root and its loaded config
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub list_dir: PathBuf,
    pub config: Config,
}

impl Project {
    /// The store described by the config
    pub fn store(&self) -> FileStore {
        FileStore::new(self.list_dir.join(&self.config.store.file), &self.config.store.key)
    }
}

/// Walk up from `start` looking for a `.tasklist/` directory.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(LIST_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Load the task list rooted at `root`.
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    let list_dir = root.join(LIST_DIR);
    if !list_dir.is_dir() {
        return Err(ProjectError::NotAProject);
    }
    let config = config_io::read_config(&list_dir)?;
    Ok(Project {
        root: root.to_path_buf(),
        list_dir,
        config,
    })
}

/// Create `.tasklist/` under `root` with a default config.
pub fn init_project(root: &Path, force: bool) -> Result<Project, ProjectError> {
    let list_dir = root.join(LIST_DIR);
    if list_dir.is_dir() && !force {
        return Err(ProjectError::AlreadyInitialized(list_dir));
    }
    fs::create_dir_all(&list_dir).map_err(|source| ProjectError::WriteError {
        path: list_dir.clone(),
        source,
    })?;
    config_io::write_default_config(&list_dir)?;
    load_project(root)
}
