use std::fs;
use std::path::{Path, PathBuf};

use crate::io::project_io::ProjectError;
use crate::model::config::Config;
use crate::model::task::ViewMode;

/// Written by `tl init`
const DEFAULT_CONFIG: &str = r#"# tasklist configuration

[store]
# Store file, relative to this directory
file = "store.json"
# Top-level key holding the task snapshot
key = "todos"

[view]
# Filter used by `tl list`: all, active or completed
filter = "all"

[ui]
# Display columns for task text in `tl list`
max_width = 80
"#;

pub fn config_path(list_dir: &Path) -> PathBuf {
    list_dir.join("config.toml")
}

/// Read config.toml. A missing file means every default.
pub fn read_config(list_dir: &Path) -> Result<Config, ProjectError> {
    let path = config_path(list_dir);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(source) => Err(ProjectError::ReadError { path, source }),
    }
}

pub fn write_default_config(list_dir: &Path) -> Result<(), ProjectError> {
    let path = config_path(list_dir);
    fs::write(&path, DEFAULT_CONFIG).map_err(|source| ProjectError::WriteError { path, source })
}

/// Read config.toml as an editable document (empty if the file is missing)
pub fn read_config_document(list_dir: &Path) -> Result<toml_edit::DocumentMut, ProjectError> {
    let path = config_path(list_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => return Err(ProjectError::ReadError { path, source }),
    };
    Ok(text.parse()?)
}

/// Write an edited document back, preserving its formatting
pub fn write_config_document(
    list_dir: &Path,
    doc: &toml_edit::DocumentMut,
) -> Result<(), ProjectError> {
    let path = config_path(list_dir);
    fs::write(&path, doc.to_string()).map_err(|source| ProjectError::WriteError { path, source })
}

/// Set `[view] filter` in the document
pub fn set_default_filter(doc: &mut toml_edit::DocumentMut, mode: ViewMode) {
    if !doc.contains_key("view") {
        doc["view"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["view"]["filter"] = toml_edit::value(mode.as_str());
}
