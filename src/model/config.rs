use serde::{Deserialize, Serialize};

use crate::model::task::ViewMode;

/// Configuration from .tasklist/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file, relative to the .tasklist/ directory
    #[serde(default = "default_store_file")]
    pub file: String,
    /// Top-level key holding the task snapshot
    #[serde(default = "default_store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
            key: default_store_key(),
        }
    }
}

fn default_store_file() -> String {
    "store.json".to_string()
}

fn default_store_key() -> String {
    "todos".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Filter used by `tl list` when none is given
    #[serde(default)]
    pub filter: ViewMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Display columns available to task text in list output
    #[serde(default = "default_max_width")]
    pub max_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            max_width: default_max_width(),
        }
    }
}

fn default_max_width() -> usize {
    80
}
