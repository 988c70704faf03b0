use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable task identity. Unique within a collection for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty once inside a collection
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create an open task. `text` is stored trimmed.
    pub fn new(id: TaskId, text: &str) -> Self {
        Task {
            id,
            text: text.trim().to_string(),
            completed: false,
        }
    }
}

/// Which tasks a view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    All,
    Active,
    Completed,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::All, ViewMode::Active, ViewMode::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::All => "all",
            ViewMode::Active => "active",
            ViewMode::Completed => "completed",
        }
    }

    /// Whether a task belongs in this view
    pub fn admits(self, task: &Task) -> bool {
        match self {
            ViewMode::All => true,
            ViewMode::Active => !task.completed,
            ViewMode::Completed => task.completed,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode '{0}' (expected all, active or completed)")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ViewMode::All),
            "active" => Ok(ViewMode::Active),
            "completed" | "done" => Ok(ViewMode::Completed),
            other => Err(UnknownViewMode(other.to_string())),
        }
    }
}
