use serde::Serialize;

use crate::model::task::{Task, ViewMode};

/// Project `tasks` through `mode`, keeping the collection's order.
pub fn project(tasks: &[Task], mode: ViewMode) -> Vec<Task> {
    tasks.iter().filter(|t| mode.admits(t)).cloned().collect()
}

/// The derived view handed to subscribers after every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub mode: ViewMode,
    pub tasks: Vec<Task>,
    /// Open tasks in the whole collection, independent of `mode`
    pub remaining: usize,
    pub total: usize,
}

impl FilterView {
    pub fn derive(tasks: &[Task], mode: ViewMode) -> Self {
        FilterView {
            mode,
            tasks: project(tasks, mode),
            remaining: tasks.iter().filter(|t| !t.completed).count(),
            total: tasks.len(),
        }
    }

    /// Footer text, e.g. "1 item left"
    pub fn remaining_label(&self) -> String {
        match self.remaining {
            1 => "1 item left".to_string(),
            n => format!("{} items left", n),
        }
    }
}
