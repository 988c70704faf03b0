use crate::model::task::{Task, TaskId};

/// Error type for task operations.
///
/// None of these are fatal: every variant means "nothing changed".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("cannot move task {0} relative to itself")]
    SameTask(TaskId),
    #[error("no completed tasks to clear")]
    NoneCompleted,
    #[error("task {0} is hidden by the current filter")]
    Hidden(TaskId),
    #[error("no edit in progress")]
    NotEditing,
    #[error("no drag in progress")]
    NoDrag,
    #[error("no task ids left to issue")]
    IdsExhausted,
}

/// Result of `set_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Updated,
    /// The new text was empty, so the task was removed
    Deleted,
}

/// Records dropped while hydrating a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    EmptyText(TaskId),
    DuplicateId(TaskId),
}

/// The ordered source of truth for all tasks.
///
/// Order is display order. Ids are unique for as long as the collection
/// lives: a deleted id is never reissued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    /// Highest id ever held, issued or loaded
    last_id: Option<u64>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a loaded snapshot, dropping records that would
    /// break the collection's invariants. Dropped records are returned.
    pub fn hydrate(tasks: Vec<Task>) -> (Self, Vec<Repair>) {
        let mut collection = TaskCollection::new();
        let mut repairs = Vec::new();
        for mut task in tasks {
            if collection.index_of(task.id).is_some() {
                repairs.push(Repair::DuplicateId(task.id));
                continue;
            }
            let trimmed = task.text.trim();
            if trimmed.is_empty() {
                repairs.push(Repair::EmptyText(task.id));
                continue;
            }
            if trimmed.len() != task.text.len() {
                task.text = trimmed.to_string();
            }
            collection.note_id(task.id);
            collection.tasks.push(task);
        }
        (collection, repairs)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.index_of(id).is_some()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new open task at the end. Returns the assigned id.
    pub fn add(&mut self, text: &str) -> Result<TaskId, TaskError> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }
        let id = self.issue_id()?;
        self.tasks.push(Task::new(id, text));
        Ok(id)
    }

    /// Flip the completed flag. Returns the new value.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Replace a task's text in place. Empty text deletes the task.
    pub fn set_text(&mut self, id: TaskId, text: &str) -> Result<Edit, TaskError> {
        let idx = self.index_of(id).ok_or(TaskError::NotFound(id))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.tasks.remove(idx);
            return Ok(Edit::Deleted);
        }
        self.tasks[idx].text = trimmed.to_string();
        Ok(Edit::Updated)
    }

    /// Remove a task. Returns the removed record.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let idx = self.index_of(id).ok_or(TaskError::NotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    /// Move `moved` to just before (or after) `target`.
    ///
    /// The insertion index is the target's index once `moved` has been taken
    /// out of the sequence.
    pub fn reorder(
        &mut self,
        moved: TaskId,
        target: TaskId,
        place_after: bool,
    ) -> Result<(), TaskError> {
        if moved == target {
            return Err(TaskError::SameTask(moved));
        }
        let from = self.index_of(moved).ok_or(TaskError::NotFound(moved))?;
        let to = self.index_of(target).ok_or(TaskError::NotFound(target))?;

        let task = self.tasks.remove(from);
        let mut at = if to > from { to - 1 } else { to };
        if place_after {
            at += 1;
        }
        self.tasks.insert(at, task);
        Ok(())
    }

    /// Number of tasks not yet completed
    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn issue_id(&mut self) -> Result<TaskId, TaskError> {
        let next = match self.last_id {
            None => 1,
            Some(last) => last.checked_add(1).ok_or(TaskError::IdsExhausted)?,
        };
        self.last_id = Some(next);
        Ok(TaskId(next))
    }

    fn note_id(&mut self, id: TaskId) {
        if self.last_id.is_none_or(|last| id.0 > last) {
            self.last_id = Some(id.0);
        }
    }
}
