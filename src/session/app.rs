use crate::io::store::{Store, StoreError};
use crate::model::task::{Task, TaskId, ViewMode};
use crate::ops::collection::{Repair, TaskCollection, TaskError};
use crate::ops::filter::FilterView;
use crate::session::edit::{Commit, EditSession, SaveTrigger};
use crate::session::reorder::{HoverHint, ReorderGesture};

/// An inbound request from the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    ClearCompleted,
    SetFilter(ViewMode),
    StartEdit(TaskId),
    SaveEdit { draft: String, trigger: SaveTrigger },
    CancelEdit,
    DragBegin(TaskId),
    /// Pointer `offset` from the top of item `over`, whose height is `extent`
    DragHover { over: TaskId, offset: f64, extent: f64 },
    Drop(Option<TaskId>),
    DragAbort,
}

/// What handling an intent did
#[derive(Debug)]
pub enum Outcome {
    /// Collection changed, was persisted, subscribers notified
    Saved,
    /// Collection changed and subscribers notified, but persisting failed.
    /// The in-memory state stays authoritative.
    Unsaved(StoreError),
    /// View re-emitted without a mutation (filter switch, edit cancel)
    Refreshed,
    /// Only edit or drag bookkeeping changed
    Tracked,
    /// Nothing happened
    Ignored(TaskError),
}

impl Outcome {
    /// Whether the collection changed
    pub fn is_mutation(&self) -> bool {
        matches!(self, Outcome::Saved | Outcome::Unsaved(_))
    }
}

type Subscriber = Box<dyn FnMut(&FilterView)>;

/// The application state: one task collection, its store, the selected view
/// mode, and the live edit and drag controllers.
///
/// Every intent goes through [`App::dispatch`] and runs to completion. A
/// mutation, its save, and its notification happen together there, exactly
/// once each.
pub struct App {
    store: Box<dyn Store>,
    tasks: TaskCollection,
    mode: ViewMode,
    edit: EditSession,
    drag: ReorderGesture,
    subscribers: Vec<Subscriber>,
    /// Set while the store holds an older snapshot than memory
    unsaved: bool,
}

impl App {
    /// Hydrate from `store`. An unreadable snapshot starts an empty list.
    pub fn open(store: impl Store + 'static) -> Self {
        let loaded = match store.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(error = %e, "could not load tasks, starting empty");
                Vec::new()
            }
        };
        let (tasks, repairs) = TaskCollection::hydrate(loaded);
        for repair in &repairs {
            match repair {
                Repair::DuplicateId(id) => {
                    tracing::warn!(%id, "dropped task with duplicate id")
                }
                Repair::EmptyText(id) => tracing::warn!(%id, "dropped task with empty text"),
            }
        }
        tracing::debug!(count = tasks.len(), "tasks loaded");

        App {
            store: Box::new(store),
            tasks,
            mode: ViewMode::default(),
            edit: EditSession::default(),
            drag: ReorderGesture::default(),
            subscribers: Vec::new(),
            unsaved: false,
        }
    }

    /// Register for a view after every change
    pub fn subscribe(&mut self, f: impl FnMut(&FilterView) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    pub fn view(&self) -> FilterView {
        FilterView::derive(self.tasks.tasks(), self.mode)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn remaining_count(&self) -> usize {
        self.tasks.remaining_count()
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    /// Insertion-point hint of the drag in progress
    pub fn drag_hint(&self) -> Option<HoverHint> {
        self.drag.hint()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        tracing::trace!(?intent, "dispatch");
        let outcome = match intent {
            Intent::Add(text) => self.mutate(|tasks| tasks.add(&text).map(drop)),
            Intent::Toggle(id) => self.mutate(|tasks| tasks.toggle_complete(id).map(drop)),
            Intent::Delete(id) => self.delete(id),
            Intent::ClearCompleted => self.clear_completed(),
            Intent::SetFilter(mode) => {
                self.mode = mode;
                self.notify();
                Outcome::Refreshed
            }
            Intent::StartEdit(id) => self.start_edit(id),
            Intent::SaveEdit { draft, trigger } => self.save_edit(&draft, trigger),
            Intent::CancelEdit => {
                if self.edit.cancel() {
                    self.notify();
                    Outcome::Refreshed
                } else {
                    Outcome::Ignored(TaskError::NotEditing)
                }
            }
            Intent::DragBegin(id) => {
                if !self.tasks.contains(id) {
                    if self.drag.abort() {
                        tracing::debug!("previous drag ended without a move");
                    }
                    Outcome::Ignored(TaskError::NotFound(id))
                } else {
                    if self.drag.begin(id) {
                        tracing::debug!("previous drag ended without a move");
                    }
                    Outcome::Tracked
                }
            }
            Intent::DragHover {
                over,
                offset,
                extent,
            } => match self.drag.hover(over, offset, extent) {
                Some(_) => Outcome::Tracked,
                None => Outcome::Ignored(TaskError::NoDrag),
            },
            Intent::Drop(over) => self.drop_on(over),
            Intent::DragAbort => {
                if self.drag.abort() {
                    Outcome::Tracked
                } else {
                    Outcome::Ignored(TaskError::NoDrag)
                }
            }
        };
        if let Outcome::Ignored(reason) = &outcome {
            tracing::debug!(%reason, "intent ignored");
        }
        outcome
    }

    /// Commit any open edit, then persist one last time.
    pub fn shutdown(mut self) -> Result<(), StoreError> {
        if let Some(commit) = self.edit.save(SaveTrigger::Blur)
            && let Outcome::Unsaved(e) = self.apply_commit(commit)
        {
            return Err(e);
        }
        if !self.unsaved {
            return Ok(());
        }
        self.store.save(self.tasks.tasks())?;
        self.unsaved = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Intent handlers
    // -----------------------------------------------------------------------

    fn delete(&mut self, id: TaskId) -> Outcome {
        let outcome = self.mutate(|tasks| tasks.delete(id).map(drop));
        if outcome.is_mutation() && self.edit.forget(id) {
            tracing::debug!(%id, "edited task deleted, edit dropped");
        }
        outcome
    }

    fn clear_completed(&mut self) -> Outcome {
        let outcome = self.mutate(|tasks| match tasks.clear_completed() {
            0 => Err(TaskError::NoneCompleted),
            _ => Ok(()),
        });
        if let Some(id) = self.edit.target()
            && !self.tasks.contains(id)
        {
            self.edit.forget(id);
        }
        outcome
    }

    fn start_edit(&mut self, id: TaskId) -> Outcome {
        let Some(task) = self.tasks.get(id) else {
            return Outcome::Ignored(TaskError::NotFound(id));
        };
        if !self.mode.admits(task) {
            return Outcome::Ignored(TaskError::Hidden(id));
        }
        let text = task.text.clone();
        match self.edit.start(id, &text) {
            Some(prior) => match self.apply_commit(prior) {
                Outcome::Ignored(_) => Outcome::Tracked,
                outcome => outcome,
            },
            None => Outcome::Tracked,
        }
    }

    fn save_edit(&mut self, draft: &str, trigger: SaveTrigger) -> Outcome {
        self.edit.update_draft(draft);
        match self.edit.save(trigger) {
            Some(commit) => self.apply_commit(commit),
            None => Outcome::Ignored(TaskError::NotEditing),
        }
    }

    fn apply_commit(&mut self, commit: Commit) -> Outcome {
        self.mutate(|tasks| tasks.set_text(commit.id, &commit.draft).map(drop))
    }

    fn drop_on(&mut self, over: Option<TaskId>) -> Outcome {
        let Some(dragged) = self.drag.dragged() else {
            return Outcome::Ignored(TaskError::NoDrag);
        };
        match self.drag.end(over) {
            Some(request) => self.mutate(|tasks| {
                tasks.reorder(request.moved, request.target, request.place_after)
            }),
            None if over == Some(dragged) => Outcome::Ignored(TaskError::SameTask(dragged)),
            None => Outcome::Tracked,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Apply one collection operation. On success persist and notify, once
    /// each.
    fn mutate(
        &mut self,
        op: impl FnOnce(&mut TaskCollection) -> Result<(), TaskError>,
    ) -> Outcome {
        if let Err(reason) = op(&mut self.tasks) {
            return Outcome::Ignored(reason);
        }
        let saved = self.store.save(self.tasks.tasks());
        self.unsaved = saved.is_err();
        self.notify();
        match saved {
            Ok(()) => Outcome::Saved,
            Err(e) => {
                tracing::warn!(error = %e, "could not save tasks, keeping changes in memory");
                Outcome::Unsaved(e)
            }
        }
    }

    fn notify(&mut self) {
        let view = self.view();
        for subscriber in &mut self.subscribers {
            subscriber(&view);
        }
    }
}
