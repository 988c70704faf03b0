use crate::model::task::TaskId;

/// What ended an edit with a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Explicit confirm (Enter)
    Confirm,
    /// The editor lost focus. Always saves, never discards.
    Blur,
}

/// A draft ready to be committed with `set_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: TaskId,
    pub draft: String,
}

/// In-progress text edit. At most one is live at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing { id: TaskId, draft: String },
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    /// Id of the task being edited
    pub fn target(&self) -> Option<TaskId> {
        match self {
            EditSession::Editing { id, .. } => Some(*id),
            EditSession::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// Open a session on `id` seeded with its current text.
    ///
    /// A session already open on another task is handed back as a commit so
    /// its typed text is saved rather than dropped. Restarting on the same
    /// task keeps the existing draft.
    pub fn start(&mut self, id: TaskId, current_text: &str) -> Option<Commit> {
        if self.target() == Some(id) {
            return None;
        }
        let prior = self.take_commit();
        *self = EditSession::Editing {
            id,
            draft: current_text.to_string(),
        };
        prior
    }

    /// Replace the draft text. Ignored while idle.
    pub fn update_draft(&mut self, text: &str) {
        if let EditSession::Editing { draft, .. } = self {
            *draft = text.to_string();
        }
    }

    /// Close the session, handing back the draft to commit.
    pub fn save(&mut self, trigger: SaveTrigger) -> Option<Commit> {
        let commit = self.take_commit()?;
        tracing::trace!(id = %commit.id, ?trigger, "edit saved");
        Some(commit)
    }

    /// Close the session and throw the draft away. Returns whether a
    /// session was open.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(self).is_editing()
    }

    /// The task was removed by another path: drop the session unsaved.
    /// Returns whether a session was dropped.
    pub fn forget(&mut self, id: TaskId) -> bool {
        if self.target() == Some(id) {
            *self = EditSession::Idle;
            return true;
        }
        false
    }

    fn take_commit(&mut self) -> Option<Commit> {
        match std::mem::take(self) {
            EditSession::Editing { id, draft } => Some(Commit { id, draft }),
            EditSession::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_seeds_draft_with_current_text() {
        let mut session = EditSession::default();
        assert_eq!(session.start(TaskId(2), "walk dog"), None);
        assert_eq!(session.target(), Some(TaskId(2)));
        assert_eq!(session.draft(), Some("walk dog"));
    }

    #[test]
    fn save_hands_back_draft_and_goes_idle() {
        let mut session = EditSession::default();
        session.start(TaskId(2), "walk dog");
        session.update_draft("walk the dog");
        assert_eq!(
            session.save(SaveTrigger::Confirm),
            Some(Commit {
                id: TaskId(2),
                draft: "walk the dog".into()
            })
        );
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn blur_saves_like_confirm() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        session.update_draft("b");
        let commit = session.save(SaveTrigger::Blur).unwrap();
        assert_eq!(commit.draft, "b");
    }

    #[test]
    fn cancel_discards_draft() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        session.update_draft("typed");
        assert!(session.cancel());
        assert_eq!(session, EditSession::Idle);
        assert!(!session.cancel());
    }

    #[test]
    fn save_after_cancel_is_noop() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        session.cancel();
        assert_eq!(session.save(SaveTrigger::Blur), None);
    }

    #[test]
    fn starting_another_edit_commits_the_prior_one() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        session.update_draft("a2");
        let prior = session.start(TaskId(2), "b");
        assert_eq!(
            prior,
            Some(Commit {
                id: TaskId(1),
                draft: "a2".into()
            })
        );
        assert_eq!(session.target(), Some(TaskId(2)));
        assert_eq!(session.draft(), Some("b"));
    }

    #[test]
    fn restarting_same_task_keeps_draft() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        session.update_draft("typed");
        assert_eq!(session.start(TaskId(1), "a"), None);
        assert_eq!(session.draft(), Some("typed"));
    }

    #[test]
    fn forget_only_drops_matching_session() {
        let mut session = EditSession::default();
        session.start(TaskId(1), "a");
        assert!(!session.forget(TaskId(2)));
        assert!(session.is_editing());
        assert!(session.forget(TaskId(1)));
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn update_draft_while_idle_is_ignored() {
        let mut session = EditSession::default();
        session.update_draft("x");
        assert_eq!(session, EditSession::Idle);
    }
}
