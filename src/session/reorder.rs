use crate::model::task::TaskId;

/// Last hover position reported for the drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHint {
    pub over: TaskId,
    pub place_after: bool,
}

/// A reorder the drop resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    pub moved: TaskId,
    pub target: TaskId,
    pub place_after: bool,
}

/// Drag-to-reorder interaction: begin, any number of hovers, then drop or
/// abort. Holds advisory state only; the collection is touched once, by the
/// caller, with the request `end` returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReorderGesture {
    dragged: Option<TaskId>,
    hint: Option<HoverHint>,
}

impl ReorderGesture {
    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<TaskId> {
        self.dragged
    }

    /// Insertion-point hint for the visual indicator
    pub fn hint(&self) -> Option<HoverHint> {
        self.hint
    }

    /// Pick up `id`. A drag already in progress is ended without a move;
    /// returns whether that happened.
    pub fn begin(&mut self, id: TaskId) -> bool {
        let replaced = self.abort();
        self.dragged = Some(id);
        replaced
    }

    /// Record the pointer over `over`, `offset` units from the item's top
    /// edge out of `extent`. The lower half means "after".
    pub fn hover(&mut self, over: TaskId, offset: f64, extent: f64) -> Option<HoverHint> {
        self.dragged?;
        let hint = HoverHint {
            over,
            place_after: offset > extent / 2.0,
        };
        self.hint = Some(hint);
        Some(hint)
    }

    /// Release over `over`. Gesture state is always cleared.
    pub fn end(&mut self, over: Option<TaskId>) -> Option<ReorderRequest> {
        let dragged = self.dragged.take();
        let hint = self.hint.take();
        let (moved, target) = (dragged?, over?);
        if moved == target {
            return None;
        }
        let place_after = hint.is_some_and(|h| h.over == target && h.place_after);
        Some(ReorderRequest {
            moved,
            target,
            place_after,
        })
    }

    /// Cancel the drag. Returns whether one was in progress.
    pub fn abort(&mut self) -> bool {
        self.hint = None;
        self.dragged.take().is_some()
    }
}
