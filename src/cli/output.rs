use std::borrow::Cow;

use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::task::{Task, ViewMode};
use crate::ops::filter::FilterView;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CountJson {
    pub remaining: usize,
    pub total: usize,
    pub label: String,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Shorten `text` to at most `max` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: usize) -> Cow<'_, str> {
    if text.width() <= max {
        return Cow::Borrowed(text);
    }
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    Cow::Owned(out)
}

/// One list line: `[x] 12 text`, with the id padded to `id_width`.
pub fn format_task_line(task: &Task, id_width: usize, max_width: usize) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!(
        "[{}] {:<w$} {}",
        mark,
        task.id.to_string(),
        truncate_to_width(&task.text, max_width),
        w = id_width
    )
}

fn empty_message(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::All => "No tasks",
        ViewMode::Active => "No active tasks",
        ViewMode::Completed => "No completed tasks",
    }
}

/// The whole listing for a view, footer included. No trailing newline.
pub fn render_view(view: &FilterView, max_width: usize) -> String {
    let mut lines = Vec::with_capacity(view.tasks.len() + 1);
    if view.tasks.is_empty() {
        lines.push(empty_message(view.mode).to_string());
    } else {
        let id_width = view
            .tasks
            .iter()
            .map(|t| t.id.to_string().len())
            .max()
            .unwrap_or(1);
        for task in &view.tasks {
            lines.push(format_task_line(task, id_width, max_width));
        }
    }
    lines.push(view.remaining_label());
    lines.join("\n")
}
