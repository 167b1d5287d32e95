//! Pure view-state renderer
//!
//! `render` maps a [`ViewState`] to the terminal text shown after every
//! action. It reads the state and nothing else, so snapshots of the
//! state fully determine the output.

use crate::session::{Phase, ViewState};
use chrono::{DateTime, Local, Utc};

fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%b %e %H:%M").to_string()
}

/// Render the task list view as terminal text.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Tasks | filter: {}, page {}/{} ({} total)\n",
        state.filter, state.page, state.pages, state.total
    ));

    match state.phase {
        Phase::Idle | Phase::Loading => out.push_str("  Loading...\n"),
        Phase::Empty => out.push_str("  No tasks found for selected filter.\n"),
        Phase::Loaded => {
            for (index, task) in state.tasks.iter().enumerate() {
                let marker = if task.completed { "x" } else { " " };
                let due = task
                    .due_date
                    .map(|d| format!("  (due {})", format_due(d)))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  [{}] {}. {}{}\n",
                    marker,
                    index + 1,
                    task.title,
                    due
                ));
            }
        }
    }

    if let Some(draft) = &state.edit {
        let due = draft
            .due_date
            .map(format_due)
            .unwrap_or_else(|| "none".to_string());
        out.push_str(&format!(
            "Editing '{}': title \"{}\", due {} (title/due to change, save or cancel)\n",
            draft.task_id, draft.title, due
        ));
    }

    if let Some(notice) = &state.notice {
        out.push_str(&format!("! {}\n", notice));
    }

    out
}
