//! Client view-state machine
//!
//! The whole view is one serializable [`ViewState`] passed to a pure
//! renderer; there is no ambient shared state. Transitions implement the
//! client contract:
//!
//! - a filter or page change enters `Loading` and triggers a `list()`
//!   fetch; the response replaces the entire task collection,
//! - changing filter resets the page to 1,
//! - every mutation is followed by an unconditional refetch (driven by
//!   the REPL; the machine only hands out fetch tickets),
//! - inline edit is modal per task with a local draft committed only on
//!   explicit save,
//! - each fetch carries a monotonic sequence number and stale responses
//!   are discarded instead of overwriting newer state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use donelist_core::{Task, TaskFilter, TaskId};
use donelist_http::TaskListResponse;

/// Loading phase of the task list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing fetched yet.
    Idle,
    /// A `list()` call is in flight.
    Loading,
    /// The last fetch returned at least one task.
    Loaded,
    /// The last fetch returned no tasks.
    Empty,
}

/// Local draft for the one task currently in edit mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditDraft {
    pub task_id: TaskId,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// The complete, serializable view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub filter: TaskFilter,
    pub page: u32,
    pub pages: u32,
    pub total: usize,
    pub tasks: Vec<Task>,
    pub phase: Phase,
    pub edit: Option<EditDraft>,
    pub notice: Option<String>,
}

/// Identifies one issued `list()` fetch. Responses are only applied when
/// their ticket is still the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filter: TaskFilter,
    pub page: u32,
}

/// State machine driving the client view.
pub struct Session {
    state: ViewState,
    next_seq: u64,
    latest_seq: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session: filter `all`, page 1, nothing fetched.
    pub fn new() -> Self {
        Self {
            state: ViewState {
                filter: TaskFilter::All,
                page: 1,
                pages: 1,
                total: 0,
                tasks: Vec::new(),
                phase: Phase::Idle,
                edit: None,
                notice: None,
            },
            next_seq: 0,
            latest_seq: 0,
        }
    }

    /// Read access for rendering.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn issue_fetch(&mut self) -> FetchTicket {
        self.next_seq += 1;
        self.latest_seq = self.next_seq;
        self.state.phase = Phase::Loading;
        self.state.notice = None;
        FetchTicket {
            seq: self.next_seq,
            filter: self.state.filter,
            page: self.state.page,
        }
    }

    /// Switch filters. Resets the page to 1 and starts a fetch.
    pub fn set_filter(&mut self, filter: TaskFilter) -> FetchTicket {
        self.state.filter = filter;
        self.state.page = 1;
        self.issue_fetch()
    }

    /// Jump to an arbitrary page (floored at 1) and start a fetch.
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.state.page = page.max(1);
        self.issue_fetch()
    }

    /// Advance one page unless already on the last one.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.state.page >= self.state.pages {
            return None;
        }
        self.state.page += 1;
        Some(self.issue_fetch())
    }

    /// Go back one page unless already on the first.
    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if self.state.page <= 1 {
            return None;
        }
        self.state.page -= 1;
        Some(self.issue_fetch())
    }

    /// Re-fetch the current filter/page; used after every mutation to
    /// resynchronize with the server instead of patching locally.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue_fetch()
    }

    /// Apply a `list()` response. Returns false (and changes nothing)
    /// when a newer fetch was issued after this ticket.
    pub fn apply_listing(&mut self, ticket: FetchTicket, listing: TaskListResponse) -> bool {
        if ticket.seq < self.latest_seq {
            tracing::debug!(
                stale_seq = ticket.seq,
                latest_seq = self.latest_seq,
                "Discarding stale list response"
            );
            return false;
        }

        self.state.phase = if listing.tasks.is_empty() {
            Phase::Empty
        } else {
            Phase::Loaded
        };
        self.state.tasks = listing.tasks;
        self.state.total = listing.total;
        self.state.pages = listing.pages.max(1);
        self.state.page = ticket.page;
        true
    }

    /// Record a failed fetch. The previous task collection stays as-is;
    /// the failure is surfaced as a notice line only.
    pub fn apply_fetch_error(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if ticket.seq < self.latest_seq {
            return false;
        }
        self.state.phase = if self.state.tasks.is_empty() {
            Phase::Empty
        } else {
            Phase::Loaded
        };
        self.state.notice = Some(message.into());
        true
    }

    /// Set a notice line shown by the renderer.
    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.state.notice = Some(message.into());
    }

    /// Enter edit mode for a task on the current page, seeding the draft
    /// from its current values. Entering edit on another task replaces
    /// any existing draft.
    pub fn begin_edit(&mut self, task_id: &TaskId) -> bool {
        let Some(task) = self.state.tasks.iter().find(|t| &t.id == task_id) else {
            return false;
        };
        self.state.edit = Some(EditDraft {
            task_id: task.id.clone(),
            title: task.title.clone(),
            due_date: task.due_date,
        });
        true
    }

    /// Update the draft title. No-op outside edit mode.
    pub fn edit_title(&mut self, title: impl Into<String>) -> bool {
        match self.state.edit.as_mut() {
            Some(draft) => {
                draft.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Update or clear the draft due date. No-op outside edit mode.
    pub fn edit_due_date(&mut self, due_date: Option<DateTime<Utc>>) -> bool {
        match self.state.edit.as_mut() {
            Some(draft) => {
                draft.due_date = due_date;
                true
            }
            None => false,
        }
    }

    /// Exit edit mode handing back the draft for an explicit save.
    pub fn take_edit(&mut self) -> Option<EditDraft> {
        self.state.edit.take()
    }

    /// Exit edit mode discarding the draft (the outside-click dismissal
    /// of the original UI).
    pub fn dismiss_edit(&mut self) {
        self.state.edit = None;
    }

    /// Whether a task is currently being edited.
    pub fn is_editing(&self) -> bool {
        self.state.edit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing(titles: &[&str], total: usize, pages: u32) -> TaskListResponse {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        TaskListResponse {
            tasks: titles
                .iter()
                .map(|title| Task {
                    id: TaskId::generate(),
                    title: title.to_string(),
                    completed: false,
                    due_date: None,
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
            total,
            page: 1,
            pages,
        }
    }

    #[test]
    fn test_filter_change_resets_page_and_enters_loading() {
        let mut session = Session::new();
        session.set_page(3);

        let ticket = session.set_filter(TaskFilter::Complete);

        assert_eq!(session.state().page, 1);
        assert_eq!(session.state().filter, TaskFilter::Complete);
        assert_eq!(session.state().phase, Phase::Loading);
        assert_eq!(ticket.page, 1);
        assert_eq!(ticket.filter, TaskFilter::Complete);
    }

    #[test]
    fn test_listing_replaces_collection_and_sets_phase() {
        let mut session = Session::new();
        let ticket = session.refresh();

        assert!(session.apply_listing(ticket, listing(&["a", "b"], 2, 1)));
        assert_eq!(session.state().phase, Phase::Loaded);
        assert_eq!(session.state().tasks.len(), 2);
        assert_eq!(session.state().total, 2);

        let ticket = session.refresh();
        assert!(session.apply_listing(ticket, listing(&[], 0, 1)));
        assert_eq!(session.state().phase, Phase::Empty);
        assert!(session.state().tasks.is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = Session::new();

        let old_ticket = session.set_filter(TaskFilter::All);
        let new_ticket = session.set_filter(TaskFilter::Complete);

        // The newer response lands first.
        assert!(session.apply_listing(new_ticket, listing(&["done"], 1, 1)));
        // The older one must not overwrite it.
        assert!(!session.apply_listing(old_ticket, listing(&["a", "b", "c"], 3, 1)));

        assert_eq!(session.state().tasks.len(), 1);
        assert_eq!(session.state().tasks[0].title, "done");
    }

    #[test]
    fn test_stale_fetch_error_is_discarded() {
        let mut session = Session::new();

        let old_ticket = session.refresh();
        let new_ticket = session.refresh();

        assert!(session.apply_listing(new_ticket, listing(&["a"], 1, 1)));
        assert!(!session.apply_fetch_error(old_ticket, "timed out"));
        assert_eq!(session.state().notice, None);
    }

    #[test]
    fn test_fetch_error_keeps_tasks_and_sets_notice() {
        let mut session = Session::new();
        let ticket = session.refresh();
        assert!(session.apply_listing(ticket, listing(&["keep me"], 1, 1)));

        let ticket = session.refresh();
        assert!(session.apply_fetch_error(ticket, "server unreachable"));

        assert_eq!(session.state().tasks.len(), 1);
        assert_eq!(session.state().phase, Phase::Loaded);
        assert_eq!(
            session.state().notice.as_deref(),
            Some("server unreachable")
        );
    }

    #[test]
    fn test_page_navigation_clamps_to_bounds() {
        let mut session = Session::new();
        let ticket = session.refresh();
        session.apply_listing(
            ticket,
            TaskListResponse {
                tasks: Vec::new(),
                total: 12,
                page: 1,
                pages: 3,
            },
        );

        assert!(session.prev_page().is_none());
        assert!(session.next_page().is_some());
        assert_eq!(session.state().page, 2);
        assert!(session.next_page().is_some());
        assert!(session.next_page().is_none());
        assert_eq!(session.state().page, 3);
    }

    #[test]
    fn test_edit_mode_is_modal_per_task() {
        let mut session = Session::new();
        let ticket = session.refresh();
        session.apply_listing(ticket, listing(&["first", "second"], 2, 1));

        let first = session.state().tasks[0].id.clone();
        let second = session.state().tasks[1].id.clone();

        assert!(session.begin_edit(&first));
        assert!(session.edit_title("renamed"));

        // Entering edit on another task replaces the draft.
        assert!(session.begin_edit(&second));
        let draft = session.state().edit.as_ref().unwrap();
        assert_eq!(draft.task_id, second);
        assert_eq!(draft.title, "second");
    }

    #[test]
    fn test_edit_draft_commits_only_on_save() {
        let mut session = Session::new();
        let ticket = session.refresh();
        session.apply_listing(ticket, listing(&["task"], 1, 1));
        let id = session.state().tasks[0].id.clone();

        session.begin_edit(&id);
        session.edit_title("new title");
        let due = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        session.edit_due_date(Some(due));

        // The collection itself is untouched while drafting.
        assert_eq!(session.state().tasks[0].title, "task");

        let draft = session.take_edit().unwrap();
        assert_eq!(draft.title, "new title");
        assert_eq!(draft.due_date, Some(due));
        assert!(!session.is_editing());
    }

    #[test]
    fn test_dismiss_discards_draft() {
        let mut session = Session::new();
        let ticket = session.refresh();
        session.apply_listing(ticket, listing(&["task"], 1, 1));
        let id = session.state().tasks[0].id.clone();

        session.begin_edit(&id);
        session.edit_title("abandoned");
        session.dismiss_edit();

        assert!(!session.is_editing());
        assert!(session.take_edit().is_none());
    }

    #[test]
    fn test_begin_edit_unknown_task_is_rejected() {
        let mut session = Session::new();
        assert!(!session.begin_edit(&TaskId::generate()));
        assert!(!session.edit_title("nope"));
        assert!(!session.edit_due_date(None));
    }

    #[test]
    fn test_view_state_is_serializable() {
        let session = Session::new();
        let json = serde_json::to_value(session.state()).unwrap();
        assert_eq!(json["filter"], "all");
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["page"], 1);
    }
}
