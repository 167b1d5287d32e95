//! Filter vocabulary and pagination arithmetic
//!
//! The store executes a [`TaskQuery`] (predicate + skip/limit); the service
//! derives it from the wire-level `filter`/`page` pair. Page counting is
//! `max(1, ceil(total / page_size))`, so an empty collection still reports
//! one page.

use chrono::offset::LocalResult;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::task::Task;

/// Which tasks a `list` call selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// No predicate.
    #[default]
    All,
    /// Tasks with `completed == false`.
    Incomplete,
    /// Tasks with `completed == true`.
    Complete,
    /// Tasks due within the current local calendar day, bounds inclusive.
    /// Tasks without a due date never match.
    Today,
}

impl TaskFilter {
    /// Get the wire-format name of this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Today => "today",
        }
    }

    /// Evaluate the predicate against a task. `today` is the calendar-day
    /// window the `Today` variant compares due dates against.
    pub fn matches(&self, task: &Task, today: &DayWindow) -> bool {
        match self {
            Self::All => true,
            Self::Incomplete => !task.completed,
            Self::Complete => task.completed,
            Self::Today => task.due_date.is_some_and(|due| today.contains(due)),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an unrecognized filter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilter {
    pub name: String,
}

impl fmt::Display for InvalidFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown filter '{}', expected all, incomplete, complete, or today",
            self.name
        )
    }
}

impl std::error::Error for InvalidFilter {}

impl FromStr for TaskFilter {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            "today" => Ok(Self::Today),
            other => Err(InvalidFilter {
                name: other.to_string(),
            }),
        }
    }
}

/// One calendar day expressed as an inclusive UTC interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The window for today's date in the server-local timezone.
    pub fn local_today() -> Self {
        Self::for_local_date(Local::now().date_naive())
    }

    /// The window for an arbitrary local calendar date, from midnight to
    /// 23:59:59.999 inclusive, converted to UTC.
    pub fn for_local_date(date: NaiveDate) -> Self {
        let start_naive = date.and_time(NaiveTime::MIN);
        let end_naive = date
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or(start_naive);
        Self {
            start: resolve_local(start_naive),
            end: resolve_local(end_naive),
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Resolve a naive local time to UTC. On a DST fold the earlier mapping
/// wins; inside a DST gap the naive time is read as UTC.
fn resolve_local(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

/// Position of one page within a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Fixed page size from service configuration.
    pub page_size: usize,
}

impl Pagination {
    /// Build a pagination marker. `page` is 1-based; callers validate
    /// positivity before constructing.
    pub fn new(page: u32, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Number of records to skip before this page starts.
    pub fn skip(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size)
    }

    /// Total page count for a result set: `ceil(total / page_size)`, but
    /// never less than one, even when `total == 0`.
    pub fn page_count(total: usize, page_size: usize) -> u32 {
        if page_size == 0 {
            return 1;
        }
        total.div_ceil(page_size).max(1) as u32
    }
}

/// A fully-resolved store query: predicate plus slice bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub skip: usize,
    pub limit: usize,
}

impl TaskQuery {
    /// Query for one page of a filtered listing.
    pub fn page(filter: TaskFilter, pagination: Pagination) -> Self {
        Self {
            filter,
            skip: pagination.skip(),
            limit: pagination.page_size,
        }
    }

    /// Query for the entire filtered set, in order.
    pub fn unbounded(filter: TaskFilter) -> Self {
        Self {
            filter,
            skip: 0,
            limit: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use rstest::rstest;

    fn task(completed: bool, due_date: Option<DateTime<Utc>>) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::generate(),
            title: "t".to_string(),
            completed,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("all", TaskFilter::All)]
    #[case("incomplete", TaskFilter::Incomplete)]
    #[case("complete", TaskFilter::Complete)]
    #[case("today", TaskFilter::Today)]
    fn test_filter_parse_round_trip(#[case] name: &str, #[case] filter: TaskFilter) {
        assert_eq!(name.parse::<TaskFilter>().unwrap(), filter);
        assert_eq!(filter.as_str(), name);
    }

    #[test]
    fn test_filter_parse_rejects_unknown_names() {
        let err = "overdue".parse::<TaskFilter>().unwrap_err();
        assert_eq!(err.name, "overdue");
    }

    #[test]
    fn test_completion_filters_partition_tasks() {
        let window = DayWindow::local_today();
        let done = task(true, None);
        let open = task(false, None);

        assert!(TaskFilter::Complete.matches(&done, &window));
        assert!(!TaskFilter::Complete.matches(&open, &window));
        assert!(TaskFilter::Incomplete.matches(&open, &window));
        assert!(!TaskFilter::Incomplete.matches(&done, &window));
        assert!(TaskFilter::All.matches(&done, &window));
        assert!(TaskFilter::All.matches(&open, &window));
    }

    #[test]
    fn test_today_filter_is_inclusive_and_skips_undated_tasks() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let window = DayWindow::for_local_date(date);

        assert!(TaskFilter::Today.matches(&task(false, Some(window.start)), &window));
        assert!(TaskFilter::Today.matches(&task(false, Some(window.end)), &window));
        assert!(!TaskFilter::Today.matches(
            &task(false, Some(window.end + chrono::Duration::milliseconds(1))),
            &window
        ));
        assert!(!TaskFilter::Today.matches(&task(false, None), &window));
    }

    #[test]
    fn test_day_window_spans_one_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let window = DayWindow::for_local_date(date);
        let span = window.end - window.start;

        assert_eq!(span, chrono::Duration::milliseconds(86_399_999));
    }

    #[rstest]
    #[case(0, 5, 1)]
    #[case(1, 5, 1)]
    #[case(5, 5, 1)]
    #[case(6, 5, 2)]
    #[case(10, 5, 2)]
    #[case(11, 5, 3)]
    fn test_page_count(#[case] total: usize, #[case] page_size: usize, #[case] pages: u32) {
        assert_eq!(Pagination::page_count(total, page_size), pages);
    }

    #[test]
    fn test_skip_is_zero_based_from_one_based_pages() {
        assert_eq!(Pagination::new(1, 5).skip(), 0);
        assert_eq!(Pagination::new(2, 5).skip(), 5);
        assert_eq!(Pagination::new(4, 5).skip(), 15);
    }

    #[test]
    fn test_query_page_carries_slice_bounds() {
        let query = TaskQuery::page(TaskFilter::Complete, Pagination::new(3, 5));
        assert_eq!(query.skip, 10);
        assert_eq!(query.limit, 5);
        assert_eq!(query.filter, TaskFilter::Complete);
    }
}
