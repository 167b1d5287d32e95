//! Result-set ordering shared by all backends
//!
//! Ascending by due date with undated tasks sorted last, then descending
//! by creation time as tie-break. The SQLite backend expresses the same
//! contract in SQL (`ORDER BY (due_date IS NULL), due_date, created_at
//! DESC`); this function is the in-memory equivalent and the reference
//! for tests.

use donelist_core::Task;
use std::cmp::Ordering;

/// Compare two tasks according to the listing order.
pub fn by_due_then_newest(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(left), Some(right)) => left
            .cmp(&right)
            .then_with(|| b.created_at.cmp(&a.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}
