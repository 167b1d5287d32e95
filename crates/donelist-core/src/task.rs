//! Task record and its creation/update inputs
//!
//! The wire shape uses camelCase field names with ISO-8601 date strings,
//! matching the REST interface. `due_date` is optional; `None` means the
//! task has no due date and is excluded from the `today` filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::id::TaskId;

/// A single to-do item, the sole entity of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the store on creation.
    #[schema(value_type = String)]
    pub id: TaskId,
    /// Task text. Non-empty at creation; updates are not re-validated.
    #[schema(example = "Buy milk")]
    pub title: String,
    /// Completion flag, toggled independently of other fields.
    pub completed: bool,
    /// Optional due timestamp; `null` means "no due date".
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp, immutable, used as a tie-break sort key.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation, maintained by the store.
    pub updated_at: DateTime<Utc>,
}

/// Error returned when a task is created with a blank title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTitle;

impl fmt::Display for InvalidTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task title cannot be empty")
    }
}

impl std::error::Error for InvalidTitle {}

/// Validated input for creating a task.
///
/// `completed` is always initialized to `false` by the store, regardless of
/// any value a caller might have supplied on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Create a new task draft. The title must contain at least one
    /// non-whitespace character; it is stored as given.
    pub fn new(
        title: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, InvalidTitle> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(InvalidTitle);
        }
        Ok(Self { title, due_date })
    }
}

/// Partial update of a task.
///
/// Fields left as `None` are not touched. `due_date` distinguishes an
/// absent field (keep the current value) from an explicit `null` (clear
/// the due date) via the nested `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_due_date_patch",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Maps a present-but-null `dueDate` to `Some(None)` while serde's
/// `default` keeps an absent field at `None`.
fn deserialize_due_date_patch<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// Patch that only sets the completion flag.
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Patch that replaces the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Patch that sets or clears the due date.
    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// True when no field is set; applying such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.due_date.is_none()
    }

    /// Apply this patch to a task, returning the updated record.
    ///
    /// Titles are not re-validated here: an empty replacement title is
    /// applied as-is. That leniency is part of the update contract.
    pub fn apply(&self, task: &Task, now: DateTime<Utc>) -> Task {
        Task {
            id: task.id.clone(),
            title: self.title.clone().unwrap_or_else(|| task.title.clone()),
            completed: self.completed.unwrap_or(task.completed),
            due_date: match self.due_date {
                Some(value) => value,
                None => task.due_date,
            },
            created_at: task.created_at,
            updated_at: now,
        }
    }
}
