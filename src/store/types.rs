//! Wire types for the hosted task table.
//!
//! [`Task`] mirrors the remote row shape exactly; the server assigns `id`
//! and `created_at` and they are never sent on insert. [`TaskDraft`] is the
//! client-side insert payload.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Task priority. Absent on a task means "no priority".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// The wire/display label for this priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// All priorities in ascending order, for cycling through form choices.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the remote task table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned, unique, immutable.
    pub id: TaskId,
    /// Server-assigned, immutable; the sole sort key (descending).
    pub created_at: DateTime<Utc>,
    /// Never empty in stored state.
    pub title: String,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Completion flag, defaults false.
    #[serde(default)]
    pub is_complete: bool,
    /// Owner identifier, set at creation, never changed.
    pub user_id: String,
    /// Optional calendar date, no time component.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Optional priority.
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Client-side payload for creating a task.
///
/// `normalized()` applies the validation rules: the title is trimmed and an
/// empty description becomes absent. A draft whose normalized title is empty
/// must never reach the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    /// Desired title; validated non-empty after trimming.
    pub title: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Optional calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Optional priority.
    pub priority: Option<Priority>,
}

impl TaskDraft {
    /// Create a draft with the given title and no optional fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Trim the title and collapse an empty or whitespace-only description
    /// to absent.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_owned();
        self.description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        self
    }

    /// Whether the (already normalized) title is non-empty.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}
