//! Task shapes and view filters.
//!
//! # Responsibility
//! - Hold the domain record plus its derived display helpers.
//! - Hold the persisted row and remote wire records.
//!
//! # Invariants
//! - `is_empty()` is a validity hint only; nothing rejects empty tasks.
//! - Remote status maps to the completion flag one-to-one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
///
/// Kept as a string so ids minted elsewhere (for example `PISA` from the
/// remote seed) round-trip unchanged.
pub type TaskId = String;

/// Domain task returned by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Task {
    /// Creates an active task with a freshly generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(new_task_id(), title, description)
    }

    /// Creates an active task with a caller-provided id.
    pub fn with_id(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Title shown in lists; falls back to the description when untitled.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// True when either title or description is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() || self.description.is_empty()
    }
}

/// Generates a random task id.
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Row stored in the local `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTask {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

/// Remote completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkTaskStatus {
    #[default]
    Active,
    Complete,
}

/// Record exchanged with the remote data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTask {
    pub id: TaskId,
    pub title: String,
    pub short_description: String,
    #[serde(default)]
    pub status: NetworkTaskStatus,
}

impl NetworkTask {
    /// Creates an active remote task.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        short_description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: short_description.into(),
            status: NetworkTaskStatus::Active,
        }
    }
}

/// View predicate over a task sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.is_active(),
            Self::Completed => task.is_completed,
        }
    }

    /// Keeps only the tasks matching this filter, preserving order.
    pub fn apply(self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|task| self.matches(task)).collect()
    }
}
