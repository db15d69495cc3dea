//! Domain types & projection logic for taskdeck tasks.

/// Identifier types.
pub mod id;
/// Task record and field enums.
pub mod task;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use crate::id::TaskId;
pub use crate::task::{
    ParsePriorityError, ParseStatusError, Priority, TaskRecord, TaskStatus,
};

/// Display ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// Most urgent first.
    ByPriority,
    /// Earliest due date first.
    ByDueDate,
    /// Case-insensitive title order.
    ByAlphabetical,
}

impl SortOption {
    /// String representation used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByPriority => "priority",
            Self::ByDueDate => "due",
            Self::ByAlphabetical => "alpha",
        }
    }
}

/// Error returned when a sort label cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort option: {0}")]
pub struct ParseSortOptionError(String);

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(Self::ByPriority),
            "due" => Ok(Self::ByDueDate),
            "alpha" => Ok(Self::ByAlphabetical),
            other => Err(ParseSortOptionError(other.to_owned())),
        }
    }
}

/// Derive the display sequence from the canonical collection.
///
/// Filters first (everything passes when `filter` is `None`), then applies a
/// stable sort, so records that compare equal keep their canonical order and
/// identical inputs always produce identical output.
#[must_use]
pub fn project(
    tasks: &[TaskRecord],
    filter: Option<TaskStatus>,
    sort: SortOption,
) -> Vec<TaskRecord> {
    let mut view: Vec<TaskRecord> = tasks
        .iter()
        .filter(|task| filter.is_none_or(|status| task.status == status))
        .cloned()
        .collect();

    match sort {
        SortOption::ByPriority => view.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortOption::ByDueDate => view.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
        SortOption::ByAlphabetical => {
            view.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
    }

    view
}

/// Completion counters over the canonical collection (never the filtered view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionStats {
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks overall.
    pub total: usize,
}

impl CompletionStats {
    /// Count completion over the given collection.
    #[must_use]
    pub fn of(tasks: &[TaskRecord]) -> Self {
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        Self {
            completed,
            total: tasks.len(),
        }
    }

    /// Share of completed tasks in percent; 0 for an empty collection.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn percentage(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.completed as f64 / self.total as f64
    }
}
