use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

use crate::id::TaskId;

/// Urgency bucket of a task. Ordering follows urgency (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// String representation used in configuration files and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Error returned when a priority label cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParsePriorityError(other.to_owned())),
        }
    }
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet.
    Pending,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// String representation used in configuration files and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

/// Error returned when a status label cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// A single task as held in memory and persisted by the store.
///
/// `sort_index` encodes the manual drag order. It is dense (0-based,
/// contiguous) right after a reorder; deletions may leave gaps that are only
/// closed by the next reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Immutable identifier, assigned at creation and never reused.
    pub id: TaskId,
    /// Human-readable title; never empty.
    pub title: String,
    /// Optional free-form details.
    pub description: Option<String>,
    /// Urgency bucket.
    pub priority: Priority,
    /// When the task is due.
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    /// Completion state.
    pub status: TaskStatus,
    /// Persisted manual-order rank.
    pub sort_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> TaskRecord {
        TaskRecord {
            id: TaskId::new(),
            title: "Water the plants".into(),
            description: Some("Kitchen and balcony".into()),
            priority: Priority::Medium,
            due_date: datetime!(2024-06-01 9:00 UTC),
            status: TaskStatus::Pending,
            sort_index: 3,
        }
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = sample();
        let value = serde_json::to_value(&record).expect("must serialize record");

        assert_eq!(value["id"], serde_json::json!(record.id.to_string()));
        assert_eq!(value["priority"], serde_json::json!("medium"));
        assert_eq!(value["status"], serde_json::json!("pending"));
        assert_eq!(value["dueDate"], serde_json::json!("2024-06-01T09:00:00Z"));
        assert_eq!(value["sortIndex"], serde_json::json!(3));
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = sample();
        let json = serde_json::to_string(&record).expect("must serialize record");
        let back: TaskRecord = serde_json::from_str(&json).expect("must deserialize record");
        assert_eq!(back, record);
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn priority_labels_roundtrip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(priority.as_str().parse::<Priority>(), Ok(priority));
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn status_labels_roundtrip() {
        for status in [TaskStatus::Pending, TaskStatus::Completed] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }
}
