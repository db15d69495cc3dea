//! Change notification published after every display-state change.

use taskdeck_core::{CompletionStats, TaskRecord};

use crate::undo::UndoAffordance;

/// Snapshot of everything a UI needs after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListUpdate {
    /// Display-ordered, display-filtered task sequence.
    pub tasks: Vec<TaskRecord>,
    /// Completion counters over the canonical collection.
    pub completion: CompletionStats,
    /// Undo affordance to show, if any.
    pub undo: Option<UndoAffordance>,
}

/// Receiver for task list changes.
///
/// Observers run synchronously, in registration order, after every operation
/// that changes the display state, sort and filter changes included.
pub trait TaskListObserver {
    /// Called with the freshly recomputed display state.
    fn task_list_changed(&self, update: &TaskListUpdate);
}
