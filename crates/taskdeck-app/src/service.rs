//! Task list state engine: canonical state, persistence coordination, undo.
//!
//! [`TaskListService`] owns the canonical task collection. Every mutation
//! talks to the store first and commits the in-memory change only after the
//! store call succeeded, so a persistence failure leaves the collection, the
//! projection, and the undo slots exactly as they were. All mutating
//! operations take `&mut self`; callers that share a service serialize
//! access themselves.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Error;
use taskdeck_core::{
    CompletionStats, Priority, SortOption, TaskId, TaskRecord, TaskStatus, project,
};
use time::{Duration, OffsetDateTime};

use crate::observer::{TaskListObserver, TaskListUpdate};
use crate::store::TaskStore;
use crate::undo::{
    DELETE_UNDO_WINDOW, TOGGLE_UNDO_WINDOW, UndoAffordance, UndoKind, UndoSlot,
};

/// Fields required to create a task.
///
/// The id, rank, and pending status are assigned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    /// Title of the new task; must not be empty.
    pub title: String,
    /// Optional free-form details.
    pub description: Option<String>,
    /// Urgency bucket.
    pub priority: Priority,
    /// When the task is due.
    pub due_date: OffsetDateTime,
}

/// Requested change to a task's description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DescriptionPatch {
    /// Leave the description as it is.
    #[default]
    Keep,
    /// Replace the description.
    Set(String),
    /// Remove the description.
    Clear,
}

/// Partial update applied by [`TaskListService::edit_task`].
///
/// Absent fields keep their current value. The id, status, and rank of a
/// task cannot be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title, if any; must not be empty.
    pub title: Option<String>,
    /// Description change, if any.
    pub description: DescriptionPatch,
    /// New priority, if any.
    pub priority: Option<Priority>,
    /// New due date, if any.
    pub due_date: Option<OffsetDateTime>,
}

/// Errors surfaced by [`TaskListService`].
#[derive(thiserror::Error, Debug)]
pub enum TaskListError {
    /// A task title was empty on create or edit.
    #[error("task title must not be empty")]
    EmptyTitle,
    /// Target task could not be found in the canonical collection.
    #[error("task {0} not found")]
    MissingTask(TaskId),
    /// A reorder sequence did not cover the displayed tasks exactly once.
    #[error("reorder sequence must be a permutation of the displayed tasks")]
    NotPermutation,
    /// Backing store returned an error.
    #[error("store error: {0}")]
    Store(#[from] Error),
}

/// The task list state engine.
///
/// Holds the canonical collection, the current sort/filter projection, and
/// one undo slot per reversible action kind (delete, status toggle).
pub struct TaskListService<S> {
    store: S,
    tasks: Vec<TaskRecord>,
    visible: Vec<TaskRecord>,
    sort: SortOption,
    filter: Option<TaskStatus>,
    delete_slot: Option<UndoSlot>,
    toggle_slot: Option<UndoSlot>,
    last_armed: Option<UndoKind>,
    delete_window: Duration,
    toggle_window: Duration,
    observers: Vec<Arc<dyn TaskListObserver>>,
}

impl<S> TaskListService<S> {
    /// Create an engine over `store` with an empty canonical collection.
    ///
    /// Defaults: alphabetical sort, no status filter, 5 s delete-undo and
    /// 2 s toggle-undo visibility windows. Call [`Self::load`] to pull the
    /// persisted tasks in.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            visible: Vec::new(),
            sort: SortOption::ByAlphabetical,
            filter: None,
            delete_slot: None,
            toggle_slot: None,
            last_armed: None,
            delete_window: DELETE_UNDO_WINDOW,
            toggle_window: TOGGLE_UNDO_WINDOW,
            observers: Vec::new(),
        }
    }

    /// Override the undo visibility windows.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_undo_windows(mut self, delete: Duration, toggle: Duration) -> Self {
        self.delete_window = delete;
        self.toggle_window = toggle;
        self
    }

    /// The canonical collection, in persisted-rank order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// The current display sequence (filtered, then sorted).
    #[must_use]
    pub fn visible_tasks(&self) -> &[TaskRecord] {
        &self.visible
    }

    /// The active sort option.
    #[must_use]
    pub const fn sort_option(&self) -> SortOption {
        self.sort
    }

    /// The active status filter, if any.
    #[must_use]
    pub const fn filter_status(&self) -> Option<TaskStatus> {
        self.filter
    }

    /// Completion counters over the canonical collection.
    #[must_use]
    pub fn completion_stats(&self) -> CompletionStats {
        CompletionStats::of(&self.tasks)
    }

    /// Share of completed tasks in percent, computed over the canonical
    /// collection regardless of the active filter.
    #[must_use]
    pub fn completion_percentage(&self) -> f64 {
        self.completion_stats().percentage()
    }

    /// Register an observer; it will be invoked synchronously after every
    /// display-state change, in registration order.
    pub fn add_observer(&mut self, observer: Arc<dyn TaskListObserver>) {
        self.observers.push(observer);
    }

    /// The undo affordance to show right now, if any.
    #[must_use]
    pub fn undo_affordance(&self) -> Option<UndoAffordance> {
        self.undo_affordance_at(OffsetDateTime::now_utc())
    }

    /// The undo affordance that would be shown at `now`.
    ///
    /// When both slots are inside their windows the most recently armed one
    /// wins; there is only ever one affordance on screen.
    #[must_use]
    pub fn undo_affordance_at(&self, now: OffsetDateTime) -> Option<UndoAffordance> {
        let ordered = match self.last_armed {
            Some(UndoKind::Toggle) => [UndoKind::Toggle, UndoKind::Delete],
            _ => [UndoKind::Delete, UndoKind::Toggle],
        };
        ordered.into_iter().find_map(|kind| {
            let slot = self.slot(kind)?;
            slot.visible_at(now).then(|| UndoAffordance {
                kind,
                message: kind.message(),
                remaining: slot.remaining_at(now),
            })
        })
    }

    /// Change the sort option and recompute the projection. No store call.
    pub fn set_sort_option(&mut self, sort: SortOption) {
        self.sort = sort;
        self.publish();
    }

    /// Change the status filter and recompute the projection. No store call.
    pub fn set_filter_status(&mut self, filter: Option<TaskStatus>) {
        self.filter = filter;
        self.publish();
    }

    const fn slot(&self, kind: UndoKind) -> Option<&UndoSlot> {
        match kind {
            UndoKind::Delete => self.delete_slot.as_ref(),
            UndoKind::Toggle => self.toggle_slot.as_ref(),
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn next_sort_index(&self) -> u32 {
        u32::try_from(self.tasks.len()).unwrap_or(u32::MAX)
    }

    /// Recompute the projection and notify observers.
    fn publish(&mut self) {
        self.visible = project(&self.tasks, self.filter, self.sort);
        if self.observers.is_empty() {
            return;
        }
        let update = TaskListUpdate {
            tasks: self.visible.clone(),
            completion: self.completion_stats(),
            undo: self.undo_affordance(),
        };
        for observer in &self.observers {
            observer.task_list_changed(&update);
        }
    }
}

impl<S: TaskStore> TaskListService<S> {
    fn store_error(err: S::Error) -> TaskListError {
        TaskListError::Store(err.into())
    }

    /// Replace the canonical collection with the store's contents.
    ///
    /// # Errors
    /// Returns [`TaskListError::Store`] when the fetch fails; the canonical
    /// collection is left empty in that case, never half-populated.
    pub fn load(&mut self) -> Result<(), TaskListError> {
        match self.store.fetch_tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.tasks.clear();
                self.publish();
                Err(Self::store_error(err))
            }
        }
    }

    /// Create a task at the end of the manual order.
    ///
    /// # Errors
    /// Returns [`TaskListError::EmptyTitle`] before any store call when the
    /// title is empty, or [`TaskListError::Store`] when persisting fails.
    pub fn add_task(&mut self, input: CreateTaskInput) -> Result<TaskRecord, TaskListError> {
        let CreateTaskInput {
            title,
            description,
            priority,
            due_date,
        } = input;
        if title.is_empty() {
            return Err(TaskListError::EmptyTitle);
        }

        let record = TaskRecord {
            id: TaskId::new(),
            title,
            description,
            priority,
            due_date,
            status: TaskStatus::Pending,
            sort_index: self.next_sort_index(),
        };
        self.store.save_task(&record).map_err(Self::store_error)?;
        self.tasks.push(record.clone());
        self.publish();
        Ok(record)
    }

    /// Apply a partial edit to a task.
    ///
    /// # Errors
    /// Returns [`TaskListError::MissingTask`] for an unknown id,
    /// [`TaskListError::EmptyTitle`] when the patch sets an empty title, or
    /// [`TaskListError::Store`] when persisting fails.
    pub fn edit_task(&mut self, id: TaskId, edit: TaskEdit) -> Result<TaskRecord, TaskListError> {
        let index = self.position(id).ok_or(TaskListError::MissingTask(id))?;
        if edit.title.as_deref().is_some_and(str::is_empty) {
            return Err(TaskListError::EmptyTitle);
        }

        let mut updated = self.tasks[index].clone();
        if let Some(title) = edit.title {
            updated.title = title;
        }
        match edit.description {
            DescriptionPatch::Keep => {}
            DescriptionPatch::Set(description) => updated.description = Some(description),
            DescriptionPatch::Clear => updated.description = None,
        }
        if let Some(priority) = edit.priority {
            updated.priority = priority;
        }
        if let Some(due_date) = edit.due_date {
            updated.due_date = due_date;
        }

        self.store.update_task(&updated).map_err(Self::store_error)?;
        self.tasks[index] = updated.clone();
        self.publish();
        Ok(updated)
    }

    /// Delete a task, keeping a snapshot so the deletion can be undone.
    ///
    /// # Errors
    /// Returns [`TaskListError::MissingTask`] for an unknown id, or
    /// [`TaskListError::Store`] when the store delete fails; the record
    /// then stays in the canonical collection and no undo slot is armed.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), TaskListError> {
        let index = self.position(id).ok_or(TaskListError::MissingTask(id))?;
        self.store.delete_task(id).map_err(Self::store_error)?;

        let removed = self.tasks.remove(index);
        self.delete_slot = Some(UndoSlot::arm(
            removed,
            OffsetDateTime::now_utc(),
            self.delete_window,
        ));
        self.last_armed = Some(UndoKind::Delete);
        self.publish();
        Ok(())
    }

    /// Re-create the most recently deleted task.
    ///
    /// A no-op returning `Ok(None)` when nothing is buffered. The slot is
    /// honored even after its visibility window lapsed; only a newer delete
    /// or a successful undo clears it.
    ///
    /// # Errors
    /// Returns [`TaskListError::Store`] when re-saving fails; the slot is
    /// kept so the undo can be retried.
    pub fn undo_delete(&mut self) -> Result<Option<TaskRecord>, TaskListError> {
        let Some(slot) = &self.delete_slot else {
            return Ok(None);
        };
        let record = slot.snapshot().clone();
        self.store.save_task(&record).map_err(Self::store_error)?;

        self.delete_slot = None;
        self.tasks.push(record.clone());
        // Fetch order is rank order, so the restored record slots back in by
        // its old rank rather than appearing at the end.
        self.tasks.sort_by(|a, b| a.sort_index.cmp(&b.sort_index));
        self.publish();
        Ok(Some(record))
    }

    /// Flip a task between pending and completed.
    ///
    /// # Errors
    /// Returns [`TaskListError::MissingTask`] for an unknown id, or
    /// [`TaskListError::Store`] when persisting fails; the status then
    /// stays as it was and no undo slot is armed.
    pub fn toggle_status(&mut self, id: TaskId) -> Result<TaskStatus, TaskListError> {
        let index = self.position(id).ok_or(TaskListError::MissingTask(id))?;
        let before = self.tasks[index].clone();
        let mut updated = before.clone();
        updated.status = before.status.toggled();
        self.store.update_task(&updated).map_err(Self::store_error)?;

        let status = updated.status;
        self.tasks[index] = updated;
        self.toggle_slot = Some(UndoSlot::arm(
            before,
            OffsetDateTime::now_utc(),
            self.toggle_window,
        ));
        self.last_armed = Some(UndoKind::Toggle);
        self.publish();
        Ok(status)
    }

    /// Restore the status captured by the most recent toggle.
    ///
    /// A no-op returning `Ok(None)` when nothing is buffered, or when the
    /// toggled task has since been deleted (the stale slot is dropped). Like
    /// the delete slot, an expired window does not block the undo.
    ///
    /// # Errors
    /// Returns [`TaskListError::Store`] when persisting fails; the slot is
    /// kept so the undo can be retried.
    pub fn undo_toggle(&mut self) -> Result<Option<TaskRecord>, TaskListError> {
        let Some(slot) = &self.toggle_slot else {
            return Ok(None);
        };
        let snapshot = slot.snapshot().clone();
        let Some(index) = self.position(snapshot.id) else {
            self.toggle_slot = None;
            self.publish();
            return Ok(None);
        };

        let mut restored = self.tasks[index].clone();
        restored.status = snapshot.status;
        self.store.update_task(&restored).map_err(Self::store_error)?;

        self.toggle_slot = None;
        self.tasks[index] = restored.clone();
        self.publish();
        Ok(Some(restored))
    }

    /// Re-rank tasks to match `order`, the full display-ordered id sequence.
    ///
    /// Ranks are reassigned densely (0-based) following the sequence and
    /// each changed record is persisted individually; records whose rank is
    /// already correct are skipped.
    ///
    /// # Errors
    /// Returns [`TaskListError::NotPermutation`] before any store call when
    /// `order` does not cover the currently displayed ids exactly once.
    /// Returns [`TaskListError::Store`] when one of the updates fails; the
    /// canonical collection is then resynchronized from the store, since the
    /// already-persisted ranks cannot be taken back.
    pub fn reorder(&mut self, order: &[TaskId]) -> Result<(), TaskListError> {
        if !self.is_display_permutation(order) {
            return Err(TaskListError::NotPermutation);
        }

        let mut failed: Option<TaskListError> = None;
        let mut rank: u32 = 0;
        for id in order {
            if let Some(index) = self.position(*id)
                && self.tasks[index].sort_index != rank
            {
                let mut updated = self.tasks[index].clone();
                updated.sort_index = rank;
                if let Err(err) = self.store.update_task(&updated) {
                    failed = Some(Self::store_error(err));
                    break;
                }
                self.tasks[index] = updated;
            }
            rank = rank.saturating_add(1);
        }

        if let Some(err) = failed {
            // Some ranks were already persisted; trust the store over memory.
            self.tasks = self.store.fetch_tasks().unwrap_or_default();
            self.publish();
            return Err(err);
        }

        self.tasks.sort_by(|a, b| a.sort_index.cmp(&b.sort_index));
        self.publish();
        Ok(())
    }

    fn is_display_permutation(&self, order: &[TaskId]) -> bool {
        if order.len() != self.visible.len() {
            return false;
        }
        let supplied: HashSet<TaskId> = order.iter().copied().collect();
        supplied.len() == order.len()
            && self.visible.iter().all(|task| supplied.contains(&task.id))
    }
}
