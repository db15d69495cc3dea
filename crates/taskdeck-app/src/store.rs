//! Storage contract between the engine and its persistence backend.

use anyhow::Error;
use std::sync::Arc;
use taskdeck_core::{TaskId, TaskRecord};
use taskdeck_store_json::{JsonStore, JsonStoreError};

/// Minimal storage abstraction required by
/// [`TaskListService`](crate::service::TaskListService).
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Persist a brand-new record.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn save_task(&self, task: &TaskRecord) -> Result<(), Self::Error>;

    /// Load every record, ordered by persisted rank ascending.
    ///
    /// # Errors
    /// Returns a store-specific error when the records cannot be read.
    fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, Self::Error>;

    /// Replace the stored record whose id matches, every field included.
    ///
    /// An unknown id is a logged no-op on the store side, not an error.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn update_task(&self, task: &TaskRecord) -> Result<(), Self::Error>;

    /// Remove the record with the given id.
    ///
    /// An unknown id is a logged no-op on the store side, not an error.
    ///
    /// # Errors
    /// Returns a store-specific error when the removal cannot be written.
    fn delete_task(&self, id: TaskId) -> Result<(), Self::Error>;
}

impl<S> TaskStore for &S
where
    S: TaskStore + ?Sized,
{
    type Error = S::Error;

    fn save_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        (*self).save_task(task)
    }

    fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, Self::Error> {
        (*self).fetch_tasks()
    }

    fn update_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        (*self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<(), Self::Error> {
        (*self).delete_task(id)
    }
}

impl<S> TaskStore for Arc<S>
where
    S: TaskStore,
{
    type Error = S::Error;

    fn save_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        (**self).save_task(task)
    }

    fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, Self::Error> {
        (**self).fetch_tasks()
    }

    fn update_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<(), Self::Error> {
        (**self).delete_task(id)
    }
}

impl TaskStore for JsonStore {
    type Error = JsonStoreError;

    fn save_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        Self::save_task(self, task)
    }

    fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, Self::Error> {
        Self::fetch_tasks(self)
    }

    fn update_task(&self, task: &TaskRecord) -> Result<(), Self::Error> {
        Self::update_task(self, task)
    }

    fn delete_task(&self, id: TaskId) -> Result<(), Self::Error> {
        Self::delete_task(self, id)
    }
}
