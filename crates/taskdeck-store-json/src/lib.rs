//! JSON-file-backed storage implementation for taskdeck.

mod error;

pub use error::JsonStoreError;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use taskdeck_core::{TaskId, TaskRecord};
use tracing::{info, warn};

/// Storage based on a single JSON document holding every task record.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open a store backed by `path`, creating parent directories as needed.
    ///
    /// The document itself is created lazily on first write; a missing file
    /// reads as an empty task list.
    ///
    /// # Errors
    /// Returns an error when the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Location of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a new record.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or rewritten.
    pub fn save_task(&self, task: &TaskRecord) -> Result<(), JsonStoreError> {
        let mut tasks = self.read_all()?;
        tasks.push(task.clone());
        self.write_all(&tasks)?;
        let id = task.id;
        info!(%id, "Saved task");
        Ok(())
    }

    /// All records, ordered by persisted rank ascending.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or parsed.
    pub fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, JsonStoreError> {
        let mut tasks = self.read_all()?;
        tasks.sort_by(|a, b| a.sort_index.cmp(&b.sort_index));
        Ok(tasks)
    }

    /// Replace the record whose id matches, every field included.
    ///
    /// An unknown id is logged and ignored, per the repository contract.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or rewritten.
    pub fn update_task(&self, task: &TaskRecord) -> Result<(), JsonStoreError> {
        let mut tasks = self.read_all()?;
        let id = task.id;
        let Some(slot) = tasks.iter_mut().find(|candidate| candidate.id == id) else {
            warn!(%id, "Update for unknown task ignored");
            return Ok(());
        };
        *slot = task.clone();
        self.write_all(&tasks)?;
        info!(%id, "Updated task");
        Ok(())
    }

    /// Remove the record with the given id.
    ///
    /// An unknown id is logged and ignored, per the repository contract.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or rewritten.
    pub fn delete_task(&self, id: TaskId) -> Result<(), JsonStoreError> {
        let mut tasks = self.read_all()?;
        let before = tasks.len();
        tasks.retain(|candidate| candidate.id != id);
        if tasks.len() == before {
            warn!(%id, "Delete for unknown task ignored");
            return Ok(());
        }
        self.write_all(&tasks)?;
        info!(%id, "Deleted task");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TaskRecord>, JsonStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, tasks: &[TaskRecord]) -> Result<(), JsonStoreError> {
        let json = serde_json::to_string_pretty(tasks)?;
        // The rewrite goes through a sibling temp file; the rename swaps the
        // document in a single step.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::task::{Priority, TaskStatus};
    use tempfile::TempDir;
    use time::OffsetDateTime;

    fn record(title: &str, sort_index: u32) -> TaskRecord {
        TaskRecord {
            id: TaskId::new(),
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            due_date: OffsetDateTime::UNIX_EPOCH,
            status: TaskStatus::Pending,
            sort_index,
        }
    }

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::open(dir.path().join("tasks.json")).expect("must open store")
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);
        let tasks = store.fetch_tasks().expect("must fetch tasks");
        assert!(tasks.is_empty());
    }

    #[test]
    fn fetch_orders_by_sort_index() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        let second = record("second", 1);
        let first = record("first", 0);
        store.save_task(&second).expect("must save task");
        store.save_task(&first).expect("must save task");

        let tasks = store.fetch_tasks().expect("must fetch tasks");
        let titles: Vec<_> = tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn reopen_sees_previous_state() {
        let dir = TempDir::new().expect("must create temp dir");
        let path = dir.path().join("tasks.json");

        let store = JsonStore::open(&path).expect("must open store");
        let task = record("persisted", 0);
        store.save_task(&task).expect("must save task");
        drop(store);

        let reopened = JsonStore::open(&path).expect("must reopen store");
        let tasks = reopened.fetch_tasks().expect("must fetch tasks");
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn update_rewrites_every_field() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        let task = record("original", 0);
        store.save_task(&task).expect("must save task");

        let mut changed = task.clone();
        changed.title = "renamed".into();
        changed.status = TaskStatus::Completed;
        changed.sort_index = 7;
        store.update_task(&changed).expect("must update task");

        let tasks = store.fetch_tasks().expect("must fetch tasks");
        assert_eq!(tasks, vec![changed]);
    }

    #[test]
    fn update_for_unknown_id_is_ignored() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        let task = record("kept", 0);
        store.save_task(&task).expect("must save task");
        store
            .update_task(&record("stranger", 9))
            .expect("must tolerate unknown id");

        let tasks = store.fetch_tasks().expect("must fetch tasks");
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn delete_removes_only_the_matching_record() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        let doomed = record("doomed", 0);
        let kept = record("kept", 1);
        store.save_task(&doomed).expect("must save task");
        store.save_task(&kept).expect("must save task");

        store.delete_task(doomed.id).expect("must delete task");

        let tasks = store.fetch_tasks().expect("must fetch tasks");
        assert_eq!(tasks, vec![kept]);
    }

    #[test]
    fn delete_for_unknown_id_is_ignored() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        let task = record("kept", 0);
        store.save_task(&task).expect("must save task");
        store
            .delete_task(TaskId::new())
            .expect("must tolerate unknown id");

        let tasks = store.fetch_tasks().expect("must fetch tasks");
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn rewrite_leaves_no_temp_file_behind() {
        let dir = TempDir::new().expect("must create temp dir");
        let store = store_in(&dir);

        store.save_task(&record("anything", 0)).expect("must save task");

        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());
    }
}
