use crate::calendar::HasTasks;
use crate::dates::DateKey;
use crate::storage::KeyValueStorage;
use crate::task::{Task, TaskColor};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Storage key under which the task map is kept, as a JSON string
pub(crate) const TASKS_KEY: &str = "glassTodoTasks";

/// Mapping from days to the tasks filed under them, in insertion order
pub(crate) type TaskMap = BTreeMap<DateKey, Vec<Task>>;

/// The date-keyed task lists, together with the storage they are persisted
/// to.
///
/// Invariant: every key in the map has a non-empty list.
///
/// Tasks are addressed by their index within their day's list.  Indices are
/// only meaningful for the list as it currently stands; callers must derive
/// them from the current contents after every mutation.  Operations given an
/// index that does not exist do nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TaskStore<S> {
    storage: S,
    tasks: TaskMap,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Rehydrate the task map from `storage`.  A missing or unparsable entry
    /// yields an empty store.
    pub(crate) fn load(storage: S) -> TaskStore<S> {
        let tasks = match storage.get_item(TASKS_KEY) {
            Some(src) => match serde_json::from_str::<TaskMap>(&src) {
                Ok(mut tasks) => {
                    tasks.retain(|_, bucket| !bucket.is_empty());
                    tasks
                }
                Err(e) => {
                    log::warn!("Stored tasks could not be parsed; starting empty: {e}");
                    TaskMap::new()
                }
            },
            None => TaskMap::new(),
        };
        log::info!("Loaded tasks for {} day(s)", tasks.len());
        TaskStore { storage, tasks }
    }

    /// Serialize the full task map to storage.  Failures are logged and
    /// otherwise ignored.
    pub(crate) fn save(&mut self) {
        let data = match serde_json::to_string(&self.tasks) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Failed to serialize tasks: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(TASKS_KEY, data) {
            log::warn!("Failed to save tasks: {e}");
        }
    }

    /// Append a new pending task to the list for `key` and return its index
    pub(crate) fn add_task(
        &mut self,
        key: &DateKey,
        title: String,
        desc: String,
        color: TaskColor,
    ) -> usize {
        let task = Task::new(title, desc, color, OffsetDateTime::now_utc());
        let bucket = self.tasks.entry(key.clone()).or_default();
        bucket.push(task);
        let index = bucket.len() - 1;
        log::debug!("Added task {index} on {key}");
        self.save();
        index
    }

    /// Flip the status of a task between pending and completed.  Returns
    /// `false` if there is no such task.
    pub(crate) fn toggle_status(&mut self, key: &DateKey, index: usize) -> bool {
        let Some(task) = self.tasks.get_mut(key).and_then(|b| b.get_mut(index)) else {
            log::debug!("Ignoring toggle of nonexistent task {index} on {key}");
            return false;
        };
        task.status = task.status.toggled();
        log::debug!("Task {index} on {key} is now {:?}", task.status);
        self.save();
        true
    }

    /// Remove a task, dropping its day from the map if it was the day's last
    /// task.  Returns the removed task.
    pub(crate) fn delete_task(&mut self, key: &DateKey, index: usize) -> Option<Task> {
        let Some(bucket) = self.tasks.get_mut(key).filter(|b| index < b.len()) else {
            log::debug!("Ignoring deletion of nonexistent task {index} on {key}");
            return None;
        };
        let task = bucket.remove(index);
        if bucket.is_empty() {
            self.tasks.remove(key);
        }
        log::debug!("Deleted task {index} on {key}");
        self.save();
        Some(task)
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[cfg(test)]
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }
}

impl<S> TaskStore<S> {
    pub(crate) fn has_tasks(&self, key: &DateKey) -> bool {
        self.tasks.contains_key(key)
    }

    pub(crate) fn tasks_for(&self, key: &DateKey) -> &[Task] {
        self.tasks
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn task_count(&self, key: &DateKey) -> usize {
        self.tasks_for(key).len()
    }

    #[cfg(test)]
    pub(crate) fn tasks(&self) -> &TaskMap {
        &self.tasks
    }
}

impl<S> HasTasks for TaskStore<S> {
    fn has_tasks(&self, key: &DateKey) -> bool {
        TaskStore::has_tasks(self, key)
    }
}
