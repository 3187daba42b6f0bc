//! Task status storage.

use std::collections::HashMap;
use std::sync::RwLock;

use marketscope_core::{AnalysisTask, TaskError};
use uuid::Uuid;

use crate::error::StoreError;

/// Key-value storage for task records.
///
/// Only the orchestrator writes a given task. Readers always see a whole
/// record: `update` applies its mutation under the store's write lock and
/// leaves the stored record unchanged when the mutation is refused.
pub trait TaskStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the id is already present.
    fn insert(&self, task: AnalysisTask) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the backing lock is poisoned.
    fn get(&self, task_id: Uuid) -> Result<Option<AnalysisTask>, StoreError>;

    /// Apply `mutate` to the stored record and return the updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids and
    /// [`StoreError::Transition`] when `mutate` refuses the change.
    fn update(
        &self,
        task_id: Uuid,
        mutate: &mut dyn FnMut(&mut AnalysisTask) -> Result<(), TaskError>,
    ) -> Result<AnalysisTask, StoreError>;

    /// All tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the backing lock is poisoned.
    fn list(&self) -> Result<Vec<AnalysisTask>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, AnalysisTask>>,
}

impl InMemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&self, task: AnalysisTask) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().map_err(|_| StoreError::Poisoned)?;
        if tasks.contains_key(&task.task_id) {
            return Err(StoreError::Duplicate(task.task_id));
        }
        tasks.insert(task.task_id, task);
        Ok(())
    }

    fn get(&self, task_id: Uuid) -> Result<Option<AnalysisTask>, StoreError> {
        let tasks = self.tasks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tasks.get(&task_id).cloned())
    }

    fn update(
        &self,
        task_id: Uuid,
        mutate: &mut dyn FnMut(&mut AnalysisTask) -> Result<(), TaskError>,
    ) -> Result<AnalysisTask, StoreError> {
        let mut tasks = self.tasks.write().map_err(|_| StoreError::Poisoned)?;
        let stored = tasks
            .get_mut(&task_id)
            .ok_or(StoreError::NotFound(task_id))?;
        let mut next = stored.clone();
        mutate(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }

    fn list(&self) -> Result<Vec<AnalysisTask>, StoreError> {
        let tasks = self.tasks.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<AnalysisTask> = tasks.values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use marketscope_core::{AnalysisType, TaskStatus};

    use super::*;

    #[test]
    fn insert_then_get_returns_copy() {
        let store = InMemoryTaskStore::new();
        let task = AnalysisTask::new("https://www.apple.com", AnalysisType::Full);
        let id = task.task_id;
        store.insert(task.clone()).unwrap();
        assert_eq!(store.get(id).unwrap(), Some(task));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = InMemoryTaskStore::new();
        let task = AnalysisTask::new("https://www.apple.com", AnalysisType::Full);
        store.insert(task.clone()).unwrap();
        assert!(matches!(store.insert(task), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn refused_update_leaves_record_untouched() {
        let store = InMemoryTaskStore::new();
        let task = AnalysisTask::new("https://www.apple.com", AnalysisType::Market);
        let id = task.task_id;
        store.insert(task).unwrap();

        let result = store.update(id, &mut |t| t.advance(40, "too early"));
        assert!(matches!(result, Err(StoreError::Transition(_))));
        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Pending);
        assert_eq!(stored.progress, 0);

        let updated = store.update(id, &mut |t| t.start("started")).unwrap();
        assert_eq!(updated.status, TaskStatus::Processing);
    }

    #[test]
    fn update_unknown_task_is_not_found() {
        let store = InMemoryTaskStore::new();
        let result = store.update(Uuid::new_v4(), &mut |t| t.start("x"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_is_oldest_first() {
        let store = InMemoryTaskStore::new();
        let first = AnalysisTask::new("https://a.example", AnalysisType::Full);
        let mut second = AnalysisTask::new("https://b.example", AnalysisType::Full);
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        store.insert(second.clone()).unwrap();
        store.insert(first.clone()).unwrap();
        let urls: Vec<String> = store.list().unwrap().into_iter().map(|t| t.url).collect();
        assert_eq!(urls, ["https://a.example", "https://b.example"]);
    }
}
