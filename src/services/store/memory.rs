use std::path::Path;

use anyhow::{Context, Result};

use super::{EntryStore, StoreError};
use crate::models::task::{Task, TaskId, TaskPatch};
use crate::utils::time::{time_to_minutes, MINUTES_PER_DAY};

/// In-process task store used by the desktop host and the tests.
#[derive(Debug)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    next_id: TaskId,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Build a store from tasks, assigning ids to those without one.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            store.insert(task);
        }
        store
    }

    /// Load a JSON array of task records.
    pub fn load_json(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tasks from {}", path.display()))?;
        let tasks: Vec<Task> = serde_json::from_str(&data)
            .with_context(|| format!("failed to deserialize tasks from {}", path.display()))?;
        log::info!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self::with_tasks(tasks))
    }

    /// Insert a task and return its id. An explicit id is kept if unused.
    pub fn insert(&mut self, mut task: Task) -> TaskId {
        let id = match task.id {
            Some(id) if self.get(id).is_none() => id,
            _ => self.next_id,
        };
        self.next_id = self.next_id.max(id + 1);
        task.id = Some(id);
        self.tasks.push(task);
        self.revision += 1;
        id
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == Some(id))?;
        self.revision += 1;
        Some(self.tasks.remove(index))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryStore {
    fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        for time in [&patch.start_time, &patch.end_time].into_iter().flatten() {
            time_to_minutes(time).map_err(|e| StoreError::Rejected(e.to_string()))?;
        }
        if let Some(ref start) = patch.start_time {
            if time_to_minutes(start).ok() == Some(MINUTES_PER_DAY) {
                return Err(StoreError::Rejected(format!(
                    "start time {} is the end of the day",
                    start
                )));
            }
        }

        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;

        task.apply_patch(patch);
        self.revision += 1;
        Ok(())
    }
}
