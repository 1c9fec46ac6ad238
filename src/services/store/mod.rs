//! The entry store seam.
//!
//! The scheduler never touches task storage directly: it reads the current
//! listing and sends partial updates through [`EntryStore`].

mod memory;

use thiserror::Error;

use crate::models::task::{Task, TaskId, TaskPatch};

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error("update rejected: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Backing store for tasks.
///
/// `revision` changes whenever the listing changes; hosts compare it between
/// frames to decide when to re-project entries.
#[cfg_attr(test, mockall::automock)]
pub trait EntryStore {
    fn list(&self) -> Vec<Task>;
    fn revision(&self) -> u64;
    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError>;
}
