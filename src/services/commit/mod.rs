//! Coalescing of store writes.
//!
//! Pointer-move events arrive far faster than the store should be written.
//! [`CommitDispatcher`] keeps one pending slot per task: scheduling again
//! replaces the slot's patch and pushes its deadline back, so only the latest
//! values inside a burst are ever sent. Session end bypasses the delay with
//! [`CommitDispatcher::flush`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::task::{TaskId, TaskPatch};
use crate::services::store::{EntryStore, StoreError};

#[derive(Debug, Clone)]
struct PendingCommit {
    patch: TaskPatch,
    due_at: Instant,
}

/// A store write that failed. Local preview state is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitFailure {
    pub task_id: TaskId,
    pub error: StoreError,
}

/// Outcome of a dispatch pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub sent: Vec<TaskId>,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty() && self.failures.is_empty()
    }

    fn record(&mut self, task_id: TaskId, result: Result<(), StoreError>) {
        match result {
            Ok(()) => self.sent.push(task_id),
            Err(error) => self.failures.push(CommitFailure { task_id, error }),
        }
    }
}

pub struct CommitDispatcher {
    delay: Duration,
    pending: HashMap<TaskId, PendingCommit>,
}

impl CommitDispatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel-and-reschedule: replaces any pending commit for `task_id`.
    pub fn schedule(&mut self, task_id: TaskId, patch: TaskPatch, now: Instant) {
        let due_at = now + self.delay;
        if self
            .pending
            .insert(task_id, PendingCommit { patch, due_at })
            .is_some()
        {
            log::trace!("Rescheduled pending commit for task {}", task_id);
        } else {
            log::debug!("Scheduled commit for task {} in {:?}", task_id, self.delay);
        }
    }

    /// Send every commit whose deadline has passed.
    pub fn poll(&mut self, store: &mut dyn EntryStore, now: Instant) -> CommitReport {
        let mut due: Vec<TaskId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due_at <= now)
            .map(|(id, _)| *id)
            .collect();
        due.sort_unstable();

        let mut report = CommitReport::default();
        for task_id in due {
            if let Some(pending) = self.pending.remove(&task_id) {
                report.record(task_id, send(store, task_id, &pending.patch));
            }
        }
        report
    }

    /// Send `patch` right away, dropping whatever was pending for the task.
    pub fn flush(
        &mut self,
        store: &mut dyn EntryStore,
        task_id: TaskId,
        patch: &TaskPatch,
    ) -> CommitReport {
        if self.pending.remove(&task_id).is_some() {
            log::debug!("Flushing task {} ahead of its timer", task_id);
        }
        let mut report = CommitReport::default();
        report.record(task_id, send(store, task_id, patch));
        report
    }

    /// Drop the pending commit for one task without sending it.
    pub fn cancel(&mut self, task_id: TaskId) -> bool {
        self.pending.remove(&task_id).is_some()
    }

    /// Drop every pending commit; returns how many were discarded.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Time until the earliest pending commit becomes due.
    pub fn next_due_in(&self, now: Instant) -> Option<Duration> {
        self.pending
            .values()
            .map(|p| p.due_at.saturating_duration_since(now))
            .min()
    }
}

fn send(store: &mut dyn EntryStore, task_id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
    match store.update(task_id, patch) {
        Ok(()) => {
            log::info!("Committed task {}: {:?}", task_id, patch);
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to commit task {}: {}", task_id, err);
            Err(err)
        }
    }
}
