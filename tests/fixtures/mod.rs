// Test fixtures - reusable test data
// Provides consistent tasks, grid geometry and a recording store

#![allow(dead_code)]

use chrono::NaiveDate;
use egui::{Pos2, Rect};

use week_planner::models::entry::{project_tasks, CalendarEntry};
use week_planner::models::task::{Task, TaskId, TaskPatch};
use week_planner::services::store::{EntryStore, MemoryStore, StoreError};
use week_planner::ui_egui::drag::{BlockGeometry, GridMetrics};
use week_planner::utils::time::GridScale;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Sunday, Jan 7 2024
    pub fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }

    /// Monday, Jan 8 2024
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    pub fn week() -> Vec<NaiveDate> {
        week_start()
            .iter_days()
            .take(7)
            .collect()
    }
}

/// Sample tasks for testing
pub mod tasks {
    use super::*;

    pub fn standup() -> Task {
        Task::builder()
            .title("Standup")
            .date(dates::monday())
            .start_time("09:00")
            .end_time("10:00")
            .category("meeting")
            .build()
            .unwrap()
    }

    pub fn review() -> Task {
        Task::builder()
            .title("Review")
            .date(dates::monday())
            .start_time("09:30")
            .duration_minutes(90)
            .build()
            .unwrap()
    }

    /// 09:00 with no end; projected with the default hour.
    pub fn open_ended() -> Task {
        Task::builder()
            .title("Focus block")
            .date(dates::monday())
            .start_time("09:00")
            .build()
            .unwrap()
    }

    /// 09:00 plus 45 minutes, no explicit end.
    pub fn timed_call() -> Task {
        Task::builder()
            .title("Call")
            .date(dates::monday())
            .start_time("09:00")
            .duration_minutes(45)
            .build()
            .unwrap()
    }

    /// Starts and ends at 10:00.
    pub fn reminder() -> Task {
        Task::builder()
            .title("Reminder")
            .date(dates::monday())
            .start_time("10:00")
            .end_time("10:00")
            .build()
            .unwrap()
    }

    pub fn late_shift() -> Task {
        Task::builder()
            .title("Late shift")
            .date(dates::monday())
            .start_time("22:00")
            .end_time("23:30")
            .build()
            .unwrap()
    }
}

/// Grid geometry: 60px time axis, 100px day columns, 60px hour rows.
pub fn metrics(column_count: usize) -> GridMetrics {
    GridMetrics {
        origin: Pos2::ZERO,
        time_axis_width: 60.0,
        day_column_width: 100.0,
        column_count,
        scale: GridScale::default(),
    }
}

/// Full-width screen rect of `entry` drawn in `column`.
pub fn block_rect(entry: &CalendarEntry, column: usize) -> Rect {
    let m = metrics(7);
    m.block_rect(
        BlockGeometry::for_interval(entry.start_minute, entry.end_minute, column, m.scale, 20.0),
        0.0,
        100.0,
    )
}

/// Store wrapper that records every update call and can be told to fail.
#[derive(Debug)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub calls: Vec<(TaskId, TaskPatch)>,
    pub fail_with: Option<StoreError>,
}

impl RecordingStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            inner: MemoryStore::with_tasks(tasks),
            calls: Vec::new(),
            fail_with: None,
        }
    }

    pub fn entries(&self) -> Vec<CalendarEntry> {
        project_tasks(&self.inner.list(), 60)
    }

    pub fn entry(&self, id: TaskId) -> CalendarEntry {
        self.entries().into_iter().find(|e| e.id == id).unwrap()
    }

    pub fn task(&self, id: TaskId) -> Task {
        self.inner.get(id).cloned().unwrap()
    }
}

impl EntryStore for RecordingStore {
    fn list(&self) -> Vec<Task> {
        self.inner.list()
    }

    fn revision(&self) -> u64 {
        self.inner.revision()
    }

    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        self.calls.push((id, patch.clone()));
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.inner.update(id, patch)
    }
}
