//! Pointer-facing facade over the drag controller and the commit dispatcher.
//!
//! The host forwards raw pointer input plus the current [`Instant`]; the
//! scheduler decides when previews are recomputed (at most once per
//! `preview_interval`) and when the store is written (coalesced by the
//! dispatcher, flushed at session end).

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use egui::{Pos2, Rect};

use crate::models::entry::CalendarEntry;
use crate::models::settings::SchedulerSettings;
use crate::models::task::TaskId;
use crate::services::commit::{CommitDispatcher, CommitReport};
use crate::services::store::EntryStore;
use crate::ui_egui::drag::{DragController, DragMode, DragSession, DragUpdate, GridMetrics};

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// No session was active
    Idle,
    /// Final values were sent to the store
    Committed(CommitReport),
    /// The session never produced field values (a plain click)
    Unchanged(TaskId),
    /// The target disappeared from the store; nothing was written
    Aborted(TaskId),
}

pub struct GridScheduler {
    drag: DragController,
    dispatcher: CommitDispatcher,
    preview_interval: Duration,
    last_preview_at: Option<Instant>,
    deferred_pointer: Option<Pos2>,
}

impl GridScheduler {
    pub fn new(settings: &SchedulerSettings) -> Self {
        Self::with_timing(
            settings.resize_handle_size,
            settings.min_block_height,
            settings.preview_interval(),
            settings.commit_delay(),
        )
    }

    pub fn with_timing(
        handle_size: f32,
        min_block_height: f32,
        preview_interval: Duration,
        commit_delay: Duration,
    ) -> Self {
        Self {
            drag: DragController::new(handle_size, min_block_height),
            dispatcher: CommitDispatcher::new(commit_delay),
            preview_interval,
            last_preview_at: None,
            deferred_pointer: None,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn is_idle(&self) -> bool {
        self.drag.is_idle()
    }

    pub fn min_block_height(&self) -> f32 {
        self.drag.min_block_height()
    }

    pub fn has_pending_commits(&self) -> bool {
        self.dispatcher.has_pending()
    }

    pub fn pending_commit_count(&self) -> usize {
        self.dispatcher.pending_count()
    }

    pub fn handle_size(&self) -> f32 {
        self.drag.handle_size()
    }

    pub fn pointer_down(
        &mut self,
        entry: &CalendarEntry,
        day_index: usize,
        block_rect: Rect,
        pointer: Pos2,
        metrics: GridMetrics,
        dates: &[NaiveDate],
    ) -> Option<DragMode> {
        let mode = self
            .drag
            .begin(entry, day_index, block_rect, pointer, metrics, dates)?;
        self.last_preview_at = None;
        self.deferred_pointer = None;
        Some(mode)
    }

    /// Feed a pointer position. Positions arriving faster than the preview
    /// interval are held back and applied by [`tick`](Self::tick) or at
    /// release.
    pub fn pointer_move(
        &mut self,
        pointer: Pos2,
        entries: &[CalendarEntry],
        now: Instant,
    ) -> DragUpdate {
        if self.drag.is_idle() {
            return DragUpdate::Idle;
        }
        if self.abort_if_target_missing(entries).is_some() {
            return DragUpdate::Idle;
        }
        if !self.preview_due(now) {
            self.deferred_pointer = Some(pointer);
            return DragUpdate::Deferred;
        }
        self.apply(pointer, now)
    }

    /// Apply any held-back pointer position and send commits that are due.
    pub fn tick(
        &mut self,
        store: &mut dyn EntryStore,
        entries: &[CalendarEntry],
        now: Instant,
    ) -> CommitReport {
        if self.deferred_pointer.is_some() && self.preview_due(now) {
            if self.abort_if_target_missing(entries).is_none() {
                if let Some(pointer) = self.deferred_pointer.take() {
                    self.apply(pointer, now);
                }
            }
        }
        self.dispatcher.poll(store, now)
    }

    pub fn pointer_up(
        &mut self,
        store: &mut dyn EntryStore,
        entries: &[CalendarEntry],
        now: Instant,
    ) -> SessionEnd {
        self.end_session(store, entries, now)
    }

    /// Pointer capture lost or Escape pressed. The session still commits
    /// whatever it last computed, exactly as a release does.
    pub fn pointer_cancel(
        &mut self,
        store: &mut dyn EntryStore,
        entries: &[CalendarEntry],
        now: Instant,
    ) -> SessionEnd {
        self.end_session(store, entries, now)
    }

    /// Drop the session and every pending commit without writing anything.
    pub fn teardown(&mut self) {
        if let Some(task_id) = self.drag.abort() {
            log::debug!("Teardown dropped session on task {}", task_id);
        }
        let discarded = self.dispatcher.cancel_all();
        if discarded > 0 {
            log::warn!("Teardown discarded {} pending commit(s)", discarded);
        }
        self.last_preview_at = None;
        self.deferred_pointer = None;
    }

    /// When the host should call [`tick`](Self::tick) again, if at all.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let preview = self.deferred_pointer.map(|_| {
            self.last_preview_at
                .map(|at| (at + self.preview_interval).saturating_duration_since(now))
                .unwrap_or(Duration::ZERO)
        });
        match (preview, self.dispatcher.next_due_in(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn preview_due(&self, now: Instant) -> bool {
        self.last_preview_at
            .is_none_or(|at| now.saturating_duration_since(at) >= self.preview_interval)
    }

    fn apply(&mut self, pointer: Pos2, now: Instant) -> DragUpdate {
        self.last_preview_at = Some(now);
        self.deferred_pointer = None;

        let update = self.drag.update(pointer);
        if let (DragUpdate::Changed(patch), Some(session)) = (&update, self.drag.session()) {
            self.dispatcher.schedule(session.task_id(), patch.clone(), now);
        }
        update
    }

    fn abort_if_target_missing(&mut self, entries: &[CalendarEntry]) -> Option<TaskId> {
        let task_id = self.drag.session()?.task_id();
        if entries.iter().any(|entry| entry.id == task_id) {
            return None;
        }
        log::debug!("Task {} vanished mid-session; aborting", task_id);
        self.drag.abort();
        self.dispatcher.cancel(task_id);
        self.last_preview_at = None;
        self.deferred_pointer = None;
        Some(task_id)
    }

    fn end_session(
        &mut self,
        store: &mut dyn EntryStore,
        entries: &[CalendarEntry],
        now: Instant,
    ) -> SessionEnd {
        if self.drag.is_idle() {
            return SessionEnd::Idle;
        }
        if let Some(task_id) = self.abort_if_target_missing(entries) {
            return SessionEnd::Aborted(task_id);
        }
        if let Some(pointer) = self.deferred_pointer.take() {
            self.apply(pointer, now);
        }

        self.last_preview_at = None;
        let Some(finished) = self.drag.finish() else {
            return SessionEnd::Idle;
        };

        match finished.final_patch {
            Some(patch) => {
                SessionEnd::Committed(self.dispatcher.flush(store, finished.task_id, &patch))
            }
            None => {
                self.dispatcher.cancel(finished.task_id);
                SessionEnd::Unchanged(finished.task_id)
            }
        }
    }
}

impl Drop for GridScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ColorKey;
    use crate::models::task::TaskPatch;
    use crate::services::store::MockEntryStore;
    use crate::ui_egui::drag::BlockGeometry;
    use crate::utils::time::GridScale;
    use mockall::predicate::{always, eq};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn entries() -> Vec<CalendarEntry> {
        vec![CalendarEntry {
            id: 9,
            title: "Standup".to_string(),
            date: day(),
            start_minute: 540,
            end_minute: 600,
            is_all_day: false,
            color: ColorKey::Blue,
        }]
    }

    fn scheduler() -> GridScheduler {
        GridScheduler::with_timing(
            8.0,
            20.0,
            Duration::from_millis(16),
            Duration::from_millis(100),
        )
    }

    fn grab(scheduler: &mut GridScheduler, entries: &[CalendarEntry]) -> Pos2 {
        let metrics = GridMetrics {
            origin: Pos2::ZERO,
            time_axis_width: 60.0,
            day_column_width: 100.0,
            column_count: 1,
            scale: GridScale::default(),
        };
        let rect = metrics.block_rect(
            BlockGeometry::for_interval(540, 600, 0, metrics.scale, 20.0),
            0.0,
            100.0,
        );
        let pointer = rect.center();
        scheduler.pointer_down(&entries[0], 0, rect, pointer, metrics, &[day()]);
        pointer
    }

    #[test]
    fn test_click_without_movement_sends_nothing() {
        let mut store = MockEntryStore::new();
        store.expect_update().never();

        let entries = entries();
        let mut scheduler = scheduler();
        grab(&mut scheduler, &entries);

        let end = scheduler.pointer_up(&mut store, &entries, Instant::now());
        assert_eq!(end, SessionEnd::Unchanged(9));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_deferred_pointer_applied_on_release() {
        let mut store = MockEntryStore::new();
        store
            .expect_update()
            .with(
                eq(9),
                eq(TaskPatch {
                    start_time: Some("10:00".to_string()),
                    end_time: Some("11:00".to_string()),
                    date: Some(day()),
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let entries = entries();
        let mut scheduler = scheduler();
        let anchor = grab(&mut scheduler, &entries);
        let t0 = Instant::now();

        assert!(matches!(
            scheduler.pointer_move(anchor + egui::vec2(0.0, 30.0), &entries, t0),
            DragUpdate::Changed(_)
        ));
        assert_eq!(
            scheduler.pointer_move(anchor + egui::vec2(0.0, 60.0), &entries, t0 + Duration::from_millis(5)),
            DragUpdate::Deferred
        );

        let end = scheduler.pointer_up(&mut store, &entries, t0 + Duration::from_millis(8));
        assert!(matches!(end, SessionEnd::Committed(report) if report.sent == vec![9]));
        assert!(!scheduler.has_pending_commits());
    }

    #[test]
    fn test_tick_applies_deferred_and_polls() {
        let mut store = MockEntryStore::new();
        store
            .expect_update()
            .with(eq(9), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let entries = entries();
        let mut scheduler = scheduler();
        let anchor = grab(&mut scheduler, &entries);
        let t0 = Instant::now();

        scheduler.pointer_move(anchor + egui::vec2(0.0, 30.0), &entries, t0);
        scheduler.pointer_move(anchor + egui::vec2(0.0, 60.0), &entries, t0 + Duration::from_millis(4));
        assert_eq!(
            scheduler.next_wakeup(t0 + Duration::from_millis(4)),
            Some(Duration::from_millis(12))
        );

        assert!(scheduler
            .tick(&mut store, &entries, t0 + Duration::from_millis(20))
            .is_empty());
        assert_eq!(scheduler.session().unwrap().preview_minutes(), (600, 660));

        let report = scheduler.tick(&mut store, &entries, t0 + Duration::from_millis(130));
        assert_eq!(report.sent, vec![9]);
    }

    #[test]
    fn test_missing_target_aborts_silently() {
        let mut store = MockEntryStore::new();
        store.expect_update().never();

        let entries = entries();
        let mut scheduler = scheduler();
        let anchor = grab(&mut scheduler, &entries);
        let t0 = Instant::now();
        scheduler.pointer_move(anchor + egui::vec2(0.0, 60.0), &entries, t0);
        assert!(scheduler.has_pending_commits());

        let end = scheduler.pointer_up(&mut store, &[], t0 + Duration::from_millis(30));
        assert_eq!(end, SessionEnd::Aborted(9));
        assert!(scheduler.is_idle());
        assert!(!scheduler.has_pending_commits());
    }

    #[test]
    fn test_teardown_discards_pending() {
        let entries = entries();
        let mut scheduler = scheduler();
        let anchor = grab(&mut scheduler, &entries);
        scheduler.pointer_move(anchor + egui::vec2(0.0, 60.0), &entries, Instant::now());

        scheduler.teardown();
        assert!(scheduler.is_idle());
        assert!(!scheduler.has_pending_commits());
        assert_eq!(scheduler.next_wakeup(Instant::now()), None);
    }
}
