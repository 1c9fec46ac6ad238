//! Pointer session state machine for moving and resizing grid blocks.
//!
//! `idle -> moving | resizing-start | resizing-end -> idle`. At most one
//! session exists; it is an owned `Option<DragSession>` inside
//! [`DragController`]. Every preview is recomputed from the geometry frozen
//! at pointer-down plus the total pointer delta, so replaying the same
//! pointer position always yields the same result.

use chrono::NaiveDate;
use egui::{Pos2, Rect};

use crate::models::entry::CalendarEntry;
use crate::models::task::{TaskId, TaskPatch};
use crate::ui_egui::resize::{HandleRects, ResizeHandle};
use crate::utils::time::{
    minutes_to_time, snap_to_quarter_hour, GridScale, MINUTES_PER_DAY, SNAP_MINUTES,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Moving,
    ResizingStart,
    ResizingEnd,
}

impl From<Option<ResizeHandle>> for DragMode {
    fn from(handle: Option<ResizeHandle>) -> Self {
        match handle {
            Some(ResizeHandle::Top) => DragMode::ResizingStart,
            Some(ResizeHandle::Bottom) => DragMode::ResizingEnd,
            None => DragMode::Moving,
        }
    }
}

impl DragMode {
    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            DragMode::Moving => egui::CursorIcon::Grabbing,
            DragMode::ResizingStart | DragMode::ResizingEnd => egui::CursorIcon::ResizeVertical,
        }
    }
}

/// Screen placement of the time grid, captured when a session starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    /// Top-left of the time axis column at midnight
    pub origin: Pos2,
    pub time_axis_width: f32,
    pub day_column_width: f32,
    pub column_count: usize,
    pub scale: GridScale,
}

impl GridMetrics {
    /// Day column under a screen x coordinate, clamped to the visible range.
    pub fn column_at(&self, x: f32) -> usize {
        let last = self.column_count.saturating_sub(1);
        if self.day_column_width <= 0.0 {
            return 0;
        }
        let relative = x - self.origin.x - self.time_axis_width;
        let column = (relative / self.day_column_width).floor();
        if column <= 0.0 {
            0
        } else {
            (column as usize).min(last)
        }
    }

    pub fn column_left(&self, column: usize) -> f32 {
        self.origin.x + self.time_axis_width + column as f32 * self.day_column_width
    }

    /// Screen rect of a block given its geometry and lane percentages.
    pub fn block_rect(&self, geometry: BlockGeometry, offset_percent: f32, width_percent: f32) -> Rect {
        let left = self.column_left(geometry.day_index) + self.day_column_width * offset_percent / 100.0;
        let width = self.day_column_width * width_percent / 100.0;
        Rect::from_min_size(
            Pos2::new(left, self.origin.y + geometry.top),
            egui::vec2(width, geometry.height),
        )
    }
}

/// Pixel placement of a block inside the grid: vertical offset from
/// midnight, height, and visible column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockGeometry {
    pub top: f32,
    pub height: f32,
    pub day_index: usize,
}

impl BlockGeometry {
    pub fn for_interval(
        start_minute: i32,
        end_minute: i32,
        day_index: usize,
        scale: GridScale,
        min_height: f32,
    ) -> Self {
        Self {
            top: scale.minutes_to_px(start_minute),
            height: scale.minutes_to_px(end_minute - start_minute).max(min_height),
            day_index,
        }
    }
}

/// Field values of the target at pointer-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
}

#[derive(Clone, Debug)]
pub struct DragSession {
    mode: DragMode,
    task_id: TaskId,
    title: String,
    anchor: Pos2,
    original: BlockGeometry,
    snapshot: EntrySnapshot,
    preview: BlockGeometry,
    preview_minutes: (i32, i32),
    last_patch: Option<TaskPatch>,
    metrics: GridMetrics,
    dates: Vec<NaiveDate>,
}

impl DragSession {
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    pub fn original(&self) -> BlockGeometry {
        self.original
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        self.snapshot
    }

    pub fn preview(&self) -> BlockGeometry {
        self.preview
    }

    /// Start/end minutes matching the current preview.
    pub fn preview_minutes(&self) -> (i32, i32) {
        self.preview_minutes
    }

    /// Day the preview currently targets, from the dates frozen at pointer-down.
    pub fn preview_date(&self) -> Option<NaiveDate> {
        self.dates.get(self.preview.day_index).copied()
    }

    /// True while the preview sits in a different column than the origin.
    pub fn is_cross_day(&self) -> bool {
        self.preview.day_index != self.original.day_index
    }

    /// Last field values computed in this session, if any.
    pub fn last_patch(&self) -> Option<&TaskPatch> {
        self.last_patch.as_ref()
    }
}

/// Result of feeding one pointer position to the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum DragUpdate {
    /// No session is active
    Idle,
    /// The pointer was recorded but will be applied on a later tick
    Deferred,
    /// Geometry recomputed; field values identical to the previous tick
    Unchanged,
    /// The would-be interval was inverted; preview kept as it was
    Rejected,
    /// New field values for the store
    Changed(TaskPatch),
}

/// A session that just ended.
#[derive(Clone, Debug, PartialEq)]
pub struct FinishedSession {
    pub task_id: TaskId,
    pub mode: DragMode,
    pub final_patch: Option<TaskPatch>,
}

pub struct DragController {
    session: Option<DragSession>,
    handle_size: f32,
    min_block_height: f32,
}

impl DragController {
    pub fn new(handle_size: f32, min_block_height: f32) -> Self {
        Self {
            session: None,
            handle_size,
            min_block_height,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn min_block_height(&self) -> f32 {
        self.min_block_height
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    /// Which mode a pointer-down at `pointer` inside `block_rect` would start.
    pub fn mode_at(&self, block_rect: Rect, pointer: Pos2) -> DragMode {
        HandleRects::for_block(block_rect, self.handle_size)
            .hit_test(pointer)
            .into()
    }

    /// Start a session on `entry`. Ignored (returns `None`) while another
    /// session is active or when the entry has no place on the timed grid.
    pub fn begin(
        &mut self,
        entry: &CalendarEntry,
        day_index: usize,
        block_rect: Rect,
        pointer: Pos2,
        metrics: GridMetrics,
        dates: &[NaiveDate],
    ) -> Option<DragMode> {
        if let Some(active) = &self.session {
            log::debug!(
                "Ignoring pointer-down on task {} while task {} is in flight",
                entry.id,
                active.task_id
            );
            return None;
        }
        if entry.is_all_day || day_index >= dates.len() {
            return None;
        }

        let mode = self.mode_at(block_rect, pointer);
        let original = BlockGeometry::for_interval(
            entry.start_minute,
            entry.end_minute,
            day_index,
            metrics.scale,
            self.min_block_height,
        );

        log::debug!("Task {} session started: {:?}", entry.id, mode);
        self.session = Some(DragSession {
            mode,
            task_id: entry.id,
            title: entry.title.clone(),
            anchor: pointer,
            original,
            snapshot: EntrySnapshot {
                date: entry.date,
                start_minute: entry.start_minute,
                end_minute: entry.end_minute,
            },
            preview: original,
            preview_minutes: (entry.start_minute, entry.end_minute),
            last_patch: None,
            metrics,
            dates: dates.to_vec(),
        });
        Some(mode)
    }

    /// Recompute the preview for a pointer position.
    pub fn update(&mut self, pointer: Pos2) -> DragUpdate {
        let min_height = self.min_block_height;
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::Idle;
        };

        let Some(step) = compute_step(session, pointer, min_height) else {
            log::trace!("Task {} {:?} tick rejected", session.task_id, session.mode);
            return DragUpdate::Rejected;
        };

        session.preview = step.preview;
        session.preview_minutes = step.minutes;

        if session.last_patch.as_ref() == Some(&step.patch) {
            DragUpdate::Unchanged
        } else {
            session.last_patch = Some(step.patch.clone());
            DragUpdate::Changed(step.patch)
        }
    }

    /// End the session, handing back the values to commit.
    pub fn finish(&mut self) -> Option<FinishedSession> {
        let session = self.session.take()?;
        log::debug!("Task {} session finished", session.task_id);
        Some(FinishedSession {
            task_id: session.task_id,
            mode: session.mode,
            final_patch: session.last_patch,
        })
    }

    /// Drop the session without producing anything to commit.
    pub fn abort(&mut self) -> Option<TaskId> {
        let session = self.session.take()?;
        log::debug!("Task {} session aborted", session.task_id);
        Some(session.task_id)
    }
}

struct Step {
    preview: BlockGeometry,
    minutes: (i32, i32),
    patch: TaskPatch,
}

fn compute_step(session: &DragSession, pointer: Pos2, min_height: f32) -> Option<Step> {
    let scale = session.metrics.scale;
    let delta_minutes = scale.px_to_minutes(pointer.y - session.anchor.y);
    let EntrySnapshot {
        start_minute: start,
        end_minute: end,
        ..
    } = session.snapshot;

    match session.mode {
        DragMode::Moving => {
            let duration = end - start;
            // A start of 24:00 has no place on the grid, even for a zero-length entry.
            let latest_start = MINUTES_PER_DAY - duration.max(SNAP_MINUTES);
            let new_start = snap_to_quarter_hour(start as f32 + delta_minutes).clamp(0, latest_start);
            let new_end = new_start + duration;
            let day_index = session.metrics.column_at(pointer.x);
            let date = *session.dates.get(day_index)?;

            Some(Step {
                preview: BlockGeometry {
                    top: scale.minutes_to_px(new_start),
                    height: session.original.height,
                    day_index,
                },
                minutes: (new_start, new_end),
                patch: TaskPatch {
                    start_time: minutes_to_time(new_start).ok(),
                    end_time: minutes_to_time(new_end).ok(),
                    date: Some(date),
                },
            })
        }
        DragMode::ResizingStart => {
            let new_start = snap_to_quarter_hour(start as f32 + delta_minutes).max(0);
            if new_start >= end {
                return None;
            }
            Some(Step {
                preview: BlockGeometry::for_interval(
                    new_start,
                    end,
                    session.original.day_index,
                    scale,
                    min_height,
                ),
                minutes: (new_start, end),
                // The end is written too: a task whose end came from its
                // duration would otherwise slide along with the new start.
                patch: TaskPatch {
                    start_time: Some(minutes_to_time(new_start).ok()?),
                    end_time: Some(minutes_to_time(end).ok()?),
                    date: None,
                },
            })
        }
        DragMode::ResizingEnd => {
            let new_end = snap_to_quarter_hour(end as f32 + delta_minutes).min(MINUTES_PER_DAY);
            if new_end <= start {
                return None;
            }
            Some(Step {
                preview: BlockGeometry::for_interval(
                    start,
                    new_end,
                    session.original.day_index,
                    scale,
                    min_height,
                ),
                minutes: (start, new_end),
                patch: TaskPatch {
                    end_time: Some(minutes_to_time(new_end).ok()?),
                    ..TaskPatch::default()
                },
            })
        }
    }
}
