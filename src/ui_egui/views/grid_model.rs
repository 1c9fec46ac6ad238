//! Pure description of what the week grid draws this frame.
//!
//! Built from the projected entries, the visible dates and the active drag
//! session (if any). No egui types are involved so composition rules are
//! testable on their own; `week_grid` only paints what this module decides.

use chrono::NaiveDate;

use crate::models::entry::{CalendarEntry, ColorKey};
use crate::models::task::TaskId;
use crate::services::layout::{layout_day_with_min_duration, Lane};
use crate::ui_egui::drag::DragSession;
use crate::utils::date::format_day_header;
use crate::utils::time::{minutes_to_time, GridScale};

/// Horizontal inset of the cross-day ghost inside its target column.
pub const GHOST_OFFSET_PERCENT: f32 = 4.0;
pub const GHOST_WIDTH_PERCENT: f32 = 92.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EntryBlock {
    pub id: TaskId,
    pub title: String,
    pub time_label: String,
    pub color: ColorKey,
    pub top: f32,
    pub height: f32,
    pub lane: Lane,
    /// Origin block of a cross-day move; keeps its lane but is not drawn.
    pub hidden: bool,
    /// Geometry comes from the active session rather than the store.
    pub is_preview: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllDayChip {
    pub id: TaskId,
    pub title: String,
    pub color: ColorKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
    pub all_day: Vec<AllDayChip>,
    pub blocks: Vec<EntryBlock>,
}

/// Translucent copy of the dragged block drawn in the column under the
/// pointer while it is away from its own day.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostBlock {
    pub id: TaskId,
    pub title: String,
    pub time_label: String,
    pub color: ColorKey,
    pub column: usize,
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowIndicator {
    pub column: usize,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekGridModel {
    pub columns: Vec<DayColumn>,
    pub ghost: Option<GhostBlock>,
    pub now_indicator: Option<NowIndicator>,
    pub day_height: f32,
}

impl WeekGridModel {
    /// Blocks that will actually be painted for `id`, ghost included.
    pub fn visible_renders(&self, id: TaskId) -> usize {
        let blocks = self
            .columns
            .iter()
            .flat_map(|c| c.blocks.iter())
            .filter(|b| b.id == id && !b.hidden)
            .count();
        blocks + self.ghost.iter().filter(|g| g.id == id).count()
    }
}

pub struct GridInputs<'a> {
    pub entries: &'a [CalendarEntry],
    pub dates: &'a [NaiveDate],
    pub session: Option<&'a DragSession>,
    pub scale: GridScale,
    pub min_block_height: f32,
    pub today: NaiveDate,
    /// Minute of day captured when the grid was mounted
    pub now_minute: Option<i32>,
}

pub fn build_week_grid(inputs: &GridInputs<'_>) -> WeekGridModel {
    let scale = inputs.scale;
    let session = inputs.session;
    // Sessions address days through the dates they started with; the grid
    // may be showing a different range by now.
    let min_minutes = scale.px_to_minutes(inputs.min_block_height).ceil() as i32;
    let preview_column = session
        .and_then(|s| s.preview_date())
        .and_then(|date| inputs.dates.iter().position(|d| *d == date));

    let columns = inputs
        .dates
        .iter()
        .enumerate()
        .map(|(column, date)| {
            let day_entries: Vec<&CalendarEntry> = inputs
                .entries
                .iter()
                .filter(|e| e.date == *date)
                .collect();

            let all_day = day_entries
                .iter()
                .filter(|e| e.is_all_day)
                .map(|e| AllDayChip {
                    id: e.id,
                    title: e.title.clone(),
                    color: e.color,
                })
                .collect();

            let timed: Vec<&CalendarEntry> =
                day_entries.into_iter().filter(|e| !e.is_all_day).collect();

            let blocks = layout_day_with_min_duration(&timed, min_minutes)
                .into_iter()
                .map(|laned| {
                    let entry = laned.entry;
                    let active = session.filter(|s| s.task_id() == entry.id);
                    match active {
                        Some(session) => {
                            session_block(entry, laned.lane, session, preview_column != Some(column))
                        }
                        None => EntryBlock {
                            id: entry.id,
                            title: entry.title.clone(),
                            time_label: entry.time_label(),
                            color: entry.color,
                            top: scale.minutes_to_px(entry.start_minute),
                            height: scale
                                .minutes_to_px(entry.duration())
                                .max(inputs.min_block_height),
                            lane: laned.lane,
                            hidden: false,
                            is_preview: false,
                        },
                    }
                })
                .collect();

            DayColumn {
                date: *date,
                label: format_day_header(*date),
                is_today: *date == inputs.today,
                all_day,
                blocks,
            }
        })
        .collect();

    WeekGridModel {
        columns,
        ghost: session
            .zip(preview_column)
            .and_then(|(s, column)| ghost_block(inputs.entries, inputs.dates, s, column)),
        now_indicator: now_indicator(inputs),
        day_height: scale.day_height(),
    }
}

fn interval_label(start: i32, end: i32) -> String {
    format!(
        "{}–{}",
        minutes_to_time(start).unwrap_or_default(),
        minutes_to_time(end).unwrap_or_default()
    )
}

/// The active entry is drawn where the session puts it. When that is not the
/// column the store currently has it in, the store copy is hidden and the
/// ghost takes over.
fn session_block(entry: &CalendarEntry, lane: Lane, session: &DragSession, hidden: bool) -> EntryBlock {
    let preview = session.preview();
    let (start, end) = session.preview_minutes();

    EntryBlock {
        id: entry.id,
        title: entry.title.clone(),
        time_label: interval_label(start, end),
        color: entry.color,
        top: preview.top,
        height: preview.height,
        lane,
        hidden,
        is_preview: true,
    }
}

fn ghost_block(
    entries: &[CalendarEntry],
    dates: &[NaiveDate],
    session: &DragSession,
    column: usize,
) -> Option<GhostBlock> {
    let entry = entries.iter().find(|e| e.id == session.task_id())?;
    let preview = session.preview();
    let store_column = dates.iter().position(|d| *d == entry.date);
    if store_column == Some(column) {
        return None;
    }
    let (start, end) = session.preview_minutes();

    Some(GhostBlock {
        id: entry.id,
        title: entry.title.clone(),
        time_label: interval_label(start, end),
        color: entry.color,
        column,
        top: preview.top,
        height: preview.height,
    })
}

fn now_indicator(inputs: &GridInputs<'_>) -> Option<NowIndicator> {
    let minute = inputs.now_minute?;
    let column = inputs.dates.iter().position(|d| *d == inputs.today)?;
    Some(NowIndicator {
        column,
        top: inputs.scale.minutes_to_px(minute),
    })
}
