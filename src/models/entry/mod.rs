// Entry module
// Read-time projection of a task onto the week grid

use chrono::NaiveDate;

use crate::models::task::{Priority, Task, TaskId};
use crate::utils::time::{minutes_to_time, time_to_minutes, MINUTES_PER_DAY};

/// Display colour of an entry, derived from its category or priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Purple,
    Orange,
    Green,
    Blue,
    Yellow,
    Red,
}

impl ColorKey {
    /// Category wins when present; priority is the fallback.
    pub fn for_task(category: Option<&str>, priority: Option<Priority>) -> Self {
        match category {
            Some(category) => Self::for_category(category),
            None => Self::for_priority(priority),
        }
    }

    fn for_category(category: &str) -> Self {
        match category.to_lowercase().as_str() {
            "meeting" => ColorKey::Blue,
            "fitness" | "exercise" => ColorKey::Green,
            "personal" => ColorKey::Purple,
            "appointment" => ColorKey::Orange,
            _ => ColorKey::Yellow,
        }
    }

    fn for_priority(priority: Option<Priority>) -> Self {
        match priority {
            Some(Priority::High) => ColorKey::Red,
            Some(Priority::Medium) => ColorKey::Orange,
            Some(Priority::Low) => ColorKey::Green,
            None => ColorKey::Blue,
        }
    }
}

/// A task as the grid sees it: one day, a minute interval, a colour.
///
/// `end_minute >= start_minute` always holds; equality marks a zero-length
/// entry which the renderer stretches to the minimum block height.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: TaskId,
    pub title: String,
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub is_all_day: bool,
    pub color: ColorKey,
}

impl CalendarEntry {
    /// Project a task. Returns `None` for tasks without an id or with an
    /// unreadable start time.
    pub fn from_task(task: &Task, default_duration: u32) -> Option<Self> {
        let id = task.id?;

        let start_minute = match time_to_minutes(&task.start_time) {
            Ok(minute) if minute < MINUTES_PER_DAY => minute,
            Ok(_) => {
                log::warn!("Task {} starts at end of day, skipping", id);
                return None;
            }
            Err(err) => {
                log::warn!("Skipping task {} with invalid start time: {}", id, err);
                return None;
            }
        };

        let end_minute = resolve_end_minute(task, start_minute, default_duration)
            .clamp(start_minute, MINUTES_PER_DAY);

        Some(Self {
            id,
            title: task.title.clone(),
            date: task.date,
            start_minute,
            end_minute,
            is_all_day: task.is_all_day,
            color: ColorKey::for_task(task.category.as_deref(), task.priority),
        })
    }

    pub fn duration(&self) -> i32 {
        self.end_minute - self.start_minute
    }

    /// Half-open interval intersection on the same day.
    pub fn overlaps(&self, other: &CalendarEntry) -> bool {
        self.start_minute < other.end_minute && self.end_minute > other.start_minute
    }

    /// "09:00–10:00"
    pub fn time_label(&self) -> String {
        format!(
            "{}–{}",
            minutes_to_time(self.start_minute).unwrap_or_default(),
            minutes_to_time(self.end_minute).unwrap_or_default()
        )
    }
}

fn resolve_end_minute(task: &Task, start_minute: i32, default_duration: u32) -> i32 {
    if let Some(ref end) = task.end_time {
        match time_to_minutes(end) {
            Ok(minute) => return minute,
            Err(err) => log::warn!(
                "Task {:?} has invalid end time ({}), using duration",
                task.id,
                err
            ),
        }
    }

    let duration = task.duration_minutes.unwrap_or(default_duration);
    start_minute + duration as i32
}

/// Project every task in a store listing.
pub fn project_tasks(tasks: &[Task], default_duration: u32) -> Vec<CalendarEntry> {
    tasks
        .iter()
        .filter_map(|task| CalendarEntry::from_task(task, default_duration))
        .collect()
}
