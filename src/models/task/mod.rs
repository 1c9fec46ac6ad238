// Task module
// External task record as supplied by the entry store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time::time_to_minutes;

/// Stable identifier assigned by the entry store.
pub type TaskId = i64;

/// Task priority tag, used for colouring when no category is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A task record. The scheduler only reads these; changes go through
/// [`TaskPatch`] and the store's update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    pub date: NaiveDate,
    /// `HH:MM`, local wall-clock
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
}

impl Task {
    /// Create a builder for constructing tasks with optional fields
    pub fn builder() -> TaskBuilder {
        TaskBuilder::new()
    }

    /// Validate the task
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title cannot be empty".to_string());
        }

        time_to_minutes(&self.start_time).map_err(|e| format!("Invalid start time: {}", e))?;

        if let Some(ref end) = self.end_time {
            time_to_minutes(end).map_err(|e| format!("Invalid end time: {}", e))?;
        }

        Ok(())
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(ref start) = patch.start_time {
            self.start_time = start.clone();
        }
        if let Some(ref end) = patch.end_time {
            self.end_time = Some(end.clone());
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

/// Partial field update sent to the entry store.
///
/// Each patch carries the full desired value of every field it touches, so a
/// newer patch for the same task fully supersedes an older one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none() && self.date.is_none()
    }
}

/// Builder for creating tasks with optional fields
pub struct TaskBuilder {
    title: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration_minutes: Option<u32>,
    location: Option<String>,
    description: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    notes: Option<String>,
    is_all_day: bool,
}

impl TaskBuilder {
    /// Create a new task builder
    pub fn new() -> Self {
        Self {
            title: None,
            date: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            location: None,
            description: None,
            category: None,
            priority: None,
            notes: None,
            is_all_day: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start_time(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn end_time(mut self, end: impl Into<String>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set as all-day task
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    /// Build the task
    pub fn build(self) -> Result<Task, String> {
        let title = self.title.ok_or("Task title is required")?;
        let date = self.date.ok_or("Task date is required")?;
        let start_time = self.start_time.unwrap_or_else(|| "00:00".to_string());

        let task = Task {
            id: None,
            title,
            date,
            start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            location: self.location,
            description: self.description,
            category: self.category,
            priority: self.priority,
            notes: self.notes,
            is_all_day: self.is_all_day,
        };

        task.validate()?;
        Ok(task)
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
