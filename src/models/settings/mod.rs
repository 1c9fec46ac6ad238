// Settings module
// Tunables for the week grid, persisted as TOML

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::time::GridScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Height of one hour row in pixels (60 = one pixel per minute)
    pub hour_height: f32,
    /// Grab zone at the top/bottom edge of a block that starts a resize
    pub resize_handle_size: f32,
    /// Legibility floor for short blocks
    pub min_block_height: f32,
    /// Delay before a coalesced store update is sent
    pub commit_delay_ms: u64,
    /// Minimum spacing between preview recomputations (~one frame)
    pub preview_interval_ms: u64,
    /// Length given to tasks that have neither an end time nor a duration
    pub default_duration_minutes: u32,
    /// Viewports narrower than this show the two-day window
    pub compact_breakpoint: f32,
    /// Forces compact (`true`) or full (`false`) mode regardless of width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_override: Option<bool>,
    /// JSON task list loaded into the in-memory store at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            hour_height: 60.0,
            resize_handle_size: 8.0,
            min_block_height: 20.0,
            commit_delay_ms: 100,
            preview_interval_ms: 16,
            default_duration_minutes: 60,
            compact_breakpoint: 768.0,
            compact_override: None,
            seed_file: None,
        }
    }
}

impl SchedulerSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.hour_height > 0.0) {
            return Err("hour_height must be positive".to_string());
        }
        if self.resize_handle_size < 0.0 {
            return Err("resize_handle_size cannot be negative".to_string());
        }
        if self.min_block_height < 0.0 {
            return Err("min_block_height cannot be negative".to_string());
        }
        if self.commit_delay_ms == 0 {
            return Err("commit_delay_ms must be at least 1".to_string());
        }
        if self.preview_interval_ms == 0 {
            return Err("preview_interval_ms must be at least 1".to_string());
        }
        if self.default_duration_minutes == 0 {
            return Err("default_duration_minutes must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn scale(&self) -> GridScale {
        GridScale::from_hour_height(self.hour_height)
    }

    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    pub fn preview_interval(&self) -> Duration {
        Duration::from_millis(self.preview_interval_ms)
    }

    /// Compact mode for a viewport of the given width.
    pub fn is_compact(&self, viewport_width: f32) -> bool {
        self.compact_override
            .unwrap_or(viewport_width < self.compact_breakpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SchedulerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.scale().pixels_per_minute, 1.0);
        assert_eq!(settings.commit_delay(), Duration::from_millis(100));
        assert_eq!(settings.preview_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = SchedulerSettings::default();
        settings.hour_height = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = SchedulerSettings::default();
        settings.commit_delay_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = SchedulerSettings::default();
        settings.hour_height = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_compact_mode_selection() {
        let mut settings = SchedulerSettings::default();
        assert!(settings.is_compact(500.0));
        assert!(!settings.is_compact(1200.0));

        settings.compact_override = Some(true);
        assert!(settings.is_compact(1200.0));
        settings.compact_override = Some(false);
        assert!(!settings.is_compact(500.0));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: SchedulerSettings = toml::from_str("hour_height = 120.0").unwrap();
        assert_eq!(settings.hour_height, 120.0);
        assert_eq!(settings.commit_delay_ms, 100);
        assert!(settings.seed_file.is_none());
    }
}
