//! Wall-clock time and grid geometry helpers.
//!
//! Everything here is pure: minutes since local midnight on one side, pixel
//! offsets inside a day column on the other.

use thiserror::Error;

/// Minutes in one calendar day. Also the largest valid *end* minute ("24:00").
pub const MINUTES_PER_DAY: i32 = 1440;
/// Grid snapping granularity.
pub const SNAP_MINUTES: i32 = 15;
/// Hour rows drawn by the time grid.
pub const HOURS_PER_DAY: u32 = 24;
/// Reference ratio: 60px tall hour rows.
pub const DEFAULT_PIXELS_PER_MINUTE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("malformed time '{0}', expected HH:MM")]
    Malformed(String),
    #[error("time '{0}' is outside 00:00-24:00")]
    OutOfRange(String),
    #[error("minute value {0} is outside 0..=1440")]
    MinutesOutOfRange(i32),
}

/// Parse `HH:MM` into minutes since midnight.
///
/// `24:00` is accepted as the end-of-day boundary so an entry can finish at
/// midnight; anything past it is rejected rather than wrapped.
pub fn time_to_minutes(time: &str) -> Result<i32, TimeError> {
    let (hours, minutes) = time
        .trim()
        .split_once(':')
        .ok_or_else(|| TimeError::Malformed(time.to_string()))?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(TimeError::Malformed(time.to_string()));
    }

    let hours: i32 = hours
        .parse()
        .map_err(|_| TimeError::Malformed(time.to_string()))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| TimeError::Malformed(time.to_string()))?;

    if minutes >= 60 {
        return Err(TimeError::OutOfRange(time.to_string()));
    }

    let total = hours * 60 + minutes;
    if !(0..=MINUTES_PER_DAY).contains(&total) {
        return Err(TimeError::OutOfRange(time.to_string()));
    }

    Ok(total)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
pub fn minutes_to_time(minutes: i32) -> Result<String, TimeError> {
    if !(0..=MINUTES_PER_DAY).contains(&minutes) {
        return Err(TimeError::MinutesOutOfRange(minutes));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Round to the nearest quarter hour, halves rounding up.
pub fn snap_to_quarter_hour(minutes: f32) -> i32 {
    let slots = (minutes / SNAP_MINUTES as f32 + 0.5).floor();
    slots as i32 * SNAP_MINUTES
}

/// Vertical scale of the time grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScale {
    pub pixels_per_minute: f32,
}

impl Default for GridScale {
    fn default() -> Self {
        Self {
            pixels_per_minute: DEFAULT_PIXELS_PER_MINUTE,
        }
    }
}

impl GridScale {
    pub fn from_hour_height(hour_height: f32) -> Self {
        Self {
            pixels_per_minute: hour_height / 60.0,
        }
    }

    pub fn hour_height(&self) -> f32 {
        self.pixels_per_minute * 60.0
    }

    pub fn minutes_to_px(&self, minutes: i32) -> f32 {
        minutes as f32 * self.pixels_per_minute
    }

    pub fn px_to_minutes(&self, px: f32) -> f32 {
        px / self.pixels_per_minute
    }

    /// Height of the full 24 hour column.
    pub fn day_height(&self) -> f32 {
        self.minutes_to_px(MINUTES_PER_DAY)
    }
}
