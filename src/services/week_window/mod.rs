//! Which calendar dates the grid shows.
//!
//! The full window is the Sunday-based week around an anchor date. The
//! compact window shows two of those days and slides one day per step,
//! rolling into the neighbouring week at either edge so stepping never skips
//! or repeats a day.

use chrono::{Duration, NaiveDate};

use crate::utils::date::{format_month_title, get_week_start};

pub const DAYS_PER_WEEK: usize = 7;
pub const COMPACT_DAYS: usize = 2;
const LAST_COMPACT_OFFSET: usize = DAYS_PER_WEEK - COMPACT_DAYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Full,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    fn sign(self) -> i64 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    anchor: NaiveDate,
    mode: ViewportMode,
    compact_offset: usize,
}

impl WeekWindow {
    pub fn new(anchor: NaiveDate, mode: ViewportMode) -> Self {
        Self {
            anchor,
            mode,
            compact_offset: 0,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn compact_offset(&self) -> usize {
        self.compact_offset
    }

    /// Sunday of the anchor's week.
    pub fn week_start(&self) -> NaiveDate {
        get_week_start(self.anchor, 0)
    }

    pub fn week_dates(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        let start = self.week_start();
        std::array::from_fn(|i| start + Duration::days(i as i64))
    }

    /// The dates currently shown, left to right.
    pub fn visible_dates(&self) -> Vec<NaiveDate> {
        let week = self.week_dates();
        match self.mode {
            ViewportMode::Full => week.to_vec(),
            ViewportMode::Compact => {
                week[self.compact_offset..self.compact_offset + COMPACT_DAYS].to_vec()
            }
        }
    }

    pub fn column_count(&self) -> usize {
        match self.mode {
            ViewportMode::Full => DAYS_PER_WEEK,
            ViewportMode::Compact => COMPACT_DAYS,
        }
    }

    pub fn set_mode(&mut self, mode: ViewportMode) {
        if self.mode != mode {
            log::debug!("Week window mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Move the anchor by one day.
    pub fn step_day(&mut self, direction: Direction) {
        self.anchor += Duration::days(direction.sign());
    }

    /// Move the anchor by a whole week.
    pub fn step_week(&mut self, direction: Direction) {
        self.anchor += Duration::weeks(direction.sign());
    }

    /// Slide the two-day window by one day, rolling into the adjacent week
    /// and resetting to the opposite edge when it runs off either end.
    pub fn step_compact(&mut self, direction: Direction) {
        match direction {
            Direction::Back if self.compact_offset > 0 => self.compact_offset -= 1,
            Direction::Back => {
                self.step_week(Direction::Back);
                self.compact_offset = LAST_COMPACT_OFFSET;
            }
            Direction::Forward if self.compact_offset < LAST_COMPACT_OFFSET => {
                self.compact_offset += 1
            }
            Direction::Forward => {
                self.step_week(Direction::Forward);
                self.compact_offset = 0;
            }
        }
    }

    /// Mode-appropriate navigation for the header arrows.
    pub fn step(&mut self, direction: Direction) {
        match self.mode {
            ViewportMode::Full => self.step_day(direction),
            ViewportMode::Compact => self.step_compact(direction),
        }
    }

    /// Jump to a date; in compact mode the window starts on that date where
    /// the week allows it.
    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
        let day_index = (date - self.week_start()).num_days() as usize;
        self.compact_offset = day_index.min(LAST_COMPACT_OFFSET);
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.go_to(today);
    }

    /// Header title, named after the first visible day's month.
    pub fn title(&self) -> String {
        self.visible_dates()
            .first()
            .map(|d| format_month_title(*d))
            .unwrap_or_default()
    }
}
