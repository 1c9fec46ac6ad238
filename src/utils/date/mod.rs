// Date utility functions
// Week arithmetic and header formatting for the time grid

use chrono::{Datelike, Duration, NaiveDate};

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The date to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc.
pub fn get_week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - first_day_of_week as i64 + 7) % 7;
    date - Duration::days(offset)
}

/// Column header label, e.g. "Sun 7".
pub fn format_day_header(date: NaiveDate) -> String {
    date.format("%a %-d").to_string()
}

/// Grid title, e.g. "January 2024".
pub fn format_month_title(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Compact navigation label, e.g. "Mon, Jan 1".
pub fn format_short_day(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}
