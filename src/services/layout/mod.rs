//! Side-by-side lanes for overlapping entries within one day.
//!
//! This is a fixed-step heuristic rather than an interval-graph colouring:
//! each entry is pushed right by 25% for every earlier (by start time) entry it
//! intersects, capped at 50%, and narrowed by 25% for every entry it
//! intersects at all, floored at 50%. Offset plus width never exceeds 100%.
//! Recomputed on every render; nothing is cached.

use crate::models::entry::CalendarEntry;
use crate::models::task::TaskId;

pub const OVERLAP_STEP_PERCENT: f32 = 25.0;
pub const MAX_OFFSET_PERCENT: f32 = 50.0;
pub const MIN_WIDTH_PERCENT: f32 = 50.0;

/// Horizontal placement of one entry inside its day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub offset_percent: f32,
    pub width_percent: f32,
}

impl Lane {
    pub const FULL: Lane = Lane {
        offset_percent: 0.0,
        width_percent: 100.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanedEntry<'a> {
    pub entry: &'a CalendarEntry,
    pub lane: Lane,
}

impl LanedEntry<'_> {
    pub fn id(&self) -> TaskId {
        self.entry.id
    }
}

/// Lay out the timed entries of a single day.
///
/// The result is sorted by start minute; equal starts keep their input
/// order, so ties are broken deterministically.
pub fn layout_day<'a>(entries: &[&'a CalendarEntry]) -> Vec<LanedEntry<'a>> {
    layout_day_with_min_duration(entries, 0)
}

/// Like [`layout_day`], but every entry occupies at least `min_minutes`
/// for intersection purposes, matching blocks stretched to a minimum height.
pub fn layout_day_with_min_duration<'a>(
    entries: &[&'a CalendarEntry],
    min_minutes: i32,
) -> Vec<LanedEntry<'a>> {
    let mut sorted: Vec<&CalendarEntry> = entries.to_vec();
    sorted.sort_by_key(|entry| entry.start_minute);

    sorted
        .iter()
        .enumerate()
        .map(|(index, &entry)| {
            let earlier = sorted[..index]
                .iter()
                .filter(|other| visually_overlap(entry, other, min_minutes))
                .count();
            let later = sorted[index + 1..]
                .iter()
                .filter(|other| visually_overlap(entry, other, min_minutes))
                .count();

            let offset = (earlier as f32 * OVERLAP_STEP_PERCENT).min(MAX_OFFSET_PERCENT);
            let width = (100.0 - (earlier + later) as f32 * OVERLAP_STEP_PERCENT)
                .max(MIN_WIDTH_PERCENT);

            LanedEntry {
                entry,
                lane: Lane {
                    offset_percent: offset,
                    width_percent: width,
                },
            }
        })
        .collect()
}

fn visual_end(entry: &CalendarEntry, min_minutes: i32) -> i32 {
    entry.end_minute.max(entry.start_minute + min_minutes)
}

fn visually_overlap(a: &CalendarEntry, b: &CalendarEntry, min_minutes: i32) -> bool {
    a.start_minute < visual_end(b, min_minutes) && visual_end(a, min_minutes) > b.start_minute
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ColorKey;
    use chrono::NaiveDate;

    fn entry(id: i64, start: i32, end: i32) -> CalendarEntry {
        CalendarEntry {
            id,
            title: format!("entry {}", id),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_minute: start,
            end_minute: end,
            is_all_day: false,
            color: ColorKey::Blue,
        }
    }

    fn lanes(entries: &[CalendarEntry]) -> Vec<(TaskId, Lane)> {
        let refs: Vec<&CalendarEntry> = entries.iter().collect();
        layout_day(&refs).iter().map(|l| (l.id(), l.lane)).collect()
    }

    #[test]
    fn test_isolated_entries_take_full_width() {
        let result = lanes(&[entry(1, 540, 600), entry(2, 600, 660)]);
        assert_eq!(result, vec![(1, Lane::FULL), (2, Lane::FULL)]);
    }

    #[test]
    fn test_zero_length_entry_shares_lane_by_visual_height() {
        let a = entry(1, 540, 540);
        let b = entry(2, 540, 600);

        let plain: Vec<Lane> = layout_day(&[&a, &b]).iter().map(|l| l.lane).collect();
        assert_eq!(plain, vec![Lane::FULL, Lane::FULL]);

        let visual = layout_day_with_min_duration(&[&a, &b], 20);
        assert_eq!(visual[0].lane.width_percent, 75.0);
        assert_eq!(visual[1].lane.offset_percent, 25.0);

        // Stretching never reaches an entry past the visual end.
        let c = entry(3, 560, 600);
        let laid: Vec<Lane> = layout_day_with_min_duration(&[&a, &c], 20)
            .iter()
            .map(|l| l.lane)
            .collect();
        assert_eq!(laid, vec![Lane::FULL, Lane::FULL]);
    }

    #[test]
    fn test_two_overlapping_entries_share_the_column() {
        let result = lanes(&[entry(2, 570, 630), entry(1, 540, 600)]);

        assert_eq!(result[0].0, 1);
        assert_eq!(result[1].0, 2);
        for (_, lane) in &result {
            assert!(lane.width_percent <= 75.0);
        }
        assert_ne!(result[0].1.offset_percent, result[1].1.offset_percent);
        assert_eq!(result[1].1.offset_percent, 25.0);
    }

    #[test]
    fn test_three_way_overlap_respects_floor_and_cap() {
        let result = lanes(&[
            entry(1, 540, 660),
            entry(2, 560, 640),
            entry(3, 580, 620),
            entry(4, 590, 610),
        ]);

        for (_, lane) in &result {
            assert!(lane.width_percent >= MIN_WIDTH_PERCENT);
            assert!(lane.offset_percent <= MAX_OFFSET_PERCENT);
            assert!(lane.offset_percent + lane.width_percent <= 100.0);
        }
        assert_eq!(result[3].1.offset_percent, 50.0);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let result = lanes(&[entry(7, 540, 600), entry(3, 540, 600)]);
        assert_eq!(result[0].0, 7);
        assert_eq!(result[1].0, 3);
        assert_eq!(result[1].1.offset_percent, 25.0);
    }

    #[test]
    fn test_empty_day() {
        assert!(layout_day(&[]).is_empty());
    }
}
