// Property tests for overlap layout and grid geometry

use chrono::NaiveDate;
use proptest::prelude::*;

use week_planner::models::entry::{CalendarEntry, ColorKey};
use week_planner::services::layout::{layout_day, MAX_OFFSET_PERCENT, MIN_WIDTH_PERCENT};
use week_planner::utils::time::{snap_to_quarter_hour, GridScale, MINUTES_PER_DAY};

fn entry(id: i64, start: i32, length: i32) -> CalendarEntry {
    CalendarEntry {
        id,
        title: format!("entry {}", id),
        date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        start_minute: start,
        end_minute: (start + length).min(MINUTES_PER_DAY),
        is_all_day: false,
        color: ColorKey::Yellow,
    }
}

fn entries_strategy() -> impl Strategy<Value = Vec<CalendarEntry>> {
    proptest::collection::vec((0..MINUTES_PER_DAY, 1..240i32), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (start, length))| entry(i as i64 + 1, start, length))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_lanes_stay_inside_the_column(entries in entries_strategy()) {
        let refs: Vec<&CalendarEntry> = entries.iter().collect();
        let laid_out = layout_day(&refs);

        prop_assert_eq!(laid_out.len(), entries.len());
        for laned in &laid_out {
            prop_assert!(laned.lane.offset_percent >= 0.0);
            prop_assert!(laned.lane.offset_percent <= MAX_OFFSET_PERCENT);
            prop_assert!(laned.lane.width_percent >= MIN_WIDTH_PERCENT);
            prop_assert!(laned.lane.offset_percent + laned.lane.width_percent <= 100.0);
        }
        for pair in laid_out.windows(2) {
            prop_assert!(pair[0].entry.start_minute <= pair[1].entry.start_minute);
        }
    }

    #[test]
    fn prop_overlapping_pairs_are_narrowed_and_offset(
        a_start in 0..1200i32,
        a_len in 15..240i32,
        shift in 0..240i32,
        b_len in 15..240i32,
    ) {
        let a = entry(1, a_start, a_len);
        let b = entry(2, (a_start + shift).min(MINUTES_PER_DAY - 1), b_len);
        prop_assume!(a.overlaps(&b));

        let laid_out = layout_day(&[&a, &b]);
        prop_assert!(laid_out[0].lane.width_percent <= 75.0);
        prop_assert!(laid_out[1].lane.width_percent <= 75.0);
        prop_assert!(laid_out[0].lane.offset_percent != laid_out[1].lane.offset_percent);
    }

    #[test]
    fn prop_layout_is_deterministic(entries in entries_strategy()) {
        let refs: Vec<&CalendarEntry> = entries.iter().collect();
        let first: Vec<_> = layout_day(&refs).iter().map(|l| (l.id(), l.lane)).collect();
        let second: Vec<_> = layout_day(&refs).iter().map(|l| (l.id(), l.lane)).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_pixel_round_trip_lands_on_snapped_minute(
        minutes in 0..MINUTES_PER_DAY,
        hour_height in 30.0f32..240.0,
    ) {
        let scale = GridScale::from_hour_height(hour_height);
        let snapped = snap_to_quarter_hour(minutes as f32);
        let back = snap_to_quarter_hour(scale.px_to_minutes(scale.minutes_to_px(snapped)));
        prop_assert_eq!(back, snapped);
    }
}
