// Benchmark for grid layout
// Measures overlap lane assignment and full week composition

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use week_planner::models::entry::{CalendarEntry, ColorKey};
use week_planner::services::layout::layout_day;
use week_planner::ui_egui::views::grid_model::{build_week_grid, GridInputs};
use week_planner::utils::time::GridScale;

fn week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

/// `count` entries per day, staggered so neighbours overlap.
fn entries(days: i64, count: usize) -> Vec<CalendarEntry> {
    (0..days)
        .flat_map(|day| {
            (0..count).map(move |i| {
                let start = ((i * 37) % 1380) as i32;
                CalendarEntry {
                    id: day * 1000 + i as i64,
                    title: format!("task {}", i),
                    date: week_start() + Duration::days(day),
                    start_minute: start,
                    end_minute: (start + 45 + (i % 4) as i32 * 15).min(1440),
                    is_all_day: false,
                    color: ColorKey::Blue,
                }
            })
        })
        .collect()
}

fn bench_layout_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_day");

    for count in [10, 50, 200].iter() {
        let day = entries(1, *count);
        let refs: Vec<&CalendarEntry> = day.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &refs, |b, refs| {
            b.iter(|| layout_day(black_box(refs)));
        });
    }

    group.finish();
}

fn bench_build_week_grid(c: &mut Criterion) {
    let week = entries(7, 20);
    let dates: Vec<NaiveDate> = (0..7).map(|d| week_start() + Duration::days(d)).collect();

    c.bench_function("build_week_grid_140", |b| {
        b.iter(|| {
            build_week_grid(black_box(&GridInputs {
                entries: &week,
                dates: &dates,
                session: None,
                scale: GridScale::default(),
                min_block_height: 20.0,
                today: week_start(),
                now_minute: Some(600),
            }))
        });
    });
}

criterion_group!(benches, bench_layout_day, bench_build_week_grid);
criterion_main!(benches);
