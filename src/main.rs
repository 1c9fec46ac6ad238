// Week Planner Application
// Main entry point

use chrono::{Duration, Local, NaiveDate};

use week_planner::models::task::{Priority, Task};
use week_planner::services::settings::SettingsService;
use week_planner::services::store::MemoryStore;
use week_planner::ui_egui::WeekPlannerApp;
use week_planner::utils::date::get_week_start;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting Week Planner");

    let settings_service = SettingsService::at_default_location();
    let settings = settings_service.load_or_default();

    let store = match &settings.seed_file {
        Some(path) => MemoryStore::load_json(path).unwrap_or_else(|err| {
            log::warn!("{:#}; starting with sample tasks", err);
            sample_store()
        }),
        None => sample_store(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size(WeekPlannerApp::min_root_size())
            .with_title("Week Planner"),
        ..Default::default()
    };

    eframe::run_native(
        "week-planner",
        options,
        Box::new(move |_cc| Ok(Box::new(WeekPlannerApp::new(settings, store)))),
    )
}

fn sample_store() -> MemoryStore {
    let week_start = get_week_start(Local::now().date_naive(), 0);
    MemoryStore::with_tasks(sample_tasks(week_start))
}

fn sample_tasks(week_start: NaiveDate) -> Vec<Task> {
    let day = |offset: i64| week_start + Duration::days(offset);

    [
        Task::builder()
            .title("Team standup")
            .date(day(1))
            .start_time("09:00")
            .duration_minutes(30)
            .category("meeting"),
        Task::builder()
            .title("Design review")
            .date(day(1))
            .start_time("09:15")
            .end_time("10:30")
            .category("meeting")
            .location("Room 2"),
        Task::builder()
            .title("Gym")
            .date(day(2))
            .start_time("07:00")
            .end_time("08:00")
            .category("fitness"),
        Task::builder()
            .title("Dentist")
            .date(day(3))
            .start_time("14:00")
            .category("appointment"),
        Task::builder()
            .title("Quarterly report")
            .date(day(4))
            .start_time("13:00")
            .end_time("16:00")
            .priority(Priority::High),
        Task::builder()
            .title("Call parents")
            .date(day(6))
            .start_time("18:30")
            .duration_minutes(45)
            .category("personal"),
        Task::builder()
            .title("Public holiday")
            .date(day(5))
            .all_day(true),
    ]
    .into_iter()
    .filter_map(|builder| match builder.build() {
        Ok(task) => Some(task),
        Err(err) => {
            log::warn!("Skipping sample task: {}", err);
            None
        }
    })
    .collect()
}
