mod lifecycle;
mod navigation;
mod status_bar;

use chrono::NaiveDate;

use crate::models::entry::CalendarEntry;
use crate::models::settings::SchedulerSettings;
use crate::models::task::TaskId;
use crate::services::store::MemoryStore;
use crate::services::week_window::WeekWindow;
use crate::ui_egui::scheduler::GridScheduler;

const MIN_ROOT_WIDTH: f32 = 320.0;
const MIN_ROOT_HEIGHT: f32 = 220.0;

pub struct WeekPlannerApp {
    store: MemoryStore,
    settings: SchedulerSettings,
    window: WeekWindow,
    scheduler: GridScheduler,
    /// Projection of the store listing, rebuilt when the revision moves
    entries: Vec<CalendarEntry>,
    entries_revision: Option<u64>,
    today: NaiveDate,
    /// Current-time indicator position, captured once at startup
    mounted_at_minute: i32,
    status: Option<String>,
    /// Task shown in the details window
    inspecting: Option<TaskId>,
    /// Task awaiting delete confirmation
    pending_delete: Option<TaskId>,
}

impl eframe::App for WeekPlannerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        self.handle_exit(gl);
    }
}

impl WeekPlannerApp {
    pub fn min_root_size() -> [f32; 2] {
        [MIN_ROOT_WIDTH, MIN_ROOT_HEIGHT]
    }
}
