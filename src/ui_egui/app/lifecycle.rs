use std::time::Instant;

use chrono::{Local, Timelike};

use super::WeekPlannerApp;
use crate::models::entry::project_tasks;
use crate::models::settings::SchedulerSettings;
use crate::services::store::{EntryStore, MemoryStore};
use crate::services::week_window::{ViewportMode, WeekWindow};
use crate::ui_egui::scheduler::GridScheduler;
use crate::ui_egui::views::week_grid::{HostRequest, WeekGridView};

impl WeekPlannerApp {
    pub fn new(settings: SchedulerSettings, store: MemoryStore) -> Self {
        let now = Local::now();
        let today = now.date_naive();
        let mounted_at_minute = (now.hour() * 60 + now.minute()) as i32;
        log::info!(
            "Week planner starting with {} task(s), hour height {}px",
            store.len(),
            settings.hour_height
        );

        let mut app = Self {
            scheduler: GridScheduler::new(&settings),
            window: WeekWindow::new(today, ViewportMode::Full),
            store,
            settings,
            entries: Vec::new(),
            entries_revision: None,
            today,
            mounted_at_minute,
            status: None,
            inspecting: None,
            pending_delete: None,
        };
        app.refresh_entries();
        app
    }

    /// Re-project the store listing if it changed since the last frame.
    pub(super) fn refresh_entries(&mut self) {
        let revision = self.store.revision();
        if self.entries_revision == Some(revision) {
            return;
        }
        self.entries = project_tasks(&self.store.list(), self.settings.default_duration_minutes);
        self.entries_revision = Some(revision);
        log::debug!(
            "Projected {} entries at store revision {}",
            self.entries.len(),
            revision
        );
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let compact = self.settings.is_compact(ctx.screen_rect().width());
        self.window.set_mode(if compact {
            ViewportMode::Compact
        } else {
            ViewportMode::Full
        });

        self.refresh_entries();
        let report = self.scheduler.tick(&mut self.store, &self.entries, now);
        self.note_commit_report(&report);

        self.handle_keyboard_shortcuts(ctx);
        self.render_header(ctx);
        self.render_status_bar(ctx);

        let dates = self.window.visible_dates();
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                WeekGridView {
                    scheduler: &mut self.scheduler,
                    store: &mut self.store,
                    entries: &self.entries,
                    dates: &dates,
                    scale: self.settings.scale(),
                    today: self.today,
                    now_minute: Some(self.mounted_at_minute),
                    now,
                }
                .show(ui)
            })
            .inner;

        for report in &output.reports {
            self.note_commit_report(report);
        }
        for request in output.requests {
            match request {
                HostRequest::Edit(id) => self.inspecting = Some(id),
                HostRequest::Delete(id) => self.pending_delete = Some(id),
            }
        }

        self.render_task_details(ctx);
        self.render_delete_confirmation(ctx);

        if !self.scheduler.is_idle() {
            ctx.request_repaint();
        } else if let Some(wait) = self.scheduler.next_wakeup(now) {
            ctx.request_repaint_after(wait);
        }
    }

    pub(super) fn handle_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.scheduler.teardown();
        log::info!("Week planner closed");
    }

    fn render_task_details(&mut self, ctx: &egui::Context) {
        let Some(id) = self.inspecting else {
            return;
        };
        let Some(task) = self.store.get(id).cloned() else {
            self.inspecting = None;
            return;
        };

        let mut open = true;
        egui::Window::new(task.title.clone())
            .id(egui::Id::new("task_details"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("task_details_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Date");
                        ui.label(task.date.format("%A, %B %-d, %Y").to_string());
                        ui.end_row();

                        ui.label("Time");
                        if task.is_all_day {
                            ui.label("All day");
                        } else {
                            let end = task.end_time.as_deref().unwrap_or("–");
                            ui.label(format!("{} – {}", task.start_time, end));
                        }
                        ui.end_row();

                        for (label, value) in [
                            ("Location", &task.location),
                            ("Category", &task.category),
                            ("Description", &task.description),
                            ("Notes", &task.notes),
                        ] {
                            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                                ui.label(label);
                                ui.label(value);
                                ui.end_row();
                            }
                        }
                    });
            });

        if !open {
            self.inspecting = None;
        }
    }

    fn render_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete else {
            return;
        };
        let title = self
            .store
            .get(id)
            .map(|task| task.title.clone())
            .unwrap_or_default();

        let mut decision = None;
        egui::Window::new("Delete task")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{}\"?", title));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                if self.store.remove(id).is_some() {
                    log::info!("Deleted task {} \"{}\"", id, title);
                }
                self.pending_delete = None;
            }
            Some(false) => self.pending_delete = None,
            None => {}
        }
    }
}
