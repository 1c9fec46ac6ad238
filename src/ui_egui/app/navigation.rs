use egui::RichText;

use super::WeekPlannerApp;
use crate::services::week_window::{Direction, ViewportMode};
use crate::utils::date::format_short_day;

impl WeekPlannerApp {
    pub(super) fn navigate(&mut self, direction: Direction) {
        self.window.step(direction);
    }

    pub(super) fn navigate_week(&mut self, direction: Direction) {
        self.window.step_week(direction);
    }

    pub(super) fn jump_to_today(&mut self) {
        self.window.go_to_today(self.today);
    }

    /// Navigation is ignored while a block is being dragged so the columns
    /// under the pointer do not shift mid-session.
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        if !self.scheduler.is_idle() || ctx.wants_keyboard_input() {
            return;
        }

        let (left, right, page_up, page_down, today) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::PageUp),
                i.key_pressed(egui::Key::PageDown),
                i.key_pressed(egui::Key::T),
            )
        });

        if left {
            self.navigate(Direction::Back);
        }
        if right {
            self.navigate(Direction::Forward);
        }
        if page_up {
            self.navigate_week(Direction::Back);
        }
        if page_down {
            self.navigate_week(Direction::Forward);
        }
        if today {
            self.jump_to_today();
        }
    }

    pub(super) fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("week_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let idle = self.scheduler.is_idle();
                ui.add_enabled_ui(idle, |ui| {
                    if ui.button("◀").on_hover_text("Previous").clicked() {
                        self.navigate(Direction::Back);
                    }
                    if ui.button("Today").clicked() {
                        self.jump_to_today();
                    }
                    if ui.button("▶").on_hover_text("Next").clicked() {
                        self.navigate(Direction::Forward);
                    }
                });

                ui.add_space(8.0);
                ui.heading(self.window.title());

                if self.window.mode() == ViewportMode::Compact {
                    if let (Some(first), Some(last)) = (
                        self.window.visible_dates().first().copied(),
                        self.window.visible_dates().last().copied(),
                    ) {
                        ui.label(
                            RichText::new(format!(
                                "{} – {}",
                                format_short_day(first),
                                format_short_day(last)
                            ))
                            .weak(),
                        );
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let count = self.store.len();
                    ui.label(format!(
                        "{} task{}",
                        count,
                        if count == 1 { "" } else { "s" }
                    ));
                });
            });
        });
    }
}
