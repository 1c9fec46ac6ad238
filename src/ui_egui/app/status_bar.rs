//! Bottom bar: interaction state, pending writes and the last store message.

use egui::{Color32, RichText};

use super::WeekPlannerApp;
use crate::services::commit::CommitReport;
use crate::ui_egui::drag::DragMode;
use crate::utils::time::minutes_to_time;

fn hint_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_gray(140)
    } else {
        Color32::from_gray(110)
    }
}

impl WeekPlannerApp {
    /// Surface store write failures to the user. Successful writes only
    /// clear a stale error.
    pub(super) fn note_commit_report(&mut self, report: &CommitReport) {
        if let Some(failure) = report.failures.last() {
            self.status = Some(format!(
                "Could not save task {}: {}",
                failure.task_id, failure.error
            ));
        } else if !report.sent.is_empty() {
            self.status = None;
        }
    }

    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let state = match self.scheduler.session() {
                        Some(session) => {
                            let (start, end) = session.preview_minutes();
                            let verb = match session.mode() {
                                DragMode::Moving => "Moving",
                                DragMode::ResizingStart | DragMode::ResizingEnd => "Resizing",
                            };
                            format!(
                                "{} \"{}\" {}–{}",
                                verb,
                                session.title(),
                                minutes_to_time(start).unwrap_or_default(),
                                minutes_to_time(end).unwrap_or_default()
                            )
                        }
                        None => "Drag to move, drag an edge to resize".to_string(),
                    };
                    ui.label(RichText::new(state).color(hint_text_color(is_dark)));

                    if self.scheduler.has_pending_commits() {
                        ui.separator();
                        ui.label(
                            RichText::new(format!(
                                "Saving {}…",
                                self.scheduler.pending_commit_count()
                            ))
                            .color(hint_text_color(is_dark)),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(message) = &self.status {
                            ui.label(RichText::new(message).color(ui.visuals().error_fg_color));
                        }
                    });
                });
            });
    }
}
