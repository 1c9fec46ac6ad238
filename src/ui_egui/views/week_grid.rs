//! Week time grid: paints a [`WeekGridModel`] and turns egui pointer input
//! into scheduler calls.

use std::time::Instant;

use chrono::NaiveDate;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::grid_model::{
    build_week_grid, DayColumn, EntryBlock, GhostBlock, GridInputs, WeekGridModel,
    GHOST_OFFSET_PERCENT, GHOST_WIDTH_PERCENT,
};
use super::palette::{entry_fill, entry_text, with_alpha, GridPalette};
use crate::models::entry::CalendarEntry;
use crate::models::task::TaskId;
use crate::services::commit::CommitReport;
use crate::services::store::EntryStore;
use crate::ui_egui::drag::{BlockGeometry, GridMetrics};
use crate::ui_egui::resize::{draw_handle, HandleRects};
use crate::ui_egui::scheduler::{GridScheduler, SessionEnd};
use crate::utils::time::{GridScale, HOURS_PER_DAY};

pub const TIME_LABEL_WIDTH: f32 = 56.0;
const HEADER_HEIGHT: f32 = 28.0;
const ALL_DAY_ROW_HEIGHT: f32 = 20.0;
const BLOCK_INSET: f32 = 1.0;
const BLOCK_ROUNDING: f32 = 4.0;

/// Something the grid wants the host application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    Edit(TaskId),
    Delete(TaskId),
}

#[derive(Debug, Default)]
pub struct WeekGridOutput {
    pub requests: Vec<HostRequest>,
    pub reports: Vec<CommitReport>,
}

impl WeekGridOutput {
    fn record_end(&mut self, end: SessionEnd) {
        if let SessionEnd::Committed(report) = end {
            self.reports.push(report);
        }
    }
}

pub struct WeekGridView<'a> {
    pub scheduler: &'a mut GridScheduler,
    pub store: &'a mut dyn EntryStore,
    pub entries: &'a [CalendarEntry],
    pub dates: &'a [NaiveDate],
    pub scale: GridScale,
    pub today: NaiveDate,
    pub now_minute: Option<i32>,
    pub now: Instant,
}

impl WeekGridView<'_> {
    pub fn show(self, ui: &mut egui::Ui) -> WeekGridOutput {
        let WeekGridView {
            scheduler,
            store,
            entries,
            dates,
            scale,
            today,
            now_minute,
            now,
        } = self;

        let mut output = WeekGridOutput::default();
        let palette = GridPalette::from_visuals(ui.visuals());

        // Session end and cancellation come first so the model below is
        // built from the post-release state.
        let (released, escape, latest_pos) = ui.input(|i| {
            (
                i.pointer.any_released(),
                i.key_pressed(egui::Key::Escape),
                i.pointer.latest_pos(),
            )
        });
        if !scheduler.is_idle() {
            if escape {
                output.record_end(scheduler.pointer_cancel(store, entries, now));
            } else if released {
                if let Some(pos) = latest_pos {
                    scheduler.pointer_move(pos, entries, now);
                }
                output.record_end(scheduler.pointer_up(store, entries, now));
            } else if let Some(pos) = latest_pos {
                scheduler.pointer_move(pos, entries, now);
            }
        }

        let model = build_week_grid(&GridInputs {
            entries,
            dates,
            session: scheduler.session(),
            scale,
            min_block_height: scheduler.min_block_height(),
            today,
            now_minute,
        });

        let column_count = model.columns.len().max(1);
        let day_column_width =
            ((ui.available_width() - TIME_LABEL_WIDTH) / column_count as f32).max(1.0);

        draw_header(ui, &model, day_column_width, &palette);

        egui::ScrollArea::vertical()
            .id_source("week_grid_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let size = Vec2::new(ui.available_width(), model.day_height);
                let (grid_rect, _) = ui.allocate_exact_size(size, Sense::hover());
                let metrics = GridMetrics {
                    origin: grid_rect.min,
                    time_axis_width: TIME_LABEL_WIDTH,
                    day_column_width,
                    column_count,
                    scale,
                };

                draw_background(ui, &model, &metrics, grid_rect, &palette);

                for (column_index, column) in model.columns.iter().enumerate() {
                    for block in column.blocks.iter().filter(|b| !b.hidden) {
                        draw_block(
                            ui,
                            scheduler,
                            &mut output,
                            BlockContext {
                                block,
                                column_index,
                                metrics,
                                entries,
                                dates,
                            },
                        );
                    }
                }

                if let Some(ghost) = &model.ghost {
                    draw_ghost(ui, ghost, &metrics, &palette);
                }

                if let Some(indicator) = model.now_indicator {
                    let x_start = metrics.column_left(indicator.column);
                    let y = grid_rect.top() + indicator.top;
                    let painter = ui.painter();
                    painter.circle_filled(Pos2::new(x_start - 4.0, y), 3.0, palette.now_line);
                    painter.line_segment(
                        [Pos2::new(x_start, y), Pos2::new(x_start + day_column_width, y)],
                        Stroke::new(2.0, palette.now_line),
                    );
                }
            });

        if let Some(session) = scheduler.session() {
            ui.ctx().set_cursor_icon(session.mode().cursor_icon());
        }

        output
    }
}

fn draw_header(ui: &mut egui::Ui, model: &WeekGridModel, column_width: f32, palette: &GridPalette) {
    let max_chips = model.columns.iter().map(|c| c.all_day.len()).max().unwrap_or(0);
    let height = HEADER_HEIGHT + max_chips as f32 * ALL_DAY_ROW_HEIGHT;
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.header_bg);

    for (index, column) in model.columns.iter().enumerate() {
        let left = rect.left() + TIME_LABEL_WIDTH + index as f32 * column_width;
        let cell = Rect::from_min_size(Pos2::new(left, rect.top()), Vec2::new(column_width, height));
        draw_header_cell(&painter, column, cell, palette);
    }
}

fn draw_header_cell(painter: &egui::Painter, column: &DayColumn, cell: Rect, palette: &GridPalette) {
    if column.is_today {
        painter.rect_filled(cell, 0.0, palette.today_bg);
    }
    let text_color = if column.is_today {
        palette.today_text
    } else {
        palette.header_text
    };
    painter.text(
        Pos2::new(cell.center().x, cell.top() + HEADER_HEIGHT / 2.0),
        Align2::CENTER_CENTER,
        &column.label,
        FontId::proportional(14.0),
        text_color,
    );

    for (row, chip) in column.all_day.iter().enumerate() {
        let chip_rect = Rect::from_min_size(
            Pos2::new(
                cell.left() + 2.0,
                cell.top() + HEADER_HEIGHT + row as f32 * ALL_DAY_ROW_HEIGHT + 1.0,
            ),
            Vec2::new(cell.width() - 4.0, ALL_DAY_ROW_HEIGHT - 2.0),
        );
        painter.rect_filled(chip_rect, 3.0, entry_fill(chip.color));
        painter.with_clip_rect(chip_rect).text(
            Pos2::new(chip_rect.left() + 4.0, chip_rect.center().y),
            Align2::LEFT_CENTER,
            &chip.title,
            FontId::proportional(11.0),
            entry_text(chip.color),
        );
    }
}

fn draw_background(
    ui: &egui::Ui,
    model: &WeekGridModel,
    metrics: &GridMetrics,
    grid_rect: Rect,
    palette: &GridPalette,
) {
    let painter = ui.painter();
    painter.rect_filled(grid_rect, 0.0, palette.background);

    for (index, column) in model.columns.iter().enumerate() {
        let left = metrics.column_left(index);
        let column_rect = Rect::from_min_size(
            Pos2::new(left, grid_rect.top()),
            Vec2::new(metrics.day_column_width, grid_rect.height()),
        );
        if column.is_today {
            painter.rect_filled(column_rect, 0.0, palette.today_bg);
        }
        painter.line_segment(
            [column_rect.left_top(), column_rect.left_bottom()],
            Stroke::new(1.0, palette.column_border),
        );
    }

    let hour_height = metrics.scale.hour_height();
    let lines_left = grid_rect.left() + TIME_LABEL_WIDTH;
    for hour in 0..HOURS_PER_DAY {
        let y = grid_rect.top() + hour as f32 * hour_height;
        painter.line_segment(
            [Pos2::new(lines_left, y), Pos2::new(grid_rect.right(), y)],
            Stroke::new(1.0, palette.hour_line),
        );
        let half = y + hour_height / 2.0;
        painter.line_segment(
            [Pos2::new(lines_left, half), Pos2::new(grid_rect.right(), half)],
            Stroke::new(1.0, palette.half_hour_line),
        );
        painter.text(
            Pos2::new(lines_left - 6.0, y + 2.0),
            Align2::RIGHT_TOP,
            format!("{:02}:00", hour),
            FontId::proportional(12.0),
            palette.time_label,
        );
    }
}

struct BlockContext<'a> {
    block: &'a EntryBlock,
    column_index: usize,
    metrics: GridMetrics,
    entries: &'a [CalendarEntry],
    dates: &'a [NaiveDate],
}

fn draw_block(
    ui: &mut egui::Ui,
    scheduler: &mut GridScheduler,
    output: &mut WeekGridOutput,
    ctx: BlockContext<'_>,
) {
    let BlockContext {
        block,
        column_index,
        metrics,
        entries,
        dates,
    } = ctx;

    let geometry = BlockGeometry {
        top: block.top,
        height: block.height,
        day_index: column_index,
    };
    let rect = metrics
        .block_rect(geometry, block.lane.offset_percent, block.lane.width_percent)
        .shrink(BLOCK_INSET);

    let fill = if block.is_preview {
        with_alpha(entry_fill(block.color), 200)
    } else {
        entry_fill(block.color)
    };
    paint_block_body(ui, rect, fill, &block.title, &block.time_label, entry_text(block.color));

    let response = ui.interact(
        rect,
        ui.id().with(("week_grid_block", block.id)),
        Sense::click_and_drag(),
    );

    if scheduler.is_idle() {
        if let Some(hover) = response.hover_pos() {
            let handles = HandleRects::for_block(rect, scheduler.handle_size());
            let cursor = match handles.hit_test(hover) {
                Some(handle) => {
                    draw_handle(ui, &handles, handle, entry_text(block.color));
                    handle.cursor_icon()
                }
                None => egui::CursorIcon::Grab,
            };
            ui.ctx().set_cursor_icon(cursor);
        }
    }

    // egui reports the drag only once the pointer has left its click radius,
    // so the grab zone and anchor come from where the button went down.
    if response.drag_started() {
        let press_origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let (Some(pointer), Some(entry)) =
            (press_origin, entries.iter().find(|e| e.id == block.id))
        {
            scheduler.pointer_down(entry, column_index, rect, pointer, metrics, dates);
        }
    }

    if response.double_clicked() {
        output.requests.push(HostRequest::Edit(block.id));
    }

    response.context_menu(|ui| {
        if ui.button("Edit").clicked() {
            output.requests.push(HostRequest::Edit(block.id));
            ui.close_menu();
        }
        if ui.button("Delete").clicked() {
            output.requests.push(HostRequest::Delete(block.id));
            ui.close_menu();
        }
    });

    response.on_hover_text(format!("{}\n{}", block.title, block.time_label));
}

fn paint_block_body(
    ui: &egui::Ui,
    rect: Rect,
    fill: Color32,
    title: &str,
    time_label: &str,
    text_color: Color32,
) {
    let painter = ui.painter();
    painter.rect_filled(rect, BLOCK_ROUNDING, fill);

    let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    clipped.text(
        rect.left_top() + Vec2::new(4.0, 2.0),
        Align2::LEFT_TOP,
        title,
        FontId::proportional(12.0),
        text_color,
    );
    if rect.height() >= 34.0 {
        clipped.text(
            rect.left_top() + Vec2::new(4.0, 17.0),
            Align2::LEFT_TOP,
            time_label,
            FontId::proportional(10.0),
            with_alpha(text_color, 200),
        );
    }
}

fn draw_ghost(ui: &egui::Ui, ghost: &GhostBlock, metrics: &GridMetrics, palette: &GridPalette) {
    let geometry = BlockGeometry {
        top: ghost.top,
        height: ghost.height,
        day_index: ghost.column,
    };
    let rect = metrics.block_rect(geometry, GHOST_OFFSET_PERCENT, GHOST_WIDTH_PERCENT);
    paint_block_body(
        ui,
        rect,
        with_alpha(entry_fill(ghost.color), 150),
        &ghost.title,
        &ghost.time_label,
        entry_text(ghost.color),
    );
    ui.painter()
        .rect_stroke(rect, BLOCK_ROUNDING, Stroke::new(2.0, palette.ghost_border));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::project_tasks;
    use crate::models::settings::SchedulerSettings;
    use crate::models::task::Task;
    use crate::services::store::MemoryStore;
    use crate::ui_egui::drag::DragMode;
    use egui::{Event, Modifiers, PointerButton, RawInput};

    // Seven 100px columns behind the 56px time axis; no item spacing, so the
    // grid starts right under the 28px header.
    const SCREEN: Vec2 = Vec2::new(756.0, 1000.0);
    const GRID_TOP: f32 = HEADER_HEIGHT;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn week() -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 7)
            .unwrap()
            .iter_days()
            .take(7)
            .collect()
    }

    struct Harness {
        ctx: egui::Context,
        scheduler: GridScheduler,
        store: MemoryStore,
        time: f64,
    }

    impl Harness {
        fn new() -> Self {
            let ctx = egui::Context::default();
            let mut style = (*ctx.style()).clone();
            style.spacing.item_spacing = Vec2::ZERO;
            ctx.set_style(style);
            let task = Task::builder()
                .title("Standup")
                .date(monday())
                .start_time("09:00")
                .end_time("10:00")
                .build()
                .unwrap();
            Self {
                ctx,
                scheduler: GridScheduler::new(&SchedulerSettings::default()),
                store: MemoryStore::with_tasks(vec![task]),
                time: 0.0,
            }
        }

        fn frame(&mut self, events: Vec<Event>) {
            self.time += 1.0 / 60.0;
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, SCREEN)),
                time: Some(self.time),
                events,
                ..RawInput::default()
            };
            let entries = project_tasks(&self.store.list(), 60);
            let dates = week();
            let Harness {
                ctx,
                scheduler,
                store,
                ..
            } = self;
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        WeekGridView {
                            scheduler: &mut *scheduler,
                            store: &mut *store,
                            entries: &entries,
                            dates: &dates,
                            scale: GridScale::default(),
                            today: monday(),
                            now_minute: None,
                            now: Instant::now(),
                        }
                        .show(ui);
                    });
            });
        }
    }

    fn press(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_grab_zone_uses_press_position() {
        let mut harness = Harness::new();
        // 3px inside the top edge of the 09:00 block in the Monday column.
        let pressed_at = Pos2::new(206.0, GRID_TOP + 540.0 + 4.0);

        harness.frame(vec![Event::PointerMoved(pressed_at)]);
        harness.frame(vec![press(pressed_at, true)]);
        assert!(harness.scheduler.is_idle());

        // Pull upward right away; egui only reports the drag once the
        // pointer has left its click radius.
        harness.frame(vec![Event::PointerMoved(pressed_at - Vec2::new(0.0, 20.0))]);

        let session = harness.scheduler.session().expect("drag should have started");
        assert_eq!(session.mode(), DragMode::ResizingStart);
        assert_eq!(session.anchor(), pressed_at);
    }

    #[test]
    fn test_release_commits_resize_from_press_position() {
        let mut harness = Harness::new();
        let pressed_at = Pos2::new(206.0, GRID_TOP + 540.0 + 4.0);
        let released_at = pressed_at - Vec2::new(0.0, 60.0);

        harness.frame(vec![Event::PointerMoved(pressed_at)]);
        harness.frame(vec![press(pressed_at, true)]);
        harness.frame(vec![Event::PointerMoved(pressed_at - Vec2::new(0.0, 20.0))]);
        harness.frame(vec![Event::PointerMoved(released_at)]);
        harness.frame(vec![press(released_at, false)]);

        assert!(harness.scheduler.is_idle());
        let task = harness.store.get(1).unwrap();
        assert_eq!(task.start_time, "08:00");
        assert_eq!(task.end_time.as_deref(), Some("10:00"));
    }
}
