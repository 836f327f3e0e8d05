use std::collections::HashMap;

use egui::{Color32, Id, Pos2, Rect, Response, Rounding, Sense, Stroke, Ui, Vec2};
use site_schedule::engine::{hit_test, GestureMode};
use site_schedule::model::{BarSpan, DependencyKind, Task, TimelineMapper};
use uuid::Uuid;

use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_GAP: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// What the user did to the chart this frame. Applied by the app after rendering.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub select: Option<Uuid>,
    pub clear_selection: bool,
    /// Press on a bar: task, gesture mode, and anchor in timeline coordinates.
    pub press: Option<(Uuid, GestureMode, f32)>,
    /// Pointer position in timeline coordinates while a bar is dragged.
    pub drag_to: Option<f32>,
    pub released: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

/// Render the schedule chart area (right panel).
pub fn show_schedule_chart(
    tasks: &[Task],
    mapper: &TimelineMapper,
    selected: Option<Uuid>,
    editable: bool,
    edge_width: f32,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let chart_width = mapper.total_width().max(available.x);
    let chart_height = HEADER_HEIGHT + tasks.len() as f32 * (ROW_HEIGHT + ROW_GAP) + 40.0;

    // Zoom presets with Ctrl+scroll
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll > 0.0 {
            interaction.zoom_in = true;
        } else if scroll < 0.0 {
            interaction.zoom_out = true;
        }
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let height = response.rect.height();
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            for i in 0..tasks.len() {
                if i % 2 == 1 {
                    painter.rect_filled(
                        Rect::from_min_size(
                            Pos2::new(origin.x, row_top(origin, i)),
                            Vec2::new(chart_width, ROW_HEIGHT + ROW_GAP),
                        ),
                        0.0,
                        theme::BG_PANEL,
                    );
                }
            }
            draw_day_grid(&painter, origin, mapper, chart_width, height);
            draw_today_line(&painter, origin, mapper, height);

            let rows: HashMap<Uuid, usize> =
                tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
            draw_links(&painter, origin, mapper, tasks, &rows);

            for (i, task) in tasks.iter().enumerate() {
                let span = mapper.bar_span(task.start, task.end);
                let bar_rect = Rect::from_min_size(
                    Pos2::new(origin.x + span.left, row_top(origin, i) + theme::BAR_INSET),
                    Vec2::new(span.width, ROW_HEIGHT - theme::BAR_INSET * 2.0),
                );
                let is_selected = selected == Some(task.id);
                draw_task_bar(&painter, task, bar_rect, is_selected);

                let bar_sense = if editable {
                    Sense::click_and_drag()
                } else {
                    Sense::click()
                };
                let bar_response = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("task-bar", task.id)),
                    bar_sense,
                );
                let handle_rect = Rect::from_center_size(
                    Pos2::new(origin.x + span.progress_x(task.progress), bar_rect.bottom()),
                    Vec2::splat(theme::PROGRESS_HANDLE),
                );
                let handle_response = ui.interact(
                    handle_rect.expand(2.0),
                    ui.make_persistent_id(("progress-handle", task.id)),
                    if editable { Sense::drag() } else { Sense::hover() },
                );

                if bar_response.clicked() {
                    interaction.select = Some(task.id);
                    consumed_click = true;
                }

                if handle_response.drag_started() {
                    let anchor = press_x(ui, &handle_response) - origin.x;
                    interaction.press = Some((task.id, GestureMode::Progress, anchor));
                } else if bar_response.drag_started() {
                    let anchor = press_x(ui, &bar_response) - origin.x;
                    let mode = hit_test(span, anchor, edge_width).unwrap_or(GestureMode::Move);
                    interaction.press = Some((task.id, mode, anchor));
                }
                if matches!(interaction.press, Some((id, _, _)) if id == task.id) {
                    interaction.select = Some(task.id);
                    consumed_click = true;
                }

                for r in [&bar_response, &handle_response] {
                    if r.dragged() {
                        if let Some(pos) = r.interact_pointer_pos() {
                            interaction.drag_to = Some(pos.x - origin.x);
                        }
                    }
                    if r.drag_stopped() {
                        interaction.released = true;
                    }
                }

                // Cursor affordances
                if editable {
                    if handle_response.hovered() || handle_response.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeColumn);
                    } else if bar_response.hovered() || bar_response.dragged() {
                        let hover_mode = bar_response
                            .hover_pos()
                            .and_then(|p| hit_test(span, p.x - origin.x, edge_width));
                        let icon = match hover_mode {
                            Some(GestureMode::ResizeStart) | Some(GestureMode::ResizeEnd) => {
                                egui::CursorIcon::ResizeHorizontal
                            }
                            _ if bar_response.dragged() => egui::CursorIcon::Grabbing,
                            _ => egui::CursorIcon::Grab,
                        };
                        ui.ctx().set_cursor_icon(icon);
                    }
                    if is_selected || bar_response.hovered() {
                        draw_handles(&painter, bar_rect, handle_rect);
                    }
                }

                if bar_response.hovered() && !bar_response.dragged() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        Id::new(("task-tip", task.id)),
                        |ui| {
                            ui.strong(&task.name);
                            ui.label(format!(
                                "{} → {}",
                                task.start.format("%d/%m/%Y"),
                                task.end.format("%d/%m/%Y"),
                            ));
                            ui.label(format!("{} · {}%", task.status.label(), task.progress));
                            for dep in &task.dependencies {
                                if let Some(&row) = rows.get(&dep.task_id) {
                                    ui.label(format!("after {} ({})", tasks[row].name, dep.label()));
                                }
                            }
                        },
                    );
                }
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click {
                interaction.clear_selection = true;
            }
        });

    interaction
}

fn row_top(origin: Pos2, row: usize) -> f32 {
    origin.y + HEADER_HEIGHT + row as f32 * (ROW_HEIGHT + ROW_GAP) + ROW_GAP
}

fn row_mid(origin: Pos2, row: usize) -> f32 {
    row_top(origin, row) + ROW_HEIGHT / 2.0
}

/// X where the press began, falling back to the current pointer position.
fn press_x(ui: &Ui, response: &Response) -> f32 {
    ui.input(|i| i.pointer.press_origin())
        .or_else(|| response.interact_pointer_pos())
        .map(|p| p.x)
        .unwrap_or(0.0)
}

fn draw_day_grid(
    painter: &egui::Painter,
    origin: Pos2,
    mapper: &TimelineMapper,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let day_width = mapper.day_width;
    for tick in mapper.day_ticks() {
        let x = origin.x + tick.offset;

        if tick.is_weekend && day_width >= 6.0 {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(x, origin.y + HEADER_HEIGHT),
                    Vec2::new(day_width, height - HEADER_HEIGHT),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }

        if tick.is_month_start || day_width >= 12.0 {
            painter.line_segment(
                [
                    Pos2::new(x, origin.y + HEADER_HEIGHT),
                    Pos2::new(x, origin.y + height),
                ],
                Stroke::new(if tick.is_month_start { 1.0 } else { 0.5 }, theme::GRID_LINE),
            );
        }

        if day_width >= 20.0 {
            let color = if tick.is_weekend {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                Pos2::new(x + 3.0, origin.y + 30.0),
                egui::Align2::LEFT_CENTER,
                tick.date.format("%d").to_string(),
                theme::font_sub(),
                color,
            );
        }

        if tick.is_month_start || tick.offset == 0.0 {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                tick.date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, mapper: &TimelineMapper, height: f32) {
    let today = chrono::Local::now().date_naive();
    if today < mapper.origin || today > mapper.last_visible_date() {
        return;
    }
    let x = origin.x + mapper.date_to_offset(today);
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

/// Elbow connector from each predecessor's reference edge to the
/// successor edge its relation constrains.
fn draw_links(
    painter: &egui::Painter,
    origin: Pos2,
    mapper: &TimelineMapper,
    tasks: &[Task],
    rows: &HashMap<Uuid, usize>,
) {
    let stroke = Stroke::new(1.0, theme::LINK_COLOR);
    let edge_x = |span: BarSpan, at_finish: bool| {
        origin.x + if at_finish { span.right() } else { span.left }
    };

    for (row, task) in tasks.iter().enumerate() {
        let succ = mapper.bar_span(task.start, task.end);
        for dep in &task.dependencies {
            let Some(&pred_row) = rows.get(&dep.task_id) else {
                continue;
            };
            let pred_task = &tasks[pred_row];
            let pred = mapper.bar_span(pred_task.start, pred_task.end);
            let (from_finish, to_finish) = match dep.kind {
                DependencyKind::FinishToStart => (true, false),
                DependencyKind::StartToStart => (false, false),
                DependencyKind::FinishToFinish => (true, true),
                DependencyKind::StartToFinish => (false, true),
            };

            let from = Pos2::new(edge_x(pred, from_finish), row_mid(origin, pred_row));
            let to = Pos2::new(edge_x(succ, to_finish), row_mid(origin, row));
            let elbow_x = if from_finish { from.x + 6.0 } else { from.x - 6.0 };

            painter.line_segment([from, Pos2::new(elbow_x, from.y)], stroke);
            painter.line_segment([Pos2::new(elbow_x, from.y), Pos2::new(elbow_x, to.y)], stroke);
            painter.line_segment([Pos2::new(elbow_x, to.y), to], stroke);

            let dir = if to.x >= elbow_x { -1.0 } else { 1.0 };
            painter.line_segment([to, Pos2::new(to.x + dir * 4.0, to.y - 3.0)], stroke);
            painter.line_segment([to, Pos2::new(to.x + dir * 4.0, to.y + 3.0)], stroke);
        }
    }
}

fn draw_task_bar(painter: &egui::Painter, task: &Task, bar_rect: Rect, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, theme::status_color(task.status));

    if task.progress > 0 {
        let progress_rect = Rect::from_min_size(
            bar_rect.min,
            Vec2::new(
                bar_rect.width() * f32::from(task.progress) / 100.0,
                bar_rect.height(),
            ),
        );
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if task.is_critical {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.5, theme::CRITICAL_OUTLINE));
    }
    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Task name on bar (single line, clipped to bar bounds)
    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect, progress_handle: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() + 1.5, bar_rect.right() - 5.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }

    let c = progress_handle.center();
    let r = progress_handle.width() / 2.0;
    painter.add(egui::Shape::convex_polygon(
        vec![
            Pos2::new(c.x, c.y - r),
            Pos2::new(c.x + r, c.y + r),
            Pos2::new(c.x - r, c.y + r),
        ],
        theme::HANDLE_COLOR,
        Stroke::NONE,
    ));
}
