use egui::{Color32, RichText, Ui};
use site_schedule::model::Task;
use uuid::Uuid;

use crate::ui::theme;

/// Actions that the activity list can request.
pub enum TaskTableAction {
    None,
    Select(Uuid),
    Delete(Uuid),
    Add,
}

/// Render the activity list as a grid: name, dates, progress.
pub fn show_task_table(
    tasks: &[Task],
    selected_task: Option<Uuid>,
    editable: bool,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Activities").strong().size(15.0));
        ui.label(
            RichText::new(tasks.len().to_string())
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let add = egui::Button::new(RichText::new("＋ Add").color(Color32::WHITE))
                .fill(theme::ACCENT)
                .rounding(egui::Rounding::same(4.0));
            if ui.add_enabled(editable, add).clicked() {
                action = TaskTableAction::Add;
            }
        });
    });
    ui.separator();

    if tasks.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new("No activities yet").color(theme::TEXT_DIM).italics());
        return action;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("activity_grid")
                .num_columns(5)
                .striped(true)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    for heading in ["ACTIVITY", "START", "FINISH", "DONE", ""] {
                        ui.label(RichText::new(heading).size(9.0).color(theme::TEXT_DIM).strong());
                    }
                    ui.end_row();

                    for task in tasks {
                        let is_selected = selected_task == Some(task.id);
                        let mut name = RichText::new(&task.name)
                            .size(12.0)
                            .color(theme::status_color(task.status));
                        if task.is_critical {
                            name = name.strong();
                        }
                        if ui.selectable_label(is_selected, name).clicked() {
                            action = TaskTableAction::Select(task.id);
                        }

                        for date in [task.start, task.end] {
                            ui.label(
                                RichText::new(date.format("%d/%m/%y").to_string())
                                    .size(10.5)
                                    .color(theme::TEXT_SECONDARY),
                            );
                        }
                        ui.label(RichText::new(format!("{}%", task.progress)).size(10.5));

                        if editable
                            && ui
                                .small_button("✕")
                                .on_hover_text("Delete activity")
                                .clicked()
                        {
                            action = TaskTableAction::Delete(task.id);
                        } else if !editable {
                            ui.label("");
                        }
                        ui.end_row();
                    }
                });
        });

    action
}
