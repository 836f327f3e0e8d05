use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};
use site_schedule::model::{TaskDraft, TaskStatus};
use site_schedule::DraftError;

use crate::app::ScheduleApp;
use crate::ui::theme;

/// Field values of the "Add Activity" dialog.
pub struct NewActivityForm {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: TaskStatus,
    pub is_critical: bool,
    pub boq_item_id: String,
    pub error: Option<DraftError>,
}

impl NewActivityForm {
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            start: today,
            end: site_schedule::model::task::shift_days(today, 6),
            status: TaskStatus::default(),
            is_critical: false,
            boq_item_id: String::new(),
            error: None,
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            start: Some(self.start),
            end: Some(self.end),
            status: self.status,
            is_critical: self.is_critical,
            dependencies: Vec::new(),
            boq_item_id: Some(self.boq_item_id.clone()),
        }
    }
}

/// Render the "Add Activity" dialog.
pub fn show_add_task_dialog(app: &mut ScheduleApp, ctx: &Context) {
    let mut should_close = false;
    let mut should_create = false;

    Window::new(RichText::new("Add Activity").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            let form = &mut app.new_activity;
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut form.name).hint_text("Activity name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut form.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("dlg_dp_end"));
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_status")
                        .selected_text(form.status.label())
                        .show_ui(ui, |ui| {
                            for status in TaskStatus::all() {
                                ui.selectable_value(&mut form.status, *status, status.label());
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("BOQ item").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut form.boq_item_id).hint_text("optional"),
                    );
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut form.is_critical, "Critical activity");
                    ui.end_row();
                });

            if let Some(error) = &form.error {
                ui.add_space(4.0);
                ui.label(RichText::new(error.to_string()).color(theme::TODAY_LINE).size(11.0));
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    should_create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_create {
        // Stays open with the validation message when the draft is rejected.
        if app.create_task_from_dialog() {
            should_close = true;
        }
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_task = false;
        app.new_activity = NewActivityForm::starting(chrono::Local::now().date_naive());
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut ScheduleApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 190.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Site Schedule").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Construction activity scheduling");
                ui.label("with linked start and finish dates.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
