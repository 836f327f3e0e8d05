use egui::{menu, RichText, Ui};
use site_schedule::model::ZoomLevel;
use site_schedule::settings::Role;

use crate::app::ScheduleApp;
use crate::ui::theme;

/// Render the top menu bar.
pub fn show_toolbar(app: &mut ScheduleApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  New Project").clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.set_zoom(app.settings.zoom.zoom_in());
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.set_zoom(app.settings.zoom.zoom_out());
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            for zoom in ZoomLevel::all() {
                if ui.radio(app.settings.zoom == *zoom, zoom.label()).clicked() {
                    app.set_zoom(*zoom);
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Role  ").font(theme::font_header()), |ui| {
            for role in Role::all() {
                if ui.radio(app.settings.role == *role, role.label()).clicked() {
                    app.set_role(*role);
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            let access = if app.editor.is_editable() { "" } else { " · read-only" };
            ui.label(
                RichText::new(format!("{}{}{}", app.project.name, modified, access))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
