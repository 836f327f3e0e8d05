use egui::{Id, RichText, Ui};
use site_schedule::model::{Dependency, DependencyKind, Task, TaskStatus};
use uuid::Uuid;

use crate::ui::theme;

/// Actions the editor can request.
pub enum EditorAction {
    None,
    Changed(Task),
    AddDependency(Dependency),
    RemoveDependency(Uuid),
}

/// Persistent state for the "add predecessor" picker.
#[derive(Clone)]
struct DepPickerState {
    predecessor: Option<Uuid>,
    kind: DependencyKind,
    lag: i64,
}

impl Default for DepPickerState {
    fn default() -> Self {
        Self {
            predecessor: None,
            kind: DependencyKind::FinishToStart,
            lag: 0,
        }
    }
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render an inline editor for the selected task.
///
/// Edits are made on a copy; the app pushes the copy through the schedule
/// editor so dependents move with it.
pub fn show_task_editor(task: &Task, all_tasks: &[Task], editable: bool, ui: &mut Ui) -> EditorAction {
    let mut action = EditorAction::None;
    let mut draft = task.clone();
    let mut changed = false;

    ui.add_space(6.0);
    ui.label(RichText::new("Edit Activity").strong().size(13.0).color(theme::TEXT_PRIMARY));
    ui.add_space(4.0);

    ui.add_enabled_ui(editable, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        // ── Name ────────────────────────────────────────────────────
        field_label(ui, "Name");
        let name_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut draft.name),
        );
        if name_edit.changed() {
            changed = true;
        }

        // ── Dates ───────────────────────────────────────────────────
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                field_label(ui, "Start");
                let resp = ui.add(
                    egui_extras::DatePickerButton::new(&mut draft.start).id_salt("dp_start"),
                );
                if resp.changed() {
                    if draft.start > draft.end {
                        draft.end = draft.start;
                    }
                    changed = true;
                }
            });
            ui.vertical(|ui| {
                field_label(ui, "End");
                let resp = ui.add(egui_extras::DatePickerButton::new(&mut draft.end).id_salt("dp_end"));
                if resp.changed() {
                    if draft.end < draft.start {
                        draft.start = draft.end;
                    }
                    changed = true;
                }
            });
        });

        // ── Progress / status ───────────────────────────────────────
        field_label(ui, "Progress");
        if ui
            .add(egui::Slider::new(&mut draft.progress, 0..=100).suffix("%"))
            .changed()
        {
            changed = true;
        }

        field_label(ui, "Status");
        egui::ComboBox::from_id_salt("status_combo")
            .selected_text(draft.status.label())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for status in TaskStatus::all() {
                    if ui
                        .selectable_value(&mut draft.status, *status, status.label())
                        .changed()
                    {
                        changed = true;
                    }
                }
            });

        if ui.checkbox(&mut draft.is_critical, "Critical activity").changed() {
            changed = true;
        }

        // ── Predecessors ────────────────────────────────────────────
        ui.add_space(4.0);
        field_label(ui, "Predecessors");
        for dep in &task.dependencies {
            let name = all_tasks
                .iter()
                .find(|t| t.id == dep.task_id)
                .map(|t| t.name.as_str())
                .unwrap_or("(missing task)");
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{} [{}]", name, dep.label())).size(11.0));
                if ui.small_button("✕").clicked() {
                    action = EditorAction::RemoveDependency(dep.task_id);
                }
            });
        }

        let picker_id = Id::new(("dep-picker", task.id));
        let mut picker: DepPickerState = ui.data(|d| d.get_temp(picker_id)).unwrap_or_default();
        let candidates: Vec<&Task> = all_tasks
            .iter()
            .filter(|t| t.id != task.id && !task.depends_on(t.id))
            .collect();

        ui.horizontal(|ui| {
            let selected_name = picker
                .predecessor
                .and_then(|id| candidates.iter().find(|t| t.id == id))
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "Choose…".to_string());
            egui::ComboBox::from_id_salt(("dep_target", task.id))
                .selected_text(selected_name)
                .width(120.0)
                .show_ui(ui, |ui| {
                    for candidate in &candidates {
                        ui.selectable_value(
                            &mut picker.predecessor,
                            Some(candidate.id),
                            candidate.name.as_str(),
                        );
                    }
                });
            egui::ComboBox::from_id_salt(("dep_kind", task.id))
                .selected_text(picker.kind.short_label())
                .width(48.0)
                .show_ui(ui, |ui| {
                    for kind in DependencyKind::all() {
                        ui.selectable_value(&mut picker.kind, *kind, kind.short_label());
                    }
                });
            ui.add(egui::DragValue::new(&mut picker.lag).range(-365..=365).suffix("d"));
            if ui
                .add_enabled(picker.predecessor.is_some(), egui::Button::new("Link"))
                .clicked()
            {
                if let Some(predecessor) = picker.predecessor.take() {
                    action = EditorAction::AddDependency(Dependency::new(
                        predecessor,
                        picker.kind,
                        picker.lag,
                    ));
                }
            }
        });
        ui.data_mut(|d| d.insert_temp(picker_id, picker));
    });

    if changed && matches!(action, EditorAction::None) {
        action = EditorAction::Changed(draft);
    }
    action
}
