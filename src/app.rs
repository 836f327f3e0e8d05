use std::path::PathBuf;

use chrono::NaiveDate;
use site_schedule::engine::{Outcome, ScheduleEditor};
use site_schedule::model::task::shift_days;
use site_schedule::model::{Dependency, DependencyKind, Project, Task, TaskStatus, TimelineMapper, ZoomLevel};
use site_schedule::settings::{Role, Settings};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ui;
use crate::ui::dialogs::NewActivityForm;

/// Main application state.
pub struct ScheduleApp {
    pub project: Project,
    pub file_path: Option<PathBuf>,
    pub settings: Settings,
    pub editor: ScheduleEditor,
    pub selected_task: Option<Uuid>,

    // Dialog state
    pub show_add_task: bool,
    pub show_about: bool,
    pub new_activity: NewActivityForm,

    pub status_message: String,
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);

        let settings = Settings::load();
        let today = chrono::Local::now().date_naive();

        let (project, file_path) = match settings.last_project.as_deref() {
            Some(path) if path.exists() => match site_schedule::io::load_project(path) {
                Ok(project) => (project, Some(path.to_path_buf())),
                Err(e) => {
                    warn!(path = %path.display(), "could not reopen last project: {}", e);
                    (Self::sample_project(today), None)
                }
            },
            _ => (Self::sample_project(today), None),
        };

        let mut app = Self {
            project,
            file_path,
            editor: ScheduleEditor::new(settings.role.can_edit_schedule()),
            settings,
            selected_task: None,
            show_add_task: false,
            show_about: false,
            new_activity: NewActivityForm::starting(today),
            status_message: "Ready".to_string(),
        };
        app.resync("Ready");
        app
    }

    /// A small residential build used when nothing else is open.
    fn sample_project(today: NaiveDate) -> Project {
        let day = |n: i64| shift_days(today, n);
        let mut project = Project::new("Sample House");

        let mut clearing = Task::new("Site clearing", day(-6), day(-3)).with_progress(100);
        clearing.status = TaskStatus::Completed;

        let mut excavation = Task::new("Excavation", day(-2), day(3))
            .with_progress(50)
            .with_dependency(Dependency::finish_to_start(clearing.id));
        excavation.status = TaskStatus::OnTrack;
        excavation.is_critical = true;

        let mut footings = Task::new("Footings", day(4), day(9))
            .with_dependency(Dependency::new(excavation.id, DependencyKind::FinishToStart, 1));
        footings.is_critical = true;
        footings.boq_item_id = Some("B-2.1".to_string());

        let drainage = Task::new("Drainage", day(0), day(6))
            .with_dependency(Dependency::new(excavation.id, DependencyKind::StartToStart, 2));

        let walls = Task::new("Blockwork walls", day(10), day(24))
            .with_dependency(Dependency::finish_to_start(footings.id));

        let backfill = Task::new("Backfill", day(8), day(11))
            .with_dependency(Dependency::new(drainage.id, DependencyKind::FinishToFinish, 5));

        project.tasks = vec![clearing, excavation, footings, drainage, walls, backfill];
        project
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.editor.release();
        self.project = Project::default();
        self.file_path = None;
        self.selected_task = None;
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Site Schedule", &["schedule.json", "json"])
            .pick_file()
        {
            match site_schedule::io::load_project(&path) {
                Ok(project) => {
                    self.editor.release();
                    self.project = project;
                    self.selected_task = None;
                    self.remember_project(path);
                    self.resync("Project loaded");
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.project.touch();
            match site_schedule::io::save_project(&self.project, &path) {
                Ok(()) => self.status_message = "Project saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Site Schedule", &["schedule.json", "json"])
            .set_file_name(format!("{}.schedule.json", self.project.name))
            .save_file()
        {
            self.project.touch();
            match site_schedule::io::save_project(&self.project, &path) {
                Ok(()) => {
                    self.remember_project(path);
                    self.status_message = "Project saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if !self.project.tasks.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match site_schedule::io::csv_import::import_csv(&path) {
                Ok(import) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported Project")
                        .to_string();
                    let count = import.tasks.len();
                    self.editor.release();
                    self.project = Project::new(name);
                    self.project.tasks = import.tasks;
                    self.file_path = None;
                    self.selected_task = None;

                    let message = if import.skipped > 0 {
                        format!("Imported {} activities ({} rows skipped)", count, import.skipped)
                    } else {
                        format!("Imported {} activities", count)
                    };
                    self.resync(&message);
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.project.tasks.is_empty() {
            self.status_message = "Nothing to export, the project has no activities".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.project.name))
            .save_file()
        {
            match site_schedule::io::csv_export::export_csv(&self.project.tasks, &path) {
                Ok(count) => self.status_message = format!("Exported {} activities to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    // --- Settings ---

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        if self.settings.zoom != zoom {
            self.settings.zoom = zoom;
            self.persist_settings();
        }
    }

    pub fn set_role(&mut self, role: Role) {
        self.settings.role = role;
        self.editor.set_editable(role.can_edit_schedule());
        self.status_message = format!("Acting as {}", role.label());
        self.persist_settings();
    }

    fn remember_project(&mut self, path: PathBuf) {
        self.settings.last_project = Some(path.clone());
        self.file_path = Some(path);
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!("could not save settings: {}", e);
        }
    }

    // --- Schedule operations ---

    /// Resolve the whole project after a structural change.
    fn resync(&mut self, message: &str) {
        let tasks = self.project.tasks.clone();
        match self.editor.resync(&tasks, &mut self.project) {
            Outcome::Settled => self.status_message = message.to_string(),
            Outcome::RoundLimit { unsatisfied } => {
                self.status_message = format!(
                    "{} · {} links could not be satisfied, check for circular dependencies",
                    message,
                    unsatisfied.len()
                );
            }
        }
    }

    /// Validate the dialog form and add the activity. Returns false when the
    /// form was rejected.
    pub fn create_task_from_dialog(&mut self) -> bool {
        if !self.editor.is_editable() {
            return false;
        }
        match self.new_activity.to_draft().into_task() {
            Ok(task) => {
                info!(task = %task.name, "activity added");
                self.selected_task = Some(task.id);
                self.project.add_task(task);
                self.resync("Activity added");
                true
            }
            Err(e) => {
                self.new_activity.error = Some(e);
                false
            }
        }
    }

    pub fn delete_task(&mut self, id: Uuid) {
        if !self.editor.is_editable() {
            return;
        }
        if self.project.remove_task(id).is_some() {
            if self.selected_task == Some(id) {
                self.selected_task = None;
            }
            self.resync("Activity deleted");
        }
    }

    fn add_dependency(&mut self, successor: Uuid, dependency: Dependency) {
        if !self.editor.is_editable() {
            return;
        }
        let predecessor = dependency.task_id;
        if self.project.add_dependency(successor, dependency) {
            let name = |id| {
                self.project
                    .task(id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default()
            };
            let message = format!("Linked '{}' → '{}'", name(predecessor), name(successor));
            self.resync(&message);
        }
    }

    fn remove_dependency(&mut self, successor: Uuid, predecessor: Uuid) {
        if self.editor.is_editable() && self.project.remove_dependency(successor, predecessor) {
            self.resync("Dependency removed");
        }
    }

    fn apply_chart(&mut self, interaction: ui::schedule_chart::ChartInteraction, mapper: &TimelineMapper) {
        if let Some(id) = interaction.select {
            self.selected_task = Some(id);
        } else if interaction.clear_selection {
            self.selected_task = None;
        }
        if interaction.zoom_in {
            self.set_zoom(self.settings.zoom.zoom_in());
        } else if interaction.zoom_out {
            self.set_zoom(self.settings.zoom.zoom_out());
        }

        if let Some((task_id, mode, anchor)) = interaction.press {
            if let Err(e) = self.editor.press(&self.project.tasks, task_id, mode, anchor, mapper) {
                debug!("gesture not started: {}", e);
            }
        }
        if let Some(pointer) = interaction.drag_to {
            let tasks = self.project.tasks.clone();
            if self.editor.drag(&tasks, pointer, &mut self.project) {
                if let Some(task) = self.selected_task.and_then(|id| self.project.task(id)) {
                    self.status_message = format!(
                        "Updated '{}' ({} → {}, {}%)",
                        task.name,
                        task.start.format("%d/%m/%Y"),
                        task.end.format("%d/%m/%Y"),
                        task.progress
                    );
                }
            }
        }
        if interaction.released {
            self.editor.release();
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_project();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Activities: {} · {} · {}",
                                self.project.tasks.len(),
                                self.settings.zoom.label(),
                                self.settings.role.label()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: activity list + editor
        let editable = self.editor.is_editable();
        let mut task_action = ui::task_table::TaskTableAction::None;
        let mut editor_action = ui::task_editor::EditorAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(320.0)
            .min_width(240.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(task) = self.selected_task.and_then(|id| self.project.task(id)) {
                    editor_action =
                        ui::task_editor::show_task_editor(task, &self.project.tasks, editable, ui);
                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(2.0);
                }
                task_action = ui::task_table::show_task_table(
                    &self.project.tasks,
                    self.selected_task,
                    editable,
                    ui,
                );
            });

        match task_action {
            ui::task_table::TaskTableAction::Select(id) => self.selected_task = Some(id),
            ui::task_table::TaskTableAction::Delete(id) => self.delete_task(id),
            ui::task_table::TaskTableAction::Add => self.show_add_task = true,
            ui::task_table::TaskTableAction::None => {}
        }

        if let Some(selected) = self.selected_task {
            match editor_action {
                ui::task_editor::EditorAction::Changed(task) => {
                    let tasks = self.project.tasks.clone();
                    if self.editor.commit_edit(&tasks, task, &mut self.project) {
                        self.status_message = "Activity updated".to_string();
                    }
                }
                ui::task_editor::EditorAction::AddDependency(dep) => {
                    self.add_dependency(selected, dep);
                }
                ui::task_editor::EditorAction::RemoveDependency(predecessor) => {
                    self.remove_dependency(selected, predecessor);
                }
                ui::task_editor::EditorAction::None => {}
            }
        }

        // Central panel: schedule chart. A running gesture keeps its own
        // coordinate space until release.
        let mapper = self.editor.gesture_mapper().cloned().unwrap_or_else(|| {
            TimelineMapper::for_today(&self.project.tasks, self.settings.day_width())
        });
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::schedule_chart::show_schedule_chart(
                    &self.project.tasks,
                    &mapper,
                    self.selected_task,
                    editable,
                    self.settings.edge_handle_width,
                    ui,
                )
            })
            .inner;
        self.apply_chart(interaction, &mapper);

        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
