use tracing::debug;
use uuid::Uuid;

use super::gesture::{GestureController, GestureMode, GestureSession};
use super::resolver::{resolve, resolve_with_report, Outcome};
use crate::error::GestureError;
use crate::model::project::ProjectUpdate;
use crate::model::task::Task;
use crate::model::timeline::TimelineMapper;

/// A gesture together with the coordinate space it started in.
///
/// The mapper stays fixed until release so that a task dragged past the
/// timeline origin cannot shift the origin under the pointer.
#[derive(Debug, Clone)]
struct ActiveGesture {
    session: GestureSession,
    mapper: TimelineMapper,
}

/// Everything a schedule view needs to turn user edits into persisted,
/// dependency-consistent task lists.
///
/// Holds at most one gesture at a time.
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    controller: GestureController,
    gesture: Option<ActiveGesture>,
}

impl ScheduleEditor {
    pub fn new(editable: bool) -> Self {
        Self {
            controller: GestureController::new(editable),
            gesture: None,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.controller.is_editable()
    }

    /// Change edit permission. Losing it drops any active gesture.
    pub fn set_editable(&mut self, editable: bool) {
        self.controller.set_editable(editable);
        if !editable {
            self.gesture = None;
        }
    }

    pub fn active_gesture(&self) -> Option<&GestureSession> {
        self.gesture.as_ref().map(|g| &g.session)
    }

    /// Coordinate space of the active gesture. Views should render with it
    /// until release.
    pub fn gesture_mapper(&self) -> Option<&TimelineMapper> {
        self.gesture.as_ref().map(|g| &g.mapper)
    }

    /// Press on a task bar region. `anchor_offset` is in `mapper` coordinates.
    pub fn press(
        &mut self,
        tasks: &[Task],
        task_id: Uuid,
        mode: GestureMode,
        anchor_offset: f32,
        mapper: &TimelineMapper,
    ) -> Result<(), GestureError> {
        if self.gesture.is_some() {
            return Err(GestureError::GestureInProgress);
        }
        let session = self.controller.begin(tasks, task_id, mode, anchor_offset)?;
        self.gesture = Some(ActiveGesture {
            session,
            mapper: mapper.clone(),
        });
        Ok(())
    }

    /// Pointer moved while pressed. Persists the resolved schedule on
    /// accepted frames and reports whether anything was handed to `sink`.
    pub fn drag<S: ProjectUpdate + ?Sized>(
        &mut self,
        tasks: &[Task],
        pointer_offset: f32,
        sink: &mut S,
    ) -> bool {
        let Some(active) = &self.gesture else {
            return false;
        };
        match self
            .controller
            .update(&active.session, tasks, pointer_offset, &active.mapper)
        {
            Some(resolved) => {
                sink.update_tasks(resolved);
                true
            }
            None => false,
        }
    }

    /// Pointer released. Returns the finished session, if there was one.
    pub fn release(&mut self) -> Option<GestureSession> {
        let active = self.gesture.take()?;
        self.controller.end(&active.session);
        Some(active.session)
    }

    /// Apply a form edit to one task, then resolve and persist the whole list.
    ///
    /// Returns false, leaving `sink` untouched, when the schedule is read-only
    /// or the task is not in `tasks`.
    pub fn commit_edit<S: ProjectUpdate + ?Sized>(
        &self,
        tasks: &[Task],
        edited: Task,
        sink: &mut S,
    ) -> bool {
        if !self.is_editable() {
            return false;
        }
        let Some(index) = tasks.iter().position(|t| t.id == edited.id) else {
            debug!(task = %edited.id, "edit for unknown task ignored");
            return false;
        };
        let mut updated = tasks.to_vec();
        updated[index] = edited;
        sink.update_tasks(resolve(&updated));
        true
    }

    /// Re-resolve after a structural change such as adding or removing a task
    /// or dependency, and persist the result.
    pub fn resync<S: ProjectUpdate + ?Sized>(&self, tasks: &[Task], sink: &mut S) -> Outcome {
        let resolution = resolve_with_report(tasks);
        sink.update_tasks(resolution.tasks);
        resolution.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{shift_days, Dependency};
    use crate::model::Project;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn day(n: i64) -> NaiveDate {
        shift_days(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), n - 1)
    }

    #[fixture]
    fn project() -> Project {
        let mut project = Project::new("Clinic extension");
        let walls = Task::new("Walls", day(1), day(5));
        let roof = Task::new("Roof", day(6), day(9))
            .with_dependency(Dependency::finish_to_start(walls.id));
        project.tasks = vec![walls, roof];
        project
    }

    #[rstest]
    fn drag_persists_each_accepted_frame(mut project: Project) {
        let mapper = TimelineMapper::new(&project.tasks, 10.0, day(1));
        let mut editor = ScheduleEditor::new(true);
        let walls = project.tasks[0].id;

        editor
            .press(&project.tasks, walls, GestureMode::ResizeEnd, 50.0, &mapper)
            .unwrap();
        for pointer in [60.0, 70.0] {
            let tasks = project.tasks.clone();
            assert!(editor.drag(&tasks, pointer, &mut project));
        }
        assert_eq!(project.tasks[0].end, day(7));
        assert_eq!(project.tasks[1].start, day(8));

        let tasks = project.tasks.clone();
        assert!(!editor.drag(&tasks, -500.0, &mut project));
        assert_eq!(project.tasks[0].end, day(7));

        assert!(editor.release().is_some());
        assert!(editor.active_gesture().is_none());
        assert!(!editor.drag(&tasks, 90.0, &mut project));
    }

    #[rstest]
    fn only_one_gesture_at_a_time(project: Project) {
        let mapper = TimelineMapper::new(&project.tasks, 10.0, day(1));
        let mut editor = ScheduleEditor::new(true);
        let walls = project.tasks[0].id;
        editor
            .press(&project.tasks, walls, GestureMode::Move, 0.0, &mapper)
            .unwrap();
        assert_eq!(
            editor.press(&project.tasks, walls, GestureMode::Move, 0.0, &mapper),
            Err(GestureError::GestureInProgress)
        );
        editor.set_editable(false);
        assert!(editor.active_gesture().is_none());
    }

    #[rstest]
    fn mapper_stays_fixed_while_dragging_past_the_origin(mut project: Project) {
        let mapper = TimelineMapper::new(&project.tasks, 10.0, day(1));
        let mut editor = ScheduleEditor::new(true);
        let walls = project.tasks[0].id;
        editor
            .press(&project.tasks, walls, GestureMode::Move, 100.0, &mapper)
            .unwrap();

        for pointer in [0.0, -50.0] {
            let tasks = project.tasks.clone();
            assert!(editor.drag(&tasks, pointer, &mut project));
        }
        assert_eq!(project.tasks[0].start, day(-14));
        assert_eq!(editor.gesture_mapper(), Some(&mapper));
    }

    #[rstest]
    fn form_edits_cascade(mut project: Project) {
        let editor = ScheduleEditor::new(true);
        let mut walls = project.tasks[0].clone();
        walls.end = day(8);
        let tasks = project.tasks.clone();
        assert!(editor.commit_edit(&tasks, walls, &mut project));
        assert_eq!(project.tasks[1].start, day(9));
        assert_eq!(project.tasks[1].duration_days(), 3);
    }

    #[rstest]
    fn read_only_form_edits_are_ignored(mut project: Project) {
        let editor = ScheduleEditor::new(false);
        let mut walls = project.tasks[0].clone();
        walls.end = day(8);
        let tasks = project.tasks.clone();
        assert!(!editor.commit_edit(&tasks, walls, &mut project));
        assert_eq!(project.tasks, tasks);
    }

    #[rstest]
    fn resync_reports_cycles(mut project: Project) {
        let roof = project.tasks[1].id;
        project.tasks[0]
            .dependencies
            .push(Dependency::finish_to_start(roof));
        let editor = ScheduleEditor::new(true);
        let tasks = project.tasks.clone();
        let outcome = editor.resync(&tasks, &mut project);
        assert!(matches!(outcome, Outcome::RoundLimit { .. }));
    }
}
