//! End-to-end scenarios: form edits, drags and rejected resizes flowing
//! through the editor into a project.

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use site_schedule::engine::{GestureMode, ScheduleEditor};
use site_schedule::model::task::shift_days;
use site_schedule::model::{Dependency, DependencyKind, Project, Task, TaskDraft, TimelineMapper};
use site_schedule::{io, DraftError};

const DAY_WIDTH: f32 = 16.0;

fn day(n: i64) -> NaiveDate {
    shift_days(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), n - 1)
}

/// A runs days 1-5, B follows it finish-to-start.
#[fixture]
fn linked_pair() -> Project {
    let mut project = Project::new("Warehouse");
    let a = Task::new("Ground beams", day(1), day(5));
    let b = Task::new("Ground slab", day(6), day(8))
        .with_dependency(Dependency::finish_to_start(a.id));
    project.tasks = vec![a, b];
    project
}

#[rstest]
fn extending_a_predecessor_pushes_its_successor(mut linked_pair: Project) {
    let editor = ScheduleEditor::new(true);
    let mut a = linked_pair.tasks[0].clone();
    a.end = day(8);

    let tasks = linked_pair.tasks.clone();
    assert!(editor.commit_edit(&tasks, a, &mut linked_pair));

    let b = &linked_pair.tasks[1];
    assert_eq!(b.start, day(9));
    assert_eq!(b.end, day(11));
    assert_eq!(b.duration_days(), 2);
}

#[rstest]
fn dragging_a_bar_three_days_cascades(mut linked_pair: Project) {
    let mapper = TimelineMapper::new(&linked_pair.tasks, DAY_WIDTH, day(1));
    let mut editor = ScheduleEditor::new(true);
    let a = linked_pair.tasks[0].id;
    let anchor = mapper.date_to_offset(day(3));

    editor
        .press(&linked_pair.tasks, a, GestureMode::Move, anchor, &mapper)
        .unwrap();
    for days in 1..=3 {
        let tasks = linked_pair.tasks.clone();
        let pointer = anchor + days as f32 * DAY_WIDTH;
        assert!(editor.drag(&tasks, pointer, &mut linked_pair));
    }
    let session = editor.release().unwrap();
    assert_eq!(session.original.start, day(1));

    let [a, b] = &linked_pair.tasks[..] else {
        panic!("expected two tasks");
    };
    assert_eq!((a.start, a.end), (day(4), day(8)));
    assert_eq!((b.start, b.end), (day(9), day(11)));
}

#[rstest]
fn resize_start_past_the_end_is_rejected() {
    let frame = Task::new("Steel frame", day(10), day(20));
    let mut project = Project::new("Depot");
    project.tasks = vec![frame];
    let mapper = TimelineMapper::new(&project.tasks, DAY_WIDTH, day(1));
    let mut editor = ScheduleEditor::new(true);
    let id = project.tasks[0].id;
    let anchor = mapper.date_to_offset(day(10));

    editor
        .press(&project.tasks, id, GestureMode::ResizeStart, anchor, &mapper)
        .unwrap();
    let before = project.tasks.clone();
    let pointer = mapper.date_to_offset(day(25));
    assert!(!editor.drag(&before, pointer, &mut project));
    assert_eq!(project.tasks, before);

    // A legal frame in the same gesture still applies.
    let pointer = mapper.date_to_offset(day(12));
    assert!(editor.drag(&before, pointer, &mut project));
    assert_eq!(project.tasks[0].start, day(12));
    assert_eq!(project.tasks[0].end, day(20));
}

#[rstest]
fn read_only_users_cannot_start_gestures(linked_pair: Project) {
    let mapper = TimelineMapper::new(&linked_pair.tasks, DAY_WIDTH, day(1));
    let mut editor = ScheduleEditor::new(false);
    let a = linked_pair.tasks[0].id;
    assert!(editor
        .press(&linked_pair.tasks, a, GestureMode::Move, 0.0, &mapper)
        .is_err());
    assert!(editor.active_gesture().is_none());
}

#[rstest]
fn progress_drag_leaves_dates_alone(mut linked_pair: Project) {
    let mapper = TimelineMapper::new(&linked_pair.tasks, DAY_WIDTH, day(1));
    let mut editor = ScheduleEditor::new(true);
    let a = linked_pair.tasks[0].id;
    let bar = mapper.bar_span(day(1), day(5));

    editor
        .press(&linked_pair.tasks, a, GestureMode::Progress, bar.left, &mapper)
        .unwrap();
    let tasks = linked_pair.tasks.clone();
    assert!(editor.drag(&tasks, bar.left + bar.width * 0.6, &mut linked_pair));
    editor.release();

    assert_eq!(linked_pair.tasks[0].progress, 60);
    assert_eq!(linked_pair.tasks[0].start, day(1));
    assert_eq!(linked_pair.tasks[1].start, day(6));
}

#[rstest]
fn new_activities_join_through_the_editor(mut linked_pair: Project) {
    let editor = ScheduleEditor::new(true);
    let slab = linked_pair.tasks[1].id;

    let mut draft = TaskDraft::new("Racking", day(2), day(4));
    draft.dependencies.push(Dependency::new(slab, DependencyKind::FinishToStart, 2));
    linked_pair.add_task(draft.into_task().unwrap());

    let tasks = linked_pair.tasks.clone();
    editor.resync(&tasks, &mut linked_pair);
    let racking = &linked_pair.tasks[2];
    assert_eq!(racking.start, day(11));
    assert_eq!(racking.end, day(13));

    let blank = TaskDraft::new("   ", day(2), day(4));
    assert_eq!(blank.into_task(), Err(DraftError::EmptyName));
}

#[rstest]
fn saved_projects_reload_with_links(linked_pair: Project) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.schedule.json");
    io::save_project(&linked_pair, &path).unwrap();

    let loaded = io::load_project(&path).unwrap();
    assert_eq!(loaded.tasks, linked_pair.tasks);
    assert_eq!(
        loaded.tasks[1].dependencies,
        vec![Dependency::finish_to_start(loaded.tasks[0].id)]
    );
}
