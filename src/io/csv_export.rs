use std::collections::HashMap;
use std::path::Path;

use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Task;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Separator between entries in the predecessors column. Task names may
/// contain commas, so exported files use a bar.
pub const PREDECESSOR_SEPARATOR: &str = " | ";

/// Predecessor column text, e.g. `Excavation FS+2 | Survey SS`.
/// Edges to tasks outside `tasks` are left out.
fn predecessors_cell(task: &Task, names: &HashMap<Uuid, &str>) -> String {
    task.dependencies
        .iter()
        .filter_map(|d| names.get(&d.task_id).map(|name| format!("{} {}", name, d.label())))
        .collect::<Vec<_>>()
        .join(PREDECESSOR_SEPARATOR)
}

/// Write tasks as semicolon-delimited CSV matching the import format.
///
/// Columns: Task Label ; Start Date ; End Date ; Status ; Progress ; Predecessors ; BOQ Item
/// Dates are formatted as DD/MM/YYYY.
/// Returns the number of tasks written.
pub fn write_csv<W: std::io::Write>(tasks: &[Task], writer: W) -> Result<usize, StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record([
        "Task Label",
        "Start Date",
        "End Date",
        "Status",
        "Progress",
        "Predecessors",
        "BOQ Item",
    ])?;

    let names: HashMap<Uuid, &str> = tasks.iter().map(|t| (t.id, t.name.as_str())).collect();
    for task in tasks {
        let start = task.start.format(DATE_FORMAT).to_string();
        let end = task.end.format(DATE_FORMAT).to_string();
        let progress = format!("{}%", task.progress);
        let predecessors = predecessors_cell(task, &names);
        wtr.write_record([
            task.name.as_str(),
            start.as_str(),
            end.as_str(),
            task.status.label(),
            progress.as_str(),
            predecessors.as_str(),
            task.boq_item_id.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(tasks.len())
}

/// Export tasks to a CSV file.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize, StoreError> {
    let file = std::fs::File::create(path)?;
    write_csv(tasks, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, DependencyKind, TaskStatus};
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn rows_carry_status_progress_and_predecessors() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let dig = Task::new("Excavation", d(1), d(4));
        let mut pour = Task::new("Pour footings", d(6), d(7))
            .with_progress(40)
            .with_dependency(Dependency::new(dig.id, DependencyKind::FinishToStart, 1))
            .with_dependency(Dependency::new(dig.id, DependencyKind::StartToStart, 0))
            .with_dependency(Dependency::finish_to_start(Uuid::new_v4()));
        pour.status = TaskStatus::Delayed;
        pour.boq_item_id = Some("C-4.2".to_string());

        let mut out = Vec::new();
        let written = write_csv(&[dig, pour], &mut out).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Task Label;Start Date;End Date;Status;Progress;Predecessors;BOQ Item");
        assert_eq!(lines[1], "Excavation;01/05/2025;04/05/2025;Not Started;0%;;");
        assert_eq!(lines[2], "Pour footings;06/05/2025;07/05/2025;Delayed;40%;Excavation FS+1 | Excavation SS;C-4.2");
    }
}
