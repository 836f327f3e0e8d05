use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Dependency, DependencyKind, Task, TaskStatus};

/// Tasks read from a CSV file, plus the number of rows that were skipped.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub tasks: Vec<Task>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Name,
    Start,
    End,
    Status,
    Progress,
    Predecessors,
    BoqItem,
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => {
            Some(Column::End)
        }
        "status" | "state" | "stage" => Some(Column::Status),
        "progress" | "complete" | "%complete" | "percentcomplete" | "done" => Some(Column::Progress),
        "predecessors" | "dependencies" | "dependson" | "after" => Some(Column::Predecessors),
        "boq" | "boqitem" | "boqitemid" | "costitem" => Some(Column::BoqItem),
        _ => None,
    }
}

fn parse_progress(s: &str) -> Option<u8> {
    let value: f32 = s.trim().trim_end_matches('%').trim().parse().ok()?;
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// Split `Excavation FS+2` into the predecessor name and its relation.
/// A bare name means finish-to-start with no lag.
fn parse_predecessor(entry: &str) -> Option<(String, DependencyKind, i64)> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    if let Some((name, relation)) = entry.rsplit_once(' ') {
        if relation.len() >= 2 && relation.is_char_boundary(2) {
            let (code, lag) = relation.split_at(2);
            if let Some(kind) = DependencyKind::from_short_label(code) {
                let lag = if lag.is_empty() { Some(0) } else { lag.parse().ok() };
                if let Some(lag) = lag {
                    return Some((name.trim().to_string(), kind, lag));
                }
            }
        }
    }
    Some((entry.to_string(), DependencyKind::FinishToStart, 0))
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Task names to ids. A name shared by several tasks maps to `None`.
fn index_names(tasks: &[Task]) -> HashMap<String, Option<Uuid>> {
    let mut names: HashMap<String, Option<Uuid>> = HashMap::new();
    for task in tasks {
        names
            .entry(name_key(&task.name))
            .and_modify(|id| *id = None)
            .or_insert(Some(task.id));
    }
    names
}

/// Split a predecessors cell into entries.
///
/// Exported files separate entries with `|`; hand-written ones often use
/// commas. Adjacent pieces are rejoined, longest first, whenever together
/// they name a known task, so names containing the separator survive.
fn split_entries(cell: &str, names: &HashMap<String, Option<Uuid>>) -> Vec<String> {
    let separator = if cell.contains('|') { "|" } else { "," };
    let pieces: Vec<&str> = cell.split(separator).collect();
    let is_known = |entry: &str| {
        parse_predecessor(entry).is_some_and(|(name, _, _)| names.contains_key(&name_key(&name)))
    };

    let mut entries = Vec::new();
    let mut i = 0;
    while i < pieces.len() {
        let longest = (i + 1..pieces.len()).rev().find_map(|j| {
            let joined = pieces[i..=j].join(separator);
            is_known(&joined).then_some((j, joined))
        });
        match longest {
            Some((j, joined)) => {
                entries.push(joined);
                i = j + 1;
            }
            None => {
                entries.push(pieces[i].to_string());
                i += 1;
            }
        }
    }
    entries
}

/// Import tasks from CSV text.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly. Predecessors are resolved by task name once every row is read.
pub fn import_csv_str(content: &str) -> Result<CsvImport, StoreError> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        return Err(StoreError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks: Vec<Task> = Vec::new();
    let mut predecessor_cells: Vec<Option<String>> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, "skipping CSV row: {}", e);
                skipped += 1;
                continue;
            }
        };

        let mut fields: HashMap<Column, &str> = HashMap::new();
        for (column, field) in columns.iter().zip(record.iter()) {
            if let Some(column) = column {
                fields.entry(*column).or_insert(field);
            }
        }

        let name = match fields.get(&Column::Name) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                skipped += 1;
                continue;
            }
        };
        let Some(start) = fields.get(&Column::Start).and_then(|s| parse_date(s)) else {
            warn!(row, "skipping CSV row: invalid start date");
            skipped += 1;
            continue;
        };
        let Some(end) = fields.get(&Column::End).and_then(|s| parse_date(s)) else {
            warn!(row, "skipping CSV row: invalid end date");
            skipped += 1;
            continue;
        };

        let status = fields
            .get(&Column::Status)
            .and_then(|s| TaskStatus::parse(s))
            .unwrap_or_default();
        let progress = fields
            .get(&Column::Progress)
            .and_then(|s| parse_progress(s))
            .unwrap_or(if status == TaskStatus::Completed { 100 } else { 0 });

        let mut task = Task::new(name, start, end.max(start)).with_progress(progress);
        task.status = status;
        task.boq_item_id = fields
            .get(&Column::BoqItem)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        predecessor_cells.push(
            fields
                .get(&Column::Predecessors)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
        );
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(StoreError::NoRows { skipped });
    }

    // Second pass: resolve predecessor names to ids.
    let names = index_names(&tasks);
    for (task, cell) in tasks.iter_mut().zip(predecessor_cells) {
        let Some(cell) = cell else { continue };
        for entry in split_entries(&cell, &names) {
            let Some((name, kind, lag)) = parse_predecessor(&entry) else {
                continue;
            };
            match names.get(&name_key(&name)) {
                Some(Some(id)) if *id != task.id && !task.depends_on(*id) => {
                    task.dependencies.push(Dependency::new(*id, kind, lag));
                }
                Some(Some(_)) => {}
                Some(None) => warn!(
                    task = %task.name,
                    predecessor = %name,
                    "predecessor name is shared by several tasks, link skipped"
                ),
                None => warn!(task = %task.name, predecessor = %name, "predecessor not found"),
            }
        }
    }

    Ok(CsvImport { tasks, skipped })
}

/// Import tasks from a CSV file.
pub fn import_csv(path: &Path) -> Result<CsvImport, StoreError> {
    let content = std::fs::read_to_string(path)?;
    import_csv_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_export::write_csv;
    use rstest::rstest;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[rstest]
    fn comma_file_with_predecessors() {
        let csv = "\
Activity,Start,Finish,Status,% Complete,Depends On
Site clearing,2025-03-01,2025-03-04,Completed,,
Excavation,2025-03-05,2025-03-10,On Track,40%,Site clearing
Footings,2025-03-11,2025-03-15,,,\"Excavation FS+2, Site clearing SS\"
Ghost row,not a date,2025-03-15,,,
";
        let import = import_csv_str(csv).unwrap();
        assert_eq!(import.skipped, 1);
        assert_eq!(import.tasks.len(), 3);

        let [clearing, excavation, footings] = &import.tasks[..] else {
            panic!("expected three tasks");
        };
        assert_eq!(clearing.progress, 100);
        assert_eq!(clearing.status, TaskStatus::Completed);
        assert_eq!(excavation.start, d(3, 5));
        assert_eq!(
            excavation.dependencies,
            vec![Dependency::finish_to_start(clearing.id)]
        );
        assert_eq!(
            footings.dependencies,
            vec![
                Dependency::new(excavation.id, DependencyKind::FinishToStart, 2),
                Dependency::new(clearing.id, DependencyKind::StartToStart, 0),
            ]
        );
    }

    #[rstest]
    fn exported_schedule_imports_back() {
        let a = Task::new("Roof trusses", d(4, 1), d(4, 3));
        let b = Task::new("Roof covering", d(4, 5), d(4, 9))
            .with_progress(25)
            .with_dependency(Dependency::new(a.id, DependencyKind::FinishToStart, 1));
        let mut out = Vec::new();
        write_csv(&[a, b], &mut out).unwrap();

        let import = import_csv_str(&String::from_utf8(out).unwrap()).unwrap();
        let covering = &import.tasks[1];
        assert_eq!(covering.progress, 25);
        assert_eq!(covering.end, d(4, 9));
        assert_eq!(covering.dependencies[0].task_id, import.tasks[0].id);
        assert_eq!(covering.dependencies[0].lag, 1);
    }

    #[rstest]
    #[case::exported(None)]
    #[case::hand_written(Some("Name;Start;End;Predecessors\nWalls, north;2025-04-01;2025-04-03;\nRoof;2025-04-05;2025-04-09;Walls, north FS\n"))]
    fn predecessor_names_may_contain_commas(#[case] hand_written: Option<&str>) {
        let text = match hand_written {
            Some(text) => text.to_string(),
            None => {
                let walls = Task::new("Walls, north", d(4, 1), d(4, 3));
                let roof = Task::new("Roof", d(4, 5), d(4, 9))
                    .with_dependency(Dependency::finish_to_start(walls.id));
                let mut out = Vec::new();
                write_csv(&[walls, roof], &mut out).unwrap();
                String::from_utf8(out).unwrap()
            }
        };

        let import = import_csv_str(&text).unwrap();
        let [walls, roof] = &import.tasks[..] else {
            panic!("expected two tasks");
        };
        assert_eq!(walls.name, "Walls, north");
        assert_eq!(roof.dependencies, vec![Dependency::finish_to_start(walls.id)]);
    }

    #[rstest]
    fn exported_links_and_boq_items_survive() {
        let survey = Task::new("Survey", d(4, 1), d(4, 2));
        let mut piling = Task::new("Piling", d(4, 3), d(4, 8))
            .with_dependency(Dependency::new(survey.id, DependencyKind::StartToStart, 1));
        piling.boq_item_id = Some("D-1.3".to_string());
        let mut out = Vec::new();
        write_csv(&[survey, piling], &mut out).unwrap();

        let import = import_csv_str(&String::from_utf8(out).unwrap()).unwrap();
        let piling = &import.tasks[1];
        assert_eq!(piling.boq_item_id.as_deref(), Some("D-1.3"));
        assert_eq!(
            piling.dependencies,
            vec![Dependency::new(import.tasks[0].id, DependencyKind::StartToStart, 1)]
        );
        assert_eq!(import.tasks[0].boq_item_id, None);
    }

    #[rstest]
    fn ambiguous_predecessor_names_are_not_linked() {
        let csv = "\
Name;Start;End;Predecessors
Pour;2025-03-01;2025-03-02;
Pour;2025-03-10;2025-03-11;
Strike formwork;2025-03-12;2025-03-13;Pour
Cure;2025-03-03;2025-03-04;
Grind;2025-03-14;2025-03-15;Cure SS
";
        let import = import_csv_str(csv).unwrap();
        assert!(import.tasks[2].dependencies.is_empty());
        assert_eq!(
            import.tasks[4].dependencies,
            vec![Dependency::new(import.tasks[3].id, DependencyKind::StartToStart, 0)]
        );
    }

    #[rstest]
    fn missing_columns_are_reported() {
        let result = import_csv_str("Name;Owner\nDrainage;Sam\n");
        assert!(matches!(result, Err(StoreError::MissingColumns { .. })));
    }

    #[rstest]
    fn all_rows_invalid_is_an_error() {
        let result = import_csv_str("Name;Start;End\n;2025-01-01;2025-01-02\n");
        assert!(matches!(result, Err(StoreError::NoRows { skipped: 1 })));
    }

    #[rstest]
    #[case("Excavation", Some(("Excavation", DependencyKind::FinishToStart, 0)))]
    #[case("Site clearing SS-3", Some(("Site clearing", DependencyKind::StartToStart, -3)))]
    #[case("Final fix FF", Some(("Final fix", DependencyKind::FinishToFinish, 0)))]
    #[case("Snagging list", Some(("Snagging list", DependencyKind::FinishToStart, 0)))]
    #[case("  ", None)]
    fn predecessor_entries(
        #[case] entry: &str,
        #[case] expected: Option<(&str, DependencyKind, i64)>,
    ) {
        let parsed = parse_predecessor(entry);
        let expected = expected.map(|(n, k, l)| (n.to_string(), k, l));
        assert_eq!(parsed, expected);
    }
}
