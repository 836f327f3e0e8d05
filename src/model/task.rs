use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Shift a date by a signed number of days, saturating at the calendar limits.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Represents the type of precedence relation between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

/// A lower bound a dependency places on one boundary of its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    StartNoEarlierThan(NaiveDate),
    EndNoEarlierThan(NaiveDate),
}

impl Constraint {
    /// Whether the given successor dates honour this bound.
    pub fn is_met_by(self, start: NaiveDate, end: NaiveDate) -> bool {
        match self {
            Constraint::StartNoEarlierThan(bound) => start >= bound,
            Constraint::EndNoEarlierThan(bound) => end >= bound,
        }
    }
}

impl DependencyKind {
    pub fn all() -> &'static [DependencyKind] {
        &[
            DependencyKind::FinishToStart,
            DependencyKind::StartToStart,
            DependencyKind::FinishToFinish,
            DependencyKind::StartToFinish,
        ]
    }

    pub fn short_label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }

    pub fn from_short_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "FS" => Some(DependencyKind::FinishToStart),
            "SS" => Some(DependencyKind::StartToStart),
            "FF" => Some(DependencyKind::FinishToFinish),
            "SF" => Some(DependencyKind::StartToFinish),
            _ => None,
        }
    }

    /// Evaluate this relation against a predecessor's current dates.
    ///
    /// Finish-to-start always leaves one clear day after the predecessor
    /// finishes, on top of the lag.
    pub fn constraint(self, predecessor: &Task, lag: i64) -> Constraint {
        match self {
            DependencyKind::FinishToStart => Constraint::StartNoEarlierThan(shift_days(
                predecessor.end,
                lag.saturating_add(1),
            )),
            DependencyKind::StartToStart => {
                Constraint::StartNoEarlierThan(shift_days(predecessor.start, lag))
            }
            DependencyKind::FinishToFinish => {
                Constraint::EndNoEarlierThan(shift_days(predecessor.end, lag))
            }
            DependencyKind::StartToFinish => {
                Constraint::EndNoEarlierThan(shift_days(predecessor.start, lag))
            }
        }
    }
}

/// A precedence edge pointing at one of this task's predecessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub task_id: Uuid,
    pub kind: DependencyKind,
    /// Signed day offset; negative values are lead time.
    #[serde(default)]
    pub lag: i64,
}

impl Dependency {
    pub fn new(task_id: Uuid, kind: DependencyKind, lag: i64) -> Self {
        Self { task_id, kind, lag }
    }

    pub fn finish_to_start(task_id: Uuid) -> Self {
        Self::new(task_id, DependencyKind::FinishToStart, 0)
    }

    /// Compact label such as `FS+2` or `SS-1`.
    pub fn label(&self) -> String {
        match self.lag {
            0 => self.kind.short_label().to_string(),
            lag if lag > 0 => format!("{}+{}", self.kind.short_label(), lag),
            lag => format!("{}{}", self.kind.short_label(), lag),
        }
    }
}

/// Informational status shown next to a task. Never read by the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    OnTrack,
    Delayed,
    Completed,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::NotStarted,
            TaskStatus::OnTrack,
            TaskStatus::Delayed,
            TaskStatus::Completed,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::OnTrack => "On Track",
            TaskStatus::Delayed => "Delayed",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "not started" | "new" | "planned" => Some(TaskStatus::NotStarted),
            "on track" | "in progress" | "active" | "started" => Some(TaskStatus::OnTrack),
            "delayed" | "late" | "behind" => Some(TaskStatus::Delayed),
            "completed" | "complete" | "done" | "finished" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Reads a stored percentage, clamping anything above 100.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    Ok(value.min(100) as u8)
}

/// A schedulable activity on the project timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// First working day, inclusive.
    pub start: NaiveDate,
    /// Last working day, inclusive.
    pub end: NaiveDate,
    /// Percent complete, 0 to 100.
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: u8,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub is_critical: bool,
    /// Predecessor edges, evaluated in order.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Back-reference to a bill-of-quantities line item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boq_item_id: Option<String>,
}

impl Task {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
            progress: 0,
            status: TaskStatus::NotStarted,
            is_critical: false,
            dependencies: Vec::new(),
            boq_item_id: None,
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Whole days between start and end (zero for a single-day task).
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn depends_on(&self, predecessor: Uuid) -> bool {
        self.dependencies.iter().any(|d| d.task_id == predecessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[rstest]
    #[case(DependencyKind::FinishToStart, 2, Constraint::StartNoEarlierThan(day(13)))]
    #[case(DependencyKind::StartToStart, 0, Constraint::StartNoEarlierThan(day(5)))]
    #[case(DependencyKind::FinishToFinish, -1, Constraint::EndNoEarlierThan(day(9)))]
    #[case(DependencyKind::StartToFinish, 3, Constraint::EndNoEarlierThan(day(8)))]
    fn kinds_evaluate_against_the_right_boundary(
        #[case] kind: DependencyKind,
        #[case] lag: i64,
        #[case] expected: Constraint,
    ) {
        let predecessor = Task::new("Excavation", day(5), day(10));
        assert_eq!(kind.constraint(&predecessor, lag), expected);
    }

    #[rstest]
    fn extreme_lag_saturates() {
        let predecessor = Task::new("Survey", day(1), day(2));
        let bound = DependencyKind::FinishToStart.constraint(&predecessor, i64::MAX);
        assert_eq!(bound, Constraint::StartNoEarlierThan(NaiveDate::MAX));
    }

    #[rstest]
    #[case("fs", Some(DependencyKind::FinishToStart))]
    #[case(" SF ", Some(DependencyKind::StartToFinish))]
    #[case("XX", None)]
    fn short_labels_parse(#[case] label: &str, #[case] expected: Option<DependencyKind>) {
        assert_eq!(DependencyKind::from_short_label(label), expected);
    }

    #[rstest]
    fn dependency_label_includes_signed_lag() {
        let id = Uuid::new_v4();
        assert_eq!(Dependency::new(id, DependencyKind::FinishToStart, 2).label(), "FS+2");
        assert_eq!(Dependency::new(id, DependencyKind::StartToStart, -3).label(), "SS-3");
        assert_eq!(Dependency::new(id, DependencyKind::FinishToFinish, 0).label(), "FF");
    }

    #[rstest]
    fn dependency_kind_serializes_as_short_code() {
        let json = serde_json::to_string(&DependencyKind::StartToFinish).unwrap();
        assert_eq!(json, "\"SF\"");
    }

    #[rstest]
    #[case(250, 100)]
    #[case(100, 100)]
    #[case(37, 37)]
    fn stored_progress_is_clamped_on_load(#[case] stored: u64, #[case] expected: u8) {
        let json = format!(
            r#"{{"id":"{}","name":"Roof","start":"2025-03-01","end":"2025-03-04","progress":{}}}"#,
            Uuid::new_v4(),
            stored
        );
        let task: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task.progress, expected);
    }

    #[rstest]
    fn progress_is_clamped() {
        let task = Task::new("Pour slab", day(1), day(3)).with_progress(140);
        assert_eq!(task.progress, 100);
        assert_eq!(task.duration_days(), 2);
    }
}
