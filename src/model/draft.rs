use chrono::NaiveDate;

use super::task::{Dependency, Task, TaskStatus};
use crate::error::DraftError;

/// Form state for a new activity, validated before it ever reaches the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: TaskStatus,
    pub is_critical: bool,
    pub dependencies: Vec<Dependency>,
    pub boq_item_id: Option<String>,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// Check the required fields and build the task.
    pub fn into_task(self) -> Result<Task, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        let start = self.start.ok_or(DraftError::MissingStart)?;
        let end = self.end.ok_or(DraftError::MissingEnd)?;
        if end < start {
            return Err(DraftError::EndBeforeStart { start, end });
        }

        let mut task = Task::new(name, start, end);
        task.status = self.status;
        task.is_critical = self.is_critical;
        task.dependencies = self.dependencies;
        task.boq_item_id = self.boq_item_id.filter(|id| !id.trim().is_empty());
        Ok(task)
    }
}
